use std::path::Path;

use serde::Serialize;

use super::archive::build_payload;
use super::constants::{CRX2_HEADER_LEN, CRX2_VERSION, CRX_MAGIC_VALUE};
use super::errors::PackError;
use super::keys::KeyMaterial;
use super::sign::sign_archive;

/// Builds a complete CRX2 package in memory.
///
/// Archive construction (including the async loader-asset read) and key
/// parsing/derivation run concurrently; `try_join!` is the join barrier,
/// so the first branch to fail rejects the whole call before any signing
/// happens.  Signing and header assembly are synchronous once both
/// branches are in.
pub async fn create<M: Serialize>(
    code: &str,
    manifest: &M,
    pem: &str,
    wrapper_path: &Path,
) -> Result<Vec<u8>, PackError> {
    let (archive, key) = tokio::try_join!(
        payload_branch(code, manifest, wrapper_path),
        derive_key(pem),
    )?;

    let signature = sign_archive(&archive, key.private())?;

    Ok(assemble(key.public_key_der(), &signature, &archive))
}

/// Same as [`create`], but writes the package to `crx_path`.  The buffer
/// is assembled fully before anything touches the filesystem.
pub async fn create_file<M: Serialize>(
    code: &str,
    manifest: &M,
    pem: &str,
    wrapper_path: &Path,
    crx_path: &Path,
) -> Result<(), PackError> {
    let crx = create(code, manifest, pem, wrapper_path).await?;
    tokio::fs::write(crx_path, &crx)
        .await
        .map_err(PackError::Write)
}

async fn payload_branch<M: Serialize>(
    code: &str,
    manifest: &M,
    wrapper_path: &Path,
) -> Result<Vec<u8>, PackError> {
    Ok(build_payload(code, manifest, wrapper_path).await?)
}

async fn derive_key(pem: &str) -> Result<KeyMaterial, PackError> {
    Ok(KeyMaterial::from_pem(pem)?)
}

/// Concatenates the CRX2 sections.
///
/// The Chrome documentation claims the header is 4-byte aligned, but in
/// reality it isn't: the public key follows the 16 header bytes directly
/// and installers rely on the unaligned offsets.
pub fn assemble(public_key: &[u8], signature: &[u8], archive: &[u8]) -> Vec<u8> {
    let mut crx =
        Vec::with_capacity(CRX2_HEADER_LEN + public_key.len() + signature.len() + archive.len());

    // Cr24 magic number, big-endian.
    crx.extend_from_slice(&CRX_MAGIC_VALUE);
    // Format version, then the two section lengths, little-endian.
    crx.extend_from_slice(&CRX2_VERSION.to_le_bytes());
    crx.extend_from_slice(&(public_key.len() as u32).to_le_bytes());
    crx.extend_from_slice(&(signature.len() as u32).to_le_bytes());

    crx.extend_from_slice(public_key);
    crx.extend_from_slice(signature);
    crx.extend_from_slice(archive);

    crx
}
