use std::path::Path;

use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::archive::build_payload;
use super::constants::{CRX3_VERSION, CRX_MAGIC_VALUE};
use super::errors::{PackError, SignatureError};
use super::keys::KeyMaterial;

/// Domain-separation prefix the installer hashes before the signed data.
const SIGNED_DATA_CONTEXT: &[u8] = b"CRX3 SignedData\x00";

/// Protobuf field numbers of the CrxFileHeader message.
const PROOF_SHA256_WITH_RSA_FIELD: u64 = 2;
const SIGNED_HEADER_DATA_FIELD: u64 = 10000;

/// Protobuf field numbers of the AsymmetricKeyProof message.
const PROOF_PUBLIC_KEY_FIELD: u64 = 1;
const PROOF_SIGNATURE_FIELD: u64 = 2;

/// Protobuf field number of SignedData.crx_id.
const SIGNED_DATA_CRX_ID_FIELD: u64 = 1;

const CRX_ID_LEN: usize = 16;

/// Builds a CRX3 package and writes it to `crx_path`.
///
/// Same inner archive as the v2 path, different envelope: the header is a
/// protobuf CrxFileHeader carrying an RSA/SHA-256 proof and the signed
/// extension id, framed as `"Cr24" | u32le(3) | u32le(header_len)`.
/// Nothing is written until signing has succeeded.
pub async fn create_crx3<M: Serialize>(
    code: &str,
    manifest: &M,
    key_path: &Path,
    crx_path: &Path,
    wrapper_path: &Path,
) -> Result<(), PackError> {
    let (archive, key) = tokio::try_join!(
        payload_branch(code, manifest, wrapper_path),
        load_key(key_path),
    )?;

    let crx = assemble_crx3(&archive, &key)?;

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

async fn load_key(path: &Path) -> Result<KeyMaterial, PackError> {
    Ok(KeyMaterial::from_pem_file(path).await?)
}

fn assemble_crx3(archive: &[u8], key: &KeyMaterial) -> Result<Vec<u8>, PackError> {
    let signed_header_data = encode_signed_data(key.public_key_der());

    // The proof signs: context | u32le(len(signed_header_data)) |
    // signed_header_data | archive.
    let mut message = Vec::with_capacity(
        SIGNED_DATA_CONTEXT.len() + 4 + signed_header_data.len() + archive.len(),
    );
    message.extend_from_slice(SIGNED_DATA_CONTEXT);
    message.extend_from_slice(&(signed_header_data.len() as u32).to_le_bytes());
    message.extend_from_slice(&signed_header_data);
    message.extend_from_slice(archive);

    let signing_key = SigningKey::<Sha256>::new(key.private().clone());
    let signature = signing_key
        .try_sign(&message)
        .map_err(SignatureError::Sign)?
        .to_vec();

    let mut proof = Vec::new();
    put_bytes_field(PROOF_PUBLIC_KEY_FIELD, key.public_key_der(), &mut proof);
    put_bytes_field(PROOF_SIGNATURE_FIELD, &signature, &mut proof);

    let mut header = Vec::new();
    put_bytes_field(PROOF_SHA256_WITH_RSA_FIELD, &proof, &mut header);
    put_bytes_field(SIGNED_HEADER_DATA_FIELD, &signed_header_data, &mut header);

    let mut crx = Vec::with_capacity(12 + header.len() + archive.len());
    crx.extend_from_slice(&CRX_MAGIC_VALUE);
    crx.extend_from_slice(&CRX3_VERSION.to_le_bytes());
    crx.extend_from_slice(&(header.len() as u32).to_le_bytes());
    crx.extend_from_slice(&header);
    crx.extend_from_slice(archive);

    Ok(crx)
}

/// SignedData { crx_id }, where the id is the first 16 bytes of the
/// SHA-256 of the public key's SPKI encoding.
fn encode_signed_data(public_key_der: &[u8]) -> Vec<u8> {
    let digest = Sha256::digest(public_key_der);

    let mut signed_data = Vec::new();
    put_bytes_field(SIGNED_DATA_CRX_ID_FIELD, &digest[..CRX_ID_LEN], &mut signed_data);
    signed_data
}

/// Appends a length-delimited protobuf field (wire type 2).  The header
/// only uses this wire type, so a full protobuf encoder isn't needed.
fn put_bytes_field(field: u64, bytes: &[u8], out: &mut Vec<u8>) {
    put_varint(field << 3 | 2, out);
    put_varint(bytes.len() as u64, out);
    out.extend_from_slice(bytes);
}

fn put_varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}
