use std::collections::HashSet;
use std::io::{Cursor, Write};

use serde::Serialize;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use super::constants::{CODE_ENTRY_NAME, MANIFEST_ENTRY_NAME, WRAPPER_ENTRY_NAME};
use super::errors::ArchiveError;
use super::types::ArchiveEntry;

/// Wraps the payload in an IIFE.  The script gets injected straight into
/// the page's global scope, while the Greasemonkey runtime it was written
/// for wraps userscripts in its own context, so without this the payload
/// would leak identifiers into the page.
pub fn wrap_code(code: &str) -> String {
    format!("!function(){{\n{}\n}}()", code)
}

/// The three fixed entries of the inner archive, in their fixed order.
pub fn payload_entries<M: Serialize>(
    code: &str,
    manifest: &M,
    wrapper: Vec<u8>,
) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    Ok(vec![
        ArchiveEntry::new(CODE_ENTRY_NAME, wrap_code(code).into_bytes()),
        ArchiveEntry::new(WRAPPER_ENTRY_NAME, wrapper),
        ArchiveEntry::new(MANIFEST_ENTRY_NAME, serde_json::to_vec(manifest)?),
    ])
}

/// Reads the loader asset and materializes the full inner archive.  The
/// asset is resolved per invocation rather than once per process, so two
/// builds can point at different loaders.
pub async fn build_payload<M: Serialize>(
    code: &str,
    manifest: &M,
    wrapper_path: &std::path::Path,
) -> Result<Vec<u8>, ArchiveError> {
    let wrapper = tokio::fs::read(wrapper_path).await?;
    let entries = payload_entries(code, manifest, wrapper)?;
    write_archive(&entries)
}

/// Serializes the entries into a single zip buffer.  The buffer is
/// materialized fully so that the signer and the package assembler can
/// both read the exact same bytes without a shared stream.
pub fn write_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.name.as_str()) {
            return Err(ArchiveError::DuplicateEntry(entry.name.clone()));
        }
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in entries {
        let method = if entry.compress {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        };
        let options = SimpleFileOptions::default().compression_method(method);
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}
