pub mod crx;

#[cfg(test)]
mod tests {
    use crate::crx::archive::{payload_entries, wrap_code, write_archive};
    use crate::crx::constants::{CODE_ENTRY_NAME, MANIFEST_ENTRY_NAME, WRAPPER_ENTRY_NAME};
    use crate::crx::errors::{ArchiveError, KeyError, PackError};
    use crate::crx::keys::KeyMaterial;
    use crate::crx::pack::assemble;
    use crate::crx::sign::sign_archive;
    use crate::crx::types::{ArchiveEntry, CrxPackage};
    use serde_json::json;
    use std::io::Read;
    use std::{env, fs};
    use zip::ZipArchive;

    fn test_key_pem() -> String {
        let current_dir = env::current_dir().expect("Failed to get current directory");
        fs::read_to_string(current_dir.join("src/mock/test-key.pem"))
            .expect("Failed to read test key")
    }

    #[test]
    fn test_wrap_code_isolates_payload() {
        let wrapped = wrap_code("console.log(1)");
        assert_eq!(wrapped, "!function(){\nconsole.log(1)\n}()");
    }

    #[test]
    fn test_archive_contains_fixed_entries_in_order() {
        let manifest = json!({ "manifest_version": 2 });
        let entries = payload_entries("console.log(1)", &manifest, b"wrapper".to_vec())
            .expect("Failed to build entries");
        let zip_bytes = write_archive(&entries).expect("Failed to write archive");

        let cursor = std::io::Cursor::new(&zip_bytes);
        let mut archive = ZipArchive::new(cursor).expect("Should be able to read the zip data");

        assert_eq!(archive.len(), 3, "Archive should have exactly three entries");

        let expected = [CODE_ENTRY_NAME, WRAPPER_ENTRY_NAME, MANIFEST_ENTRY_NAME];
        for (i, name) in expected.iter().enumerate() {
            let file = archive.by_index(i).expect("Should be able to read entry");
            assert_eq!(&file.name(), name, "Entry order should be fixed");
        }

        let mut manifest_json = String::new();
        archive
            .by_name(MANIFEST_ENTRY_NAME)
            .expect("Manifest entry should exist")
            .read_to_string(&mut manifest_json)
            .expect("Should be able to read manifest entry");
        assert_eq!(manifest_json, r#"{"manifest_version":2}"#);
    }

    #[test]
    fn test_duplicate_entry_names_are_rejected() {
        let entries = vec![
            ArchiveEntry::new("a.txt", b"one".to_vec()),
            ArchiveEntry::new("a.txt", b"two".to_vec()),
        ];

        let err = write_archive(&entries).expect_err("Duplicate names should fail");
        assert!(matches!(err, ArchiveError::DuplicateEntry(name) if name == "a.txt"));
    }

    #[test]
    fn test_stored_entry_roundtrips() {
        let entries = vec![ArchiveEntry::stored("raw.bin", vec![0u8; 64])];
        let zip_bytes = write_archive(&entries).expect("Failed to write archive");

        let cursor = std::io::Cursor::new(&zip_bytes);
        let mut archive = ZipArchive::new(cursor).expect("Should be able to read the zip data");
        let mut file = archive.by_index(0).expect("Entry should exist");

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).expect("Should read entry");
        assert_eq!(contents, vec![0u8; 64]);
    }

    #[test]
    fn test_key_material_derives_spki() {
        let key = KeyMaterial::from_pem(&test_key_pem()).expect("Failed to parse test key");

        // 2048-bit RSA keys have a fixed-size SPKI encoding.
        assert_eq!(key.public_key_der().len(), 294);
        // DER SEQUENCE tag.
        assert_eq!(key.public_key_der()[0], 0x30);
    }

    #[test]
    fn test_malformed_pem_is_a_key_error() {
        let err = KeyMaterial::from_pem("not a pem").expect_err("Garbage should not parse");
        assert!(matches!(err, KeyError::Parse(_)));
    }

    #[test]
    fn test_signature_length_matches_key_size() {
        let key = KeyMaterial::from_pem(&test_key_pem()).expect("Failed to parse test key");
        let signature = sign_archive(b"archive bytes", key.private()).expect("Failed to sign");

        assert_eq!(signature.len(), 256);
    }

    #[test]
    fn test_assemble_header_layout() {
        let public_key = vec![0xaa; 294];
        let signature = vec![0xbb; 256];
        let archive = vec![0xcc; 100];

        let crx = assemble(&public_key, &signature, &archive);

        assert_eq!(crx.len(), 16 + 294 + 256 + 100);
        assert_eq!(u32::from_be_bytes(crx[0..4].try_into().unwrap()), 0x43723234);
        assert_eq!(u32::from_le_bytes(crx[4..8].try_into().unwrap()), 2);
        assert_eq!(u32::from_le_bytes(crx[8..12].try_into().unwrap()), 294);
        assert_eq!(u32::from_le_bytes(crx[12..16].try_into().unwrap()), 256);

        // Sections follow the header back to back, unaligned.
        assert_eq!(&crx[16..16 + 294], public_key.as_slice());
        assert_eq!(&crx[16 + 294..16 + 294 + 256], signature.as_slice());
        assert_eq!(&crx[16 + 294 + 256..], archive.as_slice());
    }

    #[test]
    fn test_parse_splits_assembled_package() {
        let crx = assemble(&[1, 2, 3], &[4, 5], &[6, 7, 8, 9]);
        let package = CrxPackage::parse(&crx).expect("Failed to parse package");

        assert_eq!(package.version, 2);
        assert_eq!(package.public_key, vec![1, 2, 3]);
        assert_eq!(package.signature, vec![4, 5]);
        assert_eq!(package.archive, vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_parse_rejects_truncated_data() {
        assert!(CrxPackage::parse(&[0x43, 0x72]).is_err());
        assert!(CrxPackage::parse(b"not a crx package!!!").is_err());
    }

    #[tokio::test]
    async fn test_missing_wrapper_is_an_archive_error() {
        let manifest = json!({ "manifest_version": 2 });
        let err = crate::crx::pack::create(
            "console.log(1)",
            &manifest,
            &test_key_pem(),
            std::path::Path::new("does/not/exist/wrapper.js"),
        )
        .await
        .expect_err("Missing loader asset should fail");

        assert!(matches!(err, PackError::Archive(ArchiveError::Io(_))));
    }
}
