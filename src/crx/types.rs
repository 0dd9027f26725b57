use super::constants::{
    CRX2_HEADER_LEN, CRX_MAGIC_VALUE, CRX_VERSION_RANGE, MAGIC_VALUE_RANGE,
    PUBLIC_KEY_LENGTH_RANGE, SIGNATURE_LENGTH_RANGE,
};

/// One named blob inside the inner archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
    pub compress: bool,
}

impl ArchiveEntry {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        ArchiveEntry {
            name: name.to_string(),
            bytes,
            compress: true,
        }
    }

    pub fn stored(name: &str, bytes: Vec<u8>) -> Self {
        ArchiveEntry {
            compress: false,
            ..ArchiveEntry::new(name, bytes)
        }
    }
}

/// A v2 package split back into its sections.  Mostly useful for
/// inspecting freshly built output.
#[derive(Debug)]
pub struct CrxPackage {
    pub version: u32,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub archive: Vec<u8>,
}

impl CrxPackage {
    pub fn parse(data: &[u8]) -> anyhow::Result<CrxPackage> {
        if data.len() < CRX2_HEADER_LEN {
            return Err(anyhow::anyhow!("Data is too short"));
        }

        if data[MAGIC_VALUE_RANGE] != CRX_MAGIC_VALUE {
            return Err(anyhow::anyhow!("Invalid CRX file"));
        }

        let version = read_u32_le(data, CRX_VERSION_RANGE.start);
        let public_key_length = read_u32_le(data, PUBLIC_KEY_LENGTH_RANGE.start) as usize;
        let signature_length = read_u32_le(data, SIGNATURE_LENGTH_RANGE.start) as usize;

        let archive_offset = CRX2_HEADER_LEN + public_key_length + signature_length;
        if data.len() < archive_offset {
            return Err(anyhow::anyhow!("Data is too short"));
        }

        let public_key = data[CRX2_HEADER_LEN..CRX2_HEADER_LEN + public_key_length].to_vec();
        let signature =
            data[CRX2_HEADER_LEN + public_key_length..archive_offset].to_vec();
        let archive = data[archive_offset..].to_vec();

        Ok(CrxPackage {
            version,
            public_key,
            signature,
            archive,
        })
    }
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}
