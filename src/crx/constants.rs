use std::ops::Range;

pub const CRX_MAGIC_VALUE: [u8; 4] = [0x43, 0x72, 0x32, 0x34];
pub const MAGIC_VALUE_RANGE: Range<usize> = 0..4;
pub const CRX_VERSION_RANGE: Range<usize> = 4..8;
pub const PUBLIC_KEY_LENGTH_RANGE: Range<usize> = 8..12;
pub const SIGNATURE_LENGTH_RANGE: Range<usize> = 12..16;

pub const CRX2_VERSION: u32 = 2;
pub const CRX3_VERSION: u32 = 3;
pub const CRX2_HEADER_LEN: usize = 16;

pub const CODE_ENTRY_NAME: &str = "code.js";
pub const WRAPPER_ENTRY_NAME: &str = "wrapper.js";
pub const MANIFEST_ENTRY_NAME: &str = "manifest.json";
