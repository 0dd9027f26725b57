use clap::error::ErrorKind;
use std::{error::Error, fmt};

#[derive(Debug, Clone)]
pub enum MkcrxCliError {
    UnsupportedFileType,
    NotFound(String),
    InvalidManifest(String),
}

impl Error for MkcrxCliError {}

impl fmt::Display for MkcrxCliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MkcrxCliError::UnsupportedFileType => {
                write!(f, "Unsupported file type. Only JS payloads are supported")
            }
            MkcrxCliError::NotFound(path) => write!(f, "{} not found", path),
            MkcrxCliError::InvalidManifest(reason) => {
                write!(f, "Manifest is not valid JSON: {}", reason)
            }
        }
    }
}

impl Into<ErrorKind> for MkcrxCliError {
    fn into(self) -> ErrorKind {
        match self {
            MkcrxCliError::UnsupportedFileType => ErrorKind::InvalidValue,
            MkcrxCliError::NotFound(_) => ErrorKind::Io,
            MkcrxCliError::InvalidManifest(_) => ErrorKind::InvalidValue,
        }
    }
}
