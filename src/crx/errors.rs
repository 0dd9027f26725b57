use thiserror::Error;

/// The private key could not be parsed or its public half derived.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read key file: {0}")]
    Read(#[source] std::io::Error),
    #[error("private key is not valid PKCS#8 or PKCS#1 PEM: {0}")]
    Parse(String),
    #[error("failed to derive SubjectPublicKeyInfo encoding: {0}")]
    Derive(#[from] rsa::pkcs8::spki::Error),
}

/// Signing the archive bytes failed.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("RSA signing failed: {0}")]
    Sign(#[from] rsa::signature::Error),
}

/// The inner archive could not be constructed.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to read loader asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip construction failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("manifest is not JSON-serializable: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("duplicate archive entry name: {0}")]
    DuplicateEntry(String),
}

/// Failure of the overall packaging operation.  Carries the error of
/// whichever branch failed first; the caller sees a single rejected
/// operation and no partial output.
#[derive(Debug, Error)]
pub enum PackError {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error("failed to write package: {0}")]
    Write(#[source] std::io::Error),
}
