use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha1::Sha1;

use super::errors::SignatureError;

/// Signs the serialized archive with RSA-SHA1, the digest the CRX2
/// installer verifies against.  The signature covers the archive bytes
/// exactly as they appear after the header sections.
pub fn sign_archive(archive: &[u8], key: &RsaPrivateKey) -> Result<Vec<u8>, SignatureError> {
    let signing_key = SigningKey::<Sha1>::new(key.clone());
    let signature = signing_key.try_sign(archive)?;
    Ok(signature.to_vec())
}
