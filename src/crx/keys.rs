use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePublicKey};
use rsa::RsaPrivateKey;

use super::errors::KeyError;

/// An RSA private key together with its public half in DER
/// SubjectPublicKeyInfo form.  The public encoding is derived once at
/// construction and never regenerated.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    private: RsaPrivateKey,
    public_der: Vec<u8>,
}

impl KeyMaterial {
    /// Parses a PEM private key.  Accepts both PKCS#8 ("BEGIN PRIVATE
    /// KEY") and the older PKCS#1 ("BEGIN RSA PRIVATE KEY") framing.
    pub fn from_pem(pem: &str) -> Result<KeyMaterial, KeyError> {
        let private = RsaPrivateKey::from_pkcs8_pem(pem).or_else(|pkcs8_err| {
            RsaPrivateKey::from_pkcs1_pem(pem).map_err(|_| KeyError::Parse(pkcs8_err.to_string()))
        })?;

        let public_der = private
            .to_public_key()
            .to_public_key_der()?
            .as_bytes()
            .to_vec();

        Ok(KeyMaterial {
            private,
            public_der,
        })
    }

    /// Reads and parses the PEM file at `path`.
    pub async fn from_pem_file(path: &std::path::Path) -> Result<KeyMaterial, KeyError> {
        let pem = tokio::fs::read_to_string(path)
            .await
            .map_err(KeyError::Read)?;
        KeyMaterial::from_pem(&pem)
    }

    pub fn private(&self) -> &RsaPrivateKey {
        &self.private
    }

    pub fn public_key_der(&self) -> &[u8] {
        &self.public_der
    }
}
