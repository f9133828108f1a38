use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use thiserror::Error;

type Nonce = [u8; 12];

const FORMAT_VERSION: u8 = 0x01;

/// Cryptographic errors
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Decryption failed: {0}")]
    Decryption(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Hex decode error: {0}")]
    HexDecode(String),
    #[error("Base64 decode error: {0}")]
    Base64Decode(String),
}

/// AES-256-GCM sealing for data kept on disk (the persisted session)
///
/// Sealed output is base64 of `[version_byte][nonce(12)][ciphertext]`.
pub struct SessionCipher {
    cipher: Aes256Gcm,
}

impl SessionCipher {
    /// Build from a 64-character hex key
    pub fn from_hex(key_hex: &str) -> Result<Self, CryptoError> {
        let key_bytes = hex::decode(key_hex.trim())
            .map_err(|e| CryptoError::HexDecode(e.to_string()))?;

        let key: [u8; 32] = key_bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey("Session key must be 32 bytes (64 hex characters)".to_string())
        })?;

        Ok(Self {
            cipher: Aes256Gcm::new(&key.into()),
        })
    }

    pub fn seal(&self, plaintext: &[u8]) -> Result<String, CryptoError> {
        let mut nonce_bytes: Nonce = [0u8; 12];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt((&nonce_bytes).into(), plaintext)
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;

        let mut sealed = Vec::with_capacity(1 + nonce_bytes.len() + ciphertext.len());
        sealed.push(FORMAT_VERSION);
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(sealed))
    }

    pub fn open(&self, sealed_b64: &str) -> Result<Vec<u8>, CryptoError> {
        let sealed = BASE64
            .decode(sealed_b64.trim())
            .map_err(|e| CryptoError::Base64Decode(e.to_string()))?;

        if sealed.len() < 13 {
            return Err(CryptoError::InvalidData(
                "Sealed data too short (need version byte and 12-byte nonce)".to_string(),
            ));
        }

        if sealed[0] != FORMAT_VERSION {
            return Err(CryptoError::InvalidData(format!(
                "Unsupported format version: {}",
                sealed[0]
            )));
        }

        let nonce: Nonce = sealed[1..13]
            .try_into()
            .map_err(|_| CryptoError::InvalidData("Failed to extract nonce".to_string()))?;

        self.cipher
            .decrypt((&nonce).into(), &sealed[13..])
            .map_err(|e| CryptoError::Decryption(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_seal_open() {
        let cipher = SessionCipher::from_hex(KEY_HEX).expect("bad key");
        let sealed = cipher.seal(br#"{"token":"abc"}"#).expect("seal failed");
        let opened = cipher.open(&sealed).expect("open failed");

        assert_eq!(opened, br#"{"token":"abc"}"#);
    }

    #[test]
    fn test_fresh_nonce_per_seal() {
        let cipher = SessionCipher::from_hex(KEY_HEX).unwrap();

        let first = cipher.seal(b"same").unwrap();
        let second = cipher.seal(b"same").unwrap();

        assert_ne!(first, second);
        assert_eq!(cipher.open(&first).unwrap(), cipher.open(&second).unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = SessionCipher::from_hex(KEY_HEX).unwrap().seal(b"secret").unwrap();
        let other = SessionCipher::from_hex(&"ab".repeat(32)).unwrap();

        assert!(matches!(other.open(&sealed), Err(CryptoError::Decryption(_))));
    }

    #[test]
    fn test_short_key_rejected() {
        assert!(matches!(
            SessionCipher::from_hex("abcd"),
            Err(CryptoError::InvalidKey(_))
        ));
        assert!(matches!(
            SessionCipher::from_hex("zz"),
            Err(CryptoError::HexDecode(_))
        ));
    }
}
