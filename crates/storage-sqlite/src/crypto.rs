//! Authenticated encryption for token columns.
//!
//! Access and refresh tokens are encrypted with AES-256-GCM before they hit
//! the database and decrypted on read. The stored layout is
//! `nonce(12) || authTag(16) || ciphertext`, base64-encoded.
//!
//! Key material is passed to the constructor; repositories receive the
//! cipher as an explicit value. Nothing here reads the environment.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use adsight_core::errors::{Error, Result};

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// AES-256-GCM codec for the two token columns.
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)),
        }
    }

    /// Builds a cipher from a 64-character hex key, the format operators
    /// usually hand over.
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        if key_hex.len() != 64 {
            return Err(Error::Secret(
                "encryption key must be a 64-character hex string (32 bytes)".to_string(),
            ));
        }

        let mut key = [0u8; 32];
        for (i, byte) in key.iter_mut().enumerate() {
            let pair = &key_hex[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| Error::Secret("encryption key is not valid hex".to_string()))?;
        }

        Ok(Self::new(key))
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let mut ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| Error::Secret(format!("encryption failed: {}", e)))?;

        // aes-gcm appends the tag to the ciphertext; the stored layout
        // carries it right after the nonce instead.
        let tag = ciphertext.split_off(ciphertext.len() - TAG_LEN);

        let mut payload = Vec::with_capacity(NONCE_LEN + TAG_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&tag);
        payload.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(payload))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let payload = BASE64
            .decode(encoded)
            .map_err(|_| Error::Secret("stored token is not valid base64".to_string()))?;

        if payload.len() < NONCE_LEN + TAG_LEN {
            return Err(Error::Secret("stored token payload is too short".to_string()));
        }

        let (nonce_bytes, rest) = payload.split_at(NONCE_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);

        let mut combined = ciphertext.to_vec();
        combined.extend_from_slice(tag);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), combined.as_ref())
            .map_err(|e| Error::Secret(format!("decryption failed: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|_| Error::Secret("decrypted token is not valid UTF-8".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> TokenCipher {
        TokenCipher::new([7u8; 32])
    }

    #[test]
    fn round_trips_tokens() {
        let token = "1//0refresh-token-value";
        let encrypted = cipher().encrypt(token).unwrap();
        assert_ne!(encrypted, token);
        assert_eq!(cipher().decrypt(&encrypted).unwrap(), token);
    }

    #[test]
    fn payload_layout_is_nonce_tag_ciphertext() {
        let token = "abcd";
        let payload = BASE64.decode(cipher().encrypt(token).unwrap()).unwrap();
        assert_eq!(payload.len(), 12 + 16 + token.len());
    }

    #[test]
    fn every_encryption_uses_a_fresh_nonce() {
        let first = cipher().encrypt("same input").unwrap();
        let second = cipher().encrypt("same input").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn tampering_is_detected() {
        let encrypted = cipher().encrypt("secret").unwrap();
        let mut payload = BASE64.decode(&encrypted).unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 0x01;
        let tampered = BASE64.encode(payload);
        assert!(cipher().decrypt(&tampered).is_err());
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let encrypted = cipher().encrypt("secret").unwrap();
        let other = TokenCipher::new([9u8; 32]);
        assert!(other.decrypt(&encrypted).is_err());
    }

    #[test]
    fn hex_key_parsing() {
        let hex = "07".repeat(32);
        let from_hex = TokenCipher::from_hex(&hex).unwrap();
        let encrypted = cipher().encrypt("secret").unwrap();
        assert_eq!(from_hex.decrypt(&encrypted).unwrap(), "secret");

        assert!(TokenCipher::from_hex("too-short").is_err());
        assert!(TokenCipher::from_hex(&"zz".repeat(32)).is_err());
    }
}
