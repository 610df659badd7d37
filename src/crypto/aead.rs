//! Authenticated encryption using AES-256-GCM.

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};

use super::{DerivedKey, NONCE_LEN, TAG_LEN};
use crate::error::{Error, Result};
use crate::secure::SecretBytes;

/// Encrypts `plaintext`, returning ciphertext with the 16-byte GCM tag
/// appended. No additional authenticated data is used.
pub fn seal(key: &DerivedKey, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| Error::AuthenticationFailed)
}

/// Decrypts and verifies `ciphertext` (ciphertext plus trailing tag).
///
/// Tag verification runs in constant time inside the AEAD primitive. On
/// mismatch no plaintext bytes, partial or otherwise, reach the caller.
///
/// # Errors
///
/// Returns [`Error::AuthenticationFailed`] if the tag does not verify.
pub fn open(key: &DerivedKey, nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<SecretBytes> {
    if ciphertext.len() < TAG_LEN {
        return Err(Error::AuthenticationFailed);
    }

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| Error::AuthenticationFailed)?;

    Ok(SecretBytes::new(plaintext))
}
