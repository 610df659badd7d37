//! Password-based authenticated encryption with a portable text envelope.
//!
//! Encrypts arbitrary bytes (or JSON-serializable values) under a password
//! and returns a self-describing, versioned JSON envelope that any build of
//! this engine decrypts back, byte for byte. Keys are derived with Argon2id
//! at one fixed high-cost parameter set per format version; payloads are
//! sealed with AES-256-GCM. There are no tunable knobs.
//!
//! ```no_run
//! let envelope = sealbox::encrypt(b"hello vault", b"correct horse battery staple")?;
//! let plaintext = sealbox::decrypt(&envelope, b"correct horse battery staple")?;
//! assert_eq!(&*plaintext, b"hello vault");
//! # Ok::<(), sealbox::Error>(())
//! ```
//!
//! Both operations block the calling thread for the full derivation cost
//! (roughly 1-5 seconds); offload them from latency-sensitive threads.

mod crypto;
mod envelope;
mod error;
mod secure;
#[cfg(feature = "wasm")]
mod wasm;

use serde::{Serialize, de::DeserializeOwned};

pub use crate::crypto::{KdfParams, OsEntropy, SecureRandom};
pub use crate::envelope::CURRENT_VERSION;
pub use crate::error::{Error, Result};
pub use crate::secure::SecretBytes;

use crate::crypto::{NONCE_LEN, SALT_LEN};
use crate::envelope::Envelope;

/// The encryption engine.
///
/// Stateless apart from its randomness source; concurrent calls are
/// independent. [`Engine::new`] uses the host CSPRNG; [`Engine::with_rng`]
/// injects an alternative source.
pub struct Engine<R: SecureRandom = OsEntropy> {
    rng: R,
}

impl Engine {
    pub fn new() -> Self {
        Self { rng: OsEntropy }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SecureRandom> Engine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Encrypts `plaintext` under `password`, returning the text envelope.
    ///
    /// Draws a fresh salt and nonce per call, so encrypting the same input
    /// twice yields two different envelopes. The derived key is zeroized
    /// before this returns, on success and on every error path.
    pub fn encrypt(&self, plaintext: &[u8], password: &[u8]) -> Result<String> {
        let mut salt = vec![0u8; SALT_LEN];
        self.rng.fill(&mut salt)?;

        let mut nonce = [0u8; NONCE_LEN];
        self.rng.fill(&mut nonce)?;

        let key = crypto::derive_key(password, &salt, KdfParams::V1)?;
        let sealed = crypto::seal(&key, &nonce, plaintext);
        drop(key);

        envelope::build(&Envelope::new(KdfParams::V1, salt, nonce, sealed?))
    }

    /// Decrypts a text envelope, returning the plaintext in a [`SecretBytes`].
    ///
    /// The key is re-derived from `password` and the salt and cost parameters
    /// stored in the envelope. Plaintext is returned only after the
    /// authentication tag verifies.
    ///
    /// # Errors
    ///
    /// [`Error::AuthenticationFailed`] on a wrong password or a tampered
    /// envelope; structural errors if the envelope text does not parse.
    pub fn decrypt(&self, envelope_text: &str, password: &[u8]) -> Result<SecretBytes> {
        let parsed = envelope::parse(envelope_text)?;

        let key = crypto::derive_key(password, parsed.salt(), parsed.kdf())?;
        let opened = crypto::open(&key, parsed.nonce(), parsed.ciphertext());
        drop(key);

        opened
    }

    /// Serializes `value` to JSON and encrypts the resulting bytes.
    pub fn encrypt_value<T: Serialize>(&self, value: &T, password: &[u8]) -> Result<String> {
        let plaintext = SecretBytes::new(serde_json::to_vec(value).map_err(Error::Serialization)?);
        self.encrypt(&plaintext, password)
    }

    /// Decrypts an envelope and deserializes the plaintext as JSON.
    pub fn decrypt_value<T: DeserializeOwned>(
        &self,
        envelope_text: &str,
        password: &[u8],
    ) -> Result<T> {
        let plaintext = self.decrypt(envelope_text, password)?;
        serde_json::from_slice(&plaintext).map_err(Error::Serialization)
    }
}

/// Encrypts bytes with the default engine. See [`Engine::encrypt`].
pub fn encrypt(plaintext: &[u8], password: &[u8]) -> Result<String> {
    Engine::new().encrypt(plaintext, password)
}

/// Decrypts an envelope with the default engine. See [`Engine::decrypt`].
pub fn decrypt(envelope_text: &str, password: &[u8]) -> Result<SecretBytes> {
    Engine::new().decrypt(envelope_text, password)
}

/// Encrypts a JSON-serializable value with the default engine.
pub fn encrypt_value<T: Serialize>(value: &T, password: &[u8]) -> Result<String> {
    Engine::new().encrypt_value(value, password)
}

/// Decrypts an envelope into a JSON-deserializable value with the default
/// engine.
pub fn decrypt_value<T: DeserializeOwned>(envelope_text: &str, password: &[u8]) -> Result<T> {
    Engine::new().decrypt_value(envelope_text, password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde_json::{Value, json};

    const PASSWORD: &[u8] = b"correct horse battery staple";

    #[test]
    fn roundtrip_with_fixed_v1_parameters() {
        let envelope = encrypt(b"hello vault", PASSWORD).unwrap();

        let record: Value = serde_json::from_str(&envelope).unwrap();
        assert_eq!(record["version"], 1);
        assert_eq!(record["kdf_params"]["memory_kib"], 262144);
        assert_eq!(record["kdf_params"]["iterations"], 4);
        assert_eq!(record["kdf_params"]["parallelism"], 8);

        let plaintext = decrypt(&envelope, PASSWORD).unwrap();
        assert_eq!(plaintext.as_bytes(), b"hello vault");

        assert!(matches!(
            decrypt(&envelope, b"wrong"),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn same_input_yields_different_envelopes() {
        let a = encrypt(b"payload", PASSWORD).unwrap();
        let b = encrypt(b"payload", PASSWORD).unwrap();
        assert_ne!(a, b);

        let a: Value = serde_json::from_str(&a).unwrap();
        let b: Value = serde_json::from_str(&b).unwrap();
        assert_ne!(a["kdf_params"]["salt"], b["kdf_params"]["salt"]);
        assert_ne!(a["nonce"], b["nonce"]);
    }

    #[test]
    fn bit_flip_in_any_binary_field_fails_authentication() {
        let envelope = encrypt(b"payload", PASSWORD).unwrap();
        let record: Value = serde_json::from_str(&envelope).unwrap();

        let flip = |field: &str| {
            let mut bytes = STANDARD.decode(field).unwrap();
            bytes[0] ^= 0x01;
            STANDARD.encode(&bytes)
        };

        for path in ["ciphertext", "nonce", "salt"] {
            let mut tampered = record.clone();
            let slot = if path == "salt" {
                &mut tampered["kdf_params"]["salt"]
            } else {
                &mut tampered[path]
            };
            let flipped = flip(slot.as_str().unwrap());
            *slot = Value::String(flipped);

            let text = serde_json::to_string(&tampered).unwrap();
            assert!(
                matches!(decrypt(&text, PASSWORD), Err(Error::AuthenticationFailed)),
                "flipping a bit in {path} must fail authentication"
            );
        }
    }

    #[test]
    fn structured_value_roundtrip() {
        let value = json!({"account": "vault", "pin": 1234});
        let envelope = encrypt_value(&value, PASSWORD).unwrap();

        let restored: Value = decrypt_value(&envelope, PASSWORD).unwrap();
        assert_eq!(restored, value);

        // A type mismatch is a serialization error, not a cryptographic one.
        assert!(matches!(
            decrypt_value::<u32>(&envelope, PASSWORD),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn unsupported_version_rejected_without_derivation() {
        let envelope = r#"{"version":7,"kdf_params":{"memory_kib":4294967295,
            "iterations":4294967295,"parallelism":1,"salt":"AAAAAAAAAAAAAAAAAAAAAA=="},
            "nonce":"AAAAAAAAAAAAAAAA","ciphertext":"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="}"#;

        // Absurd cost parameters prove derivation never ran.
        assert!(matches!(
            decrypt(envelope, PASSWORD),
            Err(Error::UnsupportedVersion(7))
        ));
    }

    struct NoEntropy;

    impl SecureRandom for NoEntropy {
        fn fill(&self, _buf: &mut [u8]) -> Result<()> {
            Err(Error::EntropyUnavailable)
        }
    }

    #[test]
    fn entropy_failure_surfaces_and_never_degrades() {
        let engine = Engine::with_rng(NoEntropy);
        assert!(matches!(
            engine.encrypt(b"payload", PASSWORD),
            Err(Error::EntropyUnavailable)
        ));
    }
}
