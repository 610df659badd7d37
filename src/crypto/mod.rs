//! Cryptographic primitives for the engine.
//!
//! Provides randomness, key derivation, and authenticated encryption.

pub mod aead;
pub mod kdf;
pub mod rng;

pub use aead::{open, seal};
pub use kdf::{DerivedKey, KdfParams, derive_key};
pub use rng::{OsEntropy, SecureRandom};

/// Length of the KDF salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the AES-GCM nonce (12 bytes / 96 bits).
pub const NONCE_LEN: usize = 12;
/// Length of the encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the GCM authentication tag (16 bytes).
pub const TAG_LEN: usize = 16;
