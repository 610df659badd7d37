//! Error types for the encryption engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while producing or consuming an envelope.
///
/// `AuthenticationFailed` deliberately covers both a wrong password and a
/// tampered envelope; the engine does not reveal which occurred.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The host could not supply cryptographically secure randomness.
    #[error("secure randomness unavailable")]
    EntropyUnavailable,

    /// The host could not allocate the working memory key derivation needs.
    #[error("insufficient memory for key derivation ({memory_kib} KiB required)")]
    DerivationResourceExhausted { memory_kib: u32 },

    /// The KDF primitive itself failed for a reason other than resource
    /// exhaustion. Not expected in normal operation on either path.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Wrong password or tampered/corrupted envelope.
    #[error("authentication failed: wrong password or corrupted data")]
    AuthenticationFailed,

    /// The envelope text is not structurally valid.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The envelope names a format version this build does not understand.
    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u32),

    /// A binary field of the envelope failed to decode from its text form.
    #[error("invalid {field} encoding in envelope")]
    InvalidEncoding { field: &'static str },

    /// Structured-value (de)serialization failed; never a cryptographic error.
    #[error("value serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}
