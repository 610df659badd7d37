//! Versioned text envelope codec.
//!
//! The envelope is a flat JSON record carrying the format version, the KDF
//! cost parameters and salt, the AEAD nonce, and the ciphertext with its tag.
//! All binary fields are base64. Parsing is purely structural; no
//! cryptography runs here and no field is ever logged.

use serde::Deserialize;

use crate::crypto::{KdfParams, NONCE_LEN};
use crate::error::{Error, Result};

pub mod v1;

/// Latest envelope format version.
pub const CURRENT_VERSION: u32 = v1::VERSION_V1;

/// A parsed envelope with all components.
pub(crate) struct Envelope {
    version: u32,
    kdf: KdfParams,
    salt: Vec<u8>,
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Creates an envelope at the current format version.
    pub fn new(kdf: KdfParams, salt: Vec<u8>, nonce: [u8; NONCE_LEN], ciphertext: Vec<u8>) -> Self {
        Self {
            version: CURRENT_VERSION,
            kdf,
            salt,
            nonce,
            ciphertext,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn kdf(&self) -> KdfParams {
        self.kdf
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Parses an envelope, dispatching on its `version` field.
///
/// # Errors
///
/// Returns [`Error::MalformedEnvelope`] if the text is not a JSON record with
/// a `version` field, and [`Error::UnsupportedVersion`] if the version is
/// unknown. Unknown versions are rejected before any field decoding.
pub(crate) fn parse(text: &str) -> Result<Envelope> {
    let probe: VersionProbe =
        serde_json::from_str(text).map_err(|e| Error::MalformedEnvelope(e.to_string()))?;

    match probe.version {
        v1::VERSION_V1 => v1::parse(text),
        other => Err(Error::UnsupportedVersion(other)),
    }
}

/// Serializes an envelope to its text form.
pub(crate) fn build(envelope: &Envelope) -> Result<String> {
    match envelope.version() {
        v1::VERSION_V1 => v1::build(envelope),
        other => Err(Error::UnsupportedVersion(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SALT_LEN;

    fn sample() -> Envelope {
        Envelope::new(
            KdfParams::new(1024, 1, 1).unwrap(),
            vec![1u8; SALT_LEN],
            [2u8; NONCE_LEN],
            vec![3u8; 48],
        )
    }

    #[test]
    fn build_parse_roundtrip() {
        let text = build(&sample()).unwrap();
        let parsed = parse(&text).unwrap();

        assert_eq!(parsed.version(), CURRENT_VERSION);
        assert_eq!(parsed.kdf(), KdfParams::new(1024, 1, 1).unwrap());
        assert_eq!(parsed.salt(), &[1u8; SALT_LEN]);
        assert_eq!(parsed.nonce(), &[2u8; NONCE_LEN]);
        assert_eq!(parsed.ciphertext(), &[3u8; 48]);
    }

    #[test]
    fn non_json_input_is_malformed() {
        assert!(matches!(
            parse("not an envelope"),
            Err(Error::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn missing_version_is_malformed() {
        assert!(matches!(
            parse(r#"{"nonce":"AAAA"}"#),
            Err(Error::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn unknown_version_rejected_before_field_decoding() {
        // Fields are garbage; the version check must fire first.
        let text = r#"{"version":99,"kdf_params":null,"nonce":"!!","ciphertext":"!!"}"#;
        assert!(matches!(parse(text), Err(Error::UnsupportedVersion(99))));
    }
}
