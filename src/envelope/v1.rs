//! Envelope format v1.
//!
//! ```json
//! {
//!   "version": 1,
//!   "kdf_params": {
//!     "memory_kib": 262144,
//!     "iterations": 4,
//!     "parallelism": 8,
//!     "salt": "<base64, 16 bytes>"
//!   },
//!   "nonce": "<base64, 12 bytes>",
//!   "ciphertext": "<base64, ciphertext + 16-byte tag>"
//! }
//! ```

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use super::Envelope;
use crate::crypto::{KdfParams, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{Error, Result};

/// First envelope format version.
pub const VERSION_V1: u32 = 1;

#[derive(Serialize, Deserialize)]
struct KdfSection {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
    salt: String,
}

#[derive(Serialize, Deserialize)]
struct EnvelopeV1 {
    version: u32,
    kdf_params: KdfSection,
    nonce: String,
    ciphertext: String,
}

fn decode_field(encoded: &str, field: &'static str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|_| Error::InvalidEncoding { field })
}

/// Parses a v1 envelope.
pub(crate) fn parse(text: &str) -> Result<Envelope> {
    let record: EnvelopeV1 =
        serde_json::from_str(text).map_err(|e| Error::MalformedEnvelope(e.to_string()))?;

    let kdf = KdfParams::new(
        record.kdf_params.memory_kib,
        record.kdf_params.iterations,
        record.kdf_params.parallelism,
    )?;

    let salt = decode_field(&record.kdf_params.salt, "salt")?;
    if salt.len() != SALT_LEN {
        return Err(Error::InvalidEncoding { field: "salt" });
    }

    let nonce: [u8; NONCE_LEN] = decode_field(&record.nonce, "nonce")?
        .try_into()
        .map_err(|_| Error::InvalidEncoding { field: "nonce" })?;

    let ciphertext = decode_field(&record.ciphertext, "ciphertext")?;
    if ciphertext.len() < TAG_LEN {
        return Err(Error::MalformedEnvelope(
            "ciphertext shorter than authentication tag".into(),
        ));
    }

    Ok(Envelope {
        version: record.version,
        kdf,
        salt,
        nonce,
        ciphertext,
    })
}

/// Serializes an envelope to v1 text form.
pub(crate) fn build(envelope: &Envelope) -> Result<String> {
    if envelope.version() != VERSION_V1 {
        return Err(Error::UnsupportedVersion(envelope.version()));
    }
    if envelope.salt().len() != SALT_LEN {
        return Err(Error::InvalidEncoding { field: "salt" });
    }

    let record = EnvelopeV1 {
        version: VERSION_V1,
        kdf_params: KdfSection {
            memory_kib: envelope.kdf().memory_kib(),
            iterations: envelope.kdf().iterations(),
            parallelism: envelope.kdf().parallelism(),
            salt: STANDARD.encode(envelope.salt()),
        },
        nonce: STANDARD.encode(envelope.nonce()),
        ciphertext: STANDARD.encode(envelope.ciphertext()),
    };

    serde_json::to_string(&record).map_err(Error::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_text() -> String {
        let envelope = Envelope::new(
            KdfParams::new(1024, 1, 1).unwrap(),
            vec![1u8; SALT_LEN],
            [2u8; NONCE_LEN],
            vec![3u8; 48],
        );
        build(&envelope).unwrap()
    }

    #[test]
    fn wire_field_names_are_stable() {
        let text = sample_text();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["kdf_params"]["memory_kib"], 1024);
        assert_eq!(value["kdf_params"]["iterations"], 1);
        assert_eq!(value["kdf_params"]["parallelism"], 1);
        assert!(value["kdf_params"]["salt"].is_string());
        assert!(value["nonce"].is_string());
        assert!(value["ciphertext"].is_string());
    }

    #[test]
    fn bad_base64_is_invalid_encoding() {
        let text = sample_text().replace(&STANDARD.encode([2u8; NONCE_LEN]), "@@not-base64@@");
        assert!(matches!(
            parse(&text),
            Err(Error::InvalidEncoding { field: "nonce" })
        ));
    }

    #[test]
    fn wrong_nonce_length_is_invalid_encoding() {
        let text = sample_text().replace(
            &STANDARD.encode([2u8; NONCE_LEN]),
            &STANDARD.encode([2u8; NONCE_LEN - 1]),
        );
        assert!(matches!(
            parse(&text),
            Err(Error::InvalidEncoding { field: "nonce" })
        ));
    }

    #[test]
    fn wrong_salt_length_is_invalid_encoding() {
        let text = sample_text().replace(
            &STANDARD.encode([1u8; SALT_LEN]),
            &STANDARD.encode([1u8; SALT_LEN + 1]),
        );
        assert!(matches!(
            parse(&text),
            Err(Error::InvalidEncoding { field: "salt" })
        ));
    }

    #[test]
    fn missing_field_is_malformed() {
        let text = r#"{"version":1,"nonce":"AAAAAAAAAAAAAAAA","ciphertext":"AAAA"}"#;
        assert!(matches!(parse(text), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn invalid_kdf_params_are_malformed() {
        let text = sample_text().replace("\"iterations\":1", "\"iterations\":0");
        assert!(matches!(parse(&text), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn out_of_range_parallelism_is_malformed() {
        let text = sample_text().replace("\"parallelism\":1", "\"parallelism\":16777216");
        assert!(matches!(parse(&text), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn ciphertext_shorter_than_tag_is_malformed() {
        let text = sample_text().replace(
            &STANDARD.encode([3u8; 48]),
            &STANDARD.encode([3u8; TAG_LEN - 1]),
        );
        assert!(matches!(parse(&text), Err(Error::MalformedEnvelope(_))));
    }
}
