//! Bindings for the sandboxed byte-code build.
//!
//! Thin adapters over the four engine operations; no cryptographic logic
//! lives here. Envelopes produced here decode identically on the native
//! build and vice versa.
//!
//! The structured-value operations take and return pre-serialized JSON text,
//! which suits a host boundary that passes strings.

use wasm_bindgen::prelude::*;

fn to_js(err: crate::Error) -> JsError {
    JsError::new(&err.to_string())
}

/// Encrypts bytes under a password, returning the text envelope.
#[wasm_bindgen]
pub fn encrypt(plaintext: &[u8], password: &[u8]) -> Result<String, JsError> {
    crate::encrypt(plaintext, password).map_err(to_js)
}

/// Decrypts a text envelope back into bytes.
#[wasm_bindgen]
pub fn decrypt(envelope: &str, password: &[u8]) -> Result<Vec<u8>, JsError> {
    crate::decrypt(envelope, password)
        .map(|plaintext| plaintext.as_bytes().to_vec())
        .map_err(to_js)
}

/// Encrypts a JSON value given as text.
#[wasm_bindgen]
pub fn encrypt_value(value_json: &str, password: &[u8]) -> Result<String, JsError> {
    let value: serde_json::Value = serde_json::from_str(value_json)
        .map_err(|e| to_js(crate::Error::Serialization(e)))?;
    crate::encrypt_value(&value, password).map_err(to_js)
}

/// Decrypts an envelope and returns the plaintext JSON value as text.
#[wasm_bindgen]
pub fn decrypt_value(envelope: &str, password: &[u8]) -> Result<String, JsError> {
    let value: serde_json::Value = crate::decrypt_value(envelope, password).map_err(to_js)?;
    serde_json::to_string(&value).map_err(|e| to_js(crate::Error::Serialization(e)))
}
