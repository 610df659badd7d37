//! Password key derivation using Argon2id.
//!
//! Memory-hard derivation resistant to GPU/ASIC attacks. The engine ships one
//! fixed parameter set per envelope version; decryption re-derives with
//! whatever parameters the envelope carries.

use argon2::{Algorithm, Argon2, Params, Version};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::KEY_LEN;
use crate::error::{Error, Result};

/// Highest lane count the Argon2 specification allows (2^24 - 1).
const MAX_PARALLELISM: u32 = 0xFF_FFFF;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl KdfParams {
    /// The fixed parameter set for envelope version 1: 256 MiB, 4 passes,
    /// 8 lanes. Roughly 1-5 seconds of wall-clock cost depending on host.
    pub const V1: Self = Self {
        memory_kib: 256 * 1024,
        iterations: 4,
        parallelism: 8,
    };

    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            memory_kib,
            iterations,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(Error::MalformedEnvelope(
                "argon2 iterations must be >= 1".into(),
            ));
        }
        if self.parallelism < 1 || self.parallelism > MAX_PARALLELISM {
            return Err(Error::MalformedEnvelope(
                "argon2 parallelism out of range".into(),
            ));
        }
        if self.memory_kib < 8 || self.memory_kib < 8 * self.parallelism {
            return Err(Error::MalformedEnvelope(
                "argon2 memory cost must be at least 8 KiB per lane".into(),
            ));
        }
        Ok(())
    }
}

/// A 256-bit symmetric key, zeroized on drop on every exit path.
///
/// Never serialized; `Debug` never shows the key bytes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([redacted])")
    }
}

/// Derives a 32-byte key from a password and salt.
///
/// Deterministic for a fixed (password, salt, params) triple; the lane count
/// is part of the Argon2 specification and affects speed only, never the
/// output value.
///
/// # Errors
///
/// Returns [`Error::DerivationResourceExhausted`] if the host cannot provide
/// the working memory the parameters demand. The cost is never silently
/// downgraded.
pub fn derive_key(password: &[u8], salt: &[u8], kdf: KdfParams) -> Result<DerivedKey> {
    kdf.validate()?;

    // Probe the allocation up front; argon2 aborts the process on OOM.
    let working = (kdf.memory_kib as usize).saturating_mul(1024);
    let mut probe: Vec<u8> = Vec::new();
    probe
        .try_reserve_exact(working)
        .map_err(|_| Error::DerivationResourceExhausted {
            memory_kib: kdf.memory_kib,
        })?;
    drop(probe);

    let params = Params::new(
        kdf.memory_kib,
        kdf.iterations,
        kdf.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| Error::KeyDerivation(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| Error::KeyDerivation(e.to_string()))?;

    Ok(DerivedKey(key))
}
