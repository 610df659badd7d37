//! Platform randomness source.

use crate::error::{Error, Result};

/// A source of cryptographically secure random bytes.
///
/// The engine takes its randomness as an explicit capability so that no
/// hidden global state is involved; [`OsEntropy`] is the production source.
pub trait SecureRandom {
    /// Fills `buf` with unpredictable bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if the host cannot supply secure
    /// randomness. Implementations must never fall back to a
    /// non-cryptographic generator.
    fn fill(&self, buf: &mut [u8]) -> Result<()>;
}

/// The host CSPRNG: the OS generator natively, the environment's secure
/// random API under wasm.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl SecureRandom for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        getrandom::fill(buf).map_err(|_| Error::EntropyUnavailable)
    }
}
