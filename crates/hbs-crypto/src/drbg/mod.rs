//! Random byte sources.
//!
//! - [`HashDrbg`]: deterministic generator expanded from an arbitrary-length
//!   seed, used wherever a key must be re-derivable from a seed.
//! - [`OsRandom`]: fresh bytes from the operating system.

pub mod hash_drbg;
pub use hash_drbg::HashDrbg;

use hbs_types::CryptoError;

use crate::provider::RandomSource;

/// Operating-system entropy via `getrandom`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::getrandom(buf).map_err(|_| CryptoError::EntropyFail)
    }
}
