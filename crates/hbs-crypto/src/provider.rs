//! Trait-based provider mechanism for the signature schemes.
//!
//! Every scheme implements [`SignatureScheme`]; every source of key material
//! implements [`RandomSource`]. Composition code is written against these
//! two seams only.

use hbs_types::CryptoError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secret/public key pair. The secret half is wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    secret_key: Vec<u8>,
    #[zeroize(skip)]
    public_key: Vec<u8>,
}

impl KeyPair {
    pub fn new(secret_key: Vec<u8>, public_key: Vec<u8>) -> Self {
        Self {
            secret_key,
            public_key,
        }
    }

    pub fn secret_key(&self) -> &[u8] {
        &self.secret_key
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }
}

impl core::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyPair")
            .field("secret_key", &"<redacted>")
            .field("public_key_len", &self.public_key.len())
            .finish()
    }
}

/// A hash-based signature scheme.
pub trait SignatureScheme: Send + Sync {
    /// Generate a fresh key pair.
    fn generate_key(&self) -> Result<KeyPair, CryptoError>;

    /// Sign `message` with `secret_key`.
    fn sign(&self, message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Verify `signature` on `message` under `public_key`.
    ///
    /// Returns `Ok(false)` when a correctly sized signature does not match;
    /// malformed buffer lengths are reported as errors.
    fn verify(
        &self,
        message: &[u8],
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError>;

    fn public_key_len(&self) -> usize;
    fn secret_key_len(&self) -> usize;
    fn signature_len(&self) -> usize;
}

/// A stream of (pseudo)random bytes.
pub trait RandomSource {
    /// Fill `buf` completely.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), CryptoError>;

    /// Convenience: return `len` fresh bytes.
    fn bytes(&mut self, len: usize) -> Result<Vec<u8>, CryptoError> {
        let mut out = vec![0u8; len];
        self.fill(&mut out)?;
        Ok(out)
    }
}

/// Fail with `SizeMismatch` unless `buf` is exactly `expected` bytes.
pub(crate) fn check_len(buf: &[u8], expected: usize) -> Result<(), CryptoError> {
    if buf.len() != expected {
        return Err(CryptoError::SizeMismatch {
            expected,
            got: buf.len(),
        });
    }
    Ok(())
}
