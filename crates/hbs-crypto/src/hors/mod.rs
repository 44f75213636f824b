//! HORS few-time signature.
//!
//! A `tau*k`-bit digest is cut into `k` big-endian `tau`-bit indices; the
//! signature reveals the secret blocks at those indices out of `t = 2^tau`.

use hbs_types::CryptoError;
use serde::{Deserialize, Serialize};

use crate::drbg::OsRandom;
use crate::hash::{digest_eq, HashFunction};
use crate::provider::{check_len, KeyPair, RandomSource, SignatureScheme};

/// HORS parameters; `tau * k` is both the digest width and the block width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorsParams {
    pub tau: usize,
    pub k: usize,
}

impl Default for HorsParams {
    fn default() -> Self {
        Self { tau: 8, k: 32 }
    }
}

impl HorsParams {
    pub fn validate(&self) -> Result<(), CryptoError> {
        validate_tau(self.tau)?;
        HashFunction::from_bits(self.tau * self.k).map(|_| ())
    }

    /// Digest width in bits.
    pub fn m(&self) -> usize {
        self.tau * self.k
    }
}

/// `tau` must be a positive multiple of 8, at most 64, and `2^tau` must be
/// addressable.
pub(crate) fn validate_tau(tau: usize) -> Result<(), CryptoError> {
    if tau == 0 || tau % 8 != 0 || tau > 64 {
        return Err(CryptoError::InvalidTau(tau));
    }
    if tau >= usize::BITS as usize {
        return Err(CryptoError::HeightTooLarge(tau));
    }
    Ok(())
}

/// Cut `digest` into `k` big-endian indices of `tau` bits.
///
/// The caller guarantees `digest` holds `tau*k` bits.
pub(crate) fn select_indices(digest: &[u8], tau: usize, k: usize) -> Vec<usize> {
    let width = tau / 8;
    digest
        .chunks_exact(width)
        .take(k)
        .map(|c| c.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64) as usize)
        .collect()
}

/// HORS over random secret blocks.
#[derive(Debug, Clone)]
pub struct Hors {
    params: HorsParams,
    hash: HashFunction,
}

impl Hors {
    pub fn new(tau: usize, k: usize) -> Result<Self, CryptoError> {
        Self::from_params(&HorsParams { tau, k })
    }

    pub fn from_params(params: &HorsParams) -> Result<Self, CryptoError> {
        params.validate()?;
        Ok(Self {
            params: *params,
            hash: HashFunction::from_bits(params.m())?,
        })
    }

    pub fn params(&self) -> HorsParams {
        self.params
    }

    fn block_size(&self) -> usize {
        self.hash.output_size()
    }

    fn key_blocks(&self) -> usize {
        1 << self.params.tau
    }

    pub fn generate_key_with(&self, rng: &mut dyn RandomSource) -> Result<KeyPair, CryptoError> {
        let sk = rng.bytes(self.key_blocks() * self.block_size())?;
        let pk: Vec<u8> = sk
            .chunks_exact(self.block_size())
            .flat_map(|b| self.hash.hash(b))
            .collect();
        Ok(KeyPair::new(sk, pk))
    }

    fn check_digest(&self, digest: &[u8]) -> Result<(), CryptoError> {
        check_len(digest, self.params.m() / 8)
    }

    /// Sign a digest of exactly `tau*k` bits.
    pub fn sign_digest(&self, digest: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.check_digest(digest)?;
        check_len(secret_key, self.secret_key_len())?;
        let bs = self.block_size();
        let mut sig = Vec::with_capacity(self.signature_len());
        for j in select_indices(digest, self.params.tau, self.params.k) {
            sig.extend_from_slice(&secret_key[j * bs..(j + 1) * bs]);
        }
        Ok(sig)
    }

    /// Verify a signature over a digest of exactly `tau*k` bits.
    pub fn verify_digest(
        &self,
        digest: &[u8],
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        self.check_digest(digest)?;
        check_len(public_key, self.public_key_len())?;
        check_len(signature, self.signature_len())?;
        let bs = self.block_size();
        let indices = select_indices(digest, self.params.tau, self.params.k);
        let mut ok = true;
        for (revealed, j) in signature.chunks_exact(bs).zip(indices) {
            ok &= digest_eq(&self.hash.hash(revealed), &public_key[j * bs..(j + 1) * bs]);
        }
        Ok(ok)
    }
}

impl SignatureScheme for Hors {
    fn generate_key(&self) -> Result<KeyPair, CryptoError> {
        let kp = self.generate_key_with(&mut OsRandom)?;
        tracing::debug!(tau = self.params.tau, k = self.params.k, "hors: key pair generated");
        Ok(kp)
    }

    fn sign(&self, message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.sign_digest(&self.hash.hash(message), secret_key)
    }

    fn verify(
        &self,
        message: &[u8],
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        let ok = self.verify_digest(&self.hash.hash(message), public_key, signature)?;
        tracing::debug!(valid = ok, "hors: verify");
        Ok(ok)
    }

    fn public_key_len(&self) -> usize {
        self.key_blocks() * self.block_size()
    }

    fn secret_key_len(&self) -> usize {
        self.key_blocks() * self.block_size()
    }

    fn signature_len(&self) -> usize {
        self.params.k * self.block_size()
    }
}
