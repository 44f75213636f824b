//! Lamport one-time signature.
//!
//! The secret key holds two random blocks per digest bit; signing reveals one
//! block of each pair, selected by the bit of `H(message)`.

use hbs_types::CryptoError;
use serde::{Deserialize, Serialize};

use crate::drbg::OsRandom;
use crate::hash::{digest_eq, HashFunction};
use crate::provider::{check_len, KeyPair, RandomSource, SignatureScheme};

/// Lamport parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LamportParams {
    /// Digest width in bits (256 or 512).
    pub n: usize,
}

impl LamportParams {
    pub fn validate(&self) -> Result<(), CryptoError> {
        HashFunction::from_bits(self.n).map(|_| ())
    }
}

impl Default for LamportParams {
    fn default() -> Self {
        Self { n: 256 }
    }
}

/// Lamport OTS over SHA-256 or SHA-512.
#[derive(Debug, Clone)]
pub struct Lamport {
    n: usize,
    hash: HashFunction,
}

fn bit(digest: &[u8], j: usize) -> usize {
    ((digest[j / 8] >> (7 - j % 8)) & 1) as usize
}

impl Lamport {
    pub fn new(n: usize) -> Result<Self, CryptoError> {
        Self::from_params(&LamportParams { n })
    }

    pub fn from_params(params: &LamportParams) -> Result<Self, CryptoError> {
        let hash = HashFunction::from_bits(params.n)?;
        Ok(Self { n: params.n, hash })
    }

    pub fn params(&self) -> LamportParams {
        LamportParams { n: self.n }
    }

    fn block_size(&self) -> usize {
        self.n / 8
    }

    /// Key generation drawing secret blocks from `rng`.
    pub fn generate_key_with(&self, rng: &mut dyn RandomSource) -> Result<KeyPair, CryptoError> {
        let bs = self.block_size();
        let mut sk = vec![0u8; 2 * self.n * bs];
        rng.fill(&mut sk)?;
        let pk: Vec<u8> = sk.chunks_exact(bs).flat_map(|b| self.hash.hash(b)).collect();
        Ok(KeyPair::new(sk, pk))
    }
}

impl SignatureScheme for Lamport {
    fn generate_key(&self) -> Result<KeyPair, CryptoError> {
        let kp = self.generate_key_with(&mut OsRandom)?;
        tracing::debug!(n = self.n, "lamport: key pair generated");
        Ok(kp)
    }

    fn sign(&self, message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_len(secret_key, self.secret_key_len())?;
        let bs = self.block_size();
        let digest = self.hash.hash(message);

        let mut sig = Vec::with_capacity(self.signature_len());
        for j in 0..self.n {
            let idx = 2 * j + bit(&digest, j);
            sig.extend_from_slice(&secret_key[idx * bs..(idx + 1) * bs]);
        }
        Ok(sig)
    }

    fn verify(
        &self,
        message: &[u8],
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        check_len(public_key, self.public_key_len())?;
        check_len(signature, self.signature_len())?;
        let bs = self.block_size();
        let digest = self.hash.hash(message);

        let mut ok = true;
        for (j, revealed) in signature.chunks_exact(bs).enumerate() {
            let idx = 2 * j + bit(&digest, j);
            ok &= digest_eq(&self.hash.hash(revealed), &public_key[idx * bs..(idx + 1) * bs]);
        }
        tracing::debug!(n = self.n, valid = ok, "lamport: verify");
        Ok(ok)
    }

    fn public_key_len(&self) -> usize {
        2 * self.n * self.block_size()
    }

    fn secret_key_len(&self) -> usize {
        2 * self.n * self.block_size()
    }

    fn signature_len(&self) -> usize {
        self.n * self.block_size()
    }
}
