//! Winternitz one-time signatures (WOTS and WOTS+).
//!
//! Both variants sign the base-w digits of `H(message)` followed by their
//! checksum digits. Chain `i` starts at secret block `sk_i`; the public key
//! is the chain end after `2^w - 1` steps and a signature reveals the
//! element at position `2^w - 1 - digit_i`. WOTS+ XORs step mask `s` into
//! the running value before step `s`; the same mask range serves every chain.

pub(crate) mod plus;

pub use plus::WotsPlus;

use hbs_types::CryptoError;
use serde::{Deserialize, Serialize};

use crate::codec::{checksum_len, message_digits, validate_w};
use crate::drbg::OsRandom;
use crate::hash::{digest_eq, HashFunction};
use crate::provider::{check_len, KeyPair, RandomSource, SignatureScheme};

/// Winternitz parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WotsParams {
    /// Digest width in bits (256 or 512).
    pub n: usize,
    /// Digit width in bits; must divide 8.
    pub w: usize,
}

impl Default for WotsParams {
    fn default() -> Self {
        Self { n: 256, w: 4 }
    }
}

impl WotsParams {
    pub fn validate(&self) -> Result<(), CryptoError> {
        validate_w(self.w)?;
        HashFunction::from_bits(self.n).map(|_| ())
    }

    /// Message digit count `n / w`.
    pub fn l1(&self) -> usize {
        self.n / self.w
    }

    pub fn l2(&self) -> usize {
        checksum_len(self.l1(), self.w)
    }

    /// Total chain count.
    pub fn chain_count(&self) -> usize {
        self.l1() + self.l2()
    }

    /// Steps from a secret block to its public block.
    pub fn chain_len(&self) -> usize {
        (1 << self.w) - 1
    }
}

/// Chain arithmetic shared by WOTS, WOTS+ and the hypertree layers.
#[derive(Debug, Clone)]
pub(crate) struct WotsEngine {
    pub(crate) params: WotsParams,
    pub(crate) hash: HashFunction,
}

impl WotsEngine {
    pub(crate) fn new(params: WotsParams) -> Result<Self, CryptoError> {
        params.validate()?;
        let hash = HashFunction::from_bits(params.n)?;
        Ok(Self { params, hash })
    }

    pub(crate) fn block_size(&self) -> usize {
        self.params.n / 8
    }

    /// Byte length of a secret key, public key or signature.
    pub(crate) fn key_len(&self) -> usize {
        self.params.chain_count() * self.block_size()
    }

    fn chain(
        &self,
        block: &[u8],
        start: usize,
        end: usize,
        masks: Option<&[u8]>,
    ) -> Result<Vec<u8>, CryptoError> {
        match masks {
            Some(m) => self.hash.hash_times_with_mask(block, start, end, m),
            None => Ok(self.hash.hash_times(block, end - start)),
        }
    }

    fn digits(&self, message: &[u8]) -> Result<Vec<u32>, CryptoError> {
        let digest = self.hash.hash(message);
        message_digits(&digest, self.params.l1(), self.params.w)
    }

    pub(crate) fn public_key(&self, sk: &[u8], masks: Option<&[u8]>) -> Result<Vec<u8>, CryptoError> {
        check_len(sk, self.key_len())?;
        let top = self.params.chain_len();
        let mut pk = Vec::with_capacity(self.key_len());
        for block in sk.chunks_exact(self.block_size()) {
            pk.extend_from_slice(&self.chain(block, 0, top, masks)?);
        }
        Ok(pk)
    }

    pub(crate) fn sign(
        &self,
        message: &[u8],
        sk: &[u8],
        masks: Option<&[u8]>,
    ) -> Result<Vec<u8>, CryptoError> {
        check_len(sk, self.key_len())?;
        let top = self.params.chain_len();
        let digits = self.digits(message)?;
        let mut sig = Vec::with_capacity(self.key_len());
        for (block, &d) in sk.chunks_exact(self.block_size()).zip(&digits) {
            sig.extend_from_slice(&self.chain(block, 0, top - d as usize, masks)?);
        }
        Ok(sig)
    }

    /// Finish every chain of `signature`, yielding the candidate public key.
    pub(crate) fn recover_public_key(
        &self,
        message: &[u8],
        signature: &[u8],
        masks: Option<&[u8]>,
    ) -> Result<Vec<u8>, CryptoError> {
        check_len(signature, self.key_len())?;
        let top = self.params.chain_len();
        let digits = self.digits(message)?;
        let mut pk = Vec::with_capacity(self.key_len());
        for (block, &d) in signature.chunks_exact(self.block_size()).zip(&digits) {
            pk.extend_from_slice(&self.chain(block, top - d as usize, top, masks)?);
        }
        Ok(pk)
    }

    pub(crate) fn verify(
        &self,
        message: &[u8],
        public_key: &[u8],
        signature: &[u8],
        masks: Option<&[u8]>,
    ) -> Result<bool, CryptoError> {
        check_len(public_key, self.key_len())?;
        let recovered = self.recover_public_key(message, signature, masks)?;
        Ok(digest_eq(&recovered, public_key))
    }
}

/// Plain Winternitz OTS: unmasked chains over random secret blocks.
#[derive(Debug, Clone)]
pub struct Wots {
    engine: WotsEngine,
}

impl Wots {
    pub fn new(w: usize, n: usize) -> Result<Self, CryptoError> {
        Self::from_params(&WotsParams { n, w })
    }

    pub fn from_params(params: &WotsParams) -> Result<Self, CryptoError> {
        Ok(Self {
            engine: WotsEngine::new(*params)?,
        })
    }

    pub fn params(&self) -> WotsParams {
        self.engine.params
    }

    pub fn generate_key_with(&self, rng: &mut dyn RandomSource) -> Result<KeyPair, CryptoError> {
        let sk = rng.bytes(self.engine.key_len())?;
        let pk = self.engine.public_key(&sk, None)?;
        Ok(KeyPair::new(sk, pk))
    }
}

impl SignatureScheme for Wots {
    fn generate_key(&self) -> Result<KeyPair, CryptoError> {
        let kp = self.generate_key_with(&mut OsRandom)?;
        let p = self.engine.params;
        tracing::debug!(n = p.n, w = p.w, chains = p.chain_count(), "wots: key pair generated");
        Ok(kp)
    }

    fn sign(&self, message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.engine.sign(message, secret_key, None)
    }

    fn verify(
        &self,
        message: &[u8],
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        let ok = self.engine.verify(message, public_key, signature, None)?;
        tracing::debug!(valid = ok, "wots: verify");
        Ok(ok)
    }

    fn public_key_len(&self) -> usize {
        self.engine.key_len()
    }

    fn secret_key_len(&self) -> usize {
        self.engine.key_len()
    }

    fn signature_len(&self) -> usize {
        self.engine.key_len()
    }
}
