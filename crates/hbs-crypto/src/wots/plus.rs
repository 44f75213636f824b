//! WOTS+ with seed-derived secret keys.

use hbs_types::CryptoError;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{WotsEngine, WotsParams};
use crate::drbg::{HashDrbg, OsRandom};
use crate::provider::{KeyPair, RandomSource, SignatureScheme};

/// WOTS+ bound to one seed and one mask range.
///
/// Key generation expands the seed through a fresh [`HashDrbg`], so the
/// same instance always yields the same key pair.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WotsPlus {
    #[zeroize(skip)]
    engine: WotsEngine,
    seed: Vec<u8>,
    #[zeroize(skip)]
    masks: Vec<u8>,
}

impl core::fmt::Debug for WotsPlus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WotsPlus")
            .field("params", &self.engine.params)
            .finish_non_exhaustive()
    }
}

/// Check a WOTS+ mask range: exactly `n * (2^w - 1)` bits.
pub(crate) fn check_masks(params: &WotsParams, masks: &[u8]) -> Result<(), CryptoError> {
    let expected = params.chain_len() * params.n / 8;
    if masks.len() != expected {
        return Err(CryptoError::SizeMismatch {
            expected,
            got: masks.len(),
        });
    }
    Ok(())
}

/// Expand `seed` into a WOTS+ secret key.
pub(crate) fn secret_from_seed(engine: &WotsEngine, seed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut drbg = HashDrbg::new(engine.hash, seed);
    drbg.bytes(engine.key_len())
}

impl WotsPlus {
    pub fn new(w: usize, n: usize, seed: &[u8], masks: &[u8]) -> Result<Self, CryptoError> {
        Self::from_params(&WotsParams { n, w }, seed, masks)
    }

    pub fn from_params(params: &WotsParams, seed: &[u8], masks: &[u8]) -> Result<Self, CryptoError> {
        let engine = WotsEngine::new(*params)?;
        check_masks(params, masks)?;
        Ok(Self {
            engine,
            seed: seed.to_vec(),
            masks: masks.to_vec(),
        })
    }

    /// Instance with a fresh seed and fresh masks from the OS.
    pub fn random(w: usize, n: usize) -> Result<Self, CryptoError> {
        let params = WotsParams { n, w };
        params.validate()?;
        let mut rng = OsRandom;
        let mut seed = rng.bytes(n / 8)?;
        let masks = rng.bytes(params.chain_len() * n / 8)?;
        let scheme = Self::from_params(&params, &seed, &masks);
        seed.zeroize();
        scheme
    }

    pub fn params(&self) -> WotsParams {
        self.engine.params
    }

    pub fn masks(&self) -> &[u8] {
        &self.masks
    }

    /// Public key implied by `signature` on `message`.
    pub fn recover_public_key(
        &self,
        message: &[u8],
        signature: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.engine
            .recover_public_key(message, signature, Some(&self.masks))
    }
}

impl SignatureScheme for WotsPlus {
    fn generate_key(&self) -> Result<KeyPair, CryptoError> {
        let sk = secret_from_seed(&self.engine, &self.seed)?;
        let pk = self.engine.public_key(&sk, Some(&self.masks))?;
        let p = self.engine.params;
        tracing::debug!(n = p.n, w = p.w, chains = p.chain_count(), "wots+: key pair generated");
        Ok(KeyPair::new(sk, pk))
    }

    fn sign(&self, message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.engine.sign(message, secret_key, Some(&self.masks))
    }

    fn verify(
        &self,
        message: &[u8],
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        let ok = self
            .engine
            .verify(message, public_key, signature, Some(&self.masks))?;
        tracing::debug!(valid = ok, "wots+: verify");
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
