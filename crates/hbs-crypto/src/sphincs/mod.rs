//! SPHINCS-style stateless hash-based signatures.
//!
//! A HORST few-time key signs the message digest, and a hypertree of `d`
//! WOTS+ layers authenticates the HORST root up to the public root. The
//! leaf used is picked pseudorandomly from the message, so no signing
//! state is kept.
//!
//! Byte layouts, with `bs = n/8`:
//!
//! ```text
//! pk  = root (bs) ‖ masks (p·bs)
//! sk  = sk1 (bs) ‖ sk2 (bs) ‖ masks (p·bs)
//! sig = index (8, big-endian) ‖ R1 (bs) ‖ HORST sig ‖ d × (WOTS+ sig ‖ hp·bs path)
//! ```

mod address;
mod hypertree;
mod mask;
mod params;

pub use mask::MaskSet;
pub use params::SphincsParams;

use hbs_types::CryptoError;
use zeroize::Zeroize;

use address::{layer_position, shr, Address};
use hypertree::Hypertree;

use crate::drbg::OsRandom;
use crate::hash::{digest_eq, HashFunction};
use crate::horst::HorstEngine;
use crate::provider::{check_len, KeyPair, RandomSource, SignatureScheme};

/// The composite scheme for one parameter set.
#[derive(Debug, Clone)]
pub struct Sphincs {
    params: SphincsParams,
    hypertree: Hypertree,
    horst: HorstEngine,
    hash_m: HashFunction,
}

impl Sphincs {
    pub fn new(params: SphincsParams) -> Result<Self, CryptoError> {
        params.validate()?;
        Ok(Self {
            params,
            hypertree: Hypertree::new(params)?,
            horst: HorstEngine::new(params.horst())?,
            hash_m: HashFunction::from_bits(params.m)?,
        })
    }

    /// SPHINCS-256 parameter set.
    pub fn sphincs256() -> Result<Self, CryptoError> {
        Self::new(SphincsParams::sphincs256())
    }

    pub fn params(&self) -> SphincsParams {
        self.params
    }

    fn block_size(&self) -> usize {
        self.params.block_size()
    }

    /// Key generation drawing `sk1`, `sk2` and the masks from `rng`.
    pub fn generate_key_with(&self, rng: &mut dyn RandomSource) -> Result<KeyPair, CryptoError> {
        let bs = self.block_size();
        let mut sk = rng.bytes(2 * bs)?;
        let masks = MaskSet::generate(&self.params, rng)?;
        let root = self.hypertree.root(&sk[..bs], &masks);
        let root = match root {
            Ok(r) => r,
            Err(e) => {
                sk.zeroize();
                return Err(e);
            }
        };

        sk.extend_from_slice(masks.as_bytes());
        let mut pk = root;
        pk.extend_from_slice(masks.as_bytes());
        Ok(KeyPair::new(sk, pk))
    }

    /// `R1` and the leaf index, both keyed by `sk1`.
    ///
    /// `r = H_512-expand(sk1 ‖ message)` to `2·bs` bytes; `R1` is the first
    /// half and the index is the top `h` bits of the next eight bytes.
    fn randomize(&self, sk1: &[u8], message: &[u8]) -> (Vec<u8>, u64) {
        let bs = self.block_size();
        let mut r = HashFunction::Sha512.expand(&[sk1, message], 2 * bs);
        let mut word = [0u8; 8];
        word.copy_from_slice(&r[bs..bs + 8]);
        let index = shr(u64::from_be_bytes(word), 64 - self.params.h);
        r.truncate(bs);
        (r, index)
    }

    fn horst_address(&self, index: u64) -> Address {
        let (tree, leaf) = layer_position(index, 0, self.params.hp());
        Address::new(self.params.d, tree, leaf)
    }
}

impl SignatureScheme for Sphincs {
    fn generate_key(&self) -> Result<KeyPair, CryptoError> {
        let kp = self.generate_key_with(&mut OsRandom)?;
        let p = self.params;
        tracing::debug!(n = p.n, h = p.h, d = p.d, masks = p.mask_count(), "sphincs: key pair generated");
        Ok(kp)
    }

    fn sign(&self, message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_len(secret_key, self.secret_key_len())?;
        let bs = self.block_size();
        let sk1 = &secret_key[..bs];
        let masks = MaskSet::from_bytes(&self.params, &secret_key[2 * bs..])?;

        let (r1, index) = self.randomize(sk1, message);
        let digest = self.hash_m.hash_parts(&[&r1, message]);

        let mut seed = self.hypertree.seed(sk1, self.horst_address(index));
        let horst_sk = self.horst.secret_from_seed(&seed);
        seed.zeroize();
        let mut horst_sk = horst_sk?;
        let signed = self.horst.sign_with_root(&digest, &horst_sk, masks.horst());
        horst_sk.zeroize();
        let (horst_sig, horst_root) = signed?;

        let layers = self.hypertree.sign(sk1, index, horst_root, &masks)?;

        let mut sig = Vec::with_capacity(self.signature_len());
        sig.extend_from_slice(&index.to_be_bytes());
        sig.extend_from_slice(&r1);
        sig.extend_from_slice(&horst_sig);
        sig.extend_from_slice(&layers);
        tracing::debug!(index, len = sig.len(), "sphincs: signed");
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
        let (root, mask_bytes) = public_key.split_at(bs);
        let masks = MaskSet::from_bytes(&self.params, mask_bytes)?;

        let (index_bytes, rest) = signature.split_at(8);
        let (r1, rest) = rest.split_at(bs);
        let (horst_sig, layers) = rest.split_at(self.params.horst_signature_len());

        let mut word = [0u8; 8];
        word.copy_from_slice(index_bytes);
        let index = u64::from_be_bytes(word);
        if shr(index, self.params.h) != 0 {
            tracing::debug!(index, "sphincs: leaf index out of range");
            return Ok(false);
        }

        let digest = self.hash_m.hash_parts(&[r1, message]);
        let horst_root = match self.horst.recover_root(&digest, horst_sig, masks.horst())? {
            Some(r) => r,
            None => {
                tracing::debug!(index, "sphincs: horst layer rejected");
                return Ok(false);
            }
        };
        let candidate = self
            .hypertree
            .recover_root(index, horst_root, layers, &masks)?;
        let ok = digest_eq(&candidate, root);
        tracing::debug!(index, valid = ok, "sphincs: verify");
        Ok(ok)
    }

    fn public_key_len(&self) -> usize {
        self.params.public_key_len()
    }

    fn secret_key_len(&self) -> usize {
        self.params.secret_key_len()
    }

    fn signature_len(&self) -> usize {
        self.params.signature_len()
    }
}
