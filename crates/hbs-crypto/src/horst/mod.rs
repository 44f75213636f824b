//! HORST: HORS with a Merkle-tree public key.
//!
//! The `t = 2^tau` secret blocks are the leaves of a masked tree of height
//! `tau + 1`, and the public key is its root. A signature carries, for each
//! of the `k` selected leaves, the secret block and its authentication path
//! up to the cut level `x`, followed once by the full level-`x` layer:
//!
//! ```text
//! k × (block ‖ (tau - x) path nodes) ‖ 2^x layer nodes
//! ```

use hbs_types::CryptoError;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::drbg::{HashDrbg, OsRandom};
use crate::hash::{digest_eq, HashFunction};
use crate::hors::{select_indices, validate_tau};
use crate::merkle::MerkleTree;
use crate::provider::{check_len, KeyPair, RandomSource, SignatureScheme};

/// HORST parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorstParams {
    /// Block and tree digest width in bits.
    pub n: usize,
    pub tau: usize,
    pub k: usize,
}

impl Default for HorstParams {
    fn default() -> Self {
        Self {
            n: 256,
            tau: 16,
            k: 32,
        }
    }
}

impl HorstParams {
    pub fn validate(&self) -> Result<(), CryptoError> {
        HashFunction::from_bits(self.n)?;
        validate_tau(self.tau)?;
        HashFunction::from_bits(self.m()).map(|_| ())
    }

    /// Message digest width in bits.
    pub fn m(&self) -> usize {
        self.tau * self.k
    }

    /// Mask digests needed by the tree: two per internal layer.
    pub fn mask_count(&self) -> usize {
        2 * self.tau
    }
}

/// Cut level minimising `k*(tau-i+1) + 2^i`; ties go to the higher level.
pub fn cut_level(k: usize, tau: usize) -> usize {
    let mut best = usize::MAX;
    let mut res = 0;
    for i in 0..=tau {
        let cost = k * (tau - i + 1) + (1usize << i);
        if cost <= best {
            best = cost;
            res = i;
        }
    }
    res
}

/// Tree arithmetic shared by the standalone scheme and the hypertree.
#[derive(Debug, Clone)]
pub(crate) struct HorstEngine {
    pub(crate) params: HorstParams,
    pub(crate) hash: HashFunction,
    pub(crate) x: usize,
}

impl HorstEngine {
    pub(crate) fn new(params: HorstParams) -> Result<Self, CryptoError> {
        params.validate()?;
        Ok(Self {
            params,
            hash: HashFunction::from_bits(params.n)?,
            x: cut_level(params.k, params.tau),
        })
    }

    pub(crate) fn block_size(&self) -> usize {
        self.params.n / 8
    }

    fn leaf_count(&self) -> usize {
        1 << self.params.tau
    }

    pub(crate) fn secret_key_len(&self) -> usize {
        self.leaf_count() * self.block_size()
    }

    fn part_len(&self) -> usize {
        (1 + self.params.tau - self.x) * self.block_size()
    }

    pub(crate) fn signature_len(&self) -> usize {
        self.params.k * self.part_len() + (1 << self.x) * self.block_size()
    }

    fn check_masks(&self, masks: &[u8]) -> Result<(), CryptoError> {
        check_len(masks, self.params.mask_count() * self.block_size())
    }

    pub(crate) fn secret_from_seed(&self, seed: &[u8]) -> Result<Vec<u8>, CryptoError> {
        HashDrbg::new(self.hash, seed).bytes(self.secret_key_len())
    }

    fn tree<'m>(&self, sk: &[u8], masks: &'m [u8]) -> Result<MerkleTree<'m>, CryptoError> {
        let mut tree = MerkleTree::with_masks(self.params.tau + 1, self.params.n, masks)?;
        tree.set_secret(sk)?;
        Ok(tree)
    }

    pub(crate) fn public_key(&self, sk: &[u8], masks: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.check_masks(masks)?;
        Ok(self.tree(sk, masks)?.get_pk()?.to_vec())
    }

    pub(crate) fn sign_digest(
        &self,
        digest: &[u8],
        sk: &[u8],
        masks: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.sign_with_root(digest, sk, masks).map(|(sig, _)| sig)
    }

    /// Sign and also return the tree root, saving a second tree build.
    pub(crate) fn sign_with_root(
        &self,
        digest: &[u8],
        sk: &[u8],
        masks: &[u8],
    ) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        check_len(digest, self.params.m() / 8)?;
        self.check_masks(masks)?;
        let tree = self.tree(sk, masks)?;
        let bs = self.block_size();

        let mut sig = Vec::with_capacity(self.signature_len());
        for j in select_indices(digest, self.params.tau, self.params.k) {
            sig.extend_from_slice(&sk[j * bs..(j + 1) * bs]);
            sig.extend_from_slice(&tree.authentication_path(self.x, j)?);
        }
        sig.extend_from_slice(tree.layer(self.x)?);
        Ok((sig, tree.get_pk()?.to_vec()))
    }

    /// Root authenticated by `signature`, or `None` when a selected leaf does
    /// not reach its carried level-`x` node.
    pub(crate) fn recover_root(
        &self,
        digest: &[u8],
        signature: &[u8],
        masks: &[u8],
    ) -> Result<Option<Vec<u8>>, CryptoError> {
        check_len(digest, self.params.m() / 8)?;
        check_len(signature, self.signature_len())?;
        self.check_masks(masks)?;

        let (tau, x) = (self.params.tau, self.x);
        let bs = self.block_size();
        let part = self.part_len();
        let (parts, layer) = signature.split_at(self.params.k * part);
        let lower_masks = &masks[2 * x * bs..];
        let first_leaf = self.leaf_count() - 1;

        let mut ok = true;
        for (chunk, j) in parts
            .chunks_exact(part)
            .zip(select_indices(digest, tau, self.params.k))
        {
            let (block, path) = chunk.split_at(bs);
            let node = MerkleTree::compute_root(
                self.hash,
                block,
                first_leaf + j,
                path,
                Some(lower_masks),
            )?;
            let pos = ancestor(first_leaf + j, tau - x) - ((1 << x) - 1);
            ok &= digest_eq(&node, &layer[pos * bs..(pos + 1) * bs]);
        }
        if !ok {
            return Ok(None);
        }

        let mut top = MerkleTree::with_masks(x + 1, self.params.n, &masks[..2 * x * bs])?;
        top.set_leaves(layer)?;
        Ok(Some(top.get_pk()?.to_vec()))
    }
}

/// Flat index of the ancestor `d` levels above node `index`.
fn ancestor(index: usize, d: usize) -> usize {
    (0..d).fold(index, |i, _| (i - 1) >> 1)
}

/// HORST bound to one seed and one mask range.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Horst {
    #[zeroize(skip)]
    engine: HorstEngine,
    seed: Vec<u8>,
    #[zeroize(skip)]
    masks: Vec<u8>,
}

impl core::fmt::Debug for Horst {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Horst")
            .field("params", &self.engine.params)
            .field("x", &self.engine.x)
            .finish_non_exhaustive()
    }
}

impl Horst {
    /// `masks` must hold `2*tau` digests of `n` bits.
    pub fn new(params: &HorstParams, seed: &[u8], masks: &[u8]) -> Result<Self, CryptoError> {
        let engine = HorstEngine::new(*params)?;
        engine.check_masks(masks)?;
        Ok(Self {
            engine,
            seed: seed.to_vec(),
            masks: masks.to_vec(),
        })
    }

    /// Instance with a fresh seed and fresh masks from the OS.
    pub fn random(params: &HorstParams) -> Result<Self, CryptoError> {
        params.validate()?;
        let bs = params.n / 8;
        let mut rng = OsRandom;
        let mut seed = rng.bytes(bs)?;
        let masks = rng.bytes(params.mask_count() * bs)?;
        let scheme = Self::new(params, &seed, &masks);
        seed.zeroize();
        scheme
    }

    pub fn params(&self) -> HorstParams {
        self.engine.params
    }

    /// Level at which authentication paths stop.
    pub fn cut_level(&self) -> usize {
        self.engine.x
    }

    pub fn masks(&self) -> &[u8] {
        &self.masks
    }

    fn message_digest(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(HashFunction::from_bits(self.engine.params.m())?.hash(message))
    }

    /// Sign a digest of exactly `tau*k` bits.
    pub fn sign_digest(&self, digest: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_len(secret_key, self.engine.secret_key_len())?;
        self.engine.sign_digest(digest, secret_key, &self.masks)
    }

    /// Verify a signature over a digest of exactly `tau*k` bits.
    pub fn verify_digest(
        &self,
        digest: &[u8],
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        check_len(public_key, self.engine.block_size())?;
        Ok(match self.engine.recover_root(digest, signature, &self.masks)? {
            Some(root) => digest_eq(&root, public_key),
            None => false,
        })
    }
}

impl SignatureScheme for Horst {
    fn generate_key(&self) -> Result<KeyPair, CryptoError> {
        let sk = self.engine.secret_from_seed(&self.seed)?;
        let pk = self.engine.public_key(&sk, &self.masks)?;
        let p = self.engine.params;
        tracing::debug!(n = p.n, tau = p.tau, k = p.k, x = self.engine.x, "horst: key pair generated");
        Ok(KeyPair::new(sk, pk))
    }

    fn sign(&self, message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.sign_digest(&self.message_digest(message)?, secret_key)
    }

    fn verify(
        &self,
        message: &[u8],
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        let ok = self.verify_digest(&self.message_digest(message)?, public_key, signature)?;
        tracing::debug!(valid = ok, "horst: verify");
        Ok(ok)
    }

    fn public_key_len(&self) -> usize {
        self.engine.block_size()
    }

    fn secret_key_len(&self) -> usize {
        self.engine.secret_key_len()
    }

    fn signature_len(&self) -> usize {
        self.engine.signature_len()
    }
}
