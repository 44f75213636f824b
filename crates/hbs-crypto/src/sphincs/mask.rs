//! Public mask set shared by all hypertree components.

use core::ops::Range;

use hbs_types::CryptoError;

use super::params::SphincsParams;
use crate::provider::{check_len, RandomSource};

/// `p` random digests, split into disjoint ranges.
///
/// In order: `2^w - 1` WOTS+ chain masks, the L-tree masks, `2*hp` tree
/// masks for each of the `d` layers (bottom layer first), then `2*tau`
/// HORST masks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskSet {
    bytes: Vec<u8>,
    bs: usize,
    wots: Range<usize>,
    ltree: Range<usize>,
    tree: Range<usize>,
    horst: Range<usize>,
    hp: usize,
}

impl MaskSet {
    /// Draw a fresh mask set from `rng`.
    pub fn generate(params: &SphincsParams, rng: &mut dyn RandomSource) -> Result<Self, CryptoError> {
        let bytes = rng.bytes(params.mask_count() * params.block_size())?;
        Self::from_bytes(params, &bytes)
    }

    /// Wrap `bytes`, which must hold exactly `p` digests.
    pub fn from_bytes(params: &SphincsParams, bytes: &[u8]) -> Result<Self, CryptoError> {
        check_len(bytes, params.mask_count() * params.block_size())?;
        let wots = 0..params.wots().chain_len();
        let ltree = wots.end..wots.end + params.ltree_mask_count();
        let tree = ltree.end..ltree.end + 2 * params.h;
        let horst = tree.end..tree.end + 2 * params.tau;
        Ok(Self {
            bytes: bytes.to_vec(),
            bs: params.block_size(),
            wots,
            ltree,
            tree,
            horst,
            hp: params.hp(),
        })
    }

    fn slice(&self, blocks: Range<usize>) -> &[u8] {
        &self.bytes[blocks.start * self.bs..blocks.end * self.bs]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn count(&self) -> usize {
        self.bytes.len() / self.bs
    }

    pub fn wots(&self) -> &[u8] {
        self.slice(self.wots.clone())
    }

    pub fn ltree(&self) -> &[u8] {
        self.slice(self.ltree.clone())
    }

    /// Masks of the tree at WOTS+ layer `layer` (bottom = 0).
    pub fn tree_layer(&self, layer: usize) -> &[u8] {
        let start = self.tree.start + 2 * layer * self.hp;
        self.slice(start..start + 2 * self.hp)
    }

    pub fn horst(&self) -> &[u8] {
        self.slice(self.horst.clone())
    }
}
