//! WOTS+ hypertree.
//!
//! `d` layers of masked Merkle trees of height `hp`. Each leaf is the L-tree
//! root of a WOTS+ public key, and each layer signs the root of the tree
//! below it; the bottom layer signs the HORST root. Every one-time key is
//! derived from `sk1` and its [`Address`], so no tree is stored.

use hbs_types::CryptoError;
use zeroize::Zeroize;

use super::address::{layer_position, Address};
use super::mask::MaskSet;
use super::params::SphincsParams;
use crate::hash::HashFunction;
use crate::merkle::{ltree_root, MerkleTree};
use crate::provider::check_len;
use crate::wots::{plus::secret_from_seed, WotsEngine};

#[derive(Debug, Clone)]
pub(crate) struct Hypertree {
    params: SphincsParams,
    wots: WotsEngine,
    hash: HashFunction,
}

impl Hypertree {
    pub fn new(params: SphincsParams) -> Result<Self, CryptoError> {
        Ok(Self {
            params,
            wots: WotsEngine::new(params.wots())?,
            hash: HashFunction::from_bits(params.n)?,
        })
    }

    /// Per-key-pair seed: `H_n(address ‖ sk1)`.
    pub fn seed(&self, sk1: &[u8], addr: Address) -> Vec<u8> {
        self.hash.hash_parts(&[&addr.to_bytes(), sk1])
    }

    fn wots_secret(&self, sk1: &[u8], addr: Address) -> Result<Vec<u8>, CryptoError> {
        let mut seed = self.seed(sk1, addr);
        let sk = secret_from_seed(&self.wots, &seed);
        seed.zeroize();
        sk
    }

    /// Compressed WOTS+ public key at `addr`.
    fn leaf(&self, sk1: &[u8], addr: Address, masks: &MaskSet) -> Result<Vec<u8>, CryptoError> {
        let mut sk = self.wots_secret(sk1, addr)?;
        let pk = self.wots.public_key(&sk, Some(masks.wots()));
        sk.zeroize();
        ltree_root(self.hash, &pk?, Some(masks.ltree()))
    }

    fn build_tree<'m>(
        &self,
        sk1: &[u8],
        layer: usize,
        tree: u64,
        masks: &'m MaskSet,
    ) -> Result<MerkleTree<'m>, CryptoError> {
        let hp = self.params.hp();
        let mut leaves = Vec::with_capacity((1 << hp) * self.params.block_size());
        for key in 0..(1u64 << hp) {
            leaves.extend_from_slice(&self.leaf(sk1, Address::new(layer, tree, key), masks)?);
        }
        let mut t = MerkleTree::with_masks(hp + 1, self.params.n, masks.tree_layer(layer))?;
        t.set_secret(&leaves)?;
        Ok(t)
    }

    /// Root of the single top-layer tree: the public root.
    pub fn root(&self, sk1: &[u8], masks: &MaskSet) -> Result<Vec<u8>, CryptoError> {
        let t = self.build_tree(sk1, self.params.d - 1, 0, masks)?;
        Ok(t.get_pk()?.to_vec())
    }

    /// Sign `node` up through all layers along the path chosen by `index`.
    ///
    /// Output is, per layer from the bottom, the WOTS+ signature followed by
    /// the `hp` authentication path digests.
    pub fn sign(
        &self,
        sk1: &[u8],
        index: u64,
        node: Vec<u8>,
        masks: &MaskSet,
    ) -> Result<Vec<u8>, CryptoError> {
        let hp = self.params.hp();
        let mut node = node;
        let mut sig = Vec::with_capacity(self.params.d * self.params.layer_signature_len());
        for j in 0..self.params.d {
            let (tree, leaf) = layer_position(index, j, hp);
            let addr = Address::new(j, tree, leaf);

            let mut sk = self.wots_secret(sk1, addr)?;
            let wots_sig = self.wots.sign(&node, &sk, Some(masks.wots()));
            sk.zeroize();
            sig.extend_from_slice(&wots_sig?);

            let t = self.build_tree(sk1, j, tree, masks)?;
            sig.extend_from_slice(&t.authentication_path(0, leaf as usize)?);
            node = t.get_pk()?.to_vec();
            tracing::trace!(
                layer = addr.layer(),
                tree = addr.tree(),
                key = addr.key(),
                "sphincs: layer signed"
            );
        }
        Ok(sig)
    }

    /// Root implied by the layer signatures over `node`.
    pub fn recover_root(
        &self,
        index: u64,
        node: Vec<u8>,
        layers: &[u8],
        masks: &MaskSet,
    ) -> Result<Vec<u8>, CryptoError> {
        let layer_len = self.params.layer_signature_len();
        check_len(layers, self.params.d * layer_len)?;
        let hp = self.params.hp();
        let first_leaf = (1usize << hp) - 1;

        let mut node = node;
        for (j, part) in layers.chunks_exact(layer_len).enumerate() {
            let (_, leaf) = layer_position(index, j, hp);
            let (wots_sig, path) = part.split_at(self.wots.key_len());
            let pk = self
                .wots
                .recover_public_key(&node, wots_sig, Some(masks.wots()))?;
            let compressed = ltree_root(self.hash, &pk, Some(masks.ltree()))?;
            node = MerkleTree::compute_root(
                self.hash,
                &compressed,
                first_leaf + leaf as usize,
                path,
                Some(masks.tree_layer(j)),
            )?;
        }
        Ok(node)
    }
}
