//! Fixed-height binary hash tree stored as a flat node array.
//!
//! Node `i` has children `2i+1` and `2i+2`; the root is node 0 and the
//! `2^(h-1)` leaves occupy the last positions of the array.

use hbs_types::CryptoError;

use super::{combine, layer_masks};
use crate::hash::HashFunction;

/// A Merkle tree of height `h` (root at level 0, leaves at level `h-1`).
#[derive(Debug, Clone)]
pub struct MerkleTree<'m> {
    height: usize,
    hash: HashFunction,
    /// `2*(h-1)` mask blocks, two per internal layer.
    masks: Option<&'m [u8]>,
    /// `(2^h - 1) * n` bytes.
    nodes: Vec<u8>,
    populated: bool,
}

impl<'m> MerkleTree<'m> {
    /// Unmasked tree over `n`-bit digests (`n` is 256 or 512).
    pub fn new(height: usize, n: usize) -> Result<Self, CryptoError> {
        Self::build(height, n, None)
    }

    /// Masked tree; `masks` must hold exactly `2*(height-1)` digests.
    pub fn with_masks(height: usize, n: usize, masks: &'m [u8]) -> Result<Self, CryptoError> {
        Self::build(height, n, Some(masks))
    }

    fn build(height: usize, n: usize, masks: Option<&'m [u8]>) -> Result<Self, CryptoError> {
        let hash = HashFunction::from_bits(n)?;
        if height == 0 {
            return Err(CryptoError::InvalidTreeHeight);
        }
        if height >= usize::BITS as usize {
            return Err(CryptoError::HeightTooLarge(height));
        }
        let bs = hash.output_size();
        if let Some(m) = masks {
            let expected = 2 * (height - 1) * bs;
            if m.len() != expected {
                return Err(CryptoError::SizeMismatch {
                    expected,
                    got: m.len(),
                });
            }
        }
        Ok(Self {
            height,
            hash,
            masks,
            nodes: vec![0u8; ((1usize << height) - 1) * bs],
            populated: false,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn hash_function(&self) -> HashFunction {
        self.hash
    }

    /// Digest size in bytes.
    pub fn block_size(&self) -> usize {
        self.hash.output_size()
    }

    pub fn leaf_count(&self) -> usize {
        1 << (self.height - 1)
    }

    fn first_leaf(&self) -> usize {
        self.leaf_count() - 1
    }

    fn node_count(&self) -> usize {
        (1 << self.height) - 1
    }

    /// Populate the tree from secret blocks: leaf `i` is `H(sk_i)`.
    pub fn set_secret(&mut self, sk: &[u8]) -> Result<(), CryptoError> {
        let bs = self.block_size();
        self.check_leaf_bytes(sk)?;
        let start = self.first_leaf() * bs;
        for (i, block) in sk.chunks_exact(bs).enumerate() {
            let leaf = self.hash.hash(block);
            self.nodes[start + i * bs..start + (i + 1) * bs].copy_from_slice(&leaf);
        }
        self.fill_internal();
        Ok(())
    }

    /// Populate the tree from already-computed leaf digests.
    pub fn set_leaves(&mut self, leaves: &[u8]) -> Result<(), CryptoError> {
        self.check_leaf_bytes(leaves)?;
        let start = self.first_leaf() * self.block_size();
        self.nodes[start..].copy_from_slice(leaves);
        self.fill_internal();
        Ok(())
    }

    fn check_leaf_bytes(&self, data: &[u8]) -> Result<(), CryptoError> {
        let expected = self.leaf_count() * self.block_size();
        if data.len() != expected {
            return Err(CryptoError::SizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(())
    }

    fn fill_internal(&mut self) {
        let bs = self.block_size();
        for i in (0..self.first_leaf()).rev() {
            let layer = (i + 1).ilog2() as usize;
            let (l, r) = (2 * i + 1, 2 * i + 2);
            let parent = combine(
                self.hash,
                &self.nodes[l * bs..(l + 1) * bs],
                &self.nodes[r * bs..(r + 1) * bs],
                layer_masks(self.masks, layer, bs),
            );
            self.nodes[i * bs..(i + 1) * bs].copy_from_slice(&parent);
        }
        self.populated = true;
    }

    fn ensure_populated(&self) -> Result<(), CryptoError> {
        if !self.populated {
            return Err(CryptoError::TreeNotInitialized);
        }
        Ok(())
    }

    /// The root digest.
    pub fn get_pk(&self) -> Result<&[u8], CryptoError> {
        self.node(0)
    }

    /// Node at flat position `index`.
    pub fn node(&self, index: usize) -> Result<&[u8], CryptoError> {
        self.ensure_populated()?;
        let limit = self.node_count();
        if index >= limit {
            return Err(CryptoError::IndexOutOfRange { index, limit });
        }
        let bs = self.block_size();
        Ok(&self.nodes[index * bs..(index + 1) * bs])
    }

    pub fn leaf(&self, index: usize) -> Result<&[u8], CryptoError> {
        let limit = self.leaf_count();
        if index >= limit {
            return Err(CryptoError::IndexOutOfRange { index, limit });
        }
        self.node(self.first_leaf() + index)
    }

    /// All `2^level` nodes of `level`, concatenated left to right.
    pub fn layer(&self, level: usize) -> Result<&[u8], CryptoError> {
        self.ensure_populated()?;
        if level >= self.height {
            return Err(CryptoError::IndexOutOfRange {
                index: level,
                limit: self.height,
            });
        }
        let bs = self.block_size();
        let start = (1usize << level) - 1;
        let end = (1usize << (level + 1)) - 1;
        Ok(&self.nodes[start * bs..end * bs])
    }

    /// Siblings of leaf `leaf_index` and its ancestors, from the leaf up to
    /// but not including `level`. Holds `height-1-level` digests,
    /// leaf-adjacent first.
    pub fn authentication_path(
        &self,
        level: usize,
        leaf_index: usize,
    ) -> Result<Vec<u8>, CryptoError> {
        self.ensure_populated()?;
        if level >= self.height {
            return Err(CryptoError::IndexOutOfRange {
                index: level,
                limit: self.height,
            });
        }
        let limit = self.leaf_count();
        if leaf_index >= limit {
            return Err(CryptoError::IndexOutOfRange {
                index: leaf_index,
                limit,
            });
        }

        let bs = self.block_size();
        let mut path = Vec::with_capacity((self.height - 1 - level) * bs);
        let stop = (1usize << (level + 1)) - 2;
        let mut j = self.first_leaf() + leaf_index;
        while j > stop {
            let sibling = if j % 2 == 1 { j + 1 } else { j - 1 };
            path.extend_from_slice(&self.nodes[sibling * bs..(sibling + 1) * bs]);
            j = (j - 1) / 2;
        }
        Ok(path)
    }

    /// Recompute an ancestor from a secret leaf block and its path.
    ///
    /// `index` is the leaf's flat position in the tree. At each step an odd
    /// index means the running value is the left child. When `masks` is
    /// given it holds `2*len(path)` digests for the layers being produced,
    /// topmost layer first.
    pub fn compute_root(
        hash: HashFunction,
        leaf_block: &[u8],
        index: usize,
        path: &[u8],
        masks: Option<&[u8]>,
    ) -> Result<Vec<u8>, CryptoError> {
        let bs = hash.output_size();
        if path.len() % bs != 0 {
            return Err(CryptoError::SizeMismatch {
                expected: path.len() / bs * bs,
                got: path.len(),
            });
        }
        let steps = path.len() / bs;
        if let Some(m) = masks {
            if m.len() != 2 * steps * bs {
                return Err(CryptoError::SizeMismatch {
                    expected: 2 * steps * bs,
                    got: m.len(),
                });
            }
        }

        let mut index = index;
        let mut ret = hash.hash(leaf_block);
        for (i, sibling) in path.chunks_exact(bs).enumerate() {
            if index == 0 {
                return Err(CryptoError::IndexOutOfRange { index, limit: 0 });
            }
            let pair = layer_masks(masks, steps - 1 - i, bs);
            ret = if index % 2 == 1 {
                combine(hash, &ret, sibling, pair)
            } else {
                combine(hash, sibling, &ret, pair)
            };
            index = (index - 1) / 2;
        }
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(count: usize, bs: usize) -> Vec<u8> {
        (0..count * bs).map(|i| (i * 7 + 3) as u8).collect()
    }

    #[test]
    fn test_tree_rejects_bad_params() {
        assert!(matches!(
            MerkleTree::new(0, 256),
            Err(CryptoError::InvalidTreeHeight)
        ));
        assert!(matches!(
            MerkleTree::new(3, 384),
            Err(CryptoError::UnsupportedDigestSize(384))
        ));
        let masks = vec![0u8; 3 * 32];
        assert!(matches!(
            MerkleTree::with_masks(3, 256, &masks),
            Err(CryptoError::SizeMismatch { expected: 128, got: 96 })
        ));
    }

    #[test]
    fn test_tree_not_initialized() {
        let tree = MerkleTree::new(3, 256).unwrap();
        assert!(matches!(tree.get_pk(), Err(CryptoError::TreeNotInitialized)));
        assert!(matches!(
            tree.authentication_path(0, 0),
            Err(CryptoError::TreeNotInitialized)
        ));
    }

    #[test]
    fn test_set_secret_size_mismatch() {
        let mut tree = MerkleTree::new(3, 256).unwrap();
        let r = tree.set_secret(&[0u8; 3 * 32]);
        assert!(matches!(
            r,
            Err(CryptoError::SizeMismatch { expected: 128, got: 96 })
        ));
    }

    #[test]
    fn test_single_node_tree() {
        let mut tree = MerkleTree::new(1, 256).unwrap();
        tree.set_secret(b"0123456789abcdef0123456789abcdef").unwrap();
        let h = HashFunction::Sha256;
        assert_eq!(tree.get_pk().unwrap(), &h.hash(b"0123456789abcdef0123456789abcdef")[..]);
        assert!(tree.authentication_path(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_node_rule_unmasked() {
        let h = HashFunction::Sha256;
        let sk = blocks(2, 32);
        let mut tree = MerkleTree::new(2, 256).unwrap();
        tree.set_secret(&sk).unwrap();
        let l = h.hash(&sk[..32]);
        let r = h.hash(&sk[32..]);
        assert_eq!(tree.get_pk().unwrap(), &h.hash_pair(&l, &r)[..]);
        assert_eq!(tree.leaf(1).unwrap(), &r[..]);
    }

    #[test]
    fn test_node_rule_masked() {
        let h = HashFunction::Sha512;
        let sk = blocks(4, 64);
        let masks = blocks(4, 64).iter().map(|b| b ^ 0x5A).collect::<Vec<u8>>();
        let mut tree = MerkleTree::with_masks(3, 512, &masks).unwrap();
        tree.set_secret(&sk).unwrap();

        let leaves: Vec<Vec<u8>> = sk.chunks(64).map(|b| h.hash(b)).collect();
        let m = |i: usize| masks[i * 64..(i + 1) * 64].to_vec();
        let a = h.hash_pair_masked(&leaves[0], &leaves[1], &m(2), &m(3));
        let b = h.hash_pair_masked(&leaves[2], &leaves[3], &m(2), &m(3));
        let root = h.hash_pair_masked(&a, &b, &m(0), &m(1));
        assert_eq!(tree.get_pk().unwrap(), &root[..]);
        assert_eq!(tree.layer(1).unwrap(), &[a, b].concat()[..]);
    }

    #[test]
    fn test_authentication_path_lengths() {
        let height = 5;
        let mut tree = MerkleTree::new(height, 256).unwrap();
        tree.set_secret(&blocks(16, 32)).unwrap();
        for level in 0..height {
            for i in 0..tree.leaf_count() {
                let path = tree.authentication_path(level, i).unwrap();
                assert_eq!(path.len(), (height - 1 - level) * 32);
            }
        }
        assert!(tree.authentication_path(height, 0).is_err());
        assert!(tree.authentication_path(0, 16).is_err());
    }

    #[test]
    fn test_compute_root_every_leaf() {
        for n in [256usize, 512] {
            let bs = n / 8;
            let height = 4;
            let sk = blocks(8, bs);
            let mut tree = MerkleTree::new(height, n).unwrap();
            tree.set_secret(&sk).unwrap();
            let root = tree.get_pk().unwrap().to_vec();
            for i in 0..8 {
                let path = tree.authentication_path(0, i).unwrap();
                let got = MerkleTree::compute_root(
                    tree.hash_function(),
                    &sk[i * bs..(i + 1) * bs],
                    7 + i,
                    &path,
                    None,
                )
                .unwrap();
                assert_eq!(got, root, "n={n} leaf={i}");
            }
        }
    }

    #[test]
    fn test_compute_root_masked_every_leaf() {
        let height = 5;
        let sk = blocks(16, 32);
        let masks: Vec<u8> = (0..8 * 32).map(|i| (i * 13) as u8).collect();
        let mut tree = MerkleTree::with_masks(height, 256, &masks).unwrap();
        tree.set_secret(&sk).unwrap();
        let root = tree.get_pk().unwrap().to_vec();
        for i in 0..16 {
            let path = tree.authentication_path(0, i).unwrap();
            let got = MerkleTree::compute_root(
                HashFunction::Sha256,
                &sk[i * 32..(i + 1) * 32],
                15 + i,
                &path,
                Some(&masks),
            )
            .unwrap();
            assert_eq!(got, root, "leaf={i}");
        }
    }

    #[test]
    fn test_compute_root_to_inner_level() {
        // a path that stops at level 2 lands on the level-2 ancestor
        let height = 5;
        let sk = blocks(16, 32);
        let masks: Vec<u8> = (0..8 * 32).map(|i| (i * 31) as u8).collect();
        let mut tree = MerkleTree::with_masks(height, 256, &masks).unwrap();
        tree.set_secret(&sk).unwrap();

        let level = 2;
        let upper = &masks[2 * level * 32..];
        for i in 0..16 {
            let path = tree.authentication_path(level, i).unwrap();
            let got = MerkleTree::compute_root(
                HashFunction::Sha256,
                &sk[i * 32..(i + 1) * 32],
                15 + i,
                &path,
                Some(upper),
            )
            .unwrap();
            // ancestor at level 2 of leaf i is node 3 + i/4
            assert_eq!(got, tree.node(3 + i / 4).unwrap());
        }
    }

    #[test]
    fn test_compute_root_detects_tampering() {
        let sk = blocks(8, 32);
        let mut tree = MerkleTree::new(4, 256).unwrap();
        tree.set_secret(&sk).unwrap();
        let root = tree.get_pk().unwrap().to_vec();
        let mut path = tree.authentication_path(0, 3).unwrap();
        path[40] ^= 1;
        let got =
            MerkleTree::compute_root(HashFunction::Sha256, &sk[96..128], 10, &path, None).unwrap();
        assert_ne!(got, root);
        // wrong position swaps operands
        let path = tree.authentication_path(0, 3).unwrap();
        let got =
            MerkleTree::compute_root(HashFunction::Sha256, &sk[96..128], 9, &path, None).unwrap();
        assert_ne!(got, root);
    }

    #[test]
    fn test_set_leaves_matches_set_secret() {
        let h = HashFunction::Sha256;
        let sk = blocks(8, 32);
        let hashed: Vec<u8> = sk.chunks(32).flat_map(|b| h.hash(b)).collect();
        let mut a = MerkleTree::new(4, 256).unwrap();
        let mut b = MerkleTree::new(4, 256).unwrap();
        a.set_secret(&sk).unwrap();
        b.set_leaves(&hashed).unwrap();
        assert_eq!(a.get_pk().unwrap(), b.get_pk().unwrap());
        assert_eq!(a.layer(3).unwrap(), &hashed[..]);
    }
}
