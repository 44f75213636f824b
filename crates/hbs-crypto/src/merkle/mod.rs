//! Merkle tree and L-tree reductions.
//!
//! Node layers are numbered from the root (layer 0). In a masked reduction
//! the node produced at layer `ℓ` is `H((left ⊕ mask[2ℓ]) ‖ (right ⊕ mask[2ℓ+1]))`,
//! with masks counted in hash-output-sized blocks.

mod ltree;
mod tree;

pub use ltree::ltree_root;
pub use tree::MerkleTree;

/// Mask pair for layer `layer`, or `None` for an unmasked reduction.
pub(crate) fn layer_masks(masks: Option<&[u8]>, layer: usize, n: usize) -> Option<(&[u8], &[u8])> {
    masks.map(|m| {
        let l = 2 * layer * n;
        (&m[l..l + n], &m[l + n..l + 2 * n])
    })
}

/// Hash two children into their parent, masking when a pair is given.
pub(crate) fn combine(
    hash: crate::hash::HashFunction,
    left: &[u8],
    right: &[u8],
    masks: Option<(&[u8], &[u8])>,
) -> Vec<u8> {
    match masks {
        Some((ml, mr)) => hash.hash_pair_masked(left, right, ml, mr),
        None => hash.hash_pair(left, right),
    }
}
