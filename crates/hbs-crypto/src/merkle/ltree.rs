//! L-tree: Merkle-style reduction over any number of blocks.

use hbs_types::CryptoError;

use super::{combine, layer_masks};
use crate::hash::HashFunction;

/// Reduce the concatenated blocks of `pk` to a single digest.
///
/// The block count is padded virtually to the next power of two; a node
/// without a right sibling is carried up unchanged, so padding slots are
/// never read. With masks, the round producing layer `j` (root = 0) uses
/// mask blocks `2j` and `2j+1`, so `masks` must hold at least
/// `2*ceil(log2(count))` digests.
pub fn ltree_root(
    hash: HashFunction,
    pk: &[u8],
    masks: Option<&[u8]>,
) -> Result<Vec<u8>, CryptoError> {
    let bs = hash.output_size();
    if pk.is_empty() || pk.len() % bs != 0 {
        return Err(CryptoError::SizeMismatch {
            expected: (pk.len() / bs).max(1) * bs,
            got: pk.len(),
        });
    }
    let num = pk.len() / bs;
    let rounds = num.next_power_of_two().ilog2() as usize;
    if let Some(m) = masks {
        if m.len() < 2 * rounds * bs {
            return Err(CryptoError::SizeMismatch {
                expected: 2 * rounds * bs,
                got: m.len(),
            });
        }
    }

    let mut nodes: Vec<Vec<u8>> = pk.chunks_exact(bs).map(<[u8]>::to_vec).collect();
    for layer in (0..rounds).rev() {
        let pair = layer_masks(masks, layer, bs);
        let mut next = Vec::with_capacity(nodes.len().div_ceil(2));
        let mut it = nodes.into_iter();
        while let Some(left) = it.next() {
            match it.next() {
                Some(right) => next.push(combine(hash, &left, &right, pair)),
                None => next.push(left),
            }
        }
        nodes = next;
    }

    Ok(nodes.swap_remove(0))
}
