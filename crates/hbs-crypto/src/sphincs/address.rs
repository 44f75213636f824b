//! Hypertree key-pair addresses.
//!
//! An address names one one-time key pair by `(layer, tree, key)`. Layer `d`
//! is the HORST layer below the `d` WOTS+ layers. The encoded form is the
//! XOR of the three fields as an 8-byte big-endian integer; it only feeds
//! seed derivation, so collisions between addresses are harmless.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Address {
    layer: u64,
    tree: u64,
    key: u64,
}

impl Address {
    pub fn new(layer: usize, tree: u64, key: u64) -> Self {
        Self {
            layer: layer as u64,
            tree,
            key,
        }
    }

    pub fn layer(&self) -> u64 {
        self.layer
    }

    pub fn tree(&self) -> u64 {
        self.tree
    }

    pub fn key(&self) -> u64 {
        self.key
    }

    pub fn to_bytes(self) -> [u8; 8] {
        (self.layer ^ self.tree ^ self.key).to_be_bytes()
    }
}

/// `value >> shift`, zero once the shift reaches the word width.
pub(crate) fn shr(value: u64, shift: usize) -> u64 {
    u32::try_from(shift)
        .ok()
        .and_then(|s| value.checked_shr(s))
        .unwrap_or(0)
}

/// Mask of the low `bits` bits.
pub(crate) fn low_mask(bits: usize) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Tree and leaf addressed at WOTS+ layer `j` (bottom = 0) by `index`.
///
/// Layer `j` consumes bits `j*hp .. (j+1)*hp` of the index as its leaf and
/// everything above them as its tree.
pub(crate) fn layer_position(index: u64, j: usize, hp: usize) -> (u64, u64) {
    let tree = shr(index, (j + 1) * hp);
    let leaf = shr(index, j * hp) & low_mask(hp);
    (tree, leaf)
}
