//! Fixed-width hash primitive.
//!
//! Every scheme in this crate hashes with either SHA-256 or SHA-512, chosen
//! by the security parameter `n`. This module wraps the two digests behind a
//! single copyable selector and provides the iterated and masked chaining
//! helpers the one-time signatures are built from.

use hbs_types::{CryptoError, DigestSize};
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

/// Hash function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashFunction {
    /// SHA-256 (output=32).
    Sha256,
    /// SHA-512 (output=64).
    Sha512,
}

fn digest_parts<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut h = D::new();
    for part in parts {
        h.update(part);
    }
    h.finalize().to_vec()
}

impl HashFunction {
    /// Select the hash whose output width is `bits`.
    pub fn from_bits(bits: usize) -> Result<Self, CryptoError> {
        Ok(Self::for_size(DigestSize::from_bits(bits)?))
    }

    pub fn for_size(size: DigestSize) -> Self {
        match size {
            DigestSize::Bits256 => Self::Sha256,
            DigestSize::Bits512 => Self::Sha512,
        }
    }

    /// Hash output size in bytes.
    pub fn output_size(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    pub fn hash(self, data: &[u8]) -> Vec<u8> {
        self.hash_parts(&[data])
    }

    /// Hash the concatenation of `parts` without building it.
    pub fn hash_parts(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            Self::Sha256 => digest_parts::<Sha256>(parts),
            Self::Sha512 => digest_parts::<Sha512>(parts),
        }
    }

    /// Apply the hash `count` times: `H(H(...H(data)))`.
    ///
    /// A count of zero returns `data` unchanged.
    pub fn hash_times(self, data: &[u8], count: usize) -> Vec<u8> {
        let mut res = data.to_vec();
        for _ in 0..count {
            res = self.hash(&res);
        }
        res
    }

    /// Masked chaining: for each step `i` in `start..end`, compute
    /// `v = H(v ⊕ mask_i)` where `mask_i` is the `i`-th output-sized block of
    /// `mask`.
    pub fn hash_times_with_mask(
        self,
        data: &[u8],
        start: usize,
        end: usize,
        mask: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let n = self.output_size();
        if data.len() != n {
            return Err(CryptoError::SizeMismatch {
                expected: n,
                got: data.len(),
            });
        }
        if end > start && mask.len() < end * n {
            return Err(CryptoError::SizeMismatch {
                expected: end * n,
                got: mask.len(),
            });
        }

        let mut res = data.to_vec();
        for i in start..end {
            xor_in_place(&mut res, &mask[i * n..(i + 1) * n]);
            res = self.hash(&res);
        }
        Ok(res)
    }

    /// `H(left ‖ right)`.
    pub(crate) fn hash_pair(self, left: &[u8], right: &[u8]) -> Vec<u8> {
        self.hash_parts(&[left, right])
    }

    /// `H((left ⊕ mask_l) ‖ (right ⊕ mask_r))`.
    pub(crate) fn hash_pair_masked(
        self,
        left: &[u8],
        right: &[u8],
        mask_l: &[u8],
        mask_r: &[u8],
    ) -> Vec<u8> {
        let l = xor(left, mask_l);
        let r = xor(right, mask_r);
        self.hash_pair(&l, &r)
    }

    /// MGF1-style expansion: `H(seed ‖ 0) ‖ H(seed ‖ 1) ‖ ...` truncated to
    /// `out_len` bytes.
    pub fn expand(self, seed: &[&[u8]], out_len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(out_len + self.output_size());
        let mut counter: u32 = 0;
        while out.len() < out_len {
            let ctr = counter.to_be_bytes();
            let mut parts: Vec<&[u8]> = seed.to_vec();
            parts.push(&ctr);
            out.extend_from_slice(&self.hash_parts(&parts));
            counter = counter.wrapping_add(1);
        }
        out.truncate(out_len);
        out
    }
}

/// Digest equality without early exit.
pub(crate) fn digest_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// `a ⊕ b` over the common prefix of the two slices.
pub(crate) fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

pub(crate) fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_answer() {
        let d = HashFunction::Sha256.hash(b"abc");
        assert_eq!(
            hex::encode(d),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_from_bits() {
        assert_eq!(HashFunction::from_bits(256).unwrap(), HashFunction::Sha256);
        assert_eq!(HashFunction::from_bits(512).unwrap(), HashFunction::Sha512);
        assert!(matches!(
            HashFunction::from_bits(128),
            Err(CryptoError::UnsupportedDigestSize(128))
        ));
    }

    #[test]
    fn test_hash_parts_matches_concat() {
        for h in [HashFunction::Sha256, HashFunction::Sha512] {
            assert_eq!(h.hash_parts(&[b"hello ", b"world"]), h.hash(b"hello world"));
        }
    }

    #[test]
    fn test_hash_times() {
        let h = HashFunction::Sha256;
        assert_eq!(h.hash_times(b"seed", 0), b"seed".to_vec());
        let twice = h.hash(&h.hash(b"seed"));
        assert_eq!(h.hash_times(b"seed", 2), twice);
        // chaining composes
        let a = h.hash_times(b"seed", 3);
        let b = h.hash_times(&h.hash_times(b"seed", 1), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_times_with_mask() {
        let h = HashFunction::Sha256;
        let data = [0x11u8; 32];
        let mask: Vec<u8> = (0..4 * 32).map(|i| i as u8).collect();

        // zero steps is identity
        assert_eq!(h.hash_times_with_mask(&data, 2, 2, &mask).unwrap(), data);

        let mut expected = data.to_vec();
        for i in 1..3 {
            expected = h.hash(&xor(&expected, &mask[i * 32..(i + 1) * 32]));
        }
        assert_eq!(h.hash_times_with_mask(&data, 1, 3, &mask).unwrap(), expected);

        // split chain equals one long chain
        let mid = h.hash_times_with_mask(&data, 0, 2, &mask).unwrap();
        let full = h.hash_times_with_mask(&data, 0, 4, &mask).unwrap();
        assert_eq!(h.hash_times_with_mask(&mid, 2, 4, &mask).unwrap(), full);
    }

    #[test]
    fn test_hash_times_with_mask_short_mask() {
        let h = HashFunction::Sha256;
        let r = h.hash_times_with_mask(&[0u8; 32], 0, 3, &[0u8; 64]);
        assert!(matches!(r, Err(CryptoError::SizeMismatch { .. })));
        let r = h.hash_times_with_mask(&[0u8; 31], 0, 1, &[0u8; 64]);
        assert!(matches!(r, Err(CryptoError::SizeMismatch { .. })));
    }

    #[test]
    fn test_hash_pair_masked_zero_mask() {
        let h = HashFunction::Sha512;
        let l = [1u8; 64];
        let r = [2u8; 64];
        let z = [0u8; 64];
        assert_eq!(h.hash_pair_masked(&l, &r, &z, &z), h.hash_pair(&l, &r));
    }

    #[test]
    fn test_digest_eq() {
        assert!(digest_eq(b"abc", b"abc"));
        assert!(!digest_eq(b"abc", b"abd"));
        assert!(!digest_eq(b"abc", b"ab"));
    }

    #[test]
    fn test_expand() {
        let h = HashFunction::Sha512;
        let out = h.expand(&[b"key", b"msg"], 100);
        assert_eq!(out.len(), 100);
        assert_eq!(&out[..64], &h.hash(b"keymsg\x00\x00\x00\x00")[..]);
        assert_eq!(&out[64..], &h.hash(b"keymsg\x00\x00\x00\x01")[..36]);
    }
}
