//! Base-w digit encoding and the Winternitz checksum.

use hbs_types::CryptoError;

/// Check that a Winternitz digit width divides 8.
pub fn validate_w(w: usize) -> Result<(), CryptoError> {
    match w {
        1 | 2 | 4 | 8 => Ok(()),
        _ => Err(CryptoError::InvalidWinternitzParam(w)),
    }
}

/// Unchecked base-w split; the caller guarantees `x` holds `out_len * w` bits.
fn base_b(x: &[u8], w: usize, out_len: usize) -> Vec<u32> {
    let mut out = Vec::with_capacity(out_len);
    let mut bit: usize = 0;
    let mut o: u64 = 0;
    let mut xi: usize = 0;

    for _ in 0..out_len {
        while bit < w && xi < x.len() {
            o = (o << 8) | (x[xi] as u64);
            bit += 8;
            xi += 1;
        }
        bit -= w;
        out.push((o >> bit) as u32);
        o &= (1u64 << bit) - 1;
    }
    out
}

/// Split `x` into `length` digits of `w` bits each, most-significant bit
/// first.
///
/// `w` must divide 8 and `x` must carry at least `length * w` bits.
pub fn base_w(x: &[u8], length: usize, w: usize) -> Result<Vec<u32>, CryptoError> {
    validate_w(w)?;
    let need = (length * w).div_ceil(8);
    if x.len() < need {
        return Err(CryptoError::SizeMismatch {
            expected: need,
            got: x.len(),
        });
    }
    Ok(base_b(x, w, length))
}

/// Number of checksum digits: `floor(log2(l1 * (2^w - 1)) / w) + 1`.
pub fn checksum_len(l1: usize, w: usize) -> usize {
    let max = l1 * ((1usize << w) - 1);
    (max.max(1).ilog2() as usize) / w + 1
}

/// Winternitz checksum digits of `digits`.
///
/// The sum `Σ (2^w − 1 − d_i)` is shifted so that its `l2 * w` significant
/// bits start at a byte boundary, then re-encoded in base w.
pub fn checksum(digits: &[u32], w: usize, l2: usize) -> Vec<u32> {
    let max = (1u64 << w) - 1;
    let mut csum: u64 = digits.iter().map(|&d| max - d as u64).sum();

    let bits = l2 * w;
    csum <<= (8 - bits % 8) % 8;
    let nbytes = bits.div_ceil(8);
    let be = csum.to_be_bytes();
    base_b(&be[8 - nbytes..], w, l2)
}

/// Message digits followed by their checksum digits: `l1 + l2` values.
pub fn message_digits(digest: &[u8], l1: usize, w: usize) -> Result<Vec<u32>, CryptoError> {
    let mut digits = base_w(digest, l1, w)?;
    let csum = checksum(&digits, w, checksum_len(l1, w));
    digits.extend_from_slice(&csum);
    Ok(digits)
}
