//! Hypertree parameter sets.

use hbs_types::CryptoError;
use serde::{Deserialize, Serialize};

use crate::codec::validate_w;
use crate::hash::HashFunction;
use crate::hors::validate_tau;
use crate::horst::{cut_level, HorstParams};
use crate::wots::WotsParams;

/// Hypertree parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SphincsParams {
    pub n: usize,   // Block width in bits
    pub m: usize,   // Message digest width in bits (= tau * k)
    pub h: usize,   // Total hypertree height
    pub d: usize,   // Number of layers
    pub w: usize,   // Winternitz digit width in bits
    pub tau: usize, // HORST tree height (t = 2^tau)
    pub k: usize,   // HORST selections
}

impl Default for SphincsParams {
    fn default() -> Self {
        Self::sphincs256()
    }
}

impl SphincsParams {
    /// SPHINCS-256: n=256, m=512, h=60, d=12, w=4 (W=16), tau=16, k=32.
    pub const fn sphincs256() -> Self {
        Self {
            n: 256,
            m: 512,
            h: 60,
            d: 12,
            w: 4,
            tau: 16,
            k: 32,
        }
    }

    pub fn validate(&self) -> Result<(), CryptoError> {
        HashFunction::from_bits(self.n)?;
        HashFunction::from_bits(self.m)?;
        validate_w(self.w)?;
        validate_tau(self.tau)?;
        if self.tau * self.k != self.m {
            return Err(CryptoError::DigestWidthMismatch {
                expected: self.m,
                got: self.tau * self.k,
            });
        }
        if self.h == 0 || self.d == 0 || self.h % self.d != 0 {
            return Err(CryptoError::InvalidLayerCount {
                h: self.h,
                d: self.d,
            });
        }
        if self.h > 64 {
            return Err(CryptoError::HeightTooLarge(self.h));
        }
        if self.hp() >= usize::BITS as usize {
            return Err(CryptoError::HeightTooLarge(self.hp()));
        }
        Ok(())
    }

    /// Height of each layer's tree of WOTS+ leaves.
    pub fn hp(&self) -> usize {
        self.h / self.d
    }

    pub fn wots(&self) -> WotsParams {
        WotsParams {
            n: self.n,
            w: self.w,
        }
    }

    pub fn horst(&self) -> HorstParams {
        HorstParams {
            n: self.n,
            tau: self.tau,
            k: self.k,
        }
    }

    pub(crate) fn block_size(&self) -> usize {
        self.n / 8
    }

    /// L-tree mask digests: two per collapse round over the `l` chains.
    pub fn ltree_mask_count(&self) -> usize {
        2 * self.wots().chain_count().next_power_of_two().ilog2() as usize
    }

    /// Total mask digests: WOTS+, L-tree, hypertree and HORST ranges.
    pub fn mask_count(&self) -> usize {
        self.wots().chain_len() + self.ltree_mask_count() + 2 * self.h + 2 * self.tau
    }

    pub fn public_key_len(&self) -> usize {
        (1 + self.mask_count()) * self.block_size()
    }

    pub fn secret_key_len(&self) -> usize {
        (2 + self.mask_count()) * self.block_size()
    }

    pub(crate) fn horst_signature_len(&self) -> usize {
        let x = cut_level(self.k, self.tau);
        (self.k * (1 + self.tau - x) + (1 << x)) * self.block_size()
    }

    /// Bytes contributed by one hypertree layer: WOTS+ signature and path.
    pub(crate) fn layer_signature_len(&self) -> usize {
        (self.wots().chain_count() + self.hp()) * self.block_size()
    }

    pub fn signature_len(&self) -> usize {
        8 + self.block_size() + self.horst_signature_len() + self.d * self.layer_signature_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphincs256_sizes() {
        let p = SphincsParams::sphincs256();
        p.validate().unwrap();
        assert_eq!(p.hp(), 5);
        assert_eq!(p.ltree_mask_count(), 14);
        assert_eq!(p.mask_count(), 15 + 14 + 120 + 32);
        assert_eq!(p.public_key_len(), 182 * 32);
        assert_eq!(p.secret_key_len(), 183 * 32);
        // HORST: 32 * 11 + 64 blocks; layers: 12 * (67 + 5) blocks
        assert_eq!(p.signature_len(), 8 + 32 + (352 + 64) * 32 + 12 * 72 * 32);
    }

    #[test]
    fn test_validate_errors() {
        let base = SphincsParams::sphincs256();

        let p = SphincsParams { k: 16, ..base };
        assert!(matches!(
            p.validate(),
            Err(CryptoError::DigestWidthMismatch { expected: 512, got: 256 })
        ));

        let p = SphincsParams { d: 7, ..base };
        assert!(matches!(
            p.validate(),
            Err(CryptoError::InvalidLayerCount { h: 60, d: 7 })
        ));

        let p = SphincsParams { h: 66, d: 6, ..base };
        assert!(matches!(p.validate(), Err(CryptoError::HeightTooLarge(66))));

        let p = SphincsParams { w: 3, ..base };
        assert!(matches!(
            p.validate(),
            Err(CryptoError::InvalidWinternitzParam(3))
        ));

        let p = SphincsParams { n: 128, ..base };
        assert!(matches!(
            p.validate(),
            Err(CryptoError::UnsupportedDigestSize(128))
        ));

        let p = SphincsParams { tau: 12, ..base };
        assert!(matches!(p.validate(), Err(CryptoError::InvalidTau(12))));
    }

    #[test]
    fn test_params_from_json() {
        let json = r#"{"n":256,"m":256,"h":8,"d":4,"w":4,"tau":8,"k":32}"#;
        let p: SphincsParams = serde_json::from_str(json).unwrap();
        p.validate().unwrap();
        assert_eq!(p.hp(), 2);
        let back = serde_json::to_string(&p).unwrap();
        assert_eq!(serde_json::from_str::<SphincsParams>(&back).unwrap(), p);
    }
}
