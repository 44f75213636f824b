//! Scheme registry: build any scheme by name with reference parameters.

use hbs_types::{CryptoError, SchemeId};

use crate::provider::{KeyPair, SignatureScheme};

#[cfg(feature = "hors")]
use crate::hors::Hors;
#[cfg(feature = "horst")]
use crate::horst::{Horst, HorstParams};
#[cfg(feature = "lamport")]
use crate::lamport::Lamport;
#[cfg(feature = "sphincs")]
use crate::sphincs::Sphincs;
#[cfg(feature = "wots")]
use crate::wots::{Wots, WotsPlus};

/// One of the six schemes, constructed with concrete parameters.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Scheme {
    #[cfg(feature = "lamport")]
    Lamport(Lamport),
    #[cfg(feature = "wots")]
    Wots(Wots),
    #[cfg(feature = "wots")]
    WotsPlus(WotsPlus),
    #[cfg(feature = "hors")]
    Hors(Hors),
    #[cfg(feature = "horst")]
    Horst(Horst),
    #[cfg(feature = "sphincs")]
    Sphincs(Sphincs),
}

impl Scheme {
    /// Reference instance for `id`.
    ///
    /// Lamport n=256; WOTS and WOTS+ w=4, n=256; HORS tau=8, k=32; HORST
    /// n=256, tau=16, k=32; SPHINCS-256. WOTS+ and HORST get a fresh seed
    /// and fresh masks from the OS.
    pub fn from_id(id: SchemeId) -> Result<Self, CryptoError> {
        match id {
            #[cfg(feature = "lamport")]
            SchemeId::Lamport => Ok(Self::Lamport(Lamport::new(256)?)),
            #[cfg(feature = "wots")]
            SchemeId::Wots => Ok(Self::Wots(Wots::new(4, 256)?)),
            #[cfg(feature = "wots")]
            SchemeId::WotsPlus => Ok(Self::WotsPlus(WotsPlus::random(4, 256)?)),
            #[cfg(feature = "hors")]
            SchemeId::Hors => Ok(Self::Hors(Hors::new(8, 32)?)),
            #[cfg(feature = "horst")]
            SchemeId::Horst => Ok(Self::Horst(Horst::random(&HorstParams::default())?)),
            #[cfg(feature = "sphincs")]
            SchemeId::Sphincs => Ok(Self::Sphincs(Sphincs::sphincs256()?)),
            #[allow(unreachable_patterns)]
            other => Err(CryptoError::UnknownScheme(other.to_string())),
        }
    }

    /// Reference instance for a textual identifier such as `"wots+"`.
    pub fn from_name(name: &str) -> Result<Self, CryptoError> {
        Self::from_id(name.parse()?)
    }

    pub fn id(&self) -> SchemeId {
        match self {
            #[cfg(feature = "lamport")]
            Self::Lamport(_) => SchemeId::Lamport,
            #[cfg(feature = "wots")]
            Self::Wots(_) => SchemeId::Wots,
            #[cfg(feature = "wots")]
            Self::WotsPlus(_) => SchemeId::WotsPlus,
            #[cfg(feature = "hors")]
            Self::Hors(_) => SchemeId::Hors,
            #[cfg(feature = "horst")]
            Self::Horst(_) => SchemeId::Horst,
            #[cfg(feature = "sphincs")]
            Self::Sphincs(_) => SchemeId::Sphincs,
        }
    }

    fn inner(&self) -> &dyn SignatureScheme {
        match self {
            #[cfg(feature = "lamport")]
            Self::Lamport(s) => s,
            #[cfg(feature = "wots")]
            Self::Wots(s) => s,
            #[cfg(feature = "wots")]
            Self::WotsPlus(s) => s,
            #[cfg(feature = "hors")]
            Self::Hors(s) => s,
            #[cfg(feature = "horst")]
            Self::Horst(s) => s,
            #[cfg(feature = "sphincs")]
            Self::Sphincs(s) => s,
        }
    }
}

impl SignatureScheme for Scheme {
    fn generate_key(&self) -> Result<KeyPair, CryptoError> {
        self.inner().generate_key()
    }

    fn sign(&self, message: &[u8], secret_key: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.inner().sign(message, secret_key)
    }

    fn verify(
        &self,
        message: &[u8],
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        self.inner().verify(message, public_key, signature)
    }

    fn public_key_len(&self) -> usize {
        self.inner().public_key_len()
    }

    fn secret_key_len(&self) -> usize {
        self.inner().secret_key_len()
    }

    fn signature_len(&self) -> usize {
        self.inner().signature_len()
    }
}
