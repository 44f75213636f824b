use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CryptoError;

/// Hash-based signature scheme identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeId {
    Lamport,
    Wots,
    #[serde(rename = "wots+")]
    WotsPlus,
    Hors,
    Horst,
    Sphincs,
}

impl SchemeId {
    /// All schemes, ordered from one-time to many-time.
    pub const ALL: [SchemeId; 6] = [
        SchemeId::Lamport,
        SchemeId::Wots,
        SchemeId::WotsPlus,
        SchemeId::Hors,
        SchemeId::Horst,
        SchemeId::Sphincs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemeId::Lamport => "lamport",
            SchemeId::Wots => "wots",
            SchemeId::WotsPlus => "wots+",
            SchemeId::Hors => "hors",
            SchemeId::Horst => "horst",
            SchemeId::Sphincs => "sphincs",
        }
    }

    /// Whether a key pair may sign more than one message.
    pub fn is_one_time(self) -> bool {
        matches!(self, SchemeId::Lamport | SchemeId::Wots | SchemeId::WotsPlus)
    }
}

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemeId {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        SchemeId::ALL
            .into_iter()
            .find(|id| id.as_str() == lower)
            .ok_or(CryptoError::UnknownScheme(lower))
    }
}

/// Digest widths supported by the hash primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestSize {
    Bits256,
    Bits512,
}

impl DigestSize {
    pub fn from_bits(bits: usize) -> Result<Self, CryptoError> {
        match bits {
            256 => Ok(DigestSize::Bits256),
            512 => Ok(DigestSize::Bits512),
            other => Err(CryptoError::UnsupportedDigestSize(other)),
        }
    }

    pub fn bits(self) -> usize {
        match self {
            DigestSize::Bits256 => 256,
            DigestSize::Bits512 => 512,
        }
    }

    pub fn bytes(self) -> usize {
        self.bits() / 8
    }
}
