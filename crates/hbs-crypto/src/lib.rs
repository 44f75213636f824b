#![doc = "Hash-based signatures: Lamport, WOTS, WOTS+, HORS, HORST and a SPHINCS-style hypertree."]
#![forbid(unsafe_code)]

// Core traits
pub mod provider;

// Primitives
pub mod codec;
pub mod drbg;
pub mod hash;
pub mod merkle;

// One-time and few-time signatures
#[cfg(feature = "hors")]
pub mod hors;
#[cfg(feature = "horst")]
pub mod horst;
#[cfg(feature = "lamport")]
pub mod lamport;
#[cfg(feature = "wots")]
pub mod wots;

// Stateless composition
#[cfg(feature = "sphincs")]
pub mod sphincs;

#[cfg(any(
    feature = "lamport",
    feature = "wots",
    feature = "hors",
    feature = "horst",
    feature = "sphincs"
))]
pub mod scheme;

pub use hbs_types::{CryptoError, DigestSize, SchemeId};
pub use provider::{KeyPair, RandomSource, SignatureScheme};
