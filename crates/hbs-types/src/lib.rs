#![forbid(unsafe_code)]
#![doc = "Common types, error codes and scheme identifiers for hash-based signatures."]

pub mod algorithm;
pub mod error;

pub use algorithm::*;
pub use error::*;
