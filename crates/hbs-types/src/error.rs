/// Errors raised by scheme construction, key handling and signing.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    // Parameter errors
    #[error("unsupported digest size: {0} bits")]
    UnsupportedDigestSize(usize),
    #[error("winternitz parameter w={0} must divide 8")]
    InvalidWinternitzParam(usize),
    #[error("tau={0} must be a positive multiple of 8 not greater than 64")]
    InvalidTau(usize),
    #[error("tau * k = {got} does not match digest width {expected}")]
    DigestWidthMismatch { expected: usize, got: usize },
    #[error("hypertree height {h} is not divisible by layer count {d}")]
    InvalidLayerCount { h: usize, d: usize },
    #[error("hypertree height {0} exceeds 64 bits")]
    HeightTooLarge(usize),
    #[error("tree height must be at least 1")]
    InvalidTreeHeight,

    // Buffer errors
    #[error("size mismatch: expected {expected} bytes, got {got}")]
    SizeMismatch { expected: usize, got: usize },
    #[error("index {index} out of range (limit {limit})")]
    IndexOutOfRange { index: usize, limit: usize },

    // State errors
    #[error("merkle tree: secret not set")]
    TreeNotInitialized,
    #[error("drbg: invalid state")]
    DrbgInvalidState,
    #[error("entropy source failure")]
    EntropyFail,

    #[error("unknown signature scheme: {0}")]
    UnknownScheme(String),
}
