//! Errors returned by the Sum-FE protocol operations.
//!
//! Host-level code (the demo binary, the discrete logarithm solver and the
//! configuration layer) reports failures through `eyre`; the protocol itself
//! uses the typed [`Error`] below so callers can match on the failure kind.

use thiserror::Error;

/// Protocol result type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Key generation gave up after the bounded number of attempts.
    #[error("key generation failed after {attempts} attempts")]
    KeyGenFailure { attempts: usize },
    /// Identity or malformed group element where a valid one is required.
    #[error("invalid point: {0}")]
    InvalidPoint(&'static str),
    /// Plaintext outside of the declared domain.
    #[error("value {value} is out of range (bound: {bound})")]
    OutOfRange { value: u64, bound: u64 },
    /// Empty or inconsistent input, e.g. an empty aggregation or ciphertexts
    /// of another epoch.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The decrypted point has no discrete logarithm below the search bound.
    #[error("no discrete logarithm below {bound}")]
    DiscreteLog { bound: u64 },
    /// An earlier failure aborted the epoch: its anchor and ciphertexts must
    /// be discarded.
    #[error("epoch {epoch} was aborted")]
    EpochAborted { epoch: u64 },
    /// The randomness source failed or kept producing degenerate values.
    #[error("randomness source failure: {0}")]
    Randomness(String),
}
