//! # Sum-FE
//!
//! Summation functional encryption over prime-order elliptic-curve groups.
//!
//! Each participant `i` holds a key pair `(s_i, Y_i = s_i·G)`. During an
//! epoch, a single ephemeral randomness `r` is drawn and every plaintext `v_i`
//! is encrypted as `v_i·G + r·Y_i`, next to the shared anchor `r·G`. The
//! holder of the functional key `Sum(s_i)` can recover `Sum(v_i)` from the
//! sum of the payloads, while individual plaintexts stay hidden.

pub mod aggregate;
pub mod codec;
pub mod config;
pub mod decrypt;
pub mod dlp;
pub mod encrypt;
pub mod epoch;
pub mod errors;
pub mod group;
pub mod keys;

pub use encrypt::Ciphertext;
pub use epoch::{ClosedEpoch, EphemeralRandomness, Epoch, EpochState};
pub use errors::{Error, Result};
pub use group::{Bls12381G1, CurveGroup, Ristretto255, P256};
pub use keys::{FunctionalKey, KeyPair, PublicKey, SecretKey};
