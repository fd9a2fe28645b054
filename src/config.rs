use crate::{codec, dlp, keys::DEFAULT_KEYGEN_ATTEMPTS};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

pub use crate::dlp::MAX_SEARCH_BOUND;

/// Group backend.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    /// `curve25519-dalek` Ristretto group
    Ristretto255,
    /// NIST P-256
    P256,
    /// BLS12-381 `G1`
    Bls12381,
}

impl FromStr for BackendId {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ristretto255" | "ristretto" => Ok(Self::Ristretto255),
            "p256" | "secp256r1" => Ok(Self::P256),
            "bls12381" | "bls12-381" => Ok(Self::Bls12381),
            other => eyre::bail!("Unknown backend: {}", other),
        }
    }
}

impl Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ristretto255 => "ristretto255",
            Self::P256 => "p256",
            Self::Bls12381 => "bls12381",
        };
        write!(f, "{}", name)
    }
}

fn default_keygen_attempts() -> usize {
    DEFAULT_KEYGEN_ATTEMPTS
}

fn default_backend() -> BackendId {
    BackendId::Ristretto255
}

/// Sum-FE setup parameters.
/// Public parameters are derived from these.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Setup {
    /// N: number of participants
    pub participants: usize,
    /// P: plaintext upper bound, i.e. vᵢ ∈ {0,..., P-1}
    pub domain_bound: u64,
    /// Maximal number of key generation attempts per participant
    #[serde(default = "default_keygen_attempts")]
    pub keygen_attempts: usize,
    #[serde(default = "default_backend")]
    pub backend: BackendId,
}

/// Validated Sum-FE parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    /// N: number of participants
    pub participants: usize,
    /// P: plaintext upper bound, i.e. vᵢ ∈ {0,..., P-1}
    pub domain_bound: u64,
    pub keygen_attempts: usize,
    pub backend: BackendId,
    /// K: aggregate upper bound, i.e. ∑vᵢ ∈ {0,..., K-1} => K = N.(P-1)+1
    pub aggregate_bound: u64,
    /// m: number of BSGS baby steps
    pub baby_steps: u64,
    /// number of BSGS giant steps, such that `m * giant_steps >= K`
    pub giant_steps: u64,
}

impl Parameters {
    pub fn instantiate(setup: &Setup) -> eyre::Result<Parameters> {
        eyre::ensure!(
            setup.participants > 0,
            "There should be at least one participant"
        );
        eyre::ensure!(
            setup.domain_bound > 0,
            "The plaintext domain should not be empty"
        );
        eyre::ensure!(
            setup.keygen_attempts > 0,
            "There should be at least one key generation attempt"
        );
        let aggregate_bound = codec::aggregate_bound(setup.domain_bound, setup.participants)?;
        eyre::ensure!(
            aggregate_bound <= MAX_SEARCH_BOUND,
            "The aggregate bound {} exceeds the computable bound {}",
            aggregate_bound,
            MAX_SEARCH_BOUND
        );
        let baby_steps = dlp::ceil_sqrt(aggregate_bound);
        Ok(Parameters {
            participants: setup.participants,
            domain_bound: setup.domain_bound,
            keygen_attempts: setup.keygen_attempts,
            backend: setup.backend,
            aggregate_bound,
            baby_steps,
            giant_steps: dlp::giant_steps(aggregate_bound, baby_steps),
        })
    }
}

impl Display for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "backend: {}, participants: {}, P: {}, K: {}, BSGS: {}x{}, keygen attempts: {}",
            self.backend,
            self.participants,
            self.domain_bound,
            self.aggregate_bound,
            self.baby_steps,
            self.giant_steps,
            self.keygen_attempts
        )
    }
}
