//! Participant key management.
//!
//! Each participant holds a key pair `(s, Y = s·G)`. The function evaluator
//! holds a functional key `Sum(s_i) mod n` for a subset of participants.

use crate::{
    aggregate,
    errors::{Error, Result},
    group::CurveGroup,
};
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, RngCore, SeedableRng};
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, warn};
use zeroize::Zeroize;

/// Number of key generation attempts before giving up.
pub const DEFAULT_KEYGEN_ATTEMPTS: usize = 8;

/// Participant secret key. Erased on drop.
#[derive(Clone)]
pub struct SecretKey<G: CurveGroup>(G::Scalar);

impl<G: CurveGroup> SecretKey<G> {
    /// Wrap an existing scalar, e.g. one restored from storage.
    pub fn from_scalar(s: G::Scalar) -> Self {
        Self(s)
    }

    pub fn as_scalar(&self) -> &G::Scalar {
        &self.0
    }

    /// Derive the matching public key `s·G`.
    pub fn public_key(&self) -> PublicKey<G> {
        PublicKey(G::mul_generator(&self.0))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        G::scalar_to_bytes(&self.0)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        G::bytes_to_scalar(bytes).map(Self)
    }
}

impl<G: CurveGroup> Drop for SecretKey<G> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl<G: CurveGroup> fmt::Debug for SecretKey<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey<{}>(..)", G::NAME)
    }
}

/// Participant public key. Never the identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PublicKey<G: CurveGroup>(G::Point);

impl<G: CurveGroup> PublicKey<G> {
    pub fn from_point(p: G::Point) -> Result<Self> {
        if G::is_identity(&p) {
            return Err(Error::InvalidPoint("public key is the identity"));
        }
        Ok(Self(p))
    }

    pub fn as_point(&self) -> &G::Point {
        &self.0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        G::point_to_bytes(&self.0)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_point(G::bytes_to_point(bytes)?)
    }
}

/// Participant key pair; the public key is always derived from the secret.
#[derive(Clone, Debug)]
pub struct KeyPair<G: CurveGroup> {
    pub secret: SecretKey<G>,
    pub public: PublicKey<G>,
}

/// Functional decryption key: sum of the secrets of a participant subset.
///
/// It decrypts the sum of the payloads of *exactly* that subset. The key does
/// not remember which participants it covers, only how many.
#[derive(Clone)]
pub struct FunctionalKey<G: CurveGroup> {
    scalar: G::Scalar,
    participants: usize,
}

impl<G: CurveGroup> FunctionalKey<G> {
    /// Wrap a scalar already aggregated by the evaluator.
    /// - `scalar`:         `Sum(s_i) mod n`
    /// - `participants`:   size of the subset
    pub fn from_scalar(scalar: G::Scalar, participants: usize) -> Self {
        Self {
            scalar,
            participants,
        }
    }

    pub fn as_scalar(&self) -> &G::Scalar {
        &self.scalar
    }

    /// Number of secrets aggregated in this key.
    pub fn participants(&self) -> usize {
        self.participants
    }
}

impl<G: CurveGroup> Drop for FunctionalKey<G> {
    fn drop(&mut self) {
        self.scalar.zeroize();
    }
}

impl<G: CurveGroup> fmt::Debug for FunctionalKey<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FunctionalKey<{}>(participants: {})",
            G::NAME,
            self.participants
        )
    }
}

/// Create the key pair of a participant, with the default number of attempts.
pub fn generate_key_pair<G, R>(rng: &mut R) -> Result<KeyPair<G>>
where
    G: CurveGroup,
    R: RngCore + CryptoRng + ?Sized,
{
    generate_key_pair_with_attempts(rng, DEFAULT_KEYGEN_ATTEMPTS)
}

/// Create the key pair of a participant.
///
/// The secret is drawn in `[1, n-1]`: a zero secret, an identity public key
/// or a failing randomness source trigger a new attempt.
/// - `rng`:        randomness source
/// - `attempts`:   maximal number of attempts
pub fn generate_key_pair_with_attempts<G, R>(rng: &mut R, attempts: usize) -> Result<KeyPair<G>>
where
    G: CurveGroup,
    R: RngCore + CryptoRng + ?Sized,
{
    for attempt in 1..=attempts {
        let mut s = match G::sample_uniform_scalar(rng) {
            Ok(s) => s,
            Err(err) => {
                warn!(backend = G::NAME, attempt, %err, "key generation: sampling failed");
                continue;
            }
        };
        if G::scalar_is_zero(&s) {
            warn!(backend = G::NAME, attempt, "key generation: zero secret");
            continue;
        }
        let public = G::mul_generator(&s);
        if G::is_identity(&public) {
            s.zeroize();
            warn!(backend = G::NAME, attempt, "key generation: identity public key");
            continue;
        }
        debug!(backend = G::NAME, attempt, "key pair generated");
        return Ok(KeyPair {
            secret: SecretKey(s),
            public: PublicKey(public),
        });
    }
    Err(Error::KeyGenFailure { attempts })
}

/// Enrol `n` participants in parallel.
///
/// Every participant draws its secret from its own `ChaCha20Rng`, seeded
/// from `rng`, so no randomness source is shared between threads.
/// - `n`:          number of participants
/// - `attempts`:   maximal number of attempts per participant
/// - `rng`:        seed source
pub fn generate_key_pairs<G, R>(n: usize, attempts: usize, rng: &mut R) -> Result<Vec<KeyPair<G>>>
where
    G: CurveGroup,
    R: RngCore + CryptoRng + ?Sized,
{
    let seeds = (0..n)
        .map(|_| {
            let mut seed = [0u8; 32];
            rng.try_fill_bytes(&mut seed)
                .map_err(|err| Error::Randomness(err.to_string()))?;
            Ok(seed)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(backend = G::NAME, n, "enrolling participants");
    seeds
        .into_par_iter()
        .map(|mut seed| {
            let mut participant_rng = ChaCha20Rng::from_seed(seed);
            seed.zeroize();
            generate_key_pair_with_attempts(&mut participant_rng, attempts)
        })
        .collect()
}

/// Compute the functional decryption key of the given subset of secrets.
///
/// The result does not depend on the order of the secrets.
pub fn derive_functional_key<'a, G, I>(secrets: I) -> Result<FunctionalKey<G>>
where
    G: CurveGroup,
    I: IntoIterator<Item = &'a SecretKey<G>>,
{
    let mut scalars = secrets.into_iter().map(|sk| sk.0).collect::<Vec<_>>();
    let participants = scalars.len();
    let sum = aggregate::combine_scalars::<G>(&scalars);
    scalars.zeroize();
    let scalar = sum?;
    debug!(backend = G::NAME, participants, "functional key derived");
    Ok(FunctionalKey {
        scalar,
        participants,
    })
}

/// Sum the public keys of a subset of participants.
///
/// Encrypting under this key with the epoch randomness yields a ciphertext
/// that decrypts with the functional key of the same subset.
pub fn aggregate_public_keys<'a, G, I>(publics: I) -> Result<PublicKey<G>>
where
    G: CurveGroup,
    I: IntoIterator<Item = &'a PublicKey<G>>,
{
    let points = publics.into_iter().map(|pk| pk.0).collect::<Vec<_>>();
    PublicKey::from_point(aggregate::combine_points::<G>(&points)?)
}
