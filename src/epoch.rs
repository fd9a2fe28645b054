//! Encryption epochs.
//!
//! An epoch owns the ephemeral randomness `r` and its anchor `r·G`. It goes
//! through three states:
//!
//! - `Created`: `r` has been sampled and the anchor computed;
//! - `Active`: at least one ciphertext has been produced against the anchor;
//! - `Closed`: the epoch has been consumed by [`Epoch::close`]. Only the anchor
//!   survives, `r` is erased and no more encryption is possible.
//!
//! Any failed encryption aborts the epoch: further encryptions are refused and
//! [`Epoch::close`] fails, so the anchor and the ciphertexts already produced
//! cannot be aggregated or decrypted through the epoch.
//!
//! Aggregation and decryption are performed on the [`ClosedEpoch`].

use crate::{
    aggregate, decrypt,
    encrypt::{self, Ciphertext},
    errors::{Error, Result},
    group::CurveGroup,
    keys::{FunctionalKey, PublicKey, SecretKey},
};
use rand_core::{CryptoRng, RngCore};
use std::{
    fmt,
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
};
use tracing::{debug, warn};
use zeroize::Zeroize;

/// Number of attempts to draw a non-zero ephemeral randomness.
const RANDOMNESS_ATTEMPTS: usize = 8;

/// Ephemeral randomness `r` and its anchor `r·G`. `r` is erased on drop.
pub struct EphemeralRandomness<G: CurveGroup> {
    r: G::Scalar,
    anchor: G::Point,
}

impl<G: CurveGroup> EphemeralRandomness<G> {
    /// Draw a fresh ephemeral randomness.
    pub fn sample<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Self> {
        for _ in 0..RANDOMNESS_ATTEMPTS {
            match Self::from_scalar(G::sample_uniform_scalar(rng)?) {
                Ok(randomness) => return Ok(randomness),
                Err(_) => warn!(backend = G::NAME, "degenerate ephemeral randomness"),
            }
        }
        Err(Error::Randomness(format!(
            "no usable ephemeral randomness after {} attempts",
            RANDOMNESS_ATTEMPTS
        )))
    }

    /// Use the given scalar as ephemeral randomness. The anchor is computed
    /// once, here.
    pub fn from_scalar(mut r: G::Scalar) -> Result<Self> {
        let anchor = G::mul_generator(&r);
        if G::is_identity(&anchor) {
            r.zeroize();
            return Err(Error::InvalidPoint("anchor is the identity"));
        }
        Ok(Self { r, anchor })
    }

    pub fn anchor(&self) -> &G::Point {
        &self.anchor
    }

    pub(crate) fn scalar(&self) -> &G::Scalar {
        &self.r
    }
}

impl<G: CurveGroup> Drop for EphemeralRandomness<G> {
    fn drop(&mut self) {
        self.r.zeroize();
    }
}

impl<G: CurveGroup> fmt::Debug for EphemeralRandomness<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralRandomness")
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpochState {
    Created,
    Active,
    Aborted,
    Closed,
}

/// Open encryption epoch.
///
/// `Epoch` is `Sync`: participants may encrypt concurrently through a shared
/// reference.
#[derive(Debug)]
pub struct Epoch<G: CurveGroup> {
    id: u64,
    randomness: EphemeralRandomness<G>,
    encryptions: AtomicU64,
    aborted: AtomicBool,
}

impl<G: CurveGroup> Epoch<G> {
    /// Open a new epoch with a fresh ephemeral randomness.
    /// - `id`:     epoch identifier, for bookkeeping only
    /// - `rng`:    randomness source
    pub fn open<R: RngCore + CryptoRng + ?Sized>(id: u64, rng: &mut R) -> Result<Self> {
        let randomness = EphemeralRandomness::sample(rng)?;
        debug!(backend = G::NAME, epoch = id, "epoch opened");
        Ok(Self::from_randomness(id, randomness))
    }

    /// Open an epoch with the given ephemeral randomness.
    pub fn from_randomness(id: u64, randomness: EphemeralRandomness<G>) -> Self {
        Self {
            id,
            randomness,
            encryptions: AtomicU64::new(0),
            aborted: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn anchor(&self) -> &G::Point {
        self.randomness.anchor()
    }

    /// Number of ciphertexts produced so far.
    pub fn encryptions(&self) -> u64 {
        self.encryptions.load(Ordering::Acquire)
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    pub fn state(&self) -> EpochState {
        if self.is_aborted() {
            EpochState::Aborted
        } else if self.encryptions() == 0 {
            EpochState::Created
        } else {
            EpochState::Active
        }
    }

    /// Run an encryption against the epoch randomness. A failure aborts the
    /// epoch.
    fn run(
        &self,
        encryption: impl FnOnce(&EphemeralRandomness<G>) -> Result<Ciphertext<G>>,
    ) -> Result<Ciphertext<G>> {
        if self.is_aborted() {
            return Err(Error::EpochAborted { epoch: self.id });
        }
        match encryption(&self.randomness) {
            Ok(ct) => {
                self.encryptions.fetch_add(1, Ordering::AcqRel);
                Ok(ct)
            }
            Err(err) => {
                self.aborted.store(true, Ordering::Release);
                warn!(backend = G::NAME, epoch = self.id, %err, "epoch aborted");
                Err(err)
            }
        }
    }

    /// Encrypt a mapped plaintext for the given participant.
    pub fn encrypt(&self, mapped: &G::Point, recipient: &PublicKey<G>) -> Result<Ciphertext<G>> {
        self.run(|randomness| encrypt::encrypt(mapped, recipient.as_point(), randomness))
    }

    /// Map `value` into the group and encrypt it for the given participant.
    pub fn encrypt_value(
        &self,
        value: u64,
        domain_bound: u64,
        recipient: &PublicKey<G>,
    ) -> Result<Ciphertext<G>> {
        self.run(|randomness| {
            encrypt::encrypt_value(value, domain_bound, recipient.as_point(), randomness)
        })
    }

    /// Close the epoch: the ephemeral randomness is erased.
    ///
    /// Fails if the epoch was aborted; the anchor is then dropped with the
    /// randomness.
    pub fn close(self) -> Result<ClosedEpoch<G>> {
        if self.is_aborted() {
            return Err(Error::EpochAborted { epoch: self.id });
        }
        let closed = ClosedEpoch {
            id: self.id,
            anchor: *self.randomness.anchor(),
            encryptions: self.encryptions(),
        };
        debug!(
            backend = G::NAME,
            epoch = closed.id,
            encryptions = closed.encryptions,
            "epoch closed"
        );
        Ok(closed)
    }
}

/// Closed epoch: only the anchor remains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosedEpoch<G: CurveGroup> {
    id: u64,
    anchor: G::Point,
    encryptions: u64,
}

impl<G: CurveGroup> ClosedEpoch<G> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn anchor(&self) -> &G::Point {
        &self.anchor
    }

    pub fn encryptions(&self) -> u64 {
        self.encryptions
    }

    pub fn state(&self) -> EpochState {
        EpochState::Closed
    }

    /// Aggregate ciphertexts of this epoch. Fails if one of them was produced
    /// against another anchor.
    pub fn aggregate(&self, ciphertexts: &[Ciphertext<G>]) -> Result<Ciphertext<G>> {
        let aggregated = aggregate::combine_ciphertexts(ciphertexts)?;
        self.check_anchor(&aggregated)?;
        Ok(aggregated)
    }

    /// Decrypt a ciphertext of this epoch with the secret of its recipient.
    pub fn decrypt_individual(
        &self,
        secret: &SecretKey<G>,
        ciphertext: &Ciphertext<G>,
    ) -> Result<G::Point> {
        self.check_anchor(ciphertext)?;
        decrypt::decrypt_individual::<G>(secret.as_scalar(), &self.anchor, &ciphertext.payload)
    }

    /// Decrypt an aggregated ciphertext of this epoch with a functional key.
    ///
    /// The functional key and the aggregated payload must cover the same
    /// subset of participants; this is not checked.
    pub fn decrypt_functional(
        &self,
        fdk: &FunctionalKey<G>,
        aggregated: &Ciphertext<G>,
    ) -> Result<G::Point> {
        self.check_anchor(aggregated)?;
        decrypt::decrypt_functional(fdk, &self.anchor, &aggregated.payload)
    }

    fn check_anchor(&self, ciphertext: &Ciphertext<G>) -> Result<()> {
        if ciphertext.anchor != self.anchor {
            return Err(Error::InvalidArgument(format!(
                "ciphertext does not belong to epoch {}",
                self.id
            )));
        }
        Ok(())
    }
}
