//! Prime-order group abstraction used by the protocol.
//!
//! The protocol never touches coordinates: every scalar and point goes through
//! the [`CurveGroup`] capability trait, implemented here for three backends
//! selected at construction time:
//!
//! - [`Ristretto255`]: `curve25519-dalek` Ristretto group;
//! - [`P256`]: NIST P-256 from the `p256` crate;
//! - [`Bls12381G1`]: the `G1` group of BLS12-381.
//!
//! All three backends perform scalar multiplication in constant time, so no
//! scalar regularization is needed at the protocol layer.

use crate::errors::{Error, Result};
use rand_core::{CryptoRng, RngCore};
use std::fmt::Debug;
use zeroize::Zeroize;

mod bls12381;
mod nistp256;
mod ristretto;

pub use self::{bls12381::Bls12381G1, nistp256::P256, ristretto::Ristretto255};

/// Upper bound on the rejection sampling rounds. Every backend accepts a
/// candidate with probability at least 1/2.
const MAX_SAMPLING_ROUNDS: usize = 128;

/// Prime-order group with generator `G` and order `n`.
///
/// Implemented on zero-sized backend markers; `Scalar` and `Point` are the
/// backend library types.
pub trait CurveGroup:
    Clone + Copy + Debug + Default + PartialEq + Eq + Send + Sync + 'static
{
    /// Integer modulo the group order `n`.
    type Scalar: Copy + Debug + PartialEq + Send + Sync + Zeroize + 'static;
    /// Group element.
    type Point: Copy + Debug + PartialEq + Send + Sync + 'static;

    /// Backend name, used in logs.
    const NAME: &'static str;
    /// Size of the canonical scalar encoding.
    const SCALAR_SIZE: usize;
    /// Size of the canonical point encoding.
    const POINT_SIZE: usize;
    /// Whether `scalar_multiply` runs in constant time w.r.t. the scalar.
    const CONSTANT_TIME_MUL: bool;

    fn generator() -> Self::Point;

    fn identity() -> Self::Point;

    fn is_identity(p: &Self::Point) -> bool;

    fn point_add(a: &Self::Point, b: &Self::Point) -> Self::Point;

    fn point_negate(p: &Self::Point) -> Self::Point;

    /// `a - b`, computed as `a + (-b)`.
    fn point_sub(a: &Self::Point, b: &Self::Point) -> Self::Point {
        Self::point_add(a, &Self::point_negate(b))
    }

    /// Returns `s·P`.
    fn scalar_multiply(s: &Self::Scalar, p: &Self::Point) -> Self::Point;

    /// Returns `s·G`. Backends override this with fixed-base tables when they
    /// have them.
    fn mul_generator(s: &Self::Scalar) -> Self::Point {
        Self::scalar_multiply(s, &Self::generator())
    }

    fn scalar_zero() -> Self::Scalar;

    fn scalar_from_u64(v: u64) -> Self::Scalar;

    /// `a + b mod n`
    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    fn scalar_is_zero(s: &Self::Scalar) -> bool {
        *s == Self::scalar_zero()
    }

    /// Draw a scalar uniformly in `[0, n-1]` by rejection sampling.
    fn sample_uniform_scalar<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Self::Scalar>;

    fn scalar_to_bytes(s: &Self::Scalar) -> Vec<u8>;

    /// Fails with `InvalidArgument` on a wrong length or a non-canonical value.
    fn bytes_to_scalar(bytes: &[u8]) -> Result<Self::Scalar>;

    fn point_to_bytes(p: &Self::Point) -> Vec<u8>;

    /// Fails with `InvalidPoint` on a wrong length or an invalid encoding.
    fn bytes_to_point(bytes: &[u8]) -> Result<Self::Point>;
}

/// Byte order of a backend's scalar encoding.
#[derive(Clone, Copy)]
pub(crate) enum Endianness {
    Little,
    Big,
}

/// Rejection sampling of a 32-byte scalar encoding.
///
/// The most significant byte of each candidate is masked with `msb_mask`
/// before being handed to `decode`, which must return `None` for values not
/// below the group order.
/// - `rng`:        randomness source
/// - `endianness`: position of the most significant byte
/// - `msb_mask`:   mask applied to the most significant byte
/// - `decode`:     canonical decoding of the candidate
pub(crate) fn rejection_sample<S, R>(
    rng: &mut R,
    endianness: Endianness,
    msb_mask: u8,
    decode: impl Fn(&[u8; 32]) -> Option<S>,
) -> Result<S>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let msb = match endianness {
        Endianness::Little => 31,
        Endianness::Big => 0,
    };
    let mut candidate = [0u8; 32];
    for _ in 0..MAX_SAMPLING_ROUNDS {
        rng.try_fill_bytes(&mut candidate)
            .map_err(|err| Error::Randomness(err.to_string()))?;
        candidate[msb] &= msb_mask;
        if let Some(s) = decode(&candidate) {
            candidate.zeroize();
            return Ok(s);
        }
    }
    candidate.zeroize();
    Err(Error::Randomness(format!(
        "no scalar below the group order after {} rounds",
        MAX_SAMPLING_ROUNDS
    )))
}

/// Check that `bytes` has the expected length and convert it to an array.
pub(crate) fn fixed_bytes<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    <[u8; N]>::try_from(bytes).ok()
}
