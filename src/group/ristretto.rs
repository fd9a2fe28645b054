use super::{fixed_bytes, rejection_sample, CurveGroup, Endianness};
use crate::errors::{Error, Result};
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::{Identity, IsIdentity},
};
use rand_core::{CryptoRng, RngCore};

/// Ristretto prime-order group built on Curve25519.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ristretto255;

impl CurveGroup for Ristretto255 {
    type Scalar = Scalar;
    type Point = RistrettoPoint;

    const NAME: &'static str = "ristretto255";
    const SCALAR_SIZE: usize = 32;
    const POINT_SIZE: usize = 32;
    const CONSTANT_TIME_MUL: bool = true;

    fn generator() -> Self::Point {
        RISTRETTO_BASEPOINT_POINT
    }

    fn identity() -> Self::Point {
        RistrettoPoint::identity()
    }

    fn is_identity(p: &Self::Point) -> bool {
        p.is_identity()
    }

    fn point_add(a: &Self::Point, b: &Self::Point) -> Self::Point {
        a + b
    }

    fn point_negate(p: &Self::Point) -> Self::Point {
        -p
    }

    fn scalar_multiply(s: &Self::Scalar, p: &Self::Point) -> Self::Point {
        p * s
    }

    fn mul_generator(s: &Self::Scalar) -> Self::Point {
        RistrettoPoint::mul_base(s)
    }

    fn scalar_zero() -> Self::Scalar {
        Scalar::ZERO
    }

    fn scalar_from_u64(v: u64) -> Self::Scalar {
        Scalar::from(v)
    }

    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        a + b
    }

    fn sample_uniform_scalar<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Self::Scalar> {
        // the order is slightly above 2^252: keep 253 bits
        rejection_sample(rng, Endianness::Little, 0x1f, |bytes| {
            Scalar::from_canonical_bytes(*bytes).into()
        })
    }

    fn scalar_to_bytes(s: &Self::Scalar) -> Vec<u8> {
        s.to_bytes().to_vec()
    }

    fn bytes_to_scalar(bytes: &[u8]) -> Result<Self::Scalar> {
        let bytes = fixed_bytes::<32>(bytes)
            .ok_or_else(|| Error::InvalidArgument(format!("wrong scalar size: {}", bytes.len())))?;
        Option::from(Scalar::from_canonical_bytes(bytes))
            .ok_or_else(|| Error::InvalidArgument("non-canonical scalar".to_string()))
    }

    fn point_to_bytes(p: &Self::Point) -> Vec<u8> {
        p.compress().to_bytes().to_vec()
    }

    fn bytes_to_point(bytes: &[u8]) -> Result<Self::Point> {
        CompressedRistretto::from_slice(bytes)
            .map_err(|_| Error::InvalidPoint("wrong Ristretto encoding size"))?
            .decompress()
            .ok_or(Error::InvalidPoint("non-canonical Ristretto encoding"))
    }
}
