use super::{fixed_bytes, rejection_sample, CurveGroup, Endianness};
use crate::errors::{Error, Result};
use p256::{
    elliptic_curve::{
        ff::PrimeField,
        group::Group,
        sec1::{FromEncodedPoint, ToEncodedPoint},
    },
    AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar,
};
use rand_core::{CryptoRng, RngCore};

/// Size of a SEC1 compressed point.
const COMPRESSED_SIZE: usize = 33;

/// NIST P-256 (secp256r1).
///
/// Points are SEC1 compressed. SEC1 encodes the identity as a single zero
/// byte; it is padded to 33 zero bytes to keep encodings fixed-width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct P256;

impl CurveGroup for P256 {
    type Scalar = Scalar;
    type Point = ProjectivePoint;

    const NAME: &'static str = "p256";
    const SCALAR_SIZE: usize = 32;
    const POINT_SIZE: usize = COMPRESSED_SIZE;
    const CONSTANT_TIME_MUL: bool = true;

    fn generator() -> Self::Point {
        ProjectivePoint::GENERATOR
    }

    fn identity() -> Self::Point {
        ProjectivePoint::IDENTITY
    }

    fn is_identity(p: &Self::Point) -> bool {
        Group::is_identity(p).into()
    }

    fn point_add(a: &Self::Point, b: &Self::Point) -> Self::Point {
        a + b
    }

    fn point_negate(p: &Self::Point) -> Self::Point {
        -*p
    }

    fn scalar_multiply(s: &Self::Scalar, p: &Self::Point) -> Self::Point {
        p * s
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
        // the order is just below 2^256: almost no rejection
        rejection_sample(rng, Endianness::Big, 0xff, |bytes| {
            Scalar::from_repr(*FieldBytes::from_slice(bytes)).into()
        })
    }

    fn scalar_to_bytes(s: &Self::Scalar) -> Vec<u8> {
        s.to_repr().to_vec()
    }

    fn bytes_to_scalar(bytes: &[u8]) -> Result<Self::Scalar> {
        let bytes = fixed_bytes::<32>(bytes)
            .ok_or_else(|| Error::InvalidArgument(format!("wrong scalar size: {}", bytes.len())))?;
        Option::from(Scalar::from_repr(*FieldBytes::from_slice(&bytes)))
            .ok_or_else(|| Error::InvalidArgument("non-canonical scalar".to_string()))
    }

    fn point_to_bytes(p: &Self::Point) -> Vec<u8> {
        if Self::is_identity(p) {
            return vec![0; COMPRESSED_SIZE];
        }
        p.to_affine().to_encoded_point(true).as_bytes().to_vec()
    }

    fn bytes_to_point(bytes: &[u8]) -> Result<Self::Point> {
        let bytes = fixed_bytes::<COMPRESSED_SIZE>(bytes)
            .ok_or(Error::InvalidPoint("wrong SEC1 compressed point size"))?;
        if bytes.iter().all(|&b| b == 0) {
            return Ok(ProjectivePoint::IDENTITY);
        }
        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|_| Error::InvalidPoint("malformed SEC1 encoding"))?;
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(ProjectivePoint::from)
            .ok_or(Error::InvalidPoint("SEC1 encoding is not on the curve"))
    }
}
