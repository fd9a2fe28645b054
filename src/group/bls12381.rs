use super::{fixed_bytes, rejection_sample, CurveGroup, Endianness};
use crate::errors::{Error, Result};
use bls12_381::{G1Affine, G1Projective, Scalar};
use rand_core::{CryptoRng, RngCore};

/// Size of a compressed `G1` point.
const G1_COMPRESSED_SIZE: usize = 48;

/// The `G1` group of BLS12-381.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bls12381G1;

impl CurveGroup for Bls12381G1 {
    type Scalar = Scalar;
    type Point = G1Projective;

    const NAME: &'static str = "bls12-381-g1";
    const SCALAR_SIZE: usize = 32;
    const POINT_SIZE: usize = G1_COMPRESSED_SIZE;
    const CONSTANT_TIME_MUL: bool = true;

    fn generator() -> Self::Point {
        G1Projective::generator()
    }

    fn identity() -> Self::Point {
        G1Projective::identity()
    }

    fn is_identity(p: &Self::Point) -> bool {
        p.is_identity().into()
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

    fn scalar_zero() -> Self::Scalar {
        Scalar::zero()
    }

    fn scalar_from_u64(v: u64) -> Self::Scalar {
        Scalar::from(v)
    }

    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        a + b
    }

    fn sample_uniform_scalar<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Self::Scalar> {
        // the order is a 255-bit prime
        rejection_sample(rng, Endianness::Little, 0x7f, |bytes| {
            Scalar::from_bytes(bytes).into()
        })
    }

    fn scalar_to_bytes(s: &Self::Scalar) -> Vec<u8> {
        s.to_bytes().to_vec()
    }

    fn bytes_to_scalar(bytes: &[u8]) -> Result<Self::Scalar> {
        let bytes = fixed_bytes::<32>(bytes)
            .ok_or_else(|| Error::InvalidArgument(format!("wrong scalar size: {}", bytes.len())))?;
        Option::from(Scalar::from_bytes(&bytes))
            .ok_or_else(|| Error::InvalidArgument("non-canonical scalar".to_string()))
    }

    fn point_to_bytes(p: &Self::Point) -> Vec<u8> {
        G1Affine::from(p).to_compressed().to_vec()
    }

    fn bytes_to_point(bytes: &[u8]) -> Result<Self::Point> {
        let bytes = fixed_bytes::<G1_COMPRESSED_SIZE>(bytes)
            .ok_or(Error::InvalidPoint("wrong G1 compressed point size"))?;
        Option::<G1Affine>::from(G1Affine::from_compressed(&bytes))
            .map(G1Projective::from)
            .ok_or(Error::InvalidPoint("malformed G1 encoding"))
    }
}
