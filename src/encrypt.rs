//! ElGamal encryption of mapped plaintexts against the epoch anchor.

use crate::{
    codec,
    epoch::EphemeralRandomness,
    errors::{Error, Result},
    group::CurveGroup,
};
use tracing::trace;

/// Sum-FE ciphertext `(r·G, M + r·Y)`.
///
/// The anchor `r·G` is shared by every ciphertext of an epoch; only the
/// payload depends on the participant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ciphertext<G: CurveGroup> {
    pub anchor: G::Point,
    pub payload: G::Point,
}

impl<G: CurveGroup> Ciphertext<G> {
    /// Serialize as `anchor || payload`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = G::point_to_bytes(&self.anchor);
        bytes.extend_from_slice(&G::point_to_bytes(&self.payload));
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 2 * G::POINT_SIZE {
            return Err(Error::InvalidArgument(format!(
                "wrong ciphertext size: {} instead of {}",
                bytes.len(),
                2 * G::POINT_SIZE
            )));
        }
        let (anchor, payload) = bytes.split_at(G::POINT_SIZE);
        let anchor = G::bytes_to_point(anchor)?;
        if G::is_identity(&anchor) {
            return Err(Error::InvalidPoint("ciphertext anchor is the identity"));
        }
        Ok(Self {
            anchor,
            payload: G::bytes_to_point(payload)?,
        })
    }
}

/// Encrypt a mapped plaintext for the given recipient.
///
/// Returns `(r·G, mapped + r·recipient)`; the anchor is the one precomputed
/// with the ephemeral randomness.
/// - `mapped`:     mapped plaintext `v·G`
/// - `recipient`:  recipient public key
/// - `randomness`: ephemeral randomness of the current epoch
pub fn encrypt<G: CurveGroup>(
    mapped: &G::Point,
    recipient: &G::Point,
    randomness: &EphemeralRandomness<G>,
) -> Result<Ciphertext<G>> {
    if G::is_identity(recipient) {
        return Err(Error::InvalidPoint("recipient public key is the identity"));
    }
    let mask = G::scalar_multiply(randomness.scalar(), recipient);
    trace!(backend = G::NAME, "payload computed");
    Ok(Ciphertext {
        anchor: *randomness.anchor(),
        payload: G::point_add(mapped, &mask),
    })
}

/// Map `value` into the group and encrypt it.
pub fn encrypt_value<G: CurveGroup>(
    value: u64,
    domain_bound: u64,
    recipient: &G::Point,
    randomness: &EphemeralRandomness<G>,
) -> Result<Ciphertext<G>> {
    let mapped = codec::map_to_point::<G>(value, domain_bound)?;
    encrypt(&mapped, recipient, randomness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{Bls12381G1, Ristretto255, P256};

    fn check_identity_recipient<G: CurveGroup>() -> Result<()> {
        let r = EphemeralRandomness::<G>::from_scalar(G::scalar_from_u64(7))?;
        let mapped = codec::map_to_point::<G>(2, 10)?;
        assert_eq!(
            encrypt(&mapped, &G::identity(), &r).unwrap_err(),
            Error::InvalidPoint("recipient public key is the identity")
        );
        // all-zero bytes either decode to the identity or do not decode
        match G::bytes_to_point(&vec![0; G::POINT_SIZE]) {
            Ok(p) => assert!(encrypt(&mapped, &p, &r).is_err()),
            Err(err) => assert!(matches!(err, Error::InvalidPoint(_))),
        }
        Ok(())
    }

    #[test]
    fn test_identity_recipient() -> Result<()> {
        check_identity_recipient::<Ristretto255>()?;
        check_identity_recipient::<P256>()?;
        check_identity_recipient::<Bls12381G1>()
    }

    #[test]
    fn test_ciphertext_bytes() -> Result<()> {
        type G = P256;
        let r = EphemeralRandomness::<G>::from_scalar(G::scalar_from_u64(12345))?;
        let y = G::mul_generator(&G::scalar_from_u64(99));
        let ct = encrypt_value(42, 100, &y, &r)?;
        let bytes = ct.to_bytes();
        assert_eq!(bytes.len(), 2 * G::POINT_SIZE);
        assert_eq!(Ciphertext::<G>::from_bytes(&bytes)?, ct);
        assert!(matches!(
            Ciphertext::<G>::from_bytes(&bytes[1..]),
            Err(Error::InvalidArgument(_))
        ));

        // a ciphertext with an identity anchor is rejected
        let forged = Ciphertext::<G> {
            anchor: G::identity(),
            payload: ct.payload,
        };
        assert_eq!(
            Ciphertext::<G>::from_bytes(&forged.to_bytes()).unwrap_err(),
            Error::InvalidPoint("ciphertext anchor is the identity")
        );
        Ok(())
    }
}
