//! Individual and functional decryption.
//!
//! Both modes compute `payload - k·anchor`:
//!
//! - with a participant secret `s` and its payload, it gives `v·G`;
//! - with a functional key `Sum(s_i)` and the aggregated payloads of the
//!   *same* subset, it gives `Sum(v_i)·G`.
//!
//! Nothing checks that the functional key and the aggregated payload cover the
//! same participants. A mismatch silently yields a meaningless point.

use crate::{
    codec,
    dlp::DiscreteLogTable,
    encrypt::Ciphertext,
    errors::{Error, Result},
    group::CurveGroup,
    keys::FunctionalKey,
};

fn unmask<G: CurveGroup>(k: &G::Scalar, anchor: &G::Point, payload: &G::Point) -> Result<G::Point> {
    if G::is_identity(anchor) {
        return Err(Error::InvalidPoint("anchor is the identity"));
    }
    Ok(G::point_add(
        payload,
        &G::point_negate(&G::scalar_multiply(k, anchor)),
    ))
}

/// Decrypt a single payload. Returns the mapped plaintext `v·G`.
/// - `secret`:     recipient secret key
/// - `anchor`:     epoch anchor `r·G`
/// - `payload`:    `v·G + r·Y`
pub fn decrypt_individual<G: CurveGroup>(
    secret: &G::Scalar,
    anchor: &G::Point,
    payload: &G::Point,
) -> Result<G::Point> {
    unmask::<G>(secret, anchor, payload)
}

/// Decrypt an aggregated payload. Returns `Sum(v_i)·G`.
/// - `fdk`:        functional key of the subset
/// - `anchor`:     epoch anchor `r·G`
/// - `aggregated`: sum of the payloads of the subset
pub fn decrypt_functional<G: CurveGroup>(
    fdk: &FunctionalKey<G>,
    anchor: &G::Point,
    aggregated: &G::Point,
) -> Result<G::Point> {
    unmask::<G>(fdk.as_scalar(), anchor, aggregated)
}

/// Decrypt a ciphertext and recover the plaintext integer.
pub fn decrypt_value<G: CurveGroup>(
    secret: &G::Scalar,
    ciphertext: &Ciphertext<G>,
    table: &DiscreteLogTable<G>,
) -> Result<u64> {
    let point = decrypt_individual::<G>(secret, &ciphertext.anchor, &ciphertext.payload)?;
    codec::recover_value(&point, table)
}

/// Decrypt an aggregated ciphertext and recover the sum of the plaintexts.
pub fn decrypt_functional_value<G: CurveGroup>(
    fdk: &FunctionalKey<G>,
    aggregated: &Ciphertext<G>,
    table: &DiscreteLogTable<G>,
) -> Result<u64> {
    let point = decrypt_functional(fdk, &aggregated.anchor, &aggregated.payload)?;
    codec::recover_value(&point, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{Bls12381G1, P256};

    #[test]
    fn test_identity_anchor() {
        type G = P256;
        let s = G::scalar_from_u64(3);
        let payload = G::mul_generator(&G::scalar_from_u64(23));
        assert_eq!(
            decrypt_individual::<G>(&s, &G::identity(), &payload).unwrap_err(),
            Error::InvalidPoint("anchor is the identity")
        );
    }

    #[test]
    fn test_unmask() -> Result<()> {
        type G = Bls12381G1;
        // 23·G - 3·(7·G) = 2·G
        let anchor = G::mul_generator(&G::scalar_from_u64(7));
        let payload = G::mul_generator(&G::scalar_from_u64(23));
        assert_eq!(
            decrypt_individual::<G>(&G::scalar_from_u64(3), &anchor, &payload)?,
            G::mul_generator(&G::scalar_from_u64(2))
        );
        Ok(())
    }
}
