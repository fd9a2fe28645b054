//! Homomorphic aggregation of payloads and secrets.
//!
//! Both reductions are associative and commutative: the result does not
//! depend on the order of the inputs, nor on the shape of the reduction tree.

use crate::{
    encrypt::Ciphertext,
    errors::{Error, Result},
    group::CurveGroup,
};
use rayon::prelude::*;
use tracing::debug;

/// Sum the given points.
pub fn combine_points<G: CurveGroup>(points: &[G::Point]) -> Result<G::Point> {
    let (first, rest) = points
        .split_first()
        .ok_or_else(|| Error::InvalidArgument("no point to combine".to_string()))?;
    Ok(rest.iter().fold(*first, |acc, p| G::point_add(&acc, p)))
}

/// Sum the given points using a parallel tree reduction.
///
/// Gives the same result as [`combine_points`].
pub fn par_combine_points<G: CurveGroup>(points: &[G::Point]) -> Result<G::Point> {
    if points.is_empty() {
        return Err(Error::InvalidArgument("no point to combine".to_string()));
    }
    Ok(points
        .par_iter()
        .copied()
        .reduce(G::identity, |a, b| G::point_add(&a, &b)))
}

/// Sum the given scalars modulo the group order.
pub fn combine_scalars<G: CurveGroup>(scalars: &[G::Scalar]) -> Result<G::Scalar> {
    let (first, rest) = scalars
        .split_first()
        .ok_or_else(|| Error::InvalidArgument("no scalar to combine".to_string()))?;
    Ok(rest.iter().fold(*first, |acc, s| G::scalar_add(&acc, s)))
}

/// Sum the payloads of ciphertexts produced in the same epoch.
///
/// Fails if the ciphertexts do not all share the same anchor: payloads of
/// different epochs cannot be aggregated.
pub fn combine_ciphertexts<G: CurveGroup>(ciphertexts: &[Ciphertext<G>]) -> Result<Ciphertext<G>> {
    let first = ciphertexts
        .first()
        .ok_or_else(|| Error::InvalidArgument("no ciphertext to combine".to_string()))?;
    if let Some(i) = ciphertexts.iter().position(|c| c.anchor != first.anchor) {
        return Err(Error::InvalidArgument(format!(
            "ciphertext {} was produced in another epoch",
            i
        )));
    }
    let payloads = ciphertexts.iter().map(|c| c.payload).collect::<Vec<_>>();
    debug!(backend = G::NAME, n = payloads.len(), "aggregating payloads");
    Ok(Ciphertext {
        anchor: first.anchor,
        payload: combine_points::<G>(&payloads)?,
    })
}
