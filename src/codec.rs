//! Mapping between bounded integers and group elements.
//!
//! An integer `v` is mapped to `v·G`. The inverse mapping is a bounded
//! discrete logarithm search, see [`crate::dlp`].

use crate::{
    dlp::DiscreteLogTable,
    errors::{Error, Result},
    group::CurveGroup,
};

/// Map `value` to `value·G`.
///
/// `0` is a valid plaintext and maps to the identity.
/// - `value`:          plaintext, `value < domain_bound`
/// - `domain_bound`:   exclusive upper bound of the plaintext domain
pub fn map_to_point<G: CurveGroup>(value: u64, domain_bound: u64) -> Result<G::Point> {
    if domain_bound == 0 {
        return Err(Error::InvalidArgument(
            "the plaintext domain is empty".to_string(),
        ));
    }
    if value >= domain_bound {
        return Err(Error::OutOfRange {
            value,
            bound: domain_bound,
        });
    }
    Ok(G::mul_generator(&G::scalar_from_u64(value)))
}

/// Exclusive upper bound of a sum of `participants` plaintexts of the given
/// domain, i.e. `participants * (domain_bound - 1) + 1`.
pub fn aggregate_bound(domain_bound: u64, participants: usize) -> Result<u64> {
    if domain_bound == 0 || participants == 0 {
        return Err(Error::InvalidArgument(format!(
            "cannot aggregate {} plaintexts of domain [0, {})",
            participants, domain_bound
        )));
    }
    (participants as u64)
        .checked_mul(domain_bound - 1)
        .and_then(|max| max.checked_add(1))
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "the sum of {} plaintexts of domain [0, {}) does not fit in 64 bits",
                participants, domain_bound
            ))
        })
}

/// Recover the integer encoded by `point`, if it is below the table bound.
pub fn recover_value<G: CurveGroup>(point: &G::Point, table: &DiscreteLogTable<G>) -> Result<u64> {
    table.lookup(point).ok_or(Error::DiscreteLog {
        bound: table.bound(),
    })
}
