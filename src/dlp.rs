//! Baby-step giant-step discrete logarithm.
//!
//! Decryption returns `x·G`; recovering `x` requires solving a discrete
//! logarithm, which is only feasible when `x` is known to be small. Given
//! `P = x·G` with `x < m·n`:
//!
//! - baby steps: store `H(i·G) -> i` for `i < m`;
//! - giant steps: for `k < n`, look `P - k·m·G` up in the table. On a hit
//!   `x = k·m + i`.
//!
//! Points are keyed by the SHA-256 hash of their canonical encoding.

use crate::group::CurveGroup;
use eyre::Result;
use sha2::{Digest, Sha256};
use std::{collections::HashMap, marker::PhantomData};
use tracing::debug;

const SHA256_SIZE: usize = 32;

/// Largest bound for which a table is considered computable: `2^24` baby
/// steps and as many giant steps.
pub const MAX_SEARCH_BOUND: u64 = 1 << 48;

type Hash = [u8; SHA256_SIZE];
type Table = HashMap<Hash, u32>;

/// Hash a group element.
/// - `p`:  point to hash
fn hash<G: CurveGroup>(p: &G::Point) -> Hash {
    Sha256::digest(&G::point_to_bytes(p)).into()
}

/// This algorithm implements the precomputation step of the BSGS algorithm.
/// It returns a hashed map containing all the precomputed pairs.
///
/// - `m`:  number of pairs to precompute
fn precomputation<G: CurveGroup>(m: u32) -> Result<Table> {
    let g = G::generator();
    let mut pairs = HashMap::with_capacity(m as usize);
    let mut p_i = G::identity();
    for i in 0..m {
        if let Some(j) = pairs.insert(hash::<G>(&p_i), i) {
            eyre::bail!(
                "Hash collision during the precomputation step of the BSGS!\n
            `H(P_i) = H(P_j)`, where `i={}` and `j={}`",
                i,
                j
            );
        }
        p_i = G::point_add(&p_i, &g);
    }
    Ok(pairs)
}

/// This algorithm implements the iteration function of the BSGS algorithm.
///
/// - `p`:      right term of the DLP
/// - `q`:      inverse of `m·G`
/// - `n`:      the number of iterations
/// - `pairs`:  hash table containing the precomputed values
fn iterate<G: CurveGroup>(p: &G::Point, q: &G::Point, n: u32, pairs: &Table) -> Option<(u32, u32)> {
    let mut p_k = *p;
    for giant_step in 0..n {
        if let Some(&baby_step) = pairs.get(&hash::<G>(&p_k)) {
            return Some((giant_step, baby_step));
        }
        p_k = G::point_add(&p_k, q);
    }
    None
}

/// Returns `-(m·G)`.
fn giant_stride<G: CurveGroup>(m: u32) -> G::Point {
    G::point_negate(&G::mul_generator(&G::scalar_from_u64(m as u64)))
}

/// Smallest `m` such that `m * m >= bound`.
pub(crate) fn ceil_sqrt(bound: u64) -> u64 {
    let mut m = (bound as f64).sqrt() as u64;
    while m.saturating_mul(m) < bound {
        m += 1;
    }
    while m > 1 && (m - 1).saturating_mul(m - 1) >= bound {
        m -= 1;
    }
    m
}

/// Number of giant steps of stride `m` needed to cover `[0, bound)`.
pub(crate) fn giant_steps(bound: u64, m: u64) -> u64 {
    bound / m + u64::from(bound % m != 0)
}

/// This algorithm implements the BSGS algorithm. It aims to find `x` such that
/// `x.G = P`, where `G` is the group generator, `P` is given and `x < m·n`.
///
/// `u32` are used to reduce the space required by the hash table. A solution
/// greater than `U^2`, where `U` is the greatest `u32`, is not considered
/// computable.
///
/// - `p`:  right member of the DLP equation
/// - `m`:  number of baby steps
/// - `n`:  number of giant steps
pub fn solve<G: CurveGroup>(p: &G::Point, m: u32, n: u32) -> Result<u64> {
    eyre::ensure!(m > 0, "The number of baby steps should be positive!");
    let pairs = precomputation::<G>(m)?;
    let (giant_step, baby_step) = iterate::<G>(p, &giant_stride::<G>(m), n, &pairs)
        .ok_or_else(|| {
            eyre::eyre!(
                "Cannot find any solution `x` to the DLP such that `x < ({} * {})`!",
                m,
                n
            )
        })?;
    Ok((giant_step as u64) * (m as u64) + (baby_step as u64))
}

/// Precomputed BSGS table, reusable across decryptions.
#[derive(Clone)]
pub struct DiscreteLogTable<G: CurveGroup> {
    bound: u64,
    giant_steps: u32,
    stride: G::Point,
    pairs: Table,
    _group: PhantomData<G>,
}

impl<G: CurveGroup> DiscreteLogTable<G> {
    /// Build a table solving the DLP for every `x < bound`.
    pub fn new(bound: u64) -> Result<Self> {
        eyre::ensure!(bound > 0, "The DLP bound should be positive!");
        eyre::ensure!(
            bound <= MAX_SEARCH_BOUND,
            "DLP bound {} exceeds the computable bound {}!",
            bound,
            MAX_SEARCH_BOUND
        );
        let m = ceil_sqrt(bound);
        let n = giant_steps(bound, m);
        let m = u32::try_from(m)
            .map_err(|_| eyre::eyre!("DLP bound {} is too big to be computable!", bound))?;
        let giant_steps = u32::try_from(n)
            .map_err(|_| eyre::eyre!("DLP bound {} is too big to be computable!", bound))?;
        debug!(backend = G::NAME, bound, baby_steps = m, giant_steps, "BSGS precomputation");
        Ok(Self {
            bound,
            giant_steps,
            stride: giant_stride::<G>(m),
            pairs: precomputation::<G>(m)?,
            _group: PhantomData,
        })
    }

    /// Exclusive upper bound of the solutions this table finds.
    pub fn bound(&self) -> u64 {
        self.bound
    }

    pub fn baby_steps(&self) -> u32 {
        self.pairs.len() as u32
    }

    pub fn giant_steps(&self) -> u32 {
        self.giant_steps
    }

    /// Find `x < bound` such that `x·G = p`.
    pub fn lookup(&self, p: &G::Point) -> Option<u64> {
        let m = self.baby_steps() as u64;
        iterate::<G>(p, &self.stride, self.giant_steps, &self.pairs)
            .map(|(giant_step, baby_step)| (giant_step as u64) * m + (baby_step as u64))
            .filter(|&x| x < self.bound)
    }

    /// Same as [`DiscreteLogTable::lookup`], with an error if no solution exists.
    pub fn solve(&self, p: &G::Point) -> Result<u64> {
        self.lookup(p).ok_or_else(|| {
            eyre::eyre!(
                "Cannot find any solution `x` to the DLP such that `x < {}`!",
                self.bound
            )
        })
    }
}
