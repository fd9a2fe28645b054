//! # Discrete Logarithm
//!
//! Bounded discrete logarithm search used to recover the plaintexts.

use eyre::Result;
use rand::Rng;
use sumfe::{dlp, Bls12381G1, CurveGroup, Ristretto255, P256};

fn check_bsgs<G: CurveGroup>() -> Result<()> {
    // Do not use a big number, it will take useless time
    const M: u64 = 10u64.pow(4);
    let m: u32 = (M as f64).sqrt() as u32 + 1;
    let x: u64 = rand::thread_rng().gen_range(0..M);

    // create the DLP
    let p = G::mul_generator(&G::scalar_from_u64(x));

    // solve it
    let res = dlp::solve::<G>(&p, m, m)?;

    eyre::ensure!(x == res, "{}: wrong DLP solution!", G::NAME);
    Ok(())
}

#[test]
fn test_bsgs() -> Result<()> {
    check_bsgs::<Ristretto255>()?;
    check_bsgs::<P256>()?;
    check_bsgs::<Bls12381G1>()
}

#[test]
fn test_table() -> Result<()> {
    type G = P256;
    const BOUND: u64 = 12_345;
    let table = dlp::DiscreteLogTable::<G>::new(BOUND)?;
    eyre::ensure!(
        (table.baby_steps() as u64) * (table.giant_steps() as u64) >= BOUND,
        "The table does not cover its bound!"
    );

    for x in [0, 1, BOUND / 2, BOUND - 1] {
        let res = table.solve(&G::mul_generator(&G::scalar_from_u64(x)))?;
        eyre::ensure!(x == res, "Wrong DLP solution: {} != {}", res, x);
    }

    // solutions above the bound are not reported, even when reachable
    eyre::ensure!(
        table
            .lookup(&G::mul_generator(&G::scalar_from_u64(BOUND)))
            .is_none(),
        "A solution above the bound was found!"
    );
    eyre::ensure!(
        table
            .solve(&G::mul_generator(&G::scalar_from_u64(BOUND * BOUND)))
            .is_err(),
        "An out-of-range solution was found!"
    );
    Ok(())
}

#[test]
fn test_invalid_bounds() {
    assert!(dlp::DiscreteLogTable::<Ristretto255>::new(0).is_err());
    assert!(dlp::DiscreteLogTable::<Ristretto255>::new(u64::MAX).is_err());
    assert!(dlp::DiscreteLogTable::<Ristretto255>::new(dlp::MAX_SEARCH_BOUND + 1).is_err());
    assert!(dlp::solve::<Ristretto255>(&Ristretto255::generator(), 0, 10).is_err());
}
