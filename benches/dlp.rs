use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use std::time::Duration;
use sumfe::{dlp::DiscreteLogTable, CurveGroup, Ristretto255};

type G = Ristretto255;

/// Solve a random DLP `x < m` with a precomputed table.
fn solve_random(table: &DiscreteLogTable<G>) -> u64 {
    let x = rand::thread_rng().gen_range(0..table.bound());
    table.solve(&G::mul_generator(&G::scalar_from_u64(x))).unwrap()
}

fn benchmark_bsgs(c: &mut Criterion) {
    c.bench_function("BSGS precomputation 1_000_000", |b| {
        b.iter(|| DiscreteLogTable::<G>::new(black_box(1_000_000)).unwrap())
    });

    let table_1_000_000 = DiscreteLogTable::<G>::new(1_000_000).unwrap();
    c.bench_function("DLP 1_000_000", |b| {
        b.iter(|| solve_random(&table_1_000_000))
    });

    let table_1_000_000_000 = DiscreteLogTable::<G>::new(1_000_000_000).unwrap();
    let mut group_1_000_000_000 = c.benchmark_group("sample-size-example");
    group_1_000_000_000.significance_level(0.1).sample_size(10);
    group_1_000_000_000.measurement_time(Duration::new(60, 0));
    group_1_000_000_000.bench_function("DLP 1_000_000_000", |b| {
        b.iter(|| solve_random(&table_1_000_000_000))
    });
    group_1_000_000_000.finish();
}

criterion_group!(bsgs, benchmark_bsgs);
criterion_main!(bsgs);
