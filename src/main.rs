use eyre::Result;
use rand_core::OsRng;
use sumfe::{
    codec,
    config::{BackendId, Parameters, Setup},
    decrypt,
    dlp::DiscreteLogTable,
    keys, Bls12381G1, CurveGroup, Epoch, Ristretto255, P256,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const VALUE_A: u64 = 15;
const VALUE_B: u64 = 25;
const DOMAIN_BOUND: u64 = 1 << 10;

fn run<G: CurveGroup>(params: &Parameters) -> Result<()> {
    let mut rng = OsRng;
    let table = DiscreteLogTable::<G>::new(params.aggregate_bound)?;

    // enrolment
    let participants = keys::generate_key_pairs::<G, _>(
        params.participants,
        params.keygen_attempts,
        &mut rng,
    )?;
    let (alice, bob) = (&participants[0], &participants[1]);

    // encryption
    let epoch = Epoch::<G>::open(1, &mut rng)?;
    let ct_a = epoch.encrypt_value(VALUE_A, params.domain_bound, &alice.public)?;
    let ct_b = epoch.encrypt_value(VALUE_B, params.domain_bound, &bob.public)?;
    let epoch = epoch.close()?;
    info!(epoch = epoch.id(), encryptions = epoch.encryptions(), "epoch closed");

    // individual decryption
    let v_a = decrypt::decrypt_value(alice.secret.as_scalar(), &ct_a, &table)?;
    let v_b = decrypt::decrypt_value(bob.secret.as_scalar(), &ct_b, &table)?;
    info!(v_a, v_b, "individual decryptions");
    eyre::ensure!(
        v_a == VALUE_A && v_b == VALUE_B,
        "Wrong individual decryption: ({}, {}) != ({}, {})",
        v_a,
        v_b,
        VALUE_A,
        VALUE_B
    );

    // functional decryption
    let fdk = keys::derive_functional_key(participants.iter().map(|kp| &kp.secret))?;
    let aggregated = epoch.aggregate(&[ct_a, ct_b])?;
    let sum = codec::recover_value(&epoch.decrypt_functional(&fdk, &aggregated)?, &table)?;
    info!(sum, "functional decryption");
    eyre::ensure!(
        sum == VALUE_A + VALUE_B,
        "Wrong functional decryption: {} != {}",
        sum,
        VALUE_A + VALUE_B
    );

    // encryption of the sum under the master public key `Sum(Y_i)`
    let mpk = keys::aggregate_public_keys(participants.iter().map(|kp| &kp.public))?;
    let epoch = Epoch::<G>::open(2, &mut rng)?;
    let ct = epoch.encrypt_value(VALUE_A + VALUE_B, params.aggregate_bound, &mpk)?;
    let epoch = epoch.close()?;
    let sum = codec::recover_value(&epoch.decrypt_functional(&fdk, &ct)?, &table)?;
    info!(sum, "master public key decryption");
    eyre::ensure!(
        sum == VALUE_A + VALUE_B,
        "Wrong master public key decryption: {} != {}",
        sum,
        VALUE_A + VALUE_B
    );

    println!("{}: {} + {} = {}", G::NAME, VALUE_A, VALUE_B, sum);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let backend = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => BackendId::Ristretto255,
    };
    let params = Parameters::instantiate(&Setup {
        participants: 2,
        domain_bound: DOMAIN_BOUND,
        keygen_attempts: keys::DEFAULT_KEYGEN_ATTEMPTS,
        backend,
    })?;
    info!(%params, "setup");

    match params.backend {
        BackendId::Ristretto255 => run::<Ristretto255>(&params),
        BackendId::P256 => run::<P256>(&params),
        BackendId::Bls12381 => run::<Bls12381G1>(&params),
    }
}
