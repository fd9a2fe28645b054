use eyre::Result;
use rand::Rng;
use std::{
    sync::{
        mpsc::{self, Sender},
        Arc,
    },
    thread,
};
use sumfe::{
    codec, decrypt, dlp::DiscreteLogTable, keys, Bls12381G1, Ciphertext, CurveGroup, Epoch,
    Ristretto255, SecretKey,
};

const P: u64 = 10_000;

/// A participant enrols, encrypts its value during the shared epoch and
/// publishes the serialized ciphertext. Its secret is handed over to the key
/// authority, which derives the functional key.
fn client_simulation<G: CurveGroup>(
    value: u64,
    epoch: &Epoch<G>,
    key_tx: &Sender<SecretKey<G>>,
    data_tx: &Sender<Vec<u8>>,
) -> Result<()> {
    let kp = keys::generate_key_pair::<G, _>(&mut rand::thread_rng())?;
    let ct = epoch.encrypt_value(value, P, &kp.public)?;
    data_tx.send(ct.to_bytes())?;
    key_tx.send(kp.secret)?;
    Ok(())
}

fn simulation<G: CurveGroup>(values: &[u64]) -> Result<u64> {
    eyre::ensure!(!values.is_empty(), "The given value vector should not be empty!");
    let n = values.len();

    let epoch = Arc::new(Epoch::<G>::open(1, &mut rand::thread_rng())?);
    let (key_tx, key_rx) = mpsc::channel();
    let (data_tx, data_rx) = mpsc::channel();

    // Launch the clients
    let children: Vec<thread::JoinHandle<Result<()>>> = values
        .iter()
        .map(|&value| {
            let epoch = epoch.clone();
            let key_tx = key_tx.clone();
            let data_tx = data_tx.clone();
            thread::spawn(move || client_simulation(value, &epoch, &key_tx, &data_tx))
        })
        .collect();
    drop(key_tx);
    drop(data_tx);

    // Wait for all the threads to return
    for child in children {
        child
            .join()
            .map_err(|_| eyre::eyre!("A client thread panicked!"))??;
    }

    let epoch = Arc::try_unwrap(epoch)
        .map_err(|_| eyre::eyre!("The epoch is still shared!"))?
        .close()?;
    eyre::ensure!(
        epoch.encryptions() == n as u64,
        "Wrong number of encryptions: {} != {}",
        epoch.encryptions(),
        n
    );

    let secrets: Vec<SecretKey<G>> = key_rx.iter().collect();
    let ciphertexts = data_rx
        .iter()
        .map(|bytes| Ciphertext::<G>::from_bytes(&bytes))
        .collect::<Result<Vec<_>, _>>()?;
    eyre::ensure!(
        secrets.len() == n && ciphertexts.len() == n,
        "Missing contributions!"
    );

    let fdk = keys::derive_functional_key(&secrets)?;
    let aggregated = epoch.aggregate(&ciphertexts)?;
    let table = DiscreteLogTable::<G>::new(codec::aggregate_bound(P, n)?)?;
    Ok(decrypt::decrypt_functional_value(&fdk, &aggregated, &table)?)
}

#[test]
fn test_simulation() -> Result<()> {
    let n_clients = rand::thread_rng().gen_range(2..20);
    let values: Vec<u64> = (0..n_clients)
        .map(|_| rand::thread_rng().gen_range(0..P))
        .collect();
    let sum: u64 = values.iter().sum();

    for res in [
        simulation::<Ristretto255>(&values)?,
        simulation::<Bls12381G1>(&values)?,
    ] {
        eyre::ensure!(
            sum == res,
            "Error while computing the sum: incorrect result!\n{} != {}",
            sum,
            res
        );
    }
    Ok(())
}
