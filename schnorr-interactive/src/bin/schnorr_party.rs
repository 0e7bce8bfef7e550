//! Networked Schnorr identification party.
//!
//! Runs one role of the interactive protocol over TCP:
//!   schnorr-party --id 0 --sk 15 --conf net.json    (prover)
//!   schnorr-party --id 1 --conf net.json            (verifier)
//!
//! The config file lists one `host:port` per party index. A protocol fault
//! exits non-zero with an error report; a rejected proof exits with status 1.

use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ark_bls12_381::{Fr, G1Projective};
use rand::rngs::OsRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use schnorr_interactive::network::tcp::{NetworkConfig, TcpNetwork};
use schnorr_interactive::protocol::run_protocol;
use schnorr_interactive::schnorr::prover::Prover;
use schnorr_interactive::schnorr::verifier::Verifier;
use schnorr_interactive::schnorr::{KeyPair, Parameters, PROVER, VERIFIER};

type Curve = G1Projective;

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let id: usize = parse_flag(&args, "--id")
        .context("--id <0|1> is required")?
        .parse()
        .context("--id must be an integer")?;
    let conf = parse_flag(&args, "--conf").context("--conf <path> is required")?;

    let config = NetworkConfig::load(Path::new(&conf))?;
    let mut network = TcpNetwork::connect(&config, id)?;
    let parameters = Parameters::<Curve>::new();
    // Challenges and nonces must come from a fresh unpredictable source on
    // every run; reusing either across sessions leaks the secret.
    let mut rng = OsRng;

    match id {
        PROVER => {
            let keypair = match parse_flag(&args, "--sk") {
                Some(raw) => {
                    let sk: u64 = raw.parse().context("--sk must be an unsigned integer")?;
                    KeyPair::from_secret(&parameters, Fr::from(sk))
                }
                None => KeyPair::generate(&parameters, &mut rng),
            };
            info!("running as prover");
            run_protocol(&mut Prover::new(parameters, keypair), &mut rng, &mut network)?;
            info!("proof session complete");
        }
        VERIFIER => {
            info!("running as verifier");
            let accept =
                run_protocol(&mut Verifier::new(parameters), &mut rng, &mut network)?;
            if accept {
                info!("proof accepted");
            } else {
                warn!("proof rejected");
                std::process::exit(1);
            }
        }
        other => bail!("party id {} is not a role in a two-party protocol", other),
    }

    Ok(())
}
