use anyhow::{Context, Result};
use colored::Colorize;
use paillier_image::keypair::KeyPair;
use paillier_image::ring::RandomSource;
use paillier_image::{Settings, image};

use std::path::{Path, PathBuf};

pub fn run(p: u64, q: u64, out_dir: &Path, json: bool, settings: &Settings) -> Result<()> {
    let (pair, (public_path, private_path)) = generate_and_save(p, q, out_dir, settings)?;

    println!(
        "{} n = {}, g = {}",
        "public key:".cyan().bold(),
        pair.public_key.n,
        pair.public_key.g
    );
    println!(
        "{} lambda = {}, mu = {}",
        "private key:".cyan().bold(),
        pair.private_key.lambda,
        pair.private_key.mu
    );
    super::report_written("public key", &public_path);
    super::report_written("private key", &private_path);

    if json {
        println!("{}", pair.to_json()?);
    }
    Ok(())
}

/// Generates a key pair from `p` and `q` and stores both halves in `out_dir`.
pub fn generate_and_save(
    p: u64,
    q: u64,
    out_dir: &Path,
    settings: &Settings,
) -> Result<(KeyPair, (PathBuf, PathBuf))> {
    let pair = image::generate_key_pair_with(p, q, &mut RandomSource::from_os_rng(), &settings.limits)
        .with_context(|| format!("generating a key pair from p = {} and q = {}", p, q))?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating '{}'", out_dir.display()))?;
    let paths = pair
        .save_to_dir(out_dir)
        .with_context(|| format!("saving keys into '{}'", out_dir.display()))?;

    log::info!("key pair generated for n = {}", pair.public_key.n);
    Ok((pair, paths))
}
