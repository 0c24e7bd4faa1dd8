use anyhow::{Context, Result, bail};
use colored::Colorize;
use paillier_image::codec::{CodecOptions, EncodingMode};
use paillier_image::keypair::{Key, PublicKey, load_key_file};
use paillier_image::{Settings, image};

use std::path::{Path, PathBuf};

use crate::cli::default_output;

#[derive(Debug)]
pub struct EncryptArgs {
    pub image: PathBuf,
    pub primes: Option<(u64, u64)>,
    pub key: Option<PathBuf>,
    pub split: bool,
    pub histogram_expansion: bool,
    pub optimized_r: bool,
    pub known_zero_bits: u32,
    pub output: Option<PathBuf>,
}

pub fn run(args: EncryptArgs, settings: &Settings) -> Result<()> {
    let public_key = resolve_public_key(&args, settings)?;

    let mode = if args.optimized_r {
        EncodingMode::OptimizedR {
            known_zero_bits: args.known_zero_bits,
        }
    } else if args.split {
        EncodingMode::Split
    } else {
        EncodingMode::Whole
    };
    let options = CodecOptions::try_with(mode, args.histogram_expansion, settings.limits)?;

    let plain = super::read_raster(&args.image)?;
    let pixels = plain
        .pixels()
        .with_context(|| format!("'{}' is not an 8-bit image", args.image.display()))?;

    let encrypted = image::encrypt_image(&pixels, plain.dims(), &public_key, &options)
        .with_context(|| format!("encrypting '{}'", args.image.display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.image, "E"));

    if args.optimized_r {
        let packed = image::compress(
            &encrypted.samples,
            encrypted.dims,
            args.known_zero_bits,
            encrypted.sample_width,
            &settings.packing,
        )?;
        super::write_compressed_raster(&output, &packed.to_compressed_raster()?)?;
        println!(
            "{} {} pixels packed into a {} image of {}",
            "info:".blue().bold(),
            pixels.len(),
            packed.dims,
            packed.word_width
        );
    } else {
        super::write_raster(&output, &encrypted.to_raster()?)?;
    }

    super::report_written("encrypted image", &output);
    Ok(())
}

fn resolve_public_key(args: &EncryptArgs, settings: &Settings) -> Result<PublicKey> {
    if let Some((p, q)) = args.primes {
        let key_dir = key_dir_for(&args.image);
        let (pair, (public_path, private_path)) =
            super::keygen::generate_and_save(p, q, &key_dir, settings)?;
        super::report_written("public key", &public_path);
        super::report_written("private key", &private_path);
        return Ok(pair.public_key);
    }

    let Some(path) = args.key.as_deref() else {
        bail!("either p and q or --key must be given");
    };
    match load_key_file(path, true)
        .with_context(|| format!("loading public key '{}'", path.display()))?
    {
        Key::Public(key) => Ok(key),
        Key::Private(_) => bail!("'{}' does not hold a public key", path.display()),
    }
}

/// Keys generated during encryption land next to the image.
fn key_dir_for(image: &Path) -> PathBuf {
    match image.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_dir_for() {
        assert_eq!(key_dir_for(Path::new("lena.pgm")), PathBuf::from("."));
        assert_eq!(key_dir_for(Path::new("img/lena.pgm")), PathBuf::from("img"));
    }
}
