use anyhow::{Context, Result, bail};
use paillier_image::codec::{CodecOptions, EncodingMode};
use paillier_image::image::{self, PackedImage};
use paillier_image::keypair::{Key, PrivateKey, load_key_file};
use paillier_image::Settings;

use std::path::{Path, PathBuf};

use crate::cli::default_output;

#[derive(Debug)]
pub struct DecryptArgs {
    pub image: PathBuf,
    pub key: PathBuf,
    pub split: bool,
    pub compressed: bool,
    pub known_zero_bits: u32,
    pub histogram_expansion: bool,
    pub output: Option<PathBuf>,
}

pub fn run(args: DecryptArgs, settings: &Settings) -> Result<()> {
    let private_key = load_private_key(&args.key)?;

    let mode = if args.compressed {
        EncodingMode::OptimizedR {
            known_zero_bits: args.known_zero_bits,
        }
    } else if args.split {
        EncodingMode::Split
    } else {
        EncodingMode::Whole
    };
    let options = CodecOptions::try_with(mode, args.histogram_expansion, settings.limits)?;

    let (samples, dims) = if args.compressed {
        let compressed = super::read_compressed_raster(&args.image)?;
        let packed = PackedImage::from_compressed_raster(compressed, args.known_zero_bits);
        let sample_width = private_key.profile()?.ciphertext_width();
        let samples = image::decompress(&packed, sample_width, &settings.packing)
            .with_context(|| format!("unpacking '{}'", args.image.display()))?;
        (samples, packed.original)
    } else {
        let raster = super::read_raster(&args.image)?;
        let dims = raster.dims();
        (raster.into_samples(), dims)
    };

    let decrypted = image::decrypt_image(&samples, dims, &private_key, &options)
        .with_context(|| format!("decrypting '{}'", args.image.display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.image, "D"));
    super::write_raster(&output, &decrypted)?;

    super::report_written("decrypted image", &output);
    Ok(())
}

fn load_private_key(path: &Path) -> Result<PrivateKey> {
    match load_key_file(path, false)
        .with_context(|| format!("loading private key '{}'", path.display()))?
    {
        Key::Private(key) => Ok(key),
        Key::Public(_) => bail!("'{}' does not hold a private key", path.display()),
    }
}
