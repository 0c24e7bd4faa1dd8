use clap::{ArgAction, Parser, Subcommand};
use paillier_image::codec::DEFAULT_KNOWN_ZERO_BITS;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "paillier-pgm",
    about = "Encrypt or decrypt PGM images with the Paillier cryptosystem",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct PaillierCli {
    /// Global: search and packing limits (JSON)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a key pair from two primes p and q with gcd(pq, (p-1)(q-1)) = 1
    ///
    /// Examples:
    ///   paillier-pgm keygen 61 53
    ///   paillier-pgm keygen 251 241 --out-dir keys --json
    #[command(alias = "k")]
    Keygen {
        #[arg(value_name = "P")]
        p: u64,
        #[arg(value_name = "Q")]
        q: u64,
        /// Directory receiving Paillier_public_key.bin and Paillier_private_key.bin
        #[arg(long = "out-dir", value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
        /// Also print the key pair as JSON
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Encrypt an 8-bit PGM image
    ///
    /// Examples:
    ///   paillier-pgm encrypt lena.pgm 61 53
    ///   paillier-pgm encrypt lena.pgm --key Paillier_public_key.bin --split
    #[command(visible_aliases = ["enc", "e"])]
    Encrypt {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        /// Prime p; a fresh key pair is generated and saved when p and q are given
        #[arg(value_name = "P", requires = "q")]
        p: Option<u64>,
        #[arg(value_name = "Q", requires = "p")]
        q: Option<u64>,
        /// Public key file
        #[arg(
            short = 'k',
            long = "key",
            value_name = "FILE",
            conflicts_with_all = ["p", "q"],
            required_unless_present = "p"
        )]
        key: Option<PathBuf>,
        /// Store each encrypted pixel as two samples
        #[arg(short = 'd', long = "split", action = ArgAction::SetTrue)]
        split: bool,
        /// Rescale pixels onto [0, n) before encryption
        #[arg(long = "histogram-expansion", alias = "hexp", action = ArgAction::SetTrue)]
        histogram_expansion: bool,
        /// Force low ciphertext bits to zero and bit-pack the output
        #[arg(long = "optimized-r", alias = "olsbr", action = ArgAction::SetTrue, conflicts_with = "split")]
        optimized_r: bool,
        #[arg(long = "known-zero-bits", value_name = "K", default_value_t = DEFAULT_KNOWN_ZERO_BITS, requires = "optimized_r")]
        known_zero_bits: u32,
        /// Output image, defaults to <IMAGE stem>_E.pgm
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Decrypt an image produced by `encrypt`
    ///
    /// Examples:
    ///   paillier-pgm decrypt lena_E.pgm --key Paillier_private_key.bin
    ///   paillier-pgm decrypt lena_E.pgm -k Paillier_private_key.bin --compressed --histogram-expansion
    #[command(visible_aliases = ["dec", "d"])]
    Decrypt {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        /// Private key file
        #[arg(short = 'k', long = "key", value_name = "FILE")]
        key: PathBuf,
        /// The image stores each pixel as two samples
        #[arg(short = 'd', long = "split", action = ArgAction::SetTrue)]
        split: bool,
        /// The image is bit-packed (encrypted with --optimized-r)
        #[arg(long = "compressed", alias = "olsbr", action = ArgAction::SetTrue, conflicts_with = "split")]
        compressed: bool,
        #[arg(long = "known-zero-bits", value_name = "K", default_value_t = DEFAULT_KNOWN_ZERO_BITS, requires = "compressed")]
        known_zero_bits: u32,
        /// Undo the histogram expansion applied at encryption
        #[arg(long = "histogram-expansion", alias = "hexp", action = ArgAction::SetTrue)]
        histogram_expansion: bool,
        /// Output image, defaults to <IMAGE stem>_D.pgm
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// `dir/stem_<suffix>.pgm` next to `image`.
pub fn default_output(image: &Path, suffix: &str) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    image.with_file_name(format!("{}_{}.pgm", stem, suffix))
}
