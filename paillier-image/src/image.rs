//! Whole-image operations used by front ends.
//!
//! These tie the key material, the pixel codec and the bit packer to raster
//! dimensions; they never touch the filesystem.

use crate::bitpack::{BitPacker, decompose_dimension};
use crate::cipher::SampleWidth;
use crate::codec::{CodecOptions, EncodingMode, PixelCodec};
use crate::config::{PackingLimits, SearchLimits};
use crate::errors::{PaillierError, Result};
use crate::keypair::{KeyPair, PrimeFactors, PrivateKey, PublicKey};
use crate::raster::{CompressedRaster, Dimensions, Raster};
use crate::ring::RandomSource;

pub use crate::keypair::{Key, load_key};

/// Encrypted samples ready to be written as a raster.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EncryptedImage {
    pub dims: Dimensions,
    pub sample_width: SampleWidth,
    pub samples: Vec<u64>,
}

impl EncryptedImage {
    pub fn to_raster(&self) -> Result<Raster> {
        Raster::full_range(self.dims, self.sample_width, self.samples.clone())
    }
}

/// Bit-packed ciphertexts reshaped into a near-square rectangle.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PackedImage {
    /// Dimensions of the encrypted image before packing.
    pub original: Dimensions,
    pub dims: Dimensions,
    pub word_width: SampleWidth,
    pub known_zero_bits: u32,
    pub words: Vec<u64>,
}

impl PackedImage {
    pub fn to_compressed_raster(&self) -> Result<CompressedRaster> {
        Ok(CompressedRaster {
            original: self.original,
            raster: Raster::full_range(self.dims, self.word_width, self.words.clone())?,
        })
    }

    pub fn from_compressed_raster(compressed: CompressedRaster, known_zero_bits: u32) -> Self {
        let CompressedRaster { original, raster } = compressed;
        Self {
            original,
            dims: raster.dims(),
            word_width: raster.sample_width(),
            known_zero_bits,
            words: raster.into_samples(),
        }
    }
}

/// Validates `p` and `q`, then derives a key pair with an OS-seeded generator.
pub fn generate_key_pair(p: u64, q: u64) -> Result<KeyPair> {
    generate_key_pair_with(p, q, &mut RandomSource::from_os_rng(), &SearchLimits::default())
}

pub fn generate_key_pair_with(
    p: u64,
    q: u64,
    rng: &mut RandomSource,
    limits: &SearchLimits,
) -> Result<KeyPair> {
    KeyPair::generate(PrimeFactors::try_with(p, q)?, rng, limits)
}

/// Encrypts 8-bit pixels; split mode doubles the image width.
pub fn encrypt_image(
    pixels: &[u8],
    dims: Dimensions,
    key: &PublicKey,
    options: &CodecOptions,
) -> Result<EncryptedImage> {
    encrypt_image_with(pixels, dims, key, options, RandomSource::from_os_rng())
}

pub fn encrypt_image_with(
    pixels: &[u8],
    dims: Dimensions,
    key: &PublicKey,
    options: &CodecOptions,
    rng: RandomSource,
) -> Result<EncryptedImage> {
    check_sample_count(pixels.len(), dims)?;

    let mut codec = PixelCodec::try_with(key.profile()?, *options, rng)?;
    let samples = codec.encrypt_pixel_stream(pixels, key)?;

    let dims = match options.mode {
        EncodingMode::Split => Dimensions::new(
            dims.width.checked_mul(2).ok_or_else(|| {
                PaillierError::CalculationOverflow(format!("2 x {} columns", dims.width))
            })?,
            dims.height,
        ),
        EncodingMode::Whole | EncodingMode::OptimizedR { .. } => dims,
    };

    Ok(EncryptedImage {
        dims,
        sample_width: codec.output_width(),
        samples,
    })
}

/// Decrypts the samples of an encrypted image of size `dims` back into an 8-bit raster.
pub fn decrypt_image(
    samples: &[u64],
    dims: Dimensions,
    key: &PrivateKey,
    options: &CodecOptions,
) -> Result<Raster> {
    check_sample_count(samples.len(), dims)?;

    let plain_dims = match options.mode {
        EncodingMode::Split => {
            if dims.width % 2 != 0 {
                return Err(PaillierError::DimensionMismatch(format!(
                    "split image width {} is odd",
                    dims.width
                )));
            }
            Dimensions::new(dims.width / 2, dims.height)
        }
        EncodingMode::Whole | EncodingMode::OptimizedR { .. } => dims,
    };

    let codec = PixelCodec::try_with(key.profile()?, *options, RandomSource::seeded(0))?;
    let pixels = codec.decrypt_pixel_stream(samples, key)?;
    Raster::from_pixels(plain_dims, &pixels)
}

/// Packs ciphertexts whose low `known_zero_bits` bits are zero into words of the same width.
pub fn compress(
    samples: &[u64],
    dims: Dimensions,
    known_zero_bits: u32,
    sample_width: SampleWidth,
    limits: &PackingLimits,
) -> Result<PackedImage> {
    check_sample_count(samples.len(), dims)?;

    let words = BitPacker::new(*limits).pack(samples, sample_width, known_zero_bits, sample_width)?;
    let (rows, cols) = decompose_dimension(words.len() as u64);
    log::debug!(
        "compressed {} image into {} words laid out as {}x{}",
        dims,
        words.len(),
        cols,
        rows
    );

    Ok(PackedImage {
        original: dims,
        dims: Dimensions::new(cols, rows),
        word_width: sample_width,
        known_zero_bits,
        words,
    })
}

/// Recovers the `packed.original` samples of `sample_width`.
pub fn decompress(
    packed: &PackedImage,
    sample_width: SampleWidth,
    limits: &PackingLimits,
) -> Result<Vec<u64>> {
    check_sample_count(packed.words.len(), packed.dims)?;

    BitPacker::new(*limits).unpack(
        &packed.words,
        packed.original.sample_count()?,
        sample_width,
        packed.known_zero_bits,
        packed.word_width,
    )
}

fn check_sample_count(len: usize, dims: Dimensions) -> Result<()> {
    let expected = dims.sample_count()?;
    if len != expected {
        return Err(PaillierError::DimensionMismatch(format!(
            "{} image needs {} samples, got {}",
            dims, expected, len
        )));
    }
    Ok(())
}
