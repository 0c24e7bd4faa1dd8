//! # Codec Module
//!
//! Per-pixel transforms between an 8-bit grayscale stream and a stream of
//! ciphertext samples.
//!
//! ## Modes
//! - [`EncodingMode::Whole`]: one ciphertext per pixel, stored at the ciphertext width.
//! - [`EncodingMode::Split`]: `c / n` and `c % n`, both at the plaintext width.
//! - [`EncodingMode::OptimizedR`]: encryption is repeated with fresh `r` until the low
//!   `k` bits of `c` are zero, so the stream can later be packed without loss.
//!
//! Histogram expansion rescales a pixel `p` to `p * n / 256` before encryption;
//! [`histogram_reduction`] undoes it after decryption.

pub mod options;

pub use options::{CodecOptions, DEFAULT_KNOWN_ZERO_BITS, EncodingMode};

use crate::cipher::{PaillierCipher, Profile, SampleWidth};
use crate::errors::{PaillierError, Result};
use crate::keypair::{PrivateKey, PublicKey};
use crate::ring::RandomSource;

use itertools::Itertools;

const PIXEL_LEVELS: u128 = 256;

/// Maps an 8-bit pixel onto `[0, n)`: `pixel * n / 256`.
///
/// # Example
///
/// ```
/// # use paillier_image::codec::histogram_expansion;
/// assert_eq!(histogram_expansion(128, 3233, true), 1616);
/// assert_eq!(histogram_expansion(128, 3233, false), 128);
/// ```
pub fn histogram_expansion(pixel: u64, n: u64, enabled: bool) -> u64 {
    if !enabled {
        return pixel;
    }
    ((pixel as u128 * n as u128) / PIXEL_LEVELS) as u64
}

/// Inverse of [`histogram_expansion`]: `ceil(value * 256 / n)`.
///
/// Exact for every pixel whenever `n >= 256`.
pub fn histogram_reduction(value: u64, n: u64, enabled: bool) -> u64 {
    if !enabled || n == 0 {
        return value;
    }
    let n = n as u128;
    ((value as u128 * PIXEL_LEVELS).div_ceil(n)) as u64
}

#[derive(Debug)]
pub struct PixelCodec {
    cipher: PaillierCipher,
    options: CodecOptions,
}

impl PixelCodec {
    pub fn try_with(profile: Profile, options: CodecOptions, rng: RandomSource) -> Result<Self> {
        let options = CodecOptions::try_with(
            options.mode,
            options.histogram_expansion,
            options.limits,
        )?;

        let known_zero_bits = options.mode.known_zero_bits();
        if known_zero_bits >= profile.ciphertext_width().bits() {
            return Err(PaillierError::InvalidParameters(format!(
                "known_zero_bits = {} leaves nothing of a {} ciphertext",
                known_zero_bits,
                profile.ciphertext_width()
            )));
        }

        Ok(Self {
            cipher: PaillierCipher::try_with(profile, rng, options.limits)?,
            options,
        })
    }

    pub fn profile(&self) -> Profile {
        self.cipher.profile()
    }

    /// Width of every sample in the encrypted stream.
    pub fn output_width(&self) -> SampleWidth {
        match self.options.mode {
            EncodingMode::Split => self.profile().plaintext_width(),
            EncodingMode::Whole | EncodingMode::OptimizedR { .. } => {
                self.profile().ciphertext_width()
            }
        }
    }

    pub fn encrypt_pixel_stream(&mut self, pixels: &[u8], key: &PublicKey) -> Result<Vec<u64>> {
        let mut samples = Vec::with_capacity(pixels.len() * self.options.mode.samples_per_pixel());

        for &pixel in pixels {
            let m = histogram_expansion(pixel as u64, key.n, self.options.histogram_expansion);
            match self.options.mode {
                EncodingMode::Whole => samples.push(self.cipher.encrypt(key, m)?),
                EncodingMode::Split => {
                    let c = self.cipher.encrypt(key, m)?;
                    samples.push(c / key.n);
                    samples.push(c % key.n);
                }
                EncodingMode::OptimizedR { known_zero_bits } => {
                    samples.push(self.encrypt_optimized_r(key, m, known_zero_bits)?)
                }
            }
        }

        log::debug!(
            "encrypted {} pixels into {} samples ({:?}, {})",
            pixels.len(),
            samples.len(),
            self.options.mode,
            self.output_width()
        );
        Ok(samples)
    }

    pub fn decrypt_pixel_stream(&self, samples: &[u64], key: &PrivateKey) -> Result<Vec<u8>> {
        let pixels = match self.options.mode {
            EncodingMode::Whole | EncodingMode::OptimizedR { .. } => samples
                .iter()
                .map(|&c| self.decrypt_pixel(key, c))
                .collect::<Result<Vec<_>>>()?,
            EncodingMode::Split => {
                if samples.len() % 2 != 0 {
                    return Err(PaillierError::DimensionMismatch(format!(
                        "split stream holds {} samples, expected an even count",
                        samples.len()
                    )));
                }
                samples
                    .iter()
                    .tuples()
                    .map(|(&hi, &lo)| self.decrypt_pixel(key, join_halves(hi, lo, key.n)?))
                    .collect::<Result<Vec<_>>>()?
            }
        };

        log::debug!(
            "decrypted {} samples into {} pixels ({:?})",
            samples.len(),
            pixels.len(),
            self.options.mode
        );
        Ok(pixels)
    }

    fn decrypt_pixel(&self, key: &PrivateKey, c: u64) -> Result<u8> {
        let m = self.cipher.decrypt(key, c)?;
        let value = histogram_reduction(m, key.n, self.options.histogram_expansion);
        u8::try_from(value).map_err(|_| PaillierError::PlaintextOverflow {
            value,
            width: SampleWidth::Bits8,
        })
    }

    /// Re-encrypts until the low `known_zero_bits` bits of `c` are zero.
    fn encrypt_optimized_r(&mut self, key: &PublicKey, m: u64, known_zero_bits: u32) -> Result<u64> {
        let mask = (1u64 << known_zero_bits) - 1;
        let max_attempts = self.options.limits.max_optimized_r_attempts;

        let mut attempts: u64 = 0;
        while attempts < max_attempts {
            attempts += 1;

            let c = self.cipher.encrypt(key, m)?;
            if c & mask == 0 {
                log::trace!("optimized r found for m = {} after {} attempts", m, attempts);
                if attempts > max_attempts / 2 {
                    log::warn!(
                        "optimized r search for m = {} used {} of {} attempts",
                        m,
                        attempts,
                        max_attempts
                    );
                }
                return Ok(c);
            }
        }

        Err(PaillierError::SearchExhausted {
            search: "optimized r",
            attempts,
        })
    }
}

fn join_halves(hi: u64, lo: u64, n: u64) -> Result<u64> {
    for half in [hi, lo] {
        if half >= n {
            return Err(PaillierError::CiphertextOutOfRange {
                value: half,
                modulus_squared: n.saturating_mul(n),
            });
        }
    }
    // hi < n and lo < n, so hi * n + lo < n² which fits because n² does
    Ok(hi * n + lo)
}
