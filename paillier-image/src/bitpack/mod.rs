//! # Bitpack Module
//!
//! Lossless packing of fixed-width samples whose low `k` bits are known to be zero.
//!
//! `pack` drops those `k` bits, concatenates the remaining high bits of every sample
//! (most significant bit first) and slices the resulting stream into words, padding
//! the last word with zero bits. `unpack` reverses it given the sample count.
//!
//! The intermediate stream is sized from the input, and rejected when it would
//! exceed [`PackingLimits::max_bits`].

use crate::cipher::SampleWidth;
use crate::config::PackingLimits;
use crate::errors::{PaillierError, Result};

/// Number of words needed to pack `count` samples.
///
/// # Example
///
/// ```
/// # use paillier_image::bitpack::packed_len;
/// // 2 samples of 8 bits with 4 known-zero bits fit one 16-bit word
/// assert_eq!(packed_len(2, 8, 4, 16), 1);
/// assert_eq!(packed_len(3, 16, 5, 16), 3);
/// ```
pub fn packed_len(count: u64, bits_per_sample: u32, known_zero_bits: u32, word_bits: u32) -> u64 {
    if word_bits == 0 {
        return 0;
    }
    let kept = bits_per_sample.saturating_sub(known_zero_bits) as u128;
    (count as u128 * kept).div_ceil(word_bits as u128) as u64
}

/// Factor pair `(rows, cols)` of `count` with `rows <= cols` and the smallest difference.
///
/// Prime counts fall back to `(1, count)`, an empty stream gives `(0, 0)`.
pub fn decompose_dimension(count: u64) -> (u64, u64) {
    if count == 0 {
        return (0, 0);
    }

    (1..=count.isqrt())
        .rev()
        .find(|rows| count % rows == 0)
        .map(|rows| (rows, count / rows))
        .unwrap_or((1, count))
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BitPacker {
    limits: PackingLimits,
}

impl BitPacker {
    pub fn new(limits: PackingLimits) -> Self {
        Self { limits }
    }

    /// Packs `samples` into words of `word` width.
    ///
    /// # Errors
    /// * `InvalidParameters` if `known_zero_bits >= bits_per_sample`.
    /// * `CapacityExceeded` if `samples.len() * bits_per_sample` exceeds the limit.
    /// * `CiphertextOverflow` if a sample does not fit `bits_per_sample`.
    /// * `NonZeroLowBits` if a sample has one of its low `known_zero_bits` bits set.
    pub fn pack(
        &self,
        samples: &[u64],
        bits_per_sample: SampleWidth,
        known_zero_bits: u32,
        word: SampleWidth,
    ) -> Result<Vec<u64>> {
        self.check_layout(samples.len(), bits_per_sample, known_zero_bits)?;

        let kept = bits_per_sample.bits() - known_zero_bits;
        let word_bits = word.bits();
        let word_mask = word.max_value() as u128;
        let low_mask = low_bits_mask(known_zero_bits);

        let capacity = packed_len(samples.len() as u64, bits_per_sample.bits(), known_zero_bits, word_bits);
        let mut words = Vec::with_capacity(capacity as usize);

        let mut acc: u128 = 0;
        let mut acc_bits: u32 = 0;
        for (index, &sample) in samples.iter().enumerate() {
            if !bits_per_sample.fits(sample) {
                return Err(PaillierError::CiphertextOverflow {
                    value: sample,
                    width: bits_per_sample,
                });
            }
            if sample & low_mask != 0 {
                return Err(PaillierError::NonZeroLowBits {
                    index,
                    value: sample,
                    known_zero_bits,
                });
            }

            acc = (acc << kept) | (sample >> known_zero_bits) as u128;
            acc_bits += kept;
            while acc_bits >= word_bits {
                acc_bits -= word_bits;
                words.push(((acc >> acc_bits) & word_mask) as u64);
            }
            acc &= (1u128 << acc_bits) - 1;
        }

        if acc_bits > 0 {
            words.push(((acc << (word_bits - acc_bits)) & word_mask) as u64);
        }

        log::debug!(
            "packed {} samples of {} ({} known-zero bits) into {} words of {}",
            samples.len(),
            bits_per_sample,
            known_zero_bits,
            words.len(),
            word
        );
        Ok(words)
    }

    /// Rebuilds `sample_count` samples from packed `words`.
    ///
    /// # Errors
    /// * `InvalidParameters` if `known_zero_bits >= bits_per_sample`.
    /// * `CapacityExceeded` if `sample_count * bits_per_sample` exceeds the limit.
    /// * `DimensionMismatch` if `words.len()` is not the packed length of `sample_count` samples.
    /// * `CiphertextOverflow` if a word does not fit `word`.
    pub fn unpack(
        &self,
        words: &[u64],
        sample_count: usize,
        bits_per_sample: SampleWidth,
        known_zero_bits: u32,
        word: SampleWidth,
    ) -> Result<Vec<u64>> {
        self.check_layout(sample_count, bits_per_sample, known_zero_bits)?;

        let word_bits = word.bits();
        let expected = packed_len(sample_count as u64, bits_per_sample.bits(), known_zero_bits, word_bits);
        if words.len() as u64 != expected {
            return Err(PaillierError::DimensionMismatch(format!(
                "{} samples pack into {} words, got {}",
                sample_count,
                expected,
                words.len()
            )));
        }

        let kept = bits_per_sample.bits() - known_zero_bits;
        let kept_mask = low_bits_mask(kept) as u128;

        let mut samples = Vec::with_capacity(sample_count);
        let mut acc: u128 = 0;
        let mut acc_bits: u32 = 0;
        for &packed in words {
            if !word.fits(packed) {
                return Err(PaillierError::CiphertextOverflow {
                    value: packed,
                    width: word,
                });
            }

            acc = (acc << word_bits) | packed as u128;
            acc_bits += word_bits;
            while acc_bits >= kept && samples.len() < sample_count {
                acc_bits -= kept;
                samples.push((((acc >> acc_bits) & kept_mask) as u64) << known_zero_bits);
            }
            acc &= (1u128 << acc_bits) - 1;
        }

        log::debug!(
            "unpacked {} words of {} into {} samples of {}",
            words.len(),
            word,
            samples.len(),
            bits_per_sample
        );
        Ok(samples)
    }

    fn check_layout(
        &self,
        sample_count: usize,
        bits_per_sample: SampleWidth,
        known_zero_bits: u32,
    ) -> Result<()> {
        if known_zero_bits >= bits_per_sample.bits() {
            return Err(PaillierError::InvalidParameters(format!(
                "known_zero_bits = {} must be below the sample width of {}",
                known_zero_bits, bits_per_sample
            )));
        }

        let required_bits = sample_count as u128 * bits_per_sample.bits() as u128;
        if required_bits > self.limits.max_bits as u128 {
            return Err(PaillierError::CapacityExceeded {
                required_bits: u64::try_from(required_bits).unwrap_or(u64::MAX),
                limit_bits: self.limits.max_bits,
            });
        }
        Ok(())
    }
}

fn low_bits_mask(bits: u32) -> u64 {
    match bits {
        0 => 0,
        64.. => u64::MAX,
        bits => (1u64 << bits) - 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quickcheck_macros::quickcheck;

    #[test]
    fn test_two_samples_into_one_word() -> Result<()> {
        let packer = BitPacker::default();
        let samples = [0b1010000, 0b1100000];

        let words = packer.pack(&samples, SampleWidth::Bits8, 4, SampleWidth::Bits16)?;
        assert_eq!(words, vec![0b0101_0110_0000_0000]);

        let unpacked = packer.unpack(&words, 2, SampleWidth::Bits8, 4, SampleWidth::Bits16)?;
        assert_eq!(unpacked, samples);
        Ok(())
    }

    #[test]
    fn test_low_bits_must_be_zero() {
        let packer = BitPacker::default();
        // 0b1010000 has bit 4 set
        let result = packer.pack(&[0b1100000, 0b1010000], SampleWidth::Bits8, 5, SampleWidth::Bits16);
        assert!(matches!(
            result,
            Err(PaillierError::NonZeroLowBits {
                index: 1,
                value: 0b1010000,
                known_zero_bits: 5
            })
        ));
    }

    #[test]
    fn test_sixteen_bit_ciphertexts_into_bytes() -> Result<()> {
        let packer = BitPacker::default();
        let samples = [0xffe0, 0x0020, 0x8000];

        // 11 kept bits each: 33 bits, five bytes
        let words = packer.pack(&samples, SampleWidth::Bits16, 5, SampleWidth::Bits8)?;
        assert_eq!(words.len(), 5);
        assert_eq!(words, vec![0xff, 0xe0, 0x06, 0x00, 0x00]);
        assert_eq!(
            packer.unpack(&words, 3, SampleWidth::Bits16, 5, SampleWidth::Bits8)?,
            samples
        );
        Ok(())
    }

    #[test]
    fn test_capacity_limit() {
        let packer = BitPacker::new(PackingLimits { max_bits: 32 });
        assert!(packer.pack(&[0; 2], SampleWidth::Bits16, 0, SampleWidth::Bits8).is_ok());
        assert!(matches!(
            packer.pack(&[0; 3], SampleWidth::Bits16, 0, SampleWidth::Bits8),
            Err(PaillierError::CapacityExceeded {
                required_bits: 48,
                limit_bits: 32
            })
        ));
        assert!(packer.unpack(&[0; 6], 3, SampleWidth::Bits16, 0, SampleWidth::Bits8).is_err());
    }

    #[test]
    fn test_rejects_malformed_input() {
        let packer = BitPacker::default();
        assert!(packer.pack(&[256], SampleWidth::Bits8, 0, SampleWidth::Bits8).is_err());
        assert!(packer.pack(&[0], SampleWidth::Bits8, 8, SampleWidth::Bits8).is_err());
        assert!(matches!(
            packer.unpack(&[0, 0], 1, SampleWidth::Bits16, 0, SampleWidth::Bits16),
            Err(PaillierError::DimensionMismatch(_))
        ));
        assert!(packer.unpack(&[0x1_0000], 1, SampleWidth::Bits16, 0, SampleWidth::Bits16).is_err());
    }

    #[test]
    fn test_wide_samples_and_words() -> Result<()> {
        let packer = BitPacker::default();
        let samples = [u64::MAX << 3, 1 << 63, 0];
        let words = packer.pack(&samples, SampleWidth::Bits64, 3, SampleWidth::Bits64)?;
        assert_eq!(words.len(), 3);
        assert_eq!(
            packer.unpack(&words, 3, SampleWidth::Bits64, 3, SampleWidth::Bits64)?,
            samples
        );
        Ok(())
    }

    #[test]
    fn test_decompose_dimension() {
        assert_eq!(decompose_dimension(12), (3, 4));
        assert_eq!(decompose_dimension(13), (1, 13));
        assert_eq!(decompose_dimension(16), (4, 4));
        assert_eq!(decompose_dimension(1), (1, 1));
        assert_eq!(decompose_dimension(0), (0, 0));
        assert_eq!(decompose_dimension(2 * 3 * 5 * 7 * 11), (42, 55));
    }

    #[quickcheck]
    fn prop_pack_round_trip(raw: Vec<u16>, known_zero_bits: u8) -> bool {
        let known_zero_bits = (known_zero_bits % 16) as u32;
        let samples: Vec<u64> = raw
            .iter()
            .map(|&sample| (sample as u64) & !low_bits_mask(known_zero_bits))
            .collect();

        let packer = BitPacker::default();
        let Ok(words) = packer.pack(&samples, SampleWidth::Bits16, known_zero_bits, SampleWidth::Bits8)
        else {
            return false;
        };

        words.len() as u64 == packed_len(samples.len() as u64, 16, known_zero_bits, 8)
            && packer
                .unpack(&words, samples.len(), SampleWidth::Bits16, known_zero_bits, SampleWidth::Bits8)
                .is_ok_and(|unpacked| unpacked == samples)
    }

    #[quickcheck]
    fn prop_decomposition_is_a_factorisation(count: u32) -> bool {
        let count = count as u64 % 1_000_000;
        let (rows, cols) = decompose_dimension(count);
        rows * cols == count && rows <= cols
    }
}
