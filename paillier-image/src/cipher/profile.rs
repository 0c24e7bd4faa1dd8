//! Plaintext and ciphertext widths.

use crate::errors::{PaillierError, Result};

use serde::{Deserialize, Serialize};

use std::fmt;

/// Bit width of a stored sample.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SampleWidth {
    Bits8,
    Bits16,
    Bits32,
    Bits64,
}

impl SampleWidth {
    pub fn bits(self) -> u32 {
        match self {
            SampleWidth::Bits8 => 8,
            SampleWidth::Bits16 => 16,
            SampleWidth::Bits32 => 32,
            SampleWidth::Bits64 => 64,
        }
    }

    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Largest value the width can hold.
    ///
    /// # Example
    ///
    /// ```
    /// # use paillier_image::cipher::SampleWidth;
    /// assert_eq!(SampleWidth::Bits8.max_value(), 255);
    /// assert_eq!(SampleWidth::Bits64.max_value(), u64::MAX);
    /// ```
    pub fn max_value(self) -> u64 {
        match self {
            SampleWidth::Bits64 => u64::MAX,
            width => (1u64 << width.bits()) - 1,
        }
    }

    pub fn fits(self, value: u64) -> bool {
        value <= self.max_value()
    }

    pub fn try_from_bits(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(SampleWidth::Bits8),
            16 => Ok(SampleWidth::Bits16),
            32 => Ok(SampleWidth::Bits32),
            64 => Ok(SampleWidth::Bits64),
            other => Err(PaillierError::InvalidParameters(format!(
                "Unsupported sample width: {} bits",
                other
            ))),
        }
    }

    /// Smallest width holding `value`.
    pub fn smallest_for(value: u64) -> Self {
        [SampleWidth::Bits8, SampleWidth::Bits16, SampleWidth::Bits32]
            .into_iter()
            .find(|width| width.fits(value))
            .unwrap_or(SampleWidth::Bits64)
    }
}

impl fmt::Display for SampleWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.bits())
    }
}

/// Pairs the plaintext width with the ciphertext width able to hold `[0, n²)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Profile {
    /// 8-bit plaintext, 16-bit ciphertext (n <= 256).
    Narrow,
    /// 16-bit plaintext, 32-bit ciphertext (n <= 65 536).
    Wide,
    /// 32-bit plaintext, 64-bit ciphertext (n < 2^32).
    Extended,
}

impl Profile {
    /// Picks the smallest profile whose ciphertext width holds every value below `n²`.
    ///
    /// # Example
    ///
    /// ```
    /// # use paillier_image::cipher::Profile;
    /// assert_eq!(Profile::for_modulus(143).unwrap(), Profile::Narrow);
    /// assert_eq!(Profile::for_modulus(3233).unwrap(), Profile::Wide);
    /// ```
    pub fn for_modulus(n: u64) -> Result<Self> {
        if n <= 1 {
            return Err(PaillierError::InvalidModulus(format!(
                "n must be greater than 1, got {}",
                n
            )));
        }

        [Profile::Narrow, Profile::Wide, Profile::Extended]
            .into_iter()
            .find(|profile| profile.supports(n))
            .ok_or_else(|| {
                PaillierError::InvalidModulus(format!("n = {} needs more than 64-bit ciphertexts", n))
            })
    }

    pub fn plaintext_width(self) -> SampleWidth {
        match self {
            Profile::Narrow => SampleWidth::Bits8,
            Profile::Wide => SampleWidth::Bits16,
            Profile::Extended => SampleWidth::Bits32,
        }
    }

    pub fn ciphertext_width(self) -> SampleWidth {
        match self {
            Profile::Narrow => SampleWidth::Bits16,
            Profile::Wide => SampleWidth::Bits32,
            Profile::Extended => SampleWidth::Bits64,
        }
    }

    /// True when `n² - 1` fits the ciphertext width.
    pub fn supports(self, n: u64) -> bool {
        match n.checked_mul(n) {
            Some(n_squared) => n_squared > 0 && self.ciphertext_width().fits(n_squared - 1),
            None => false,
        }
    }
}
