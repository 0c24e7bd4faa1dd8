use crate::config::SearchLimits;
use crate::errors::{PaillierError, Result};

use serde::{Deserialize, Serialize};

/// Low ciphertext bits forced to zero when none are requested explicitly.
pub const DEFAULT_KNOWN_ZERO_BITS: u32 = 5;

/// How each encrypted pixel is laid out in the output stream.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum EncodingMode {
    /// One ciphertext sample per pixel.
    #[default]
    Whole,
    /// Two samples per pixel: `c / n` then `c % n`.
    Split,
    /// One sample per pixel whose low `known_zero_bits` bits are zero.
    OptimizedR { known_zero_bits: u32 },
}

impl EncodingMode {
    pub fn optimized_r() -> Self {
        EncodingMode::OptimizedR {
            known_zero_bits: DEFAULT_KNOWN_ZERO_BITS,
        }
    }

    pub fn samples_per_pixel(self) -> usize {
        match self {
            EncodingMode::Split => 2,
            EncodingMode::Whole | EncodingMode::OptimizedR { .. } => 1,
        }
    }

    pub fn known_zero_bits(self) -> u32 {
        match self {
            EncodingMode::OptimizedR { known_zero_bits } => known_zero_bits,
            EncodingMode::Whole | EncodingMode::Split => 0,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct CodecOptions {
    pub mode: EncodingMode,
    pub histogram_expansion: bool,
    pub limits: SearchLimits,
}

impl CodecOptions {
    pub fn try_with(
        mode: EncodingMode,
        histogram_expansion: bool,
        limits: SearchLimits,
    ) -> Result<Self> {
        let known_zero_bits = mode.known_zero_bits();
        if matches!(mode, EncodingMode::OptimizedR { .. })
            && (known_zero_bits == 0 || known_zero_bits >= 64)
        {
            return Err(PaillierError::InvalidParameters(format!(
                "known_zero_bits must be in [1, 64), got {}",
                known_zero_bits
            )));
        }
        if limits.max_optimized_r_attempts == 0 || limits.max_unit_attempts == 0 {
            return Err(PaillierError::InvalidParameters(
                "Search limits must be > 0".to_string(),
            ));
        }

        Ok(Self {
            mode,
            histogram_expansion,
            limits,
        })
    }
}
