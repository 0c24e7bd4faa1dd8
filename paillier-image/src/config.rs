//! Tunables shared by key generation, encryption and bit packing.

use crate::errors::{PaillierError, Result};

use serde::{Deserialize, Serialize};

use std::path::Path;

/// 15360 × 8640 pixels of 16 bits.
pub const DEFAULT_MAX_PACKED_BITS: u64 = 2_123_366_400;

const DEFAULT_MAX_ATTEMPTS: u64 = 100_000;

/// Caps on every rejection-sampling loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Draws allowed when sampling `r` from `(Z/nZ)*`.
    pub max_unit_attempts: u64,
    /// Candidates tried for the public generator `g`.
    pub max_generator_attempts: u64,
    /// Encryptions tried per pixel to zero the low ciphertext bits.
    pub max_optimized_r_attempts: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_unit_attempts: DEFAULT_MAX_ATTEMPTS,
            max_generator_attempts: DEFAULT_MAX_ATTEMPTS,
            max_optimized_r_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl SearchLimits {
    /// Loops never give up.
    pub fn unbounded() -> Self {
        Self {
            max_unit_attempts: u64::MAX,
            max_generator_attempts: u64::MAX,
            max_optimized_r_attempts: u64::MAX,
        }
    }

    pub fn try_with(
        max_unit_attempts: u64,
        max_generator_attempts: u64,
        max_optimized_r_attempts: u64,
    ) -> Result<Self> {
        if max_unit_attempts == 0 || max_generator_attempts == 0 || max_optimized_r_attempts == 0
        {
            return Err(PaillierError::InvalidParameters(
                "Search limits must be > 0".to_string(),
            ));
        }

        Ok(Self {
            max_unit_attempts,
            max_generator_attempts,
            max_optimized_r_attempts,
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingLimits {
    /// Largest intermediate bit stream the packer accepts.
    pub max_bits: u64,
}

impl Default for PackingLimits {
    fn default() -> Self {
        Self {
            max_bits: DEFAULT_MAX_PACKED_BITS,
        }
    }
}

/// Everything a run can tune, loadable from JSON.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub limits: SearchLimits,
    pub packing: PackingLimits,
}

impl Settings {
    pub fn try_with(limits: SearchLimits, packing: PackingLimits) -> Result<Self> {
        SearchLimits::try_with(
            limits.max_unit_attempts,
            limits.max_generator_attempts,
            limits.max_optimized_r_attempts,
        )?;

        if packing.max_bits == 0 {
            return Err(PaillierError::InvalidParameters(
                "Packing limit must be > 0 bits".to_string(),
            ));
        }

        Ok(Self { limits, packing })
    }

    /// Parses and validates settings; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Settings = serde_json::from_str(json)?;
        Self::try_with(raw.limits, raw.packing)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
