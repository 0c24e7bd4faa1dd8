//! # Raster Module
//!
//! In-memory grayscale rasters and their PGM (`P5`) encoding, see [`pgm`].

pub mod pgm;

use crate::cipher::SampleWidth;
use crate::errors::{PaillierError, Result};

use serde::{Deserialize, Serialize};

use std::fmt;

/// Raster size in columns and rows.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u64,
    pub height: u64,
}

impl Dimensions {
    pub fn new(width: u64, height: u64) -> Self {
        Self { width, height }
    }

    /// Number of samples, `width * height`.
    pub fn sample_count(&self) -> Result<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| {
                PaillierError::CalculationOverflow(format!("{} x {} samples", self.width, self.height))
            })
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Row-major samples with their declared maximum and storage width.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Raster {
    dims: Dimensions,
    max_value: u64,
    sample_width: SampleWidth,
    samples: Vec<u64>,
}

impl Raster {
    /// Checks that the sample count matches `dims` and that every value fits `max_value`,
    /// which itself must fit `sample_width`.
    pub fn try_with(
        dims: Dimensions,
        max_value: u64,
        sample_width: SampleWidth,
        samples: Vec<u64>,
    ) -> Result<Self> {
        if max_value == 0 || !sample_width.fits(max_value) {
            return Err(PaillierError::MalformedRaster(format!(
                "max value {} is not storable in {}",
                max_value, sample_width
            )));
        }

        let expected = dims.sample_count()?;
        if samples.len() != expected {
            return Err(PaillierError::DimensionMismatch(format!(
                "{} raster needs {} samples, got {}",
                dims,
                expected,
                samples.len()
            )));
        }

        if let Some((index, value)) = samples
            .iter()
            .enumerate()
            .find(|(_, value)| **value > max_value)
        {
            return Err(PaillierError::MalformedRaster(format!(
                "sample {} = {} exceeds max value {}",
                index, value, max_value
            )));
        }

        Ok(Self {
            dims,
            max_value,
            sample_width,
            samples,
        })
    }

    /// 8-bit grayscale raster with max value 255.
    pub fn from_pixels(dims: Dimensions, pixels: &[u8]) -> Result<Self> {
        Self::try_with(
            dims,
            SampleWidth::Bits8.max_value(),
            SampleWidth::Bits8,
            pixels.iter().map(|&pixel| pixel as u64).collect(),
        )
    }

    /// Raster whose max value is the largest value of `sample_width`.
    pub fn full_range(dims: Dimensions, sample_width: SampleWidth, samples: Vec<u64>) -> Result<Self> {
        Self::try_with(dims, sample_width.max_value(), sample_width, samples)
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    pub fn sample_width(&self) -> SampleWidth {
        self.sample_width
    }

    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u64> {
        self.samples
    }

    /// Samples as 8-bit pixels, failing on the first value above 255.
    pub fn pixels(&self) -> Result<Vec<u8>> {
        self.samples
            .iter()
            .map(|&value| {
                u8::try_from(value).map_err(|_| PaillierError::PlaintextOverflow {
                    value,
                    width: SampleWidth::Bits8,
                })
            })
            .collect()
    }
}

/// A packed raster together with the dimensions of the image it came from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CompressedRaster {
    pub original: Dimensions,
    pub raster: Raster,
}
