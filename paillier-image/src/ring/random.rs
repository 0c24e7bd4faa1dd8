//! Random sampling over `[min, max]` and over the unit group `(Z/nZ)*`.
//!
//! Not hardened: the generator is a plain seedable PRNG.

use crate::errors::{PaillierError, Result};
use crate::ring::gcd;

use rand::prelude::{Rng, SeedableRng, StdRng};

use std::fmt;

pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Seeds the generator from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Repeatable stream for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform value in `[min, max]`.
    pub fn random_in_range(&mut self, min: u64, max: u64) -> Result<u64> {
        if min > max {
            return Err(PaillierError::InvalidParameters(format!(
                "Empty range [{}, {}]",
                min, max
            )));
        }

        Ok(self.rng.random_range(min..=max))
    }

    /// Samples `r` in `[1, n]` until `gcd(r, n) == 1`, giving up after `max_attempts` draws.
    pub fn random_unit_group_element(&mut self, n: u64, max_attempts: u64) -> Result<u64> {
        if n == 0 {
            return Err(PaillierError::InvalidModulus(
                "(Z/0Z)* has no elements to sample".to_string(),
            ));
        }

        let mut attempts: u64 = 0;
        while attempts < max_attempts {
            attempts += 1;
            let r = self.random_in_range(1, n)?;
            if gcd(r, n) == 1 {
                log::trace!("unit of Z/{}Z found after {} attempts", n, attempts);
                return Ok(r);
            }
        }

        Err(PaillierError::SearchExhausted {
            search: "unit group element",
            attempts,
        })
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SEED: u64 = 42;

    #[test]
    fn test_range_bounds() -> Result<()> {
        let mut source = RandomSource::seeded(TEST_SEED);
        for _ in 0..1000 {
            let r = source.random_in_range(10, 20)?;
            assert!((10..=20).contains(&r));
        }
        assert_eq!(source.random_in_range(7, 7)?, 7);
        assert!(source.random_in_range(8, 7).is_err());
        Ok(())
    }

    #[test]
    fn test_same_seed_same_stream() -> Result<()> {
        let mut a = RandomSource::seeded(TEST_SEED);
        let mut b = RandomSource::seeded(TEST_SEED);
        for _ in 0..32 {
            assert_eq!(a.random_in_range(0, u64::MAX)?, b.random_in_range(0, u64::MAX)?);
        }
        Ok(())
    }

    #[test]
    fn test_unit_group_element_is_coprime() -> Result<()> {
        let mut source = RandomSource::seeded(TEST_SEED);
        for n in [2u64, 15, 143, 3233, 1 << 20] {
            for _ in 0..100 {
                let r = source.random_unit_group_element(n, 10_000)?;
                assert!(r >= 1 && r < n.max(2));
                assert_eq!(gcd(r, n), 1);
            }
        }
        Ok(())
    }

    #[test]
    fn test_unit_search_is_bounded() {
        let mut source = RandomSource::seeded(TEST_SEED);
        let result = source.random_unit_group_element(1 << 40, 0);
        assert!(matches!(
            result,
            Err(PaillierError::SearchExhausted { attempts: 0, .. })
        ));
        assert!(source.random_unit_group_element(0, 10).is_err());
    }
}
