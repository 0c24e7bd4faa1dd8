use crate::errors::{PaillierError, Result};
use crate::ring::{RandomSource, Ring, gcd, l_function, lcm};

/// Searches for the public generator `g`.
///
/// Implements the generator search of the Paillier key set-up.
///
/// # Parameters
/// * `n`: The public modulus `p * q`.
/// * `lambda`: `lcm(p - 1, q - 1)`.
/// * `rng`: Source of the candidates.
/// * `max_attempts`: Candidates tried before giving up.
///
/// # Algorithm Steps
/// 1. Draws `g` from `(Z/n²Z)*`.
/// 2. Computes `u = g^lambda mod n²` and `l = L(u) = (u - 1) / n`.
/// 3. Accepts `g` when `gcd(l, n) == 1`, which guarantees that `mu` exists.
///
/// # Returns
/// * `Ok(u64)`: The accepted generator.
/// * `Err(PaillierError)`: `n²` overflows, or the search ran out of attempts.
pub fn generate_generator(
    n: u64,
    lambda: u64,
    rng: &mut RandomSource,
    max_attempts: u64,
    max_unit_attempts: u64,
) -> Result<u64> {
    let n_squared = n
        .checked_mul(n)
        .ok_or_else(|| PaillierError::CalculationOverflow(format!("{}²", n)))?;
    let ring = Ring::try_with(n_squared)?;

    let mut attempts: u64 = 0;
    while attempts < max_attempts {
        attempts += 1;

        let g = rng.random_unit_group_element(n_squared, max_unit_attempts)?;
        let u = ring.pow(g, lambda);
        let Ok(l) = l_function(u, n) else {
            continue;
        };

        if gcd(l, n) == 1 {
            log::debug!("generator g = {} accepted after {} candidates", g, attempts);
            return Ok(g);
        }
    }

    Err(PaillierError::SearchExhausted {
        search: "generator g",
        attempts,
    })
}

/// Computes `mu = L(g^lambda mod n²)^-1 mod n`.
///
/// Returns `0` when the inverse does not exist.
pub fn generate_mu(g: u64, lambda: u64, n: u64) -> u64 {
    try_generate_mu(g, lambda, n).unwrap_or(0)
}

/// Like [`generate_mu`], reporting a missing inverse as `MuNotFound`.
pub fn try_generate_mu(g: u64, lambda: u64, n: u64) -> Result<u64> {
    let n_squared = n
        .checked_mul(n)
        .ok_or_else(|| PaillierError::CalculationOverflow(format!("{}²", n)))?;

    let u = Ring::try_with(n_squared)?.pow(g, lambda);
    let l = l_function(u, n).map_err(|_| PaillierError::MuNotFound { g, n })?;
    Ring::try_with(n)?
        .inv(l)
        .map_err(|_| PaillierError::MuNotFound { g, n })
}

/// Derives `(lambda, mu)` from the prime factors and the generator.
///
/// # Errors
///
/// Returns `PaillierError::MuNotFound` if no inverse exists for the chosen `g`.
pub fn generate_private_key(p: u64, q: u64, n: u64, g: u64) -> Result<(u64, u64)> {
    let lambda = carmichael_lambda(p, q)?;
    let mu = try_generate_mu(g, lambda, n)?;

    Ok((lambda, mu))
}

/// `lcm(p - 1, q - 1)`.
pub fn carmichael_lambda(p: u64, q: u64) -> Result<u64> {
    if p < 2 || q < 2 {
        return Err(PaillierError::InvalidParameters(format!(
            "p and q must be >= 2, got p = {} and q = {}",
            p, q
        )));
    }

    lcm(p - 1, q - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::{fast_mod_exp, mod_inverse};

    const TEST_SEED: u64 = 42;

    #[test]
    fn test_textbook_lambda() -> Result<()> {
        assert_eq!(carmichael_lambda(61, 53)?, 780);
        assert_eq!(carmichael_lambda(11, 13)?, 60);
        assert!(carmichael_lambda(1, 13).is_err());
        Ok(())
    }

    #[test]
    fn test_textbook_mu() {
        // g = n + 1 gives L(g^lambda) = lambda mod n
        let n = 61 * 53;
        let mu = generate_mu(n + 1, 780, n);
        assert_eq!(mu, mod_inverse(780, n));
        assert_eq!(780 * mu % n, 1);
    }

    #[test]
    fn test_generator_satisfies_condition() -> Result<()> {
        let mut rng = RandomSource::seeded(TEST_SEED);
        let (p, q) = (11, 13);
        let n = p * q;
        let lambda = carmichael_lambda(p, q)?;

        for _ in 0..20 {
            let g = generate_generator(n, lambda, &mut rng, 1_000, 1_000)?;
            assert!(g >= 1 && g < n * n);
            let u = fast_mod_exp(g, lambda, n * n);
            assert_eq!(gcd(l_function(u, n)?, n), 1);

            let (_, mu) = generate_private_key(p, q, n, g)?;
            assert_ne!(mu, 0);
        }
        Ok(())
    }

    #[test]
    fn test_generator_search_is_bounded() {
        let mut rng = RandomSource::seeded(TEST_SEED);
        let result = generate_generator(143, 60, &mut rng, 0, 1_000);
        assert!(matches!(result, Err(PaillierError::SearchExhausted { .. })));
    }

    #[test]
    fn test_mu_sentinel_and_error_agree() {
        assert_eq!(generate_mu(1, 60, 143), 0);
        assert!(matches!(
            try_generate_mu(1, 60, 143),
            Err(PaillierError::MuNotFound { g: 1, n: 143 })
        ));
        assert_eq!(try_generate_mu(3234, 780, 3233).ok(), Some(generate_mu(3234, 780, 3233)));
    }

    #[test]
    fn test_mu_not_found_is_reported() {
        // g = 1 gives L(1) = 0 which has no inverse
        let result = generate_private_key(11, 13, 143, 1);
        assert!(matches!(
            result,
            Err(PaillierError::MuNotFound { g: 1, n: 143 })
        ));
    }
}
