use crate::cipher::Profile;
use crate::config::SearchLimits;
use crate::errors::{PaillierError, Result};
use crate::keypair::generator::{carmichael_lambda, generate_generator, generate_private_key};
use crate::ring::{RandomSource, gcd, is_prime};

use serde::{Deserialize, Serialize};

/// Encryption key `(n, g)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PublicKey {
    pub n: u64,
    pub g: u64,
}

/// Decryption key `(lambda, mu, n)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PrivateKey {
    pub lambda: u64,
    pub mu: u64,
    pub n: u64,
}

/// The two secret primes, consumed once by key generation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PrimeFactors {
    p: u64,
    q: u64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl PublicKey {
    /// Builds a public key, checking `n > 1` and `g` in `[1, n²)`.
    pub fn try_with(n: u64, g: u64) -> Result<Self> {
        let n_squared = checked_square(n)?;
        if g == 0 || g >= n_squared {
            return Err(PaillierError::InvalidKeyData(format!(
                "g = {} must be in [1, n²) with n = {}",
                g, n
            )));
        }

        Ok(Self { n, g })
    }

    pub fn n_squared(&self) -> Result<u64> {
        checked_square(self.n)
    }

    /// Smallest width profile able to hold this key's ciphertexts.
    pub fn profile(&self) -> Result<Profile> {
        Profile::for_modulus(self.n)
    }
}

impl PrivateKey {
    /// Builds a private key, checking `n > 1`, `lambda > 0` and `mu` in `[1, n)`.
    pub fn try_with(lambda: u64, mu: u64, n: u64) -> Result<Self> {
        checked_square(n)?;
        if lambda == 0 {
            return Err(PaillierError::InvalidKeyData(
                "lambda must be > 0".to_string(),
            ));
        }
        if mu == 0 || mu >= n {
            return Err(PaillierError::InvalidKeyData(format!(
                "mu = {} must be in [1, n) with n = {}",
                mu, n
            )));
        }

        Ok(Self { lambda, mu, n })
    }

    pub fn n_squared(&self) -> Result<u64> {
        checked_square(self.n)
    }

    pub fn profile(&self) -> Result<Profile> {
        Profile::for_modulus(self.n)
    }
}

impl PrimeFactors {
    /// Checks the key set-up preconditions before any key material is derived.
    ///
    /// # Constraints
    /// * `p` and `q` are distinct primes.
    /// * `gcd(p * q, (p - 1) * (q - 1)) == 1`.
    /// * `(p * q)²` fits in 64 bits.
    pub fn try_with(p: u64, q: u64) -> Result<Self> {
        if !is_prime(p) {
            return Err(PaillierError::NotPrime(p));
        }
        if !is_prime(q) {
            return Err(PaillierError::NotPrime(q));
        }
        if p == q {
            return Err(PaillierError::InvalidParameters(format!(
                "p and q must be distinct, both are {}",
                p
            )));
        }

        let n = p
            .checked_mul(q)
            .ok_or_else(|| PaillierError::CalculationOverflow(format!("{} * {}", p, q)))?;
        checked_square(n)?;

        let phi = (p - 1)
            .checked_mul(q - 1)
            .ok_or_else(|| PaillierError::CalculationOverflow(format!("({} - 1) * ({} - 1)", p, q)))?;
        let g = gcd(n, phi);
        if g != 1 {
            return Err(PaillierError::GcdConstraintNotMet(g));
        }

        Ok(Self { p, q })
    }

    pub fn p(&self) -> u64 {
        self.p
    }

    pub fn q(&self) -> u64 {
        self.q
    }

    pub fn n(&self) -> u64 {
        self.p * self.q
    }
}

impl KeyPair {
    /// Generates a key pair from two primes with an OS-seeded generator and default limits.
    pub fn try_with(p: u64, q: u64) -> Result<Self> {
        Self::generate(
            PrimeFactors::try_with(p, q)?,
            &mut RandomSource::from_os_rng(),
            &SearchLimits::default(),
        )
    }

    /// Derives `n`, `g`, `lambda` and `mu` from validated primes.
    pub fn generate(
        factors: PrimeFactors,
        rng: &mut RandomSource,
        limits: &SearchLimits,
    ) -> Result<Self> {
        let PrimeFactors { p, q } = factors;
        let n = factors.n();

        // 1) lambda = lcm(p - 1, q - 1)
        let lambda = carmichael_lambda(p, q)?;

        // 2) g with gcd(L(g^lambda mod n²), n) = 1
        let g = generate_generator(
            n,
            lambda,
            rng,
            limits.max_generator_attempts,
            limits.max_unit_attempts,
        )?;

        // 3) mu, never persisted as 0
        let (lambda, mu) = generate_private_key(p, q, n, g)?;

        let public_key = PublicKey::try_with(n, g)?;
        let private_key = PrivateKey::try_with(lambda, mu, n)?;
        log::debug!(
            "key pair generated: n = {}, g = {}, lambda = {}, mu = {}",
            n,
            g,
            lambda,
            mu
        );

        Ok(Self {
            public_key,
            private_key,
        })
    }

    pub fn pub_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn priv_key(&self) -> &PrivateKey {
        &self.private_key
    }
}

fn checked_square(n: u64) -> Result<u64> {
    if n <= 1 {
        return Err(PaillierError::InvalidModulus(format!(
            "n must be greater than 1, got {}",
            n
        )));
    }

    n.checked_mul(n)
        .ok_or_else(|| PaillierError::InvalidModulus(format!("n² overflows 64 bits for n = {}", n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SEED: u64 = 42;

    #[test]
    fn test_prime_factor_validation() {
        assert!(PrimeFactors::try_with(61, 53).is_ok());
        assert!(matches!(
            PrimeFactors::try_with(60, 53),
            Err(PaillierError::NotPrime(60))
        ));
        assert!(matches!(
            PrimeFactors::try_with(61, 1),
            Err(PaillierError::NotPrime(1))
        ));
        assert!(PrimeFactors::try_with(13, 13).is_err());
        // 3 divides 7 - 1
        assert!(matches!(
            PrimeFactors::try_with(3, 7),
            Err(PaillierError::GcdConstraintNotMet(3))
        ));
        // n² no longer fits in 64 bits
        assert!(PrimeFactors::try_with(4_294_967_291, 4_294_967_279).is_err());
    }

    #[test]
    fn test_generated_pair_is_consistent() -> Result<()> {
        let mut rng = RandomSource::seeded(TEST_SEED);
        let factors = PrimeFactors::try_with(61, 53)?;
        let pair = KeyPair::generate(factors, &mut rng, &SearchLimits::default())?;

        assert_eq!(pair.pub_key().n, 3233);
        assert_eq!(pair.priv_key().n, 3233);
        assert_eq!(pair.priv_key().lambda, 780);
        assert_ne!(pair.priv_key().mu, 0);
        assert_eq!(pair.pub_key().profile()?, Profile::Wide);
        Ok(())
    }

    #[test]
    fn test_key_constructors_validate() {
        assert!(PublicKey::try_with(143, 0).is_err());
        assert!(PublicKey::try_with(143, 143 * 143).is_err());
        assert!(PublicKey::try_with(1, 1).is_err());
        assert!(PrivateKey::try_with(60, 0, 143).is_err());
        assert!(PrivateKey::try_with(60, 143, 143).is_err());
        assert!(PrivateKey::try_with(0, 5, 143).is_err());
        assert!(PrivateKey::try_with(60, 5, 143).is_ok());
    }
}
