//! # Cipher Module
//!
//! Single-value Paillier encryption and decryption.
//!
//! A [`PaillierCipher`] is bound to a [`Profile`], which fixes the plaintext and
//! ciphertext widths every value must fit in. Nothing is ever truncated: a value
//! outside its width is reported as an error.

pub mod profile;

pub use profile::{Profile, SampleWidth};

use crate::config::SearchLimits;
use crate::errors::{PaillierError, Result};
use crate::keypair::{PrivateKey, PublicKey};
use crate::ring::{RandomSource, Ring, gcd, l_function};

#[derive(Debug)]
pub struct PaillierCipher {
    profile: Profile,
    rng: RandomSource,
    limits: SearchLimits,
}

impl PaillierCipher {
    pub fn try_with(profile: Profile, rng: RandomSource, limits: SearchLimits) -> Result<Self> {
        if limits.max_unit_attempts == 0 {
            return Err(PaillierError::InvalidParameters(
                "max_unit_attempts must be > 0".to_string(),
            ));
        }

        Ok(Self {
            profile,
            rng,
            limits,
        })
    }

    /// Cipher using the smallest profile for `key.n`, an OS-seeded generator and default limits.
    pub fn for_key(key: &PublicKey) -> Result<Self> {
        Self::try_with(
            key.profile()?,
            RandomSource::from_os_rng(),
            SearchLimits::default(),
        )
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Encrypts `m` with a fresh `r` drawn from `(Z/nZ)*`.
    pub fn encrypt(&mut self, key: &PublicKey, m: u64) -> Result<u64> {
        let r = self
            .rng
            .random_unit_group_element(key.n, self.limits.max_unit_attempts)?;
        self.encrypt_with(key, m, r)
    }

    /// Encrypts `m` with caller supplied randomness.
    ///
    /// Computes `c = (g^m mod n²) * (r^n mod n²) mod n²`.
    ///
    /// # Errors
    /// * `PlaintextOverflow` if `m` does not fit the plaintext width.
    /// * `PlaintextOutOfRange` if `m >= n`.
    /// * `InvalidRandomness` if `r == 0` or `gcd(r, n) != 1`.
    /// * `CiphertextOverflow` if `c` does not fit the ciphertext width.
    ///
    /// # Example
    ///
    /// ```
    /// # use paillier_image::cipher::PaillierCipher;
    /// # use paillier_image::keypair::PublicKey;
    /// let key = PublicKey::try_with(143, 144).unwrap();
    /// let cipher = PaillierCipher::for_key(&key).unwrap();
    /// let c1 = cipher.encrypt_with(&key, 7, 2).unwrap();
    /// let c2 = cipher.encrypt_with(&key, 7, 2).unwrap();
    /// assert_eq!(c1, c2);
    /// ```
    pub fn encrypt_with(&self, key: &PublicKey, m: u64, r: u64) -> Result<u64> {
        let plaintext_width = self.profile.plaintext_width();
        if !plaintext_width.fits(m) {
            return Err(PaillierError::PlaintextOverflow {
                value: m,
                width: plaintext_width,
            });
        }
        if m >= key.n {
            return Err(PaillierError::PlaintextOutOfRange {
                value: m,
                modulus: key.n,
            });
        }
        if r == 0 || gcd(r, key.n) != 1 {
            return Err(PaillierError::InvalidRandomness { r, n: key.n });
        }

        let ring = Ring::try_with(key.n_squared()?)?;
        let c = ring.mul(ring.pow(key.g, m), ring.pow(r, key.n));

        self.check_ciphertext(c)?;
        Ok(c)
    }

    /// Recovers `m = L(c^lambda mod n²) * mu mod n`.
    ///
    /// # Errors
    /// * `CiphertextOverflow` if `c` does not fit the ciphertext width.
    /// * `CiphertextOutOfRange` if `c == 0` or `c >= n²`.
    /// * `PlaintextOverflow` if the result does not fit the plaintext width.
    pub fn decrypt(&self, key: &PrivateKey, c: u64) -> Result<u64> {
        self.check_ciphertext(c)?;

        let n_squared = key.n_squared()?;
        if c == 0 || c >= n_squared {
            return Err(PaillierError::CiphertextOutOfRange {
                value: c,
                modulus_squared: n_squared,
            });
        }

        let u = Ring::try_with(n_squared)?.pow(c, key.lambda);
        let m = Ring::try_with(key.n)?.mul(l_function(u, key.n)?, key.mu);

        let plaintext_width = self.profile.plaintext_width();
        if !plaintext_width.fits(m) {
            return Err(PaillierError::PlaintextOverflow {
                value: m,
                width: plaintext_width,
            });
        }
        Ok(m)
    }

    /// Homomorphic addition: the result decrypts to `(m1 + m2) mod n`.
    pub fn add_encrypted(&self, key: &PublicKey, c1: u64, c2: u64) -> Result<u64> {
        let n_squared = key.n_squared()?;
        for c in [c1, c2] {
            if c == 0 || c >= n_squared {
                return Err(PaillierError::CiphertextOutOfRange {
                    value: c,
                    modulus_squared: n_squared,
                });
            }
        }

        let c = Ring::try_with(n_squared)?.mul(c1, c2);
        self.check_ciphertext(c)?;
        Ok(c)
    }

    fn check_ciphertext(&self, c: u64) -> Result<()> {
        let ciphertext_width = self.profile.ciphertext_width();
        if !ciphertext_width.fits(c) {
            return Err(PaillierError::CiphertextOverflow {
                value: c,
                width: ciphertext_width,
            });
        }
        Ok(())
    }
}
