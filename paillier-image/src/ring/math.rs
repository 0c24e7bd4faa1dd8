//! Implementation of ring ops using modular arithmetic.

use crate::errors::{PaillierError, Result};

use super::helper::extended_gcd;

use serde::{Deserialize, Serialize};

/// Width of the exponent scanned by [`fast_mod_exp`].
const EXPONENT_BITS: u32 = u64::BITS;

/// Computes `(a * b) mod modulus` through a 128-bit intermediate.
#[inline]
pub fn mul_mod(a: u64, b: u64, modulus: u64) -> u64 {
    ((a as u128 * b as u128) % modulus as u128) as u64
}

/// Computes `base^exponent mod modulus` by square-and-multiply.
///
/// The exponent is scanned over its full 64-bit width, most significant bit first.
///
/// # Panics
///
/// Panics if `modulus == 0`. [`Ring`] guarantees a modulus greater than 1.
///
/// # Example
///
/// ```
/// # use paillier_image::ring::fast_mod_exp;
/// assert_eq!(fast_mod_exp(4, 13, 497), 445);
/// assert_eq!(fast_mod_exp(7, 0, 13), 1);
/// ```
pub fn fast_mod_exp(base: u64, exponent: u64, modulus: u64) -> u64 {
    let base = base % modulus;
    let mut c = 1 % modulus;

    for i in (0..EXPONENT_BITS).rev() {
        c = mul_mod(c, c, modulus);
        if (exponent >> i) & 1 == 1 {
            c = mul_mod(c, base, modulus);
        }
    }

    c
}

/// Represents a finite ring Z_n using modular arithmetic.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub modulus: u64,
}

impl Ring {
    /// Create a new Ring with the given modulus.
    ///
    /// The modulus must be greater than 1.
    pub fn try_with(modulus: u64) -> Result<Self> {
        if modulus <= 1 {
            return Err(PaillierError::InvalidModulus(format!(
                "Modulus must be greater than 1, got {}",
                modulus
            )));
        }

        Ok(Ring { modulus })
    }

    /// Normalizes a value to be within the range `[0, modulus - 1]`.
    pub fn normalize(&self, value: u64) -> u64 {
        value % self.modulus
    }

    /// Computes `(a * b) mod modulus`.
    ///
    /// Uses `u128` internally to prevent overflow during multiplication before the modulo operation.
    ///
    /// # Example
    ///
    /// ```
    /// # use paillier_image::ring::Ring;
    /// let ring = Ring::try_with(10).unwrap();
    /// assert_eq!(ring.mul(7, 5), 5);
    /// assert_eq!(ring.mul(4, 5), 0);
    /// ```
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        mul_mod(a, b, self.modulus)
    }

    /// Computes `base^exponent mod modulus`.
    ///
    /// # Example
    ///
    /// ```
    /// # use paillier_image::ring::Ring;
    /// let ring = Ring::try_with(3233 * 3233).unwrap();
    /// assert_eq!(ring.pow(3234, 780) % 3233, 1);
    /// ```
    pub fn pow(&self, base: u64, exponent: u64) -> u64 {
        fast_mod_exp(base, exponent, self.modulus)
    }

    /// Computes the modular multiplicative inverse `a^-1 mod modulus`.
    ///
    /// The inverse exists if and only if `gcd(a, modulus) == 1`.
    /// Uses the Extended Euclidean Algorithm.
    ///
    /// # Errors
    ///
    /// Returns `PaillierError::NoInverse` if the inverse does not exist (i.e., `gcd(a, modulus) != 1`).
    /// Returns `PaillierError::NoInverse` if `a` is 0.
    ///
    /// # Example
    ///
    /// ```
    /// # use paillier_image::ring::Ring;
    /// let ring = Ring::try_with(10).unwrap();
    /// assert_eq!(ring.inv(3).unwrap(), 7); // 3 * 7 = 21 = 1 mod 10
    /// assert!(ring.inv(2).is_err()); // gcd(2, 10) = 2
    /// assert!(ring.inv(0).is_err());
    /// ```
    pub fn inv(&self, a: u64) -> Result<u64> {
        let a_norm = self.normalize(a);
        if a_norm == 0 {
            return Err(PaillierError::NoInverse(format!(
                "Cannot invert 0 in mod {}",
                self.modulus
            )));
        }

        let (g, x, _) = extended_gcd(a_norm as i128, self.modulus as i128);
        if g != 1 {
            return Err(PaillierError::NoInverse(format!(
                "Modular inverse does not exist for {} mod {} (gcd={})",
                a_norm, self.modulus, g
            )));
        }

        Ok(x.rem_euclid(self.modulus as i128) as u64)
    }
}
