use crate::errors::{PaillierError, Result};

/// Computes the greatest common divisor of two numbers.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let temp = b;
        b = a % b;
        a = temp;
    }
    a
}

/// Computes `a * b / gcd(a, b)`.
///
/// # Errors
///
/// Returns `PaillierError::CalculationOverflow` if the result does not fit in 64 bits.
pub fn lcm(a: u64, b: u64) -> Result<u64> {
    if a == 0 || b == 0 {
        return Ok(0);
    }

    (a / gcd(a, b))
        .checked_mul(b)
        .ok_or_else(|| PaillierError::CalculationOverflow(format!("lcm({}, {})", a, b)))
}

/// Finds (g, x, y) such that ax + by = g = gcd(a, b).
pub fn extended_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    if a == 0 {
        if b.is_negative() {
            return (-b, 0, -1);
        }

        return (b, 0, 1);
    }

    let (g, x1, y1) = extended_gcd(b % a, a);
    let x = y1 - (b / a) * x1;
    let y = x1;
    (g, x, y)
}

/// Modular inverse of `a` mod `n`.
///
/// Returns the unique `x` in `[1, n)` with `a * x ≡ 1 (mod n)`, or `0` when no
/// inverse exists (including `n <= 1`). Callers must treat `0` as a failure.
///
/// # Example
///
/// ```
/// # use paillier_image::ring::mod_inverse;
/// assert_eq!(mod_inverse(3, 10), 7);
/// assert_eq!(mod_inverse(2, 10), 0);
/// ```
pub fn mod_inverse(a: u64, n: u64) -> u64 {
    if n <= 1 {
        return 0;
    }

    let a = a % n;
    let (g, x, _) = extended_gcd(a as i128, n as i128);
    if g != 1 {
        return 0;
    }

    x.rem_euclid(n as i128) as u64
}

/// Computes `base^exp` without a modulus.
///
/// # Errors
///
/// Returns `PaillierError::CalculationOverflow` if the power does not fit in 64 bits.
pub fn int_pow(base: u64, exp: u64) -> Result<u64> {
    let mut acc: u64 = 1;
    for _ in 0..exp {
        acc = acc
            .checked_mul(base)
            .ok_or_else(|| PaillierError::CalculationOverflow(format!("{}^{}", base, exp)))?;
        if acc == 0 || acc == 1 {
            // 0^k and 1^k are fixed points
            break;
        }
    }
    Ok(acc)
}

/// L(x) = (x - 1) / n
///
/// # Errors
///
/// Returns `PaillierError::InvalidParameters` if `x == 0` or `n == 0`.
pub fn l_function(x: u64, n: u64) -> Result<u64> {
    if n == 0 {
        return Err(PaillierError::InvalidParameters(
            "L(x) is undefined for n = 0".to_string(),
        ));
    }

    let Some(shifted) = x.checked_sub(1) else {
        return Err(PaillierError::InvalidParameters(
            "L(x) is undefined for x = 0".to_string(),
        ));
    };

    Ok(shifted / n)
}

/// Trial-division primality test.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut i: u64 = 3;
    while i.saturating_mul(i) <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    use quickcheck_macros::quickcheck;

    #[test]
    fn test_simple_gcd() {
        assert_eq!(gcd(1, 6), 1);
        assert_eq!(gcd(5, 6), 1);
        assert_eq!(gcd(2, 6), 2);
        assert_eq!(gcd(3, 6), 3);
        assert_eq!(gcd(4, 6), 2);
        assert_eq!(gcd(6, 6), 6);
        assert_eq!(gcd(10, 0), 10);
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(54, 24), 6);
    }

    #[test]
    fn test_lcm() -> Result<()> {
        assert_eq!(lcm(60, 52)?, 780);
        assert_eq!(lcm(10, 12)?, 60);
        assert_eq!(lcm(7, 0)?, 0);
        assert!(lcm(u64::MAX, u64::MAX - 1).is_err());
        Ok(())
    }

    #[test]
    fn test_extended_gcd_basic() {
        let (g, x, y) = extended_gcd(12, 8);
        assert_eq!(g, 4);
        assert_eq!(12 * x + 8 * y, g);

        let (g, x, y) = extended_gcd(240, 46);
        assert_eq!(g, 2);
        assert_eq!(240 * x + 46 * y, g);
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(17, 3120), 2753);
        assert_eq!(mod_inverse(9, 10), 9);
        assert_eq!(mod_inverse(13, 10), 7);
        assert_eq!(mod_inverse(0, 10), 0);
        assert_eq!(mod_inverse(4, 10), 0);
        assert_eq!(mod_inverse(5, 1), 0);
        assert_eq!(mod_inverse(5, 0), 0);
    }

    #[test]
    fn test_int_pow() -> Result<()> {
        assert_eq!(int_pow(2, 10)?, 1024);
        assert_eq!(int_pow(7, 0)?, 1);
        assert_eq!(int_pow(0, 5)?, 0);
        assert_eq!(int_pow(1, u64::MAX)?, 1);
        assert!(int_pow(2, 64).is_err());
        Ok(())
    }

    #[test]
    fn test_l_function() -> Result<()> {
        assert_eq!(l_function(1, 77)?, 0);
        assert_eq!(l_function(155, 77)?, 2);
        assert!(l_function(0, 77).is_err());
        assert!(l_function(5, 0).is_err());
        Ok(())
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<u64> = (0..60).filter(|&n| is_prime(n)).collect();
        assert_eq!(
            primes,
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59]
        );
        assert!(is_prime(65_537));
        assert!(!is_prime(3233));
    }

    #[quickcheck]
    fn prop_inverse_is_inverse(a: u32, n: u32) -> bool {
        let (a, n) = (a as u64, n as u64);
        let x = mod_inverse(a, n);
        if x == 0 {
            n <= 1 || gcd(a % n, n) != 1
        } else {
            x < n && (a % n) * x % n == 1
        }
    }

    #[quickcheck]
    fn prop_gcd_divides_both(a: u64, b: u64) -> bool {
        let g = gcd(a, b);
        if g == 0 {
            return a == 0 && b == 0;
        }
        a % g == 0 && b % g == 0
    }
}
