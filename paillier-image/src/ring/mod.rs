//! # Ring Module
//!
//! Modular arithmetic over `u64` values: exponentiation, gcd/lcm, inverses and the
//! [`Ring`] struct for Z_n that the cipher and key set-up compute in, plus the
//! [`RandomSource`] used to sample unit group elements.

pub mod helper;
pub mod math;
pub mod random;

pub use helper::{extended_gcd, gcd, int_pow, is_prime, l_function, lcm, mod_inverse};
pub use math::{Ring, fast_mod_exp, mul_mod};
pub use random::RandomSource;
