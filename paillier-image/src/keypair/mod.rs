//! Key material: generation of `(n, g)` and `(lambda, mu, n)` from two primes, and key records.

pub mod generator;
pub mod keys;
pub mod storage;

pub use generator::{generate_generator, generate_mu, generate_private_key, try_generate_mu};
pub use keys::{KeyPair, PrimeFactors, PrivateKey, PublicKey};
pub use storage::{Key, load_key, load_key_file};
