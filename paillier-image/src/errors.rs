use crate::cipher::SampleWidth;

#[derive(thiserror::Error, Debug)]
pub enum PaillierError {
    /// A plaintext value does not fit the plaintext width of the active profile.
    #[error("PlaintextOverflow: {value} does not fit in {width}")]
    PlaintextOverflow { value: u64, width: SampleWidth },
    /// A ciphertext value does not fit the ciphertext width of the active profile.
    #[error("CiphertextOverflow: {value} does not fit in {width}")]
    CiphertextOverflow { value: u64, width: SampleWidth },
    #[error("PlaintextOutOfRange: {value} must be lower than n = {modulus}")]
    PlaintextOutOfRange { value: u64, modulus: u64 },
    #[error("CiphertextOutOfRange: {value} must be in [1, n²) with n² = {modulus_squared}")]
    CiphertextOutOfRange { value: u64, modulus_squared: u64 },

    /// Error when trying to find a modular inverse that doesn't exist (gcd(a, n) != 1).
    #[error("NoInverse: {0}")]
    NoInverse(String),
    #[error("No mu exists for g = {g} and n = {n}, the key pair must not be used")]
    MuNotFound { g: u64, n: u64 },

    #[error("{0} is not a prime number")]
    NotPrime(u64),
    #[error("gcd(p * q, (p - 1) * (q - 1)) must be 1, but the calculated gcd was {0}")]
    GcdConstraintNotMet(u64),
    /// Error when a modulus is out of the supported range.
    #[error("InvalidModulus: {0}")]
    InvalidModulus(String),
    #[error("InvalidParameters: {0}")]
    InvalidParameters(String),
    #[error("r = {r} is not an element of (Z/{n}Z)*")]
    InvalidRandomness { r: u64, n: u64 },
    #[error("Internal error: Overflow during calculation of {0}")]
    CalculationOverflow(String),

    #[error("Search for {search} gave up after {attempts} attempts")]
    SearchExhausted { search: &'static str, attempts: u64 },

    #[error("Bit buffer needs {required_bits} bits, limit is {limit_bits}")]
    CapacityExceeded { required_bits: u64, limit_bits: u64 },

    #[error("DimensionMismatch: {0}")]
    DimensionMismatch(String),
    #[error("Sample {index} = {value} has non-zero bits among its {known_zero_bits} low bits")]
    NonZeroLowBits {
        index: usize,
        value: u64,
        known_zero_bits: u32,
    },
    #[error("InvalidKeyData: {0}")]
    InvalidKeyData(String),
    #[error("MalformedRaster: {0}")]
    MalformedRaster(String),

    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("Data serialization: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PaillierError>;
