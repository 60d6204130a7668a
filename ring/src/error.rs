//! Error type shared by every fallible operation of the ring engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Ring degree is zero or not a power of two.
    #[error("invalid ring degree: n={n} is not a power of two")]
    InvalidRingDegree { n: usize },

    /// No limb was given.
    #[error("invalid moduli: list is empty")]
    EmptyModuli,

    #[error("invalid modulus: q={q} is not prime")]
    NotPrime { q: u64 },

    /// q != 1 mod 2N, so no primitive 2N-th root of unity exists.
    #[error("invalid modulus: q={q} != 1 mod 2n={nth_root}")]
    NotNttFriendly { q: u64, nth_root: u64 },

    /// Lazy reductions keep values below 4q, which must fit in 63 bits.
    #[error("invalid modulus: q={q} has {bits} bits > 61")]
    ModulusTooLarge { q: u64, bits: u32 },

    #[error("invalid modulus: gcd(q={q}, 2^64) != 1")]
    EvenModulus { q: u64 },

    #[error("prime search exhausted: found {found}/{requested} primes of {bit_size} bits = 1 mod {nth_root}")]
    PrimesExhausted {
        found: usize,
        requested: usize,
        bit_size: u32,
        nth_root: u64,
    },

    #[error("degree mismatch: expected n={expected}, got n={got}")]
    DegreeMismatch { expected: usize, got: usize },

    #[error("level mismatch: expected {expected} limbs, got {got}")]
    LevelMismatch { expected: usize, got: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Stream ended before the object was complete.
    #[error("truncated input: consumed {consumed} of {expected} bytes")]
    Truncated { consumed: usize, expected: usize },

    /// A stream header (limb count, degree) does not match the receiver.
    #[error("unexpected header: {field}={got}, expected {expected}")]
    UnexpectedHeader {
        field: &'static str,
        expected: u64,
        got: u64,
    },

    #[error("invalid sampler parameter: {0}")]
    InvalidSamplerParameter(String),

    #[error("invalid big integer string: {0:?}")]
    InvalidBigInt(String),

    /// The entropy source failed; samplers never substitute a default output.
    #[error("entropy source failure: {0}")]
    Entropy(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn entropy<E: std::fmt::Display>(err: E) -> Self {
        Error::Entropy(err.to_string())
    }
}
