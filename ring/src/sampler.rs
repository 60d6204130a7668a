//! Samplers bound to a [crate::ring::Context].
//!
//! Every sampler owns the entropy source it was built with; nothing here
//! touches process-wide randomness. Sources implement
//! [rand_core::TryRngCore], so a failing source (the OS RNG) surfaces as
//! [crate::Error::Entropy] instead of a constant output.

pub mod crp;
pub mod gaussian;
pub mod normal;
pub mod ternary;
pub mod uniform;

pub use crp::CRPGenerator;
pub use gaussian::KYSampler;
pub use normal::NormalSampler;
pub use ternary::TernarySampler;
pub use uniform::UniformSampler;

/// Standard deviation of the RLWE error distribution.
pub const DEFAULT_SIGMA: f64 = 3.19;

/// default_bound(DEFAULT_SIGMA).
pub const DEFAULT_BOUND: usize = 19;

/// Truncation bound of a Gaussian of standard deviation sigma.
pub fn default_bound(sigma: f64) -> usize {
    (6.0 * sigma) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bound_is_six_sigma() {
        assert_eq!(default_bound(DEFAULT_SIGMA), DEFAULT_BOUND);
    }
}
