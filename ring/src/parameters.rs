//! Serializable description of a set of ring contexts.

use crate::error::{Error, Result};
use crate::modulus::generation::NTTFriendlyPrimesGenerator;
use crate::modulus::prime::Prime;
use crate::ring::{Context, MAX_LOG_N};
use crate::sampler::{default_bound, DEFAULT_SIGMA};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Degree, moduli and noise parameters shared by the contexts of a scheme.
///
/// `q` holds the ciphertext limbs, `p` the auxiliary limbs used by basis
/// extension and `t` the plaintext modulus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RingParameters {
    pub log_n: usize,
    pub q: Vec<u64>,
    #[serde(default)]
    pub p: Vec<u64>,
    pub t: u64,
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// Gaussian truncation, 6 sigma when absent.
    #[serde(default)]
    pub bound: Option<usize>,
}

fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

fn check_log_n(log_n: usize) -> Result<()> {
    if log_n > MAX_LOG_N {
        return Err(Error::InvalidArgument(format!(
            "log_n={} > {}",
            log_n, MAX_LOG_N
        )));
    }
    Ok(())
}

impl RingParameters {
    /// Draws q_count primes of q_bits bits and p_count primes of p_bits bits,
    /// all distinct and 1 mod 2^(log_n+1).
    pub fn generate(
        log_n: usize,
        q_count: usize,
        q_bits: u32,
        p_count: usize,
        p_bits: u32,
        t: u64,
    ) -> Result<Self> {
        check_log_n(log_n)?;
        let nth_root: u64 = 2u64 << log_n;
        let mut generator_q: NTTFriendlyPrimesGenerator = NTTFriendlyPrimesGenerator::new(q_bits, nth_root)?;
        let q: Vec<u64> = generator_q.next_downstream_primes(q_count)?;
        let p: Vec<u64> = if p_count == 0 {
            Vec::new()
        } else if p_bits == q_bits {
            generator_q.next_downstream_primes(p_count)?
        } else {
            NTTFriendlyPrimesGenerator::new(p_bits, nth_root)?.next_downstream_primes(p_count)?
        };
        debug!(log_n, q_count, q_bits, p_count, p_bits, "generated ring parameters");
        let params: RingParameters = Self {
            log_n,
            q,
            p,
            t,
            sigma: DEFAULT_SIGMA,
            bound: None,
        };
        params.validate()?;
        Ok(params)
    }

    /// 2^log_n, or 0 when log_n does not fit a usize shift.
    pub fn n(&self) -> usize {
        u32::try_from(self.log_n)
            .ok()
            .and_then(|log_n| 1usize.checked_shl(log_n))
            .unwrap_or(0)
    }

    pub fn bound(&self) -> usize {
        self.bound.unwrap_or_else(|| default_bound(self.sigma))
    }

    /// Checks the degree, every modulus of q and p, their distinctness and
    /// the noise parameters.
    pub fn validate(&self) -> Result<()> {
        check_log_n(self.log_n)?;
        if self.q.is_empty() {
            return Err(Error::EmptyModuli);
        }
        let nth_root: u64 = 2u64 << self.log_n;
        for (i, &q) in self.q.iter().chain(self.p.iter()).enumerate() {
            Prime::new(q)?;
            if q % nth_root != 1 {
                return Err(Error::NotNttFriendly { q, nth_root });
            }
            if self.q.iter().chain(self.p.iter()).skip(i + 1).any(|&other| other == q) {
                return Err(Error::InvalidArgument(format!("modulus {} appears twice", q)));
            }
        }
        if self.t < 2 {
            return Err(Error::InvalidArgument(format!("t={} < 2", self.t)));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) || self.bound() == 0 {
            return Err(Error::InvalidSamplerParameter(format!(
                "sigma={} bound={}",
                self.sigma,
                self.bound()
            )));
        }
        Ok(())
    }

    pub fn context_q(&self) -> Result<Context> {
        Context::new(self.n(), &self.q)
    }

    pub fn context_p(&self) -> Result<Context> {
        Context::new(self.n(), &self.p)
    }

    /// Context over the limbs of q followed by the limbs of p.
    pub fn context_qp(&self) -> Result<Context> {
        let moduli: Vec<u64> = self.q.iter().chain(self.p.iter()).copied().collect();
        Context::new(self.n(), &moduli)
    }

    /// Single limb context over t. Requires t to be an NTT friendly prime.
    pub fn context_t(&self) -> Result<Context> {
        Context::new(self.n(), &[self.t])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_parameters_build_contexts() {
        let params = RingParameters::generate(10, 3, 55, 2, 60, 65537).unwrap();
        assert_eq!(params.q.len(), 3);
        assert_eq!(params.p.len(), 2);
        assert_eq!(params.bound(), 19);
        let qp = params.context_qp().unwrap();
        assert_eq!(qp.limbs(), 5);
        assert_eq!(qp.n(), 1024);
        assert_eq!(params.context_t().unwrap().moduli(), vec![65537]);
    }

    #[test]
    fn oversized_log_n_is_rejected() {
        assert!(matches!(
            RingParameters::generate(64, 1, 50, 0, 50, 97),
            Err(Error::InvalidArgument(_))
        ));
        let mut params = RingParameters::generate(4, 1, 50, 0, 50, 97).unwrap();
        params.log_n = MAX_LOG_N + 1;
        assert!(matches!(params.validate(), Err(Error::InvalidArgument(_))));
        params.log_n = 200;
        assert!(matches!(params.context_q(), Err(Error::InvalidRingDegree { n: 0 })));
    }

    #[test]
    fn validate_rejects_duplicates() {
        let mut params = RingParameters::generate(4, 2, 50, 1, 50, 97).unwrap();
        params.p = vec![params.q[0]];
        assert!(matches!(params.validate(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn json_defaults() {
        let json: &str = r#"{"log_n": 4, "q": [4294957057], "t": 97}"#;
        let params: RingParameters = serde_json::from_str(json).unwrap();
        assert!(params.p.is_empty());
        assert_eq!(params.sigma, DEFAULT_SIGMA);
        assert_eq!(params.bound(), 19);
    }
}
