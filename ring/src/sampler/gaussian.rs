use crate::error::{Error, Result};
use crate::poly::PolyRNS;
use crate::ring::Context;
use rand_core::TryRngCore;
use sampling::knuth_yao::KnuthYao;

/// Knuth-Yao sampler of the discrete Gaussian truncated to [-bound, bound].
///
/// Each coefficient is drawn once as a signed integer and written into
/// every limb, so the limbs hold the residues of the same small polynomial.
pub struct KYSampler<R: TryRngCore> {
    context: Context,
    ky: KnuthYao,
    source: R,
    buf: Vec<i64>,
}

impl<R: TryRngCore> KYSampler<R> {
    pub fn new(context: &Context, sigma: f64, bound: usize, source: R) -> Result<Self> {
        let ky: KnuthYao = KnuthYao::new(sigma, bound).ok_or_else(|| {
            Error::InvalidSamplerParameter(format!("sigma={} bound={}", sigma, bound))
        })?;
        Ok(Self {
            context: context.clone(),
            ky,
            source,
            buf: vec![0; context.n()],
        })
    }

    /// Truncates at [super::default_bound] of sigma.
    pub fn new_default(context: &Context, sigma: f64, source: R) -> Result<Self> {
        Self::new(context, sigma, super::default_bound(sigma), source)
    }

    pub fn sigma(&self) -> f64 {
        self.ky.sigma()
    }

    pub fn bound(&self) -> usize {
        self.ky.bound()
    }

    /// Overwrites a with a fresh sample.
    pub fn sample(&mut self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.context.check_poly(a)?;
        for x in self.buf.iter_mut() {
            *x = self.ky.sample(&mut self.source).map_err(Error::entropy)?;
        }
        self.context.set_small_coefficients(&self.buf, a)
    }

    pub fn sample_new(&mut self) -> Result<PolyRNS<u64>> {
        let mut a: PolyRNS<u64> = self.context.new_poly();
        self.sample(&mut a)?;
        Ok(a)
    }

    /// Adds a fresh sample to a.
    pub fn sample_and_add(&mut self, a: &mut PolyRNS<u64>) -> Result<()> {
        let e: PolyRNS<u64> = self.sample_new()?;
        self.context.check_poly(a)?;
        self.context.add_inplace(&e, a)
    }
}
