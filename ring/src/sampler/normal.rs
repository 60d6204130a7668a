use crate::error::{Error, Result};
use crate::poly::PolyRNS;
use crate::ring::Context;
use rand_core::RngCore;
use rand_distr::{Distribution, Normal};
use sampling::source::Source;

/// Rounded continuous Gaussian, rejected outside [-bound, bound].
///
/// Faster to set up than [super::KYSampler] for large sigma, at the cost of
/// a distribution that is only close to the discrete Gaussian.
pub struct NormalSampler<R: RngCore = Source> {
    context: Context,
    dist: Normal<f64>,
    bound: f64,
    source: R,
    buf: Vec<i64>,
}

impl<R: RngCore> NormalSampler<R> {
    /// Fails unless sigma > 0 and bound >= 0.5.
    pub fn new(context: &Context, sigma: f64, bound: f64, source: R) -> Result<Self> {
        if !(sigma.is_finite() && sigma > 0.0 && bound.is_finite() && bound >= 0.5) {
            return Err(Error::InvalidSamplerParameter(format!(
                "sigma={} bound={}",
                sigma, bound
            )));
        }
        let dist: Normal<f64> = Normal::new(0.0, sigma)
            .map_err(|err| Error::InvalidSamplerParameter(err.to_string()))?;
        Ok(Self {
            context: context.clone(),
            dist,
            bound,
            source,
            buf: vec![0; context.n()],
        })
    }

    pub fn sigma(&self) -> f64 {
        self.dist.std_dev()
    }

    pub fn bound(&self) -> f64 {
        self.bound
    }

    pub fn sample(&mut self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.context.check_poly(a)?;
        for x in self.buf.iter_mut() {
            let mut dist_f64: f64 = self.dist.sample(&mut self.source);
            while dist_f64.abs() > self.bound {
                dist_f64 = self.dist.sample(&mut self.source)
            }
            *x = dist_f64.round() as i64;
        }
        self.context.set_small_coefficients(&self.buf, a)
    }

    pub fn sample_new(&mut self) -> Result<PolyRNS<u64>> {
        let mut a: PolyRNS<u64> = self.context.new_poly();
        self.sample(&mut a)?;
        Ok(a)
    }
}
