use crate::error::{Error, Result};
use crate::poly::PolyRNS;
use crate::ring::Context;
use rand_core::TryRngCore;

const PRECISION: u32 = 53;

/// Ternary polynomials: each coefficient is 0 with probability 1-p and
/// -1 or 1 with probability p/2 each.
pub struct TernarySampler<R: TryRngCore> {
    context: Context,
    p: f64,
    threshold: u64,
    source: R,
    buf: Vec<i64>,
}

impl<R: TryRngCore> TernarySampler<R> {
    /// Fails unless p lies in [0, 1].
    pub fn new(context: &Context, p: f64, source: R) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::InvalidSamplerParameter(format!(
                "p={} is not a probability",
                p
            )));
        }
        Ok(Self {
            context: context.clone(),
            p,
            threshold: (p * (1u64 << PRECISION) as f64) as u64,
            source,
            buf: vec![0; context.n()],
        })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    /// Overwrites a with a fresh sample.
    pub fn sample(&mut self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.context.check_poly(a)?;
        for x in self.buf.iter_mut() {
            let r: u64 = self.source.try_next_u64().map_err(Error::entropy)?;
            // The top bits decide zero/non-zero, the lowest bit the sign.
            *x = if (r >> (u64::BITS - PRECISION)) < self.threshold {
                1 - 2 * (r & 1) as i64
            } else {
                0
            };
        }
        self.context.set_small_coefficients(&self.buf, a)
    }

    pub fn sample_new(&mut self) -> Result<PolyRNS<u64>> {
        let mut a: PolyRNS<u64> = self.context.new_poly();
        self.sample(&mut a)?;
        Ok(a)
    }
}
