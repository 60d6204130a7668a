use crate::error::Result;
use crate::poly::PolyRNS;
use crate::ring::Context;
use rand_core::TryRngCore;

/// Uniform polynomials over a context.
pub struct UniformSampler<R: TryRngCore> {
    context: Context,
    source: R,
}

impl<R: TryRngCore> UniformSampler<R> {
    pub fn new(context: &Context, source: R) -> Self {
        Self {
            context: context.clone(),
            source,
        }
    }

    pub fn read(&mut self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.context.fill_uniform(&mut self.source, a)
    }

    pub fn read_new(&mut self) -> Result<PolyRNS<u64>> {
        let mut a: PolyRNS<u64> = self.context.new_poly();
        self.read(&mut a)?;
        Ok(a)
    }
}
