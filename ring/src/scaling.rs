//! Modulus switching from a basis Q down to a small modulus T.

use crate::error::{Error, Result};
use crate::num_bigint::{rem_u64, Div};
use crate::poly::{Poly, PolyRNS};
use crate::ring::Context;
use num_bigint::BigUint;
use std::sync::Arc;

/// Maps x in Z_Q to round(x * T / Q) mod T.
///
/// The rounding is exact: coefficients are reconstructed over Q as big
/// integers in [0, Q) and divided with ties rounded away from zero.
#[derive(Clone, Debug)]
pub struct SimpleScaler {
    t: u64,
    context_q: Context,
    crt: Arc<Vec<BigUint>>,
}

impl SimpleScaler {
    /// Fails if t < 2.
    pub fn new(t: u64, context_q: &Context) -> Result<Self> {
        if t < 2 {
            return Err(Error::InvalidArgument(format!("t={} < 2", t)));
        }
        Ok(Self {
            t,
            context_q: context_q.clone(),
            crt: Arc::new(context_q.crt_coefficients()),
        })
    }

    /// Shares the precomputed constants with self.
    pub fn shallow_copy(&self) -> Self {
        self.clone()
    }

    pub fn t(&self) -> u64 {
        self.t
    }

    pub fn context_q(&self) -> &Context {
        &self.context_q
    }

    /// b <- round(a * T / Q) mod T, coefficient-wise, with b a single
    /// polynomial of the same degree.
    pub fn scale(&self, a: &PolyRNS<u64>, b: &mut Poly<u64>) -> Result<()> {
        self.context_q.check_poly(a)?;
        if b.n() != self.context_q.n() {
            return Err(Error::DegreeMismatch {
                expected: self.context_q.n(),
                got: b.n(),
            });
        }
        debug_assert!(!a.is_ntt() && !a.is_montgomery(), "scale expects plain coefficients");
        let modulus: &BigUint = self.context_q.modulus();
        for (j, out) in b.0.iter_mut().enumerate() {
            let x: BigUint = a
                .iter()
                .zip(self.crt.iter())
                .fold(BigUint::ZERO, |acc, (p, c)| acc + c * p.0[j])
                % modulus;
            *out = rem_u64(&(x * self.t).div_round(modulus), self.t);
        }
        Ok(())
    }

    pub fn scale_new(&self, a: &PolyRNS<u64>) -> Result<Poly<u64>> {
        let mut b: Poly<u64> = Poly::new(self.context_q.n());
        self.scale(a, &mut b)?;
        Ok(b)
    }

    /// Scales a and writes the result, a value in [0, T), into the first limb
    /// of a. The other limbs are zeroed.
    pub fn scale_inplace(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        let b: Poly<u64> = self.scale_new(a)?;
        a.iter_mut().skip(1).for_each(|p| p.zero());
        a.at_mut(0).copy_from(&b);
        Ok(())
    }

    /// Scales a into a polynomial over context_t, whose moduli must all be T.
    pub fn scale_to(&self, a: &PolyRNS<u64>, context_t: &Context, b: &mut PolyRNS<u64>) -> Result<()> {
        context_t.check_poly(b)?;
        if context_t.moduli().iter().any(|&q| q != self.t) {
            return Err(Error::InvalidArgument(format!(
                "context moduli {:?} differ from t={}",
                context_t.moduli(),
                self.t
            )));
        }
        let scaled: Poly<u64> = self.scale_new(a)?;
        b.iter_mut().for_each(|p| p.copy_from(&scaled));
        b.set_representation(crate::poly::Representation::COEFFS);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use num_traits::ToPrimitive;

    const Q: [u64; 2] = [0x1fffffffffe00001, 0x1fffffffffc80001];

    #[test]
    fn matches_bigint_rounding() {
        let t: u64 = 65537;
        let context = Context::new(8, &Q).unwrap();
        let scaler = SimpleScaler::new(t, &context).unwrap();
        let q: BigUint = context.modulus().clone();

        // Values around Q/T boundaries, including exact half points.
        let step: BigUint = &q / t;
        let coeffs: Vec<BigUint> = vec![
            BigUint::ZERO,
            BigUint::from(1u64),
            &q - 1u64,
            step.clone(),
            &step * 3u64 + (&step >> 1),
            &q >> 1,
            (&q >> 1) + 1u64,
            &q - &step,
        ];
        let signed: Vec<BigInt> = coeffs.iter().map(|c| BigInt::from(c.clone())).collect();
        let mut a = context.new_poly();
        context.set_coefficients_bigint(&signed, &mut a).unwrap();

        let b = scaler.scale_new(&a).unwrap();
        for (c, got) in coeffs.iter().zip(b.0.iter()) {
            let want: u64 = ((c * t).div_round(&q) % t).to_u64().unwrap();
            assert_eq!(*got, want);
        }
    }

    #[test]
    fn rejects_degenerate_t() {
        let context = Context::new(8, &Q).unwrap();
        assert!(SimpleScaler::new(1, &context).is_err());
    }
}
