//! Exact lift of a polynomial from a basis Q to Q ∪ P.

use crate::error::{Error, Result};
use crate::num_bigint::rem_u64;
use crate::poly::{Poly, PolyRNS, Representation};
use crate::ring::Context;
use num_bigint::BigUint;
use std::sync::Arc;
use tracing::debug;

/// Extends polynomials over Q with the limbs of P.
///
/// Every coefficient is reconstructed over Q with exact arithmetic, taking
/// the representative in [0, Q), then reduced modulo each limb of P. The
/// extender is read-only after construction and holds no scratch state, so
/// one instance can serve concurrent callers working on distinct polynomials.
#[derive(Clone, Debug)]
pub struct BasisExtender {
    context_q: Context,
    context_p: Context,
    /// (Q/q_i) * ((Q/q_i)^-1 mod q_i).
    crt: Arc<Vec<BigUint>>,
}

impl BasisExtender {
    pub fn new(context_q: &Context, context_p: &Context) -> Result<Self> {
        if context_q.n() != context_p.n() {
            return Err(Error::DegreeMismatch {
                expected: context_q.n(),
                got: context_p.n(),
            });
        }
        let moduli_q: Vec<u64> = context_q.moduli();
        if let Some(p) = context_p.moduli().iter().find(|p| moduli_q.contains(p)) {
            return Err(Error::InvalidArgument(format!(
                "modulus {} belongs to both bases",
                p
            )));
        }
        debug!(
            n = context_q.n(),
            limbs_q = context_q.limbs(),
            limbs_p = context_p.limbs(),
            "basis extender"
        );
        Ok(Self {
            context_q: context_q.clone(),
            context_p: context_p.clone(),
            crt: Arc::new(context_q.crt_coefficients()),
        })
    }

    /// Shares the precomputed constants with self.
    pub fn shallow_copy(&self) -> Self {
        self.clone()
    }

    pub fn context_q(&self) -> &Context {
        &self.context_q
    }

    pub fn context_p(&self) -> &Context {
        &self.context_p
    }

    /// Writes the P limbs of a into `out`, one polynomial per limb of P.
    fn extend(&self, a: &PolyRNS<u64>, out: &mut [Poly<u64>]) {
        let modulus: &BigUint = self.context_q.modulus();
        let moduli_p: Vec<u64> = self.context_p.moduli();
        for j in 0..self.context_q.n() {
            let x: BigUint = a
                .iter()
                .zip(self.crt.iter())
                .fold(BigUint::ZERO, |acc, (p, c)| acc + c * p.0[j])
                % modulus;
            out.iter_mut()
                .zip(moduli_p.iter())
                .for_each(|(p, &q)| p.0[j] = rem_u64(&x, q));
        }
    }

    /// b <- a over Q ∪ P, with a a coefficient domain polynomial over Q and
    /// b holding the limbs of Q followed by the limbs of P.
    pub fn extend_basis(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.context_q.check_poly(a)?;
        self.check_extended(b)?;
        debug_assert!(!a.is_ntt() && !a.is_montgomery(), "extend_basis expects plain coefficients");
        let limbs_q: usize = self.context_q.limbs();
        let (low, high) = b.split_at_mut(limbs_q);
        low.iter_mut()
            .zip(a.iter())
            .for_each(|(b, a)| b.copy_from(a));
        self.extend(a, high);
        b.set_representation(Representation::COEFFS);
        Ok(())
    }

    /// Appends the limbs of P to a.
    pub fn extend_basis_inplace(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.context_q.check_poly(a)?;
        debug_assert!(!a.is_ntt() && !a.is_montgomery(), "extend_basis expects plain coefficients");
        let n: usize = self.context_q.n();
        let mut high: Vec<Poly<u64>> = (0..self.context_p.limbs()).map(|_| Poly::new(n)).collect();
        self.extend(a, &mut high);
        a.limbs.extend(high);
        a.set_representation(Representation::COEFFS);
        Ok(())
    }

    fn check_extended(&self, b: &PolyRNS<u64>) -> Result<()> {
        let limbs: usize = self.context_q.limbs() + self.context_p.limbs();
        if b.limbs() != limbs {
            return Err(Error::LevelMismatch {
                expected: limbs,
                got: b.limbs(),
            });
        }
        if let Some(p) = b.iter().find(|p| p.n() != self.context_q.n()) {
            return Err(Error::DegreeMismatch {
                expected: self.context_q.n(),
                got: p.n(),
            });
        }
        Ok(())
    }
}
