use crate::error::{Error, Result};
use crate::modulus::barrett::Barrett;
use crate::modulus::{BARRETT, ONCE};
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Context, Ring};

impl Context {
    /// Validates a polynomial that is about to lose `k` limbs: it must keep
    /// at least one and may not have more than this context.
    fn check_rescale(&self, a: &PolyRNS<u64>, k: usize) -> Result<()> {
        if a.limbs() > self.limbs() || a.limbs() <= k {
            return Err(Error::LevelMismatch {
                expected: self.limbs(),
                got: a.limbs(),
            });
        }
        if let Some(p) = a.iter().find(|p| p.n() != self.n) {
            return Err(Error::DegreeMismatch {
                expected: self.n,
                got: p.n(),
            });
        }
        Ok(())
    }

    /// -q_l^-1 mod q_i for i < l, with l the last limb of a polynomial
    /// holding l+1 limbs.
    fn rescaling_constants(&self, level: usize) -> Vec<Barrett<u64>> {
        let q_last: u64 = self.rings[level].modulus.q;
        self.rings[..level]
            .iter()
            .map(|ring| {
                let q_last_inv: u64 = ring.modulus.inv(q_last % ring.modulus.q);
                ring.modulus
                    .barrett
                    .prepare((ring.modulus.q - q_last_inv) % ring.modulus.q)
            })
            .collect()
    }

    /// Drops the last limb q_l of a, mapping every coefficient x to
    /// floor(x / q_l) (ROUND = false) or round(x / q_l) (ROUND = true).
    fn div_by_last_modulus<const ROUND: bool, const NTT: bool>(&self, a: &mut PolyRNS<u64>) {
        let level: usize = a.level();
        let last_ring: &Ring<u64> = &self.rings[level];
        let constants: Vec<Barrett<u64>> = self.rescaling_constants(level);

        let mut last: Poly<u64> = match a.pop_limb() {
            Some(p) => p,
            None => return,
        };
        if NTT {
            last_ring.intt_inplace::<false>(&mut last);
        }

        // round(x / q_l) = floor((x + q_l/2) / q_l).
        let half: u64 = last_ring.modulus.q >> 1;
        if ROUND {
            last_ring.add_scalar_inplace::<ONCE>(&half, &mut last);
        }

        let mut buf: Poly<u64> = Poly::new(self.n);
        self.rings[..level]
            .iter()
            .zip(a.iter_mut())
            .zip(constants.iter())
            .for_each(|((ring, ai), c)| {
                buf.0.copy_from_slice(&last.0);
                ring.reduce_inplace::<BARRETT>(&mut buf);
                if ROUND {
                    let q: u64 = ring.modulus.q;
                    ring.add_scalar_inplace::<ONCE>(&(q - half % q), &mut buf);
                }
                if NTT {
                    ring.ntt_inplace::<false>(&mut buf);
                }
                // ai <- (buf - ai) * -q_l^-1 = (ai - buf) / q_l.
                ring.a_sub_b_mul_c_scalar_barrett_inplace::<1, ONCE>(&buf, c, ai);
            });
    }

    /// a <- floor(a / q_l), dropping the last limb of a (coefficient domain).
    pub fn div_floor_by_last_modulus(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_rescale(a, 1)?;
        debug_assert!(!a.is_ntt(), "expects the coefficient domain");
        debug_assert!(!a.is_montgomery(), "expects plain coefficients");
        self.div_by_last_modulus::<false, false>(a);
        Ok(())
    }

    /// a <- round(a / q_l), dropping the last limb of a (coefficient domain).
    pub fn div_round_by_last_modulus(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_rescale(a, 1)?;
        debug_assert!(!a.is_ntt(), "expects the coefficient domain");
        debug_assert!(!a.is_montgomery(), "expects plain coefficients");
        self.div_by_last_modulus::<true, false>(a);
        Ok(())
    }

    /// [Context::div_floor_by_last_modulus] for a in the NTT domain.
    pub fn div_floor_by_last_modulus_ntt(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_rescale(a, 1)?;
        debug_assert!(a.is_ntt(), "expects the NTT domain");
        debug_assert!(!a.is_montgomery(), "expects plain coefficients");
        self.div_by_last_modulus::<false, true>(a);
        Ok(())
    }

    /// [Context::div_round_by_last_modulus] for a in the NTT domain.
    pub fn div_round_by_last_modulus_ntt(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_rescale(a, 1)?;
        debug_assert!(a.is_ntt(), "expects the NTT domain");
        debug_assert!(!a.is_montgomery(), "expects plain coefficients");
        self.div_by_last_modulus::<true, true>(a);
        Ok(())
    }

    /// Divides by the last k limb moduli, flooring after each division.
    /// Equal to floor(a / (q_l * ... * q_{l-k+1})).
    pub fn div_floor_by_last_modulus_many(&self, a: &mut PolyRNS<u64>, k: usize) -> Result<()> {
        self.check_rescale(a, k)?;
        debug_assert!(!a.is_ntt(), "expects the coefficient domain");
        (0..k).for_each(|_| self.div_by_last_modulus::<false, false>(a));
        Ok(())
    }

    /// Divides by the last k limb moduli, rounding after each division.
    pub fn div_round_by_last_modulus_many(&self, a: &mut PolyRNS<u64>, k: usize) -> Result<()> {
        self.check_rescale(a, k)?;
        debug_assert!(!a.is_ntt(), "expects the coefficient domain");
        (0..k).for_each(|_| self.div_by_last_modulus::<true, false>(a));
        Ok(())
    }

    pub fn div_floor_by_last_modulus_many_ntt(&self, a: &mut PolyRNS<u64>, k: usize) -> Result<()> {
        self.check_rescale(a, k)?;
        debug_assert!(a.is_ntt(), "expects the NTT domain");
        (0..k).for_each(|_| self.div_by_last_modulus::<false, true>(a));
        Ok(())
    }

    pub fn div_round_by_last_modulus_many_ntt(&self, a: &mut PolyRNS<u64>, k: usize) -> Result<()> {
        self.check_rescale(a, k)?;
        debug_assert!(a.is_ntt(), "expects the NTT domain");
        (0..k).for_each(|_| self.div_by_last_modulus::<true, true>(a));
        Ok(())
    }
}
