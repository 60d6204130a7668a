use crate::error::Result;
use crate::modulus::ReduceOnce;
use crate::modulus::ONCE;
use crate::poly::{Poly, PolyRNS, Representation};
use crate::pool::PolyPool;
use crate::ring::{Context, Ring};
use itertools::izip;

impl Ring<u64> {
    /// Negacyclic schoolbook product, c <- a * b mod X^n + 1.
    ///
    /// `mul` is the coefficient product: plain for mul_poly_naive, Montgomery
    /// for mul_poly_naive_montgomery.
    fn convolve<F: Fn(u64, u64) -> u64>(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>, mul: F) {
        let n: usize = self.n();
        let q: u64 = self.modulus.q;
        let mut acc: Vec<u64> = vec![0; n];
        for (i, &ai) in a.0.iter().enumerate() {
            for (j, &bj) in b.0.iter().enumerate() {
                let prod: u64 = mul(ai, bj);
                let k: usize = i + j;
                if k < n {
                    acc[k] = (acc[k] + prod).reduce_once(q);
                } else {
                    acc[k - n] = (acc[k - n] + q - prod).reduce_once(q);
                }
            }
        }
        c.0.copy_from_slice(&acc);
    }

    pub fn mul_poly_naive(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        let barrett = &self.modulus.barrett;
        self.convolve(a, b, c, |x, y| barrett.mul(x, y));
    }

    pub fn mul_poly_naive_montgomery(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        let montgomery = &self.modulus.montgomery;
        self.convolve(a, b, c, |x, y| montgomery.mul_internal::<ONCE>(x, y));
    }
}

impl Context {
    /// Pointwise c <- a * b.
    pub fn mul_coeffs(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, b, &*c])?;
        izip!(self.rings.iter(), a.iter(), b.iter(), c.iter_mut())
            .for_each(|(ring, a, b, c)| ring.mul_coeffs(a, b, c));
        c.repr = a.repr;
        Ok(())
    }

    /// Pointwise c <- a * b * 2^-64, with a in Montgomery form.
    ///
    /// The output is in Montgomery form iff b is.
    pub fn mul_coeffs_montgomery(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, b, &*c])?;
        debug_assert!(a.is_montgomery(), "a is not in Montgomery form");
        izip!(self.rings.iter(), a.iter(), b.iter(), c.iter_mut())
            .for_each(|(ring, a, b, c)| ring.mul_montgomery_external::<ONCE>(a, b, c));
        c.repr = Representation {
            ntt: a.repr.ntt,
            montgomery: b.repr.montgomery,
        };
        Ok(())
    }

    /// b <- a * b * 2^-64, with a in Montgomery form.
    pub fn mul_coeffs_montgomery_inplace(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        debug_assert!(a.is_montgomery(), "a is not in Montgomery form");
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.mul_montgomery_external_inplace::<ONCE>(a, b));
        Ok(())
    }

    /// c <- a * b in Z_Q[X]/(X^n+1), computed as InvNTT(NTT(a) . NTT(b)).
    /// a and b are plain coefficient polynomials.
    pub fn mul_poly(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, b, &*c])?;
        debug_assert!(!a.is_ntt() && !b.is_ntt(), "mul_poly expects the coefficient domain");
        let mut a_ntt: Poly<u64> = Poly::new(self.n);
        let mut b_ntt: Poly<u64> = Poly::new(self.n);
        izip!(self.rings.iter(), a.iter(), b.iter(), c.iter_mut()).for_each(|(ring, a, b, c)| {
            ring.ntt::<false>(a, &mut a_ntt);
            ring.ntt::<false>(b, &mut b_ntt);
            ring.mul_coeffs(&a_ntt, &b_ntt, c);
            ring.intt_inplace::<false>(c);
        });
        c.repr = Representation::COEFFS;
        Ok(())
    }

    /// c <- a * b with a, b and c in Montgomery form.
    pub fn mul_poly_montgomery(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, b, &*c])?;
        debug_assert!(!a.is_ntt() && !b.is_ntt(), "mul_poly_montgomery expects the coefficient domain");
        debug_assert!(a.is_montgomery(), "a is not in Montgomery form");
        let mut a_ntt: Poly<u64> = Poly::new(self.n);
        izip!(self.rings.iter(), a.iter(), b.iter(), c.iter_mut()).for_each(|(ring, a, b, c)| {
            ring.ntt::<false>(a, &mut a_ntt);
            ring.ntt::<false>(b, c);
            ring.mul_montgomery_external_inplace::<ONCE>(&a_ntt, c);
            ring.intt_inplace::<false>(c);
        });
        c.repr = Representation {
            ntt: false,
            montgomery: b.repr.montgomery,
        };
        Ok(())
    }

    /// Schoolbook reference for [Context::mul_poly].
    pub fn mul_poly_naive(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, b, &*c])?;
        debug_assert!(!a.is_ntt() && !b.is_ntt(), "mul_poly_naive expects the coefficient domain");
        izip!(self.rings.iter(), a.iter(), b.iter(), c.iter_mut())
            .for_each(|(ring, a, b, c)| ring.mul_poly_naive(a, b, c));
        c.repr = Representation::COEFFS;
        Ok(())
    }

    /// Schoolbook reference for [Context::mul_poly_montgomery].
    pub fn mul_poly_naive_montgomery(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, b, &*c])?;
        debug_assert!(!a.is_ntt() && !b.is_ntt(), "mul_poly_naive_montgomery expects the coefficient domain");
        debug_assert!(a.is_montgomery(), "a is not in Montgomery form");
        izip!(self.rings.iter(), a.iter(), b.iter(), c.iter_mut())
            .for_each(|(ring, a, b, c)| ring.mul_poly_naive_montgomery(a, b, c));
        c.repr = Representation {
            ntt: false,
            montgomery: b.repr.montgomery,
        };
        Ok(())
    }

    /// [Context::mul_poly] with the NTT buffers taken from pool.
    pub fn mul_poly_pooled(
        &self,
        pool: &mut PolyPool,
        a: &PolyRNS<u64>,
        b: &PolyRNS<u64>,
        c: &mut PolyRNS<u64>,
    ) -> Result<()> {
        self.check_polys(&[a, b, &*c])?;
        debug_assert!(!a.is_ntt() && !b.is_ntt(), "mul_poly expects the coefficient domain");
        let mut a_ntt: PolyRNS<u64> = pool.get(self.n, self.limbs());
        let mut b_ntt: PolyRNS<u64> = pool.get(self.n, self.limbs());
        self.ntt(a, &mut a_ntt)?;
        self.ntt(b, &mut b_ntt)?;
        self.mul_coeffs(&a_ntt, &b_ntt, c)?;
        self.inv_ntt_inplace(c)?;
        pool.put(a_ntt);
        pool.put(b_ntt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_product_wraps_negacyclically() {
        let q: u64 = 0x1fffffffffe00001;
        let ring = Ring::new(4, q).unwrap();
        // (1 + X^3) * X = X - 1
        let a = Poly(vec![1, 0, 0, 1]);
        let b = Poly(vec![0, 1, 0, 0]);
        let mut c = ring.new_poly();
        ring.mul_poly_naive(&a, &b, &mut c);
        assert_eq!(c.0, vec![q - 1, 1, 0, 0]);
    }
}
