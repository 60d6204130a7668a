use crate::dft::ntt::Table;
use crate::error::{Error, Result};
use crate::modulus::barrett::Barrett;
use crate::modulus::montgomery::Montgomery;
use crate::modulus::prime::Prime;
use crate::modulus::{ScalarOperations, VectorOperations};
use crate::modulus::{BARRETT, ONCE, REDUCEMOD};
use crate::poly::Poly;
use crate::ring::{is_valid_degree, Ring};
use crate::CHUNK;
use itertools::izip;

impl Ring<u64> {
    /// Builds Z_q[X]/(X^n+1). Fails unless n is a power of two and q is a
    /// prime of at most 61 bits with q = 1 mod 2n.
    pub fn new(n: usize, q: u64) -> Result<Self> {
        if !is_valid_degree(n) {
            return Err(Error::InvalidRingDegree { n });
        }
        let prime: Prime<u64> = Prime::<u64>::new(q)?;
        let ntt: Table<u64> = Table::<u64>::new(prime, (n as u64) << 1)?;
        Ok(Self {
            n,
            modulus: prime,
            ntt,
        })
    }

    pub fn q(&self) -> u64 {
        self.modulus.q
    }
}

impl Ring<u64> {
    pub fn ntt_inplace<const LAZY: bool>(&self, poly: &mut Poly<u64>) {
        self.ntt.forward_inplace::<LAZY>(&mut poly.0)
    }

    pub fn intt_inplace<const LAZY: bool>(&self, poly: &mut Poly<u64>) {
        self.ntt.backward_inplace::<LAZY>(&mut poly.0)
    }

    pub fn ntt<const LAZY: bool>(&self, poly_in: &Poly<u64>, poly_out: &mut Poly<u64>) {
        poly_out.0.copy_from_slice(&poly_in.0);
        self.ntt.forward_inplace::<LAZY>(&mut poly_out.0)
    }

    pub fn intt<const LAZY: bool>(&self, poly_in: &Poly<u64>, poly_out: &mut Poly<u64>) {
        poly_out.0.copy_from_slice(&poly_in.0);
        self.ntt.backward_inplace::<LAZY>(&mut poly_out.0)
    }
}

impl Ring<u64> {
    #[inline(always)]
    pub fn add_inplace<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_add_vb_into_vb::<CHUNK, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn add<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_add_vb_into_vc::<CHUNK, REDUCE>(&a.0, &b.0, &mut c.0);
    }

    #[inline(always)]
    pub fn add_scalar_inplace<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut Poly<u64>) {
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus.sa_add_vb_into_vb::<CHUNK, REDUCE>(a, &mut b.0);
    }

    #[inline(always)]
    pub fn sub_inplace<const BRANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_sub_vb_into_vb::<CHUNK, BRANGE, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn sub<const BRANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_sub_vb_into_vc::<CHUNK, BRANGE, REDUCE>(&a.0, &b.0, &mut c.0);
    }

    #[inline(always)]
    pub fn neg<const ARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_neg_into_vb::<CHUNK, ARANGE, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn neg_inplace<const ARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus
            .va_neg_into_va::<CHUNK, ARANGE, REDUCE>(&mut a.0);
    }

    #[inline(always)]
    pub fn reduce_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus.va_reduce_into_va::<CHUNK, REDUCE>(&mut a.0);
    }

    /// b <- a * 2^64 mod q.
    #[inline(always)]
    pub fn mform(&self, a: &Poly<u64>, b: &mut Poly<Montgomery<u64>>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_prep_mont_into_vb::<CHUNK, ONCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn mform_inplace(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        let montgomery = &self.modulus.montgomery;
        a.0.iter_mut()
            .for_each(|x| *x = montgomery.prepare::<ONCE>(*x));
    }

    /// b <- a * 2^-64 mod q.
    #[inline(always)]
    pub fn inv_mform(&self, a: &Poly<Montgomery<u64>>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_unprep_mont_into_vb::<CHUNK, ONCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn inv_mform_inplace(&self, a: &mut Poly<Montgomery<u64>>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        let montgomery = &self.modulus.montgomery;
        a.0.iter_mut()
            .for_each(|x| *x = montgomery.unprepare::<ONCE>(*x));
    }

    /// Pointwise c <- a * b mod q.
    #[inline(always)]
    pub fn mul_coeffs(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus.va_mul_vb_into_vc::<CHUNK>(&a.0, &b.0, &mut c.0);
    }

    /// Pointwise c <- a * b * 2^-64 mod q.
    #[inline(always)]
    pub fn mul_montgomery_external<const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<Montgomery<u64>>,
        b: &Poly<u64>,
        c: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_mont_mul_vb_into_vc::<CHUNK, REDUCE>(&a.0, &b.0, &mut c.0);
    }

    #[inline(always)]
    pub fn mul_montgomery_external_inplace<const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<Montgomery<u64>>,
        b: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_mont_mul_vb_into_vb::<CHUNK, REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn mul_scalar<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &u64, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus.sa_barrett_mul_vb_into_vc::<CHUNK, REDUCE>(
            &self
                .modulus
                .barrett
                .prepare(self.modulus.barrett.reduce::<BARRETT>(b)),
            &a.0,
            &mut c.0,
        );
    }

    #[inline(always)]
    pub fn mul_scalar_inplace<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut Poly<u64>) {
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus.sa_barrett_mul_vb_into_vb::<CHUNK, REDUCE>(
            &self
                .modulus
                .barrett
                .prepare(self.modulus.barrett.reduce::<BARRETT>(a)),
            &mut b.0,
        );
    }

    #[inline(always)]
    pub fn mul_scalar_barrett_inplace<const REDUCE: REDUCEMOD>(&self, a: &Barrett<u64>, b: &mut Poly<u64>) {
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .sa_barrett_mul_vb_into_vb::<CHUNK, REDUCE>(a, &mut b.0);
    }

    /// d <- (a - b) * c.
    #[inline(always)]
    pub fn a_sub_b_mul_c_scalar_barrett<const BRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        b: &Poly<u64>,
        c: &Barrett<u64>,
        d: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(d.n() == self.n(), "d.n()={} != n={}", d.n(), self.n());
        self.modulus
            .va_sub_vb_mul_sc_into_vd::<CHUNK, BRANGE, REDUCE>(&a.0, &b.0, c, &mut d.0);
    }

    /// b <- (a - b) * c.
    #[inline(always)]
    pub fn a_sub_b_mul_c_scalar_barrett_inplace<const BRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        c: &Barrett<u64>,
        b: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus
            .va_sub_vb_mul_sc_into_vb::<CHUNK, BRANGE, REDUCE>(&a.0, c, &mut b.0);
    }
}

impl Ring<u64> {
    /// Cyclic rotation: b[i] = a[(i - k) mod n].
    pub fn shift(&self, a: &Poly<u64>, k: usize, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        b.0.copy_from_slice(&a.0);
        self.shift_inplace(k, b);
    }

    pub fn shift_inplace(&self, k: usize, a: &mut Poly<u64>) {
        a.0.rotate_right(k & (self.n() - 1));
    }

    /// b <- a * X^k mod X^n + 1, with k taken mod 2n.
    pub fn mult_by_monomial(&self, a: &Poly<u64>, k: usize, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        b.0.copy_from_slice(&a.0);
        self.mult_by_monomial_inplace(k, b);
    }

    pub fn mult_by_monomial_inplace(&self, k: usize, a: &mut Poly<u64>) {
        let n: usize = self.n();
        let k: usize = k & ((n << 1) - 1);
        let shift: usize = k & (n - 1);
        a.0.rotate_right(shift);
        // X^n = -1: the wrapped coefficients change sign, and a further n flips all of them.
        let wrapped: &mut [u64] = if k < n {
            &mut a.0[..shift]
        } else {
            &mut a.0[shift..]
        };
        self.modulus.va_neg_into_va::<CHUNK, 1, ONCE>(wrapped);
    }

    /// b(X) <- a(psi^(-2k) X), which cyclically shifts the evaluation vector
    /// of a, in natural order, by k positions.
    pub fn rotate(&self, a: &Poly<u64>, k: usize, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        b.0.copy_from_slice(&a.0);
        self.rotate_inplace(k, b);
    }

    pub fn rotate_inplace(&self, k: usize, a: &mut Poly<u64>) {
        let k: u64 = (k & (self.n() - 1)) as u64;
        let step: Barrett<u64> = self
            .modulus
            .barrett
            .prepare(self.modulus.pow(self.ntt.psi_inv(), k << 1));
        let mut power: Barrett<u64> = self.modulus.barrett.one();
        a.0.iter_mut().for_each(|x| {
            self.modulus
                .sa_barrett_mul_sb_into_sb::<ONCE>(&power, x);
            power = self
                .modulus
                .barrett
                .prepare(self.modulus.barrett.mul_external::<ONCE>(&step, power.value()));
        });
    }

    /// b[j] <- a[table[j]].
    pub fn permute(&self, a: &Poly<u64>, table: &[usize], b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(table.len() == self.n(), "table.len()={} != n={}", table.len(), self.n());
        izip!(b.0.iter_mut(), table.iter()).for_each(|(b, &j)| *b = a.0[j]);
    }
}
