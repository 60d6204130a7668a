use crate::error::{Error, Result};
use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::{BARRETT, BARRETTLAZY, FOURTIMES, NONE, ONCE, REDUCEMOD, TWICE};
use crate::modulus::{ReduceOnce, WideMul};

/// Montgomery is a generic struct storing
/// an element in the Montgomery domain.
pub type Montgomery<O> = O;

/// MontgomeryPrecomp is a generic struct storing
/// precomputations for Montgomery arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MontgomeryPrecomp<O> {
    pub q: O,
    pub two_q: O,
    pub four_q: O,
    pub barrett: BarrettPrecomp<O>,
    pub q_inv: O,
    pub one: Montgomery<O>,
    pub minus_one: Montgomery<O>,
}

/// MontgomeryPrecomp is a set of methods implemented for MontgomeryPrecomp<u64>
/// enabling Montgomery arithmetic over u64 values.
impl MontgomeryPrecomp<u64> {
    /// Returns an new instance of MontgomeryPrecomp<u64>.
    /// Fails if gcd(q, 2^64) != 1.
    pub fn new(q: u64) -> Result<MontgomeryPrecomp<u64>> {
        if q & 1 == 0 || q < 3 {
            return Err(Error::EvenModulus { q });
        }
        // q^(2^63 - 1) = q^-1 mod 2^64 since the odd residues have exponent 2^62.
        let mut q_inv: u64 = 1;
        let mut q_pow: u64 = q;
        for _i in 0..63 {
            q_inv = q_inv.wrapping_mul(q_pow);
            q_pow = q_pow.wrapping_mul(q_pow);
        }
        let mut precomp = Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            barrett: BarrettPrecomp::new(q),
            q_inv,
            one: 0,
            minus_one: 0,
        };

        precomp.one = precomp.prepare::<ONCE>(1);
        precomp.minus_one = q - precomp.one;

        Ok(precomp)
    }

    /// Returns 2^64 mod q as a Montgomery<u64>.
    #[inline(always)]
    pub fn one(&self) -> Montgomery<u64> {
        self.one
    }

    /// Returns (q-1) * 2^64 mod q as a Montgomery<u64>.
    #[inline(always)]
    pub fn minus_one(&self) -> Montgomery<u64> {
        self.minus_one
    }

    #[inline(always)]
    pub fn reduce<const REDUCE: REDUCEMOD>(&self, x: u64) -> u64 {
        let mut r: u64 = x;
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        match REDUCE {
            NONE => {}
            ONCE => x.reduce_once_assign(self.q),
            TWICE => x.reduce_once_assign(self.two_q),
            FOURTIMES => x.reduce_once_assign(self.four_q),
            BARRETT => self.barrett.reduce_assign::<BARRETT>(x),
            BARRETTLAZY => self.barrett.reduce_assign::<BARRETTLAZY>(x),
            _ => unreachable!("invalid REDUCE argument"),
        }
    }

    /// Returns lhs * 2^64 mod q as a Montgomery<u64>.
    #[inline(always)]
    pub fn prepare<const REDUCE: REDUCEMOD>(&self, lhs: u64) -> Montgomery<u64> {
        let mut rhs: u64 = 0;
        self.prepare_assign::<REDUCE>(lhs, &mut rhs);
        rhs
    }

    /// Assigns lhs * 2^64 mod q to rhs, in [0, 2q) before REDUCE.
    #[inline(always)]
    pub fn prepare_assign<const REDUCE: REDUCEMOD>(&self, lhs: u64, rhs: &mut Montgomery<u64>) {
        let mhi: u64 = lhs.mul_hi(*self.barrett.value_lo());
        *rhs = (lhs.wrapping_mul(*self.barrett.value_hi()).wrapping_add(mhi))
            .wrapping_mul(self.q)
            .wrapping_neg();
        self.reduce_assign::<REDUCE>(rhs);
    }

    /// Returns lhs * (2^64)^-1 mod q as a u64.
    #[inline(always)]
    pub fn unprepare<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>) -> u64 {
        let mut rhs: u64 = 0u64;
        self.unprepare_assign::<REDUCE>(lhs, &mut rhs);
        rhs
    }

    /// Assigns lhs * (2^64)^-1 mod q to rhs, in (0, q] before REDUCE.
    #[inline(always)]
    pub fn unprepare_assign<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>, rhs: &mut u64) {
        let r: u64 = self.q.mul_hi(lhs.wrapping_mul(self.q_inv));
        *rhs = self.reduce::<REDUCE>(self.q.wrapping_sub(r));
    }

    /// Returns lhs * rhs * (2^{64})^-1 mod q.
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>, rhs: u64) -> u64 {
        let mut r: u64 = rhs;
        self.mul_external_assign::<REDUCE>(lhs, &mut r);
        r
    }

    /// Assigns lhs * rhs * (2^{64})^-1 mod q to rhs, in (0, 2q) before REDUCE.
    /// Requires lhs * rhs < q * 2^64.
    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>, rhs: &mut u64) {
        let (mlo, mhi) = lhs.mul_wide(*rhs);
        let hhi: u64 = self.q.mul_hi(mlo.wrapping_mul(self.q_inv));
        *rhs = self.reduce::<REDUCE>(mhi.wrapping_sub(hhi).wrapping_add(self.q));
    }

    /// Returns lhs * rhs * (2^{64})^-1 mod q.
    #[inline(always)]
    pub fn mul_internal<const REDUCE: REDUCEMOD>(
        &self,
        lhs: Montgomery<u64>,
        rhs: Montgomery<u64>,
    ) -> Montgomery<u64> {
        self.mul_external::<REDUCE>(lhs, rhs)
    }

    #[inline(always)]
    pub fn mul_internal_assign<const REDUCE: REDUCEMOD>(&self, lhs: Montgomery<u64>, rhs: &mut Montgomery<u64>) {
        self.mul_external_assign::<REDUCE>(lhs, rhs);
    }

    /// Returns (x^exponent) * 2^64 mod q.
    pub fn pow(&self, x: Montgomery<u64>, exponent: u64) -> Montgomery<u64> {
        let mut y: Montgomery<u64> = self.one();
        let mut x_mut: Montgomery<u64> = x;
        let mut i: u64 = exponent;
        while i > 0 {
            if i & 1 == 1 {
                self.mul_internal_assign::<ONCE>(x_mut, &mut y);
            }
            let x_sq: Montgomery<u64> = x_mut;
            self.mul_internal_assign::<ONCE>(x_sq, &mut x_mut);
            i >>= 1;
        }

        y.reduce_once_assign(self.q);
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MODULI: [u64; 4] = [
        0x1fffffffffe00001,
        0x1fffffffffc80001,
        0x1fffffffffb40001,
        0x1fffffffff500001,
    ];

    #[test]
    fn rejects_even_modulus() {
        assert!(matches!(
            MontgomeryPrecomp::new(1 << 40),
            Err(Error::EvenModulus { .. })
        ));
    }

    #[test]
    fn test_mul_external() {
        let q: u64 = 0x1fffffffffe00001;
        let m_precomp = MontgomeryPrecomp::new(q).unwrap();
        let x: u64 = 0x5f876e514845cc8b % q;
        let y: u64 = 0xad726f98f24a761a % q;
        let y_mont = m_precomp.prepare::<ONCE>(y);
        assert_eq!(
            m_precomp.mul_external::<ONCE>(y_mont, x),
            (x as u128 * y as u128 % q as u128) as u64
        );
    }

    #[test]
    fn pow_matches_fermat() {
        for q in MODULI {
            let m = MontgomeryPrecomp::new(q).unwrap();
            let x = m.prepare::<ONCE>(123456789);
            assert_eq!(m.unprepare::<ONCE>(m.pow(x, q - 1)), 1);
        }
    }

    proptest! {
        #[test]
        fn mred_matches_bigint(idx in 0..4usize, x in any::<u64>(), y in any::<u64>()) {
            let q = MODULI[idx];
            let (x, y) = (x % q, y % q);
            let m = MontgomeryPrecomp::new(q).unwrap();
            let want = num_bigint::BigUint::from(x) * y % q;
            let have = m.mul_external::<ONCE>(m.prepare::<ONCE>(y), x);
            prop_assert_eq!(num_bigint::BigUint::from(have), want);
        }

        #[test]
        fn mform_round_trip(idx in 0..4usize, x in any::<u64>()) {
            let q = MODULI[idx];
            let x = x % q;
            let m = MontgomeryPrecomp::new(q).unwrap();
            let x_mont = m.prepare::<ONCE>(x);
            prop_assert!(x_mont < q);
            prop_assert_eq!(m.unprepare::<ONCE>(x_mont), x);
        }
    }
}
