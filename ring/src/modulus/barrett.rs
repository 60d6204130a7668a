use crate::modulus::{BARRETT, BARRETTLAZY, FOURTIMES, NONE, ONCE, REDUCEMOD, TWICE};
use crate::modulus::{ReduceOnce, WideMul};

/// A scalar `v` together with its Shoup quotient `floor(v * 2^64 / q)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Barrett<O>(pub O, pub O);

impl<O> Barrett<O> {
    #[inline(always)]
    pub fn value(&self) -> &O {
        &self.0
    }

    #[inline(always)]
    pub fn quotient(&self) -> &O {
        &self.1
    }
}

/// Barrett constants of a modulus: `hi || lo = floor(2^128 / q)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrettPrecomp<O> {
    pub q: O,
    pub two_q: O,
    pub four_q: O,
    pub lo: O,
    pub hi: O,
    pub one: Barrett<O>,
}

impl<O> BarrettPrecomp<O> {
    #[inline(always)]
    pub fn value_hi(&self) -> &O {
        &self.hi
    }

    #[inline(always)]
    pub fn value_lo(&self) -> &O {
        &self.lo
    }
}

impl BarrettPrecomp<u64> {
    pub fn new(q: u64) -> BarrettPrecomp<u64> {
        debug_assert!(q > 2, "invalid modulus: q={} <= 2", q);
        let big_r: u128 = u128::MAX / q as u128;
        // u128::MAX / q == floor(2^128 / q) unless q divides 2^128, i.e. q is a power of two.
        let big_r: u128 = if q.is_power_of_two() { big_r + 1 } else { big_r };
        let mut precomp: BarrettPrecomp<u64> = Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            lo: big_r as u64,
            hi: (big_r >> 64) as u64,
            one: Barrett(0, 0),
        };
        precomp.one = precomp.prepare(1);
        precomp
    }

    #[inline(always)]
    pub fn one(&self) -> Barrett<u64> {
        self.one
    }

    /// Applies a modular reduction on x based on REDUCE:
    /// - NONE: no modular reduction.
    /// - ONCE: subtracts q if x >= q.
    /// - TWICE: subtracts 2q if x >= 2q.
    /// - FOURTIMES: subtracts 4q if x >= 4q.
    /// - BARRETT: maps x to x mod q using Barrett reduction.
    /// - BARRETTLAZY: maps x to x mod q using Barrett reduction with values in [0, 2q-1].
    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        match REDUCE {
            NONE => {}
            ONCE => x.reduce_once_assign(self.q),
            TWICE => x.reduce_once_assign(self.two_q),
            FOURTIMES => x.reduce_once_assign(self.four_q),
            BARRETT => {
                let mhi: u64 = x.mul_hi(self.hi);
                *x = x.wrapping_sub(mhi.wrapping_mul(self.q));
                x.reduce_once_assign(self.q);
                x.reduce_once_assign(self.q);
            }
            BARRETTLAZY => {
                let mhi: u64 = x.mul_hi(self.hi);
                *x = x.wrapping_sub(mhi.wrapping_mul(self.q));
                x.reduce_once_assign(self.two_q);
            }
            _ => unreachable!("invalid REDUCE argument"),
        }
    }

    #[inline(always)]
    pub fn reduce<const REDUCE: REDUCEMOD>(&self, x: &u64) -> u64 {
        let mut r = *x;
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    /// Returns `(hi * 2^64 + lo) mod q` for any double word with `hi < q`.
    #[inline(always)]
    pub fn reduce_u128(&self, lo: u64, hi: u64) -> u64 {
        debug_assert!(hi < self.q, "invalid argument: hi={} >= q={}", hi, self.q);
        // floor(x * floor(2^128/q) / 2^128) without the low word of x * lo.
        let carry: u128 = (lo as u128 * self.lo as u128) >> 64;
        let mid: u128 = carry + lo as u128 * self.hi as u128 + hi as u128 * self.lo as u128;
        let quotient: u64 = hi.wrapping_mul(self.hi).wrapping_add((mid >> 64) as u64);
        let mut r: u64 = lo.wrapping_sub(quotient.wrapping_mul(self.q));
        r.reduce_once_assign(self.q);
        r.reduce_once_assign(self.q);
        r
    }

    /// Returns x * y mod q for x, y in [0, q) using the full-width Barrett constant.
    #[inline(always)]
    pub fn mul(&self, x: u64, y: u64) -> u64 {
        let (lo, hi) = x.mul_wide(y);
        self.reduce_u128(lo, hi)
    }

    #[inline(always)]
    pub fn prepare(&self, v: u64) -> Barrett<u64> {
        debug_assert!(v < self.q, "invalid argument: v={} >= q={}", v, self.q);
        let quotient: u64 = (((v as u128) << 64) / self.q as u128) as _;
        Barrett(v, quotient)
    }

    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: &Barrett<u64>, rhs: &u64) -> u64 {
        let mut r: u64 = *rhs;
        self.mul_external_assign::<REDUCE>(lhs, &mut r);
        r
    }

    /// Assigns lhs * rhs mod q to rhs, in [0, 2q) before REDUCE.
    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, lhs: &Barrett<u64>, rhs: &mut u64) {
        let t: u64 = lhs.quotient().mul_hi(*rhs);
        *rhs = (rhs.wrapping_mul(*lhs.value())).wrapping_sub(self.q.wrapping_mul(t));
        self.reduce_assign::<REDUCE>(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const Q: u64 = 0x1fffffffffe00001;

    #[test]
    fn constants_match_bigint() {
        let precomp = BarrettPrecomp::new(Q);
        let r: num_bigint::BigUint = (num_bigint::BigUint::from(1u8) << 128usize) / Q;
        let digits = r.to_u64_digits();
        assert_eq!(precomp.lo, digits[0]);
        assert_eq!(precomp.hi, digits[1]);
    }

    #[test]
    fn reduce_barrett_full_range() {
        let precomp = BarrettPrecomp::new(Q);
        for x in [0, 1, Q - 1, Q, Q + 1, 2 * Q, 4 * Q - 1, u64::MAX] {
            assert_eq!(precomp.reduce::<BARRETT>(&x), x % Q);
            assert!(precomp.reduce::<BARRETTLAZY>(&x) < 2 * Q);
        }
    }

    proptest! {
        #[test]
        fn bred_matches_u128(x in 0..Q, y in 0..Q) {
            let precomp = BarrettPrecomp::new(Q);
            prop_assert_eq!(precomp.mul(x, y), ((x as u128 * y as u128) % Q as u128) as u64);
        }

        #[test]
        fn shoup_mul_matches_u128(x in 0..Q, y in any::<u64>()) {
            let precomp = BarrettPrecomp::new(Q);
            let x_prep = precomp.prepare(x);
            prop_assert_eq!(
                precomp.mul_external::<ONCE>(&x_prep, &y),
                ((x as u128 * y as u128) % Q as u128) as u64
            );
        }

        #[test]
        fn bred_small_modulus(x in 0..65537u64, y in 0..65537u64) {
            let precomp = BarrettPrecomp::new(65537);
            prop_assert_eq!(precomp.mul(x, y), x * y % 65537);
        }
    }
}
