use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed};

pub trait Div {
    /// Quotient rounded toward negative infinity.
    fn div_floor(&self, other: &Self) -> Self;
    /// Quotient rounded to the nearest integer, ties away from zero.
    fn div_round(&self, other: &Self) -> Self;
}

impl Div for BigInt {
    fn div_floor(&self, other: &Self) -> Self {
        Integer::div_floor(self, other)
    }

    fn div_round(&self, other: &Self) -> Self {
        let (quo, rem) = self.div_rem(other);
        if (rem.abs() << 1) >= other.abs() {
            if self.sign() == other.sign() {
                return quo + BigInt::one();
            } else {
                return quo - BigInt::one();
            }
        }
        quo
    }
}

impl Div for BigUint {
    fn div_floor(&self, other: &Self) -> Self {
        self / other
    }

    fn div_round(&self, other: &Self) -> Self {
        ((self << 1) + other) / (other << 1)
    }
}

/// Product of the moduli.
pub fn modulus_product(moduli: &[u64]) -> BigUint {
    moduli
        .iter()
        .fold(BigUint::one(), |acc, &q| acc * BigUint::from(q))
}

/// Maps x in [0, modulus) to its representative in (-modulus/2, modulus/2].
pub fn center(x: BigUint, modulus: &BigUint) -> BigInt {
    let half: BigUint = modulus >> 1;
    if x > half {
        BigInt::from_biguint(Sign::Minus, modulus - x)
    } else {
        BigInt::from(x)
    }
}

/// Maps x to its representative in [0, modulus).
pub fn reduce(x: &BigInt, modulus: &BigUint) -> BigUint {
    let r: BigUint = x.magnitude() % modulus;
    if x.sign() == Sign::Minus && r != BigUint::ZERO {
        modulus - r
    } else {
        r
    }
}

/// x mod q for a single-word modulus.
pub fn rem_u64(x: &BigUint, q: u64) -> u64 {
    x.iter_u64_digits()
        .rev()
        .fold(0u64, |r, d| ((((r as u128) << 64) | d as u128) % q as u128) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_floor_rounds_down() {
        let cases: [(i64, i64, i64); 6] = [(7, 2, 3), (-7, 2, -4), (7, -2, -4), (-7, -2, 3), (-6, 2, -3), (0, 5, 0)];
        for (a, b, want) in cases {
            assert_eq!(
                Div::div_floor(&BigInt::from(a), &BigInt::from(b)),
                BigInt::from(want),
                "{a}/{b}"
            );
        }
    }

    #[test]
    fn div_round_ties_away_from_zero() {
        let cases: [(i64, i64, i64); 8] = [
            (5, 2, 3),
            (-5, 2, -3),
            (5, -2, -3),
            (7, 3, 2),
            (8, 3, 3),
            (-8, 3, -3),
            (-7, 3, -2),
            (6, 3, 2),
        ];
        for (a, b, want) in cases {
            assert_eq!(
                BigInt::from(a).div_round(&BigInt::from(b)),
                BigInt::from(want),
                "{a}/{b}"
            );
        }
        assert_eq!(BigUint::from(5u64).div_round(&BigUint::from(2u64)), BigUint::from(3u64));
        assert_eq!(BigUint::from(7u64).div_round(&BigUint::from(3u64)), BigUint::from(2u64));
    }

    #[test]
    fn center_and_reduce_are_inverse() {
        let modulus: BigUint = BigUint::from(97u64);
        for x in 0u64..97 {
            let c: BigInt = center(BigUint::from(x), &modulus);
            assert!(c.abs() <= BigInt::from(48));
            assert_eq!(reduce(&c, &modulus), BigUint::from(x));
        }
        assert_eq!(reduce(&BigInt::from(-97 * 3), &modulus), BigUint::ZERO);
    }

    #[test]
    fn rem_u64_matches_bigint_remainder() {
        let x: BigUint = modulus_product(&[0x1fffffffffe00001, 0x1fffffffffc80001, 12345]) + 77u64;
        for q in [3u64, 65537, 0x1fffffffffb40001, u64::MAX] {
            assert_eq!(BigUint::from(rem_u64(&x, q)), &x % q);
        }
        assert_eq!(rem_u64(&BigUint::ZERO, 7), 0);
    }
}
