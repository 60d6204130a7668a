use crate::error::{Error, Result};
use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::montgomery::{Montgomery, MontgomeryPrecomp};
use crate::modulus::{MAX_MODULUS_BITS, ONCE};
use primality_test::is_prime;

/// An odd prime modulus with its Barrett and Montgomery constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prime<O> {
    pub q: O,
    /// 2q
    pub two_q: O,
    /// 4q
    pub four_q: O,
    pub montgomery: MontgomeryPrecomp<O>,
    pub barrett: BarrettPrecomp<O>,
}

impl Prime<u64> {
    /// Returns a new instance of Prime<u64>.
    /// Fails if q is not an odd prime or has more than [MAX_MODULUS_BITS] bits.
    pub fn new(q: u64) -> Result<Self> {
        let bits: u32 = u64::BITS - q.leading_zeros();
        if bits > MAX_MODULUS_BITS {
            return Err(Error::ModulusTooLarge { q, bits });
        }
        if q <= 2 || !is_prime(q) {
            return Err(Error::NotPrime { q });
        }
        Self::new_unchecked(q)
    }

    /// Returns a new instance of Prime<u64> without primality check.
    pub fn new_unchecked(q: u64) -> Result<Self> {
        let bits: u32 = u64::BITS - q.leading_zeros();
        if bits > MAX_MODULUS_BITS {
            return Err(Error::ModulusTooLarge { q, bits });
        }
        let montgomery: MontgomeryPrecomp<u64> = MontgomeryPrecomp::new(q)?;
        Ok(Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            barrett: montgomery.barrett,
            montgomery,
        })
    }

    pub fn q(&self) -> u64 {
        self.q
    }

    /// Returns x^exponent mod q.
    #[inline(always)]
    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let x_mont: Montgomery<u64> = self.montgomery.prepare::<ONCE>(x);
        self.montgomery
            .unprepare::<ONCE>(self.montgomery.pow(x_mont, exponent))
    }

    /// Returns x^-1 mod q.
    /// User must ensure that x is not divisible by q.
    #[inline(always)]
    pub fn inv(&self, x: u64) -> u64 {
        self.pow(x, self.q - 2)
    }

    /// Returns a primitive nth root of unity mod q, nth_root a power of two.
    pub fn primitive_nth_root(&self, nth_root: u64) -> Result<u64> {
        if !nth_root.is_power_of_two() || nth_root < 2 {
            return Err(Error::InvalidArgument(format!(
                "nth_root={} is not a power of two >= 2",
                nth_root
            )));
        }

        if self.q & (nth_root - 1) != 1 {
            return Err(Error::NotNttFriendly {
                q: self.q,
                nth_root,
            });
        }

        // psi = x^((q-1)/nth_root) has order dividing nth_root, and exactly
        // nth_root iff psi^(nth_root/2) = -1.
        let exponent: u64 = (self.q - 1) / nth_root;
        let minus_one: u64 = self.q - 1;
        let mut candidate: u64 = 2;
        while candidate < self.q {
            let psi: u64 = self.pow(candidate, exponent);
            if self.pow(psi, nth_root >> 1) == minus_one {
                return Ok(psi);
            }
            candidate += 1;
        }

        Err(Error::NotNttFriendly {
            q: self.q,
            nth_root,
        })
    }
}
