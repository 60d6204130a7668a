use crate::error::{Error, Result};
use crate::modulus::MAX_MODULUS_BITS;
use primality_test::is_prime;
use tracing::{debug, trace};

/// Enumerates primes `q = 1 mod nth_root` of exactly `bit_size` bits,
/// walking up and down from a starting point.
#[derive(Clone, Debug)]
pub struct NTTFriendlyPrimesGenerator {
    bit_size: u32,
    min: u64,
    max: u64,
    next_prime: u64,
    prev_prime: u64,
    nth_root: u64,
    check_next_prime: bool,
    check_prev_prime: bool,
}

impl NTTFriendlyPrimesGenerator {
    /// Starts the search at the top of the bit range.
    pub fn new(bit_size: u32, nth_root: u64) -> Result<Self> {
        if bit_size < 2 || bit_size > MAX_MODULUS_BITS {
            return Err(Error::InvalidArgument(format!(
                "bit_size={} not in [2, {}]",
                bit_size, MAX_MODULUS_BITS
            )));
        }
        Self::with_hint(bit_size, nth_root, (1 << bit_size) - 1)
    }

    /// Starts the search at the largest candidate `<= hint`. The candidate itself
    /// is the first upstream value.
    pub fn with_hint(bit_size: u32, nth_root: u64, hint: u64) -> Result<Self> {
        if bit_size < 2 || bit_size > MAX_MODULUS_BITS {
            return Err(Error::InvalidArgument(format!(
                "bit_size={} not in [2, {}]",
                bit_size, MAX_MODULUS_BITS
            )));
        }

        if !nth_root.is_power_of_two() || nth_root < 2 {
            return Err(Error::InvalidArgument(format!(
                "nth_root={} is not a power of two >= 2",
                nth_root
            )));
        }

        let min: u64 = 1 << (bit_size - 1);
        let max: u64 = 1 << bit_size;

        if hint < min || hint >= max {
            return Err(Error::InvalidArgument(format!(
                "hint={} does not have {} bits",
                hint, bit_size
            )));
        }

        let mut next_prime: u64 = hint - ((hint - 1) & (nth_root - 1));
        if next_prime < min {
            next_prime += nth_root;
        }
        let check_prev_prime: bool = next_prime >= min + nth_root;
        let prev_prime: u64 = if check_prev_prime { next_prime - nth_root } else { 0 };

        Ok(Self {
            bit_size,
            min,
            max,
            next_prime,
            prev_prime,
            nth_root,
            check_next_prime: next_prime < max,
            check_prev_prime,
        })
    }

    pub fn nth_root(&self) -> u64 {
        self.nth_root
    }

    pub fn bit_size(&self) -> u32 {
        self.bit_size
    }

    fn exhausted(&self, found: usize, requested: usize) -> Error {
        debug!(
            found,
            requested,
            bit_size = self.bit_size,
            nth_root = self.nth_root,
            "prime search exhausted"
        );
        Error::PrimesExhausted {
            found,
            requested,
            bit_size: self.bit_size,
            nth_root: self.nth_root,
        }
    }

    pub fn next_upstream_primes(&mut self, k: usize) -> Result<Vec<u64>> {
        let mut primes: Vec<u64> = Vec::with_capacity(k);
        for i in 0..k {
            match self.next_upstream_prime() {
                Some(q) => primes.push(q),
                None => return Err(self.exhausted(i, k)),
            }
        }
        Ok(primes)
    }

    pub fn next_downstream_primes(&mut self, k: usize) -> Result<Vec<u64>> {
        let mut primes: Vec<u64> = Vec::with_capacity(k);
        for i in 0..k {
            match self.next_downstream_prime() {
                Some(q) => primes.push(q),
                None => return Err(self.exhausted(i, k)),
            }
        }
        Ok(primes)
    }

    pub fn next_alternating_primes(&mut self, k: usize) -> Result<Vec<u64>> {
        let mut primes: Vec<u64> = Vec::with_capacity(k);
        for i in 0..k {
            match self.next_alternating_prime() {
                Some(q) => primes.push(q),
                None => return Err(self.exhausted(i, k)),
            }
        }
        Ok(primes)
    }

    /// Returns the next prime above the previous upstream one, or None once
    /// the candidates leave the bit range.
    pub fn next_upstream_prime(&mut self) -> Option<u64> {
        while self.check_next_prime {
            if let Some(q) = self.step_upstream() {
                return Some(q);
            }
        }
        None
    }

    /// Returns the next prime below the previous downstream one, or None once
    /// the candidates leave the bit range.
    pub fn next_downstream_prime(&mut self) -> Option<u64> {
        while self.check_prev_prime {
            if let Some(q) = self.step_downstream() {
                return Some(q);
            }
        }
        None
    }

    /// Alternates between upstream and downstream candidates, continuing in
    /// one direction once the other is exhausted.
    pub fn next_alternating_prime(&mut self) -> Option<u64> {
        while self.check_next_prime || self.check_prev_prime {
            if self.check_next_prime {
                if let Some(q) = self.step_upstream() {
                    return Some(q);
                }
            }

            if self.check_prev_prime {
                if let Some(q) = self.step_downstream() {
                    return Some(q);
                }
            }
        }
        None
    }

    fn step_upstream(&mut self) -> Option<u64> {
        let candidate: u64 = self.next_prime;
        if candidate >= self.max {
            self.check_next_prime = false;
            return None;
        }
        self.next_prime += self.nth_root;
        if is_prime(candidate) {
            trace!(q = candidate, "found upstream prime");
            return Some(candidate);
        }
        None
    }

    fn step_downstream(&mut self) -> Option<u64> {
        let candidate: u64 = self.prev_prime;
        if candidate < self.min {
            self.check_prev_prime = false;
            return None;
        }
        match candidate.checked_sub(self.nth_root) {
            Some(prev) => self.prev_prime = prev,
            None => self.check_prev_prime = false,
        }
        if is_prime(candidate) {
            trace!(q = candidate, "found downstream prime");
            return Some(candidate);
        }
        None
    }
}

/// Returns `count` distinct primes of exactly `bit_length` bits, searching
/// alternately upward and downward from `hint`. With `ntt_friendly` the primes
/// satisfy `q = 1 mod 2n`, so that `Z_q[X]/(X^n + 1)` admits a negacyclic NTT.
pub fn generate_ntt_primes(
    n: usize,
    hint: u64,
    count: usize,
    bit_length: u32,
    ntt_friendly: bool,
) -> Result<Vec<u64>> {
    if n == 0 || !n.is_power_of_two() {
        return Err(Error::InvalidRingDegree { n });
    }

    let nth_root: u64 = if ntt_friendly { (n as u64) << 1 } else { 2 };
    let mut generator: NTTFriendlyPrimesGenerator =
        NTTFriendlyPrimesGenerator::with_hint(bit_length, nth_root, hint)?;
    let primes: Vec<u64> = generator.next_alternating_primes(count)?;
    debug!(n, count, bit_length, ntt_friendly, "generated primes");
    Ok(primes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prime_generation() {
        let nth_root: u64 = 1 << 16;
        let mut g = NTTFriendlyPrimesGenerator::new(30, nth_root).unwrap();

        let primes = g.next_alternating_primes(10).unwrap();
        for q in primes.iter() {
            assert_eq!(q % nth_root, 1);
            assert_eq!(u64::BITS - q.leading_zeros(), 30);
            assert!(is_prime(*q));
        }
    }

    #[test]
    fn upstream_and_downstream_are_ordered() {
        let nth_root: u64 = 1 << 12;
        let hint: u64 = 0x1fffffffffe00001;
        let mut g = NTTFriendlyPrimesGenerator::with_hint(61, nth_root, hint).unwrap();
        let down = g.next_downstream_primes(4).unwrap();
        assert!(down.windows(2).all(|w| w[0] > w[1]));
        assert!(down[0] < hint);

        let mut g = NTTFriendlyPrimesGenerator::with_hint(61, nth_root, hint).unwrap();
        let up = g.next_upstream_primes(2).unwrap();
        assert_eq!(up[0], hint);
        assert!(up[1] > hint);
    }

    #[test]
    fn exhaustion_is_reported() {
        // The only 6-bit candidate = 1 mod 32 is 33 = 3 * 11.
        let mut g = NTTFriendlyPrimesGenerator::new(6, 32).unwrap();
        assert!(matches!(
            g.next_alternating_primes(1),
            Err(Error::PrimesExhausted {
                found: 0,
                requested: 1,
                ..
            })
        ));

        let err = generate_ntt_primes(8, 200, 1000, 8, true).unwrap_err();
        assert!(matches!(err, Error::PrimesExhausted { .. }));
    }

    #[test]
    fn rejects_invalid_arguments() {
        assert!(generate_ntt_primes(12, 1 << 40, 1, 41, true).is_err());
        assert!(generate_ntt_primes(16, 1 << 20, 1, 41, true).is_err());
        assert!(NTTFriendlyPrimesGenerator::new(62, 1 << 10).is_err());
    }

    #[test]
    fn non_ntt_friendly_primes() {
        let primes = generate_ntt_primes(16, 1 << 20, 8, 21, false).unwrap();
        assert_eq!(primes.len(), 8);
        let mut sorted = primes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 8);
        assert!(primes.iter().all(|&q| is_prime(q) && q >> 20 == 1));
    }
}
