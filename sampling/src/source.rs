use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_core::{OsRng, RngCore, TryRngCore};

const MAXF64: f64 = 9007199254740992.0;

/// Deterministic entropy source keyed by a 32-byte seed.
#[derive(Clone, Debug)]
pub struct Source {
    source: ChaCha8Rng,
}

/// Draws a fresh 32-byte seed from the operating system.
pub fn new_seed() -> Result<[u8; 32], <OsRng as TryRngCore>::Error> {
    let mut seed = [0u8; 32];
    OsRng.try_fill_bytes(&mut seed)?;
    Ok(seed)
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    /// Returns a source seeded by the operating system RNG.
    pub fn from_os() -> Result<Source, <OsRng as TryRngCore>::Error> {
        Ok(Source::new(new_seed()?))
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.fill_bytes(&mut seed);
        seed
    }

    pub fn branch(&mut self) -> ([u8; 32], Self) {
        let seed: [u8; 32] = self.new_seed();
        (seed, Source::new(seed))
    }

    /// Returns a uniform value in [0, max) by masked rejection.
    /// `mask` must be 2^k - 1 with 2^k >= max.
    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }

    #[inline(always)]
    pub fn next_f64(&mut self, min: f64, max: f64) -> f64 {
        min + ((self.next_u64() << 11 >> 11) as f64) / MAXF64 * (max - min)
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a: Source = Source::new([7u8; 32]);
        let mut b: Source = Source::new([7u8; 32]);
        (0..64).for_each(|_| assert_eq!(a.next_u64(), b.next_u64()));
    }

    #[test]
    fn next_u64n_stays_below_max() {
        let mut source: Source = Source::new([0u8; 32]);
        let max: u64 = 0x1fffffffffe00001;
        let mask: u64 = (1 << 61) - 1;
        (0..1024).for_each(|_| assert!(source.next_u64n(max, mask) < max));
    }

    #[test]
    fn branch_is_deterministic() {
        let (seed_a, mut a) = Source::new([1u8; 32]).branch();
        let (seed_b, mut b) = Source::new([1u8; 32]).branch();
        assert_eq!(seed_a, seed_b);
        assert_eq!(a.next_u64(), b.next_u64());
    }
}
