use crate::poly::{PolyRNS, Representation};
use tracing::trace;
use utils::map::Map;

/// Free list of scratch polynomials keyed by (n, limbs).
///
/// A pool is owned by one caller. Threads that share a [crate::ring::Context]
/// keep one pool each.
#[derive(Default)]
pub struct PolyPool {
    free: Map<(usize, usize), Vec<PolyRNS<u64>>>,
    allocated: usize,
}

impl PolyPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a polynomial of degree n over `limbs` limbs. Recycled
    /// polynomials keep their previous coefficients.
    pub fn get(&mut self, n: usize, limbs: usize) -> PolyRNS<u64> {
        debug_assert!(limbs > 0, "limbs must be positive");
        if let Some(mut p) = self.free.get_mut(&(n, limbs)).and_then(|v| v.pop()) {
            p.set_representation(Representation::COEFFS);
            return p;
        }
        self.allocated += 1;
        trace!(n, limbs, allocated = self.allocated, "pool miss");
        PolyRNS::new(n, limbs - 1)
    }

    /// Hands p back for reuse.
    pub fn put(&mut self, p: PolyRNS<u64>) {
        if p.limbs() == 0 {
            return;
        }
        self.free
            .get_or_insert_with((p.n(), p.limbs()), Vec::new)
            .push(p);
    }

    /// Number of polynomials waiting for reuse.
    pub fn idle(&self) -> usize {
        self.free.0.values().map(|v| v.len()).sum()
    }

    /// Number of polynomials allocated by this pool so far.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    pub fn clear(&mut self) {
        self.free.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recycles_by_shape() {
        let mut pool = PolyPool::new();
        let mut a = pool.get(16, 2);
        a.set_representation(Representation::NTT);
        assert_eq!(pool.allocated(), 1);
        pool.put(a);
        assert_eq!(pool.idle(), 1);

        let b = pool.get(16, 2);
        assert_eq!(pool.allocated(), 1);
        assert_eq!(pool.idle(), 0);
        assert!(!b.is_ntt());

        let c = pool.get(16, 3);
        assert_eq!(c.limbs(), 3);
        assert_eq!(pool.allocated(), 2);
    }
}
