pub mod impl_u64;

use crate::dft::ntt::Table;
use crate::modulus::prime::Prime;
use crate::poly::{Poly, PolyRNS};
use num_bigint::BigUint;
use std::sync::Arc;

/// Largest supported log2 of the ring degree.
pub const MAX_LOG_N: usize = 20;

/// n must be a power of two in [1, 2^MAX_LOG_N].
pub(crate) fn is_valid_degree(n: usize) -> bool {
    n.is_power_of_two() && n <= 1 << MAX_LOG_N
}

/// Z_q[X]/(X^n+1) for a single NTT-friendly prime q.
#[derive(Clone, Debug)]
pub struct Ring<O> {
    pub n: usize,
    pub modulus: Prime<O>,
    pub ntt: Table<O>,
}

impl<O> Ring<O> {
    pub fn log_n(&self) -> usize {
        self.n.trailing_zeros() as usize
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// 2n, the order of the roots of unity used by the NTT.
    pub fn cyclotomic_order(&self) -> usize {
        self.n << 1
    }
}

impl Ring<u64> {
    pub fn new_poly(&self) -> Poly<u64> {
        Poly::<u64>::new(self.n())
    }
}

/// Z_Q[X]/(X^n+1) with Q the product of the limb moduli.
///
/// Immutable once built. Cloning and [Context::at_level] share the per-limb
/// tables, so a context can be handed to many threads.
#[derive(Clone, Debug)]
pub struct Context {
    pub(crate) n: usize,
    pub(crate) rings: Vec<Arc<Ring<u64>>>,
    pub(crate) bit_reverse: Arc<Vec<usize>>,
    pub(crate) modulus: Arc<BigUint>,
}

impl Context {
    pub fn log_n(&self) -> usize {
        self.n.trailing_zeros() as usize
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of limbs.
    pub fn limbs(&self) -> usize {
        self.rings.len()
    }

    /// Index of the last limb.
    pub fn level(&self) -> usize {
        self.rings.len() - 1
    }

    pub fn rings(&self) -> &[Arc<Ring<u64>>] {
        &self.rings
    }

    pub fn ring(&self, i: usize) -> &Ring<u64> {
        &self.rings[i]
    }

    /// Limb moduli, in order.
    pub fn moduli(&self) -> Vec<u64> {
        self.rings.iter().map(|r| r.modulus.q).collect()
    }

    /// Product of the limb moduli.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Bit-reversal permutation of [0, n).
    pub fn bit_reverse_table(&self) -> &[usize] {
        &self.bit_reverse
    }

    /// Zero polynomial over every limb.
    pub fn new_poly(&self) -> PolyRNS<u64> {
        PolyRNS::<u64>::new(self.n(), self.level())
    }

    /// Zero polynomial over the first level+1 limbs.
    pub fn new_poly_lvl(&self, level: usize) -> PolyRNS<u64> {
        PolyRNS::<u64>::new(self.n(), level)
    }
}
