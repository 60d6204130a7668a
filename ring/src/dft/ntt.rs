use crate::error::Result;
use crate::modulus::barrett::Barrett;
use crate::modulus::montgomery::Montgomery;
use crate::modulus::prime::Prime;
use crate::modulus::ReduceOnce;
use crate::modulus::WordOps;
use crate::modulus::{BARRETT, NONE, ONCE};
use itertools::izip;
use tracing::trace;

/// Negacyclic NTT tables of a prime q = 1 mod 2n.
///
/// The forward transform maps the coefficients of a(X) in Z_q[X]/(X^n+1) to
/// its evaluations in bit-reversed order: entry j holds a(psi^(2*brv(j)+1)),
/// where psi is a primitive 2n-th root of unity and brv reverses log2(n) bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table<O> {
    prime: Prime<O>,
    psi: O,
    psi_inv: O,
    psi_forward_rev: Vec<Barrett<O>>,
    psi_backward_rev: Vec<Barrett<O>>,
    n_inv: Barrett<O>,
    psi_n_inv: Barrett<O>,
    q: O,
    two_q: O,
    four_q: O,
}

impl Table<u64> {
    pub fn new(prime: Prime<u64>, nth_root: u64) -> Result<Table<u64>> {
        let psi: u64 = prime.primitive_nth_root(nth_root)?;
        let n: usize = (nth_root >> 1) as usize;

        let psi_mont: Montgomery<u64> = prime.montgomery.prepare::<ONCE>(psi);
        let psi_inv_mont: Montgomery<u64> = prime.montgomery.pow(psi_mont, prime.q - 2);

        let mut psi_forward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];
        let mut psi_backward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];

        psi_forward_rev[0] = prime.barrett.prepare(1);
        psi_backward_rev[0] = prime.barrett.prepare(1);

        let log_n: u32 = n.trailing_zeros();

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 1..n {
            let i_rev: usize = i.reverse_bits_msb(log_n);

            prime
                .montgomery
                .mul_external_assign::<ONCE>(psi_mont, &mut powers_forward);
            prime
                .montgomery
                .mul_external_assign::<ONCE>(psi_inv_mont, &mut powers_backward);

            psi_forward_rev[i_rev] = prime.barrett.prepare(powers_forward);
            psi_backward_rev[i_rev] = prime.barrett.prepare(powers_backward);
        }

        let n_inv: Barrett<u64> = prime.barrett.prepare(prime.inv(n as u64 % prime.q));
        let psi_n_inv: Barrett<u64> = if n > 1 {
            prime
                .barrett
                .prepare(prime.barrett.mul_external::<ONCE>(&n_inv, &psi_backward_rev[1].0))
        } else {
            n_inv
        };

        let q: u64 = prime.q();

        trace!(q, n, psi, "ntt table");

        Ok(Self {
            prime,
            psi,
            psi_inv: prime.montgomery.unprepare::<ONCE>(psi_inv_mont),
            psi_forward_rev,
            psi_backward_rev,
            n_inv,
            psi_n_inv,
            q,
            two_q: q << 1,
            four_q: q << 2,
        })
    }

    /// Primitive 2n-th root of unity.
    pub fn psi(&self) -> u64 {
        self.psi
    }

    pub fn psi_inv(&self) -> u64 {
        self.psi_inv
    }

    pub fn n(&self) -> usize {
        self.psi_forward_rev.len()
    }
}

impl Table<u64> {
    /// Output in [0, q) or, if LAZY, in [0, 2q).
    pub fn forward_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        self.forward_inplace_core::<LAZY, 0, 0>(a);
    }

    pub fn forward_inplace_core<const LAZY: bool, const SKIPSTART: u8, const SKIPEND: u8>(&self, a: &mut [u64]) {
        let n: usize = a.len();
        assert!(
            n == self.n(),
            "invalid a.len()={} != table n={}",
            n,
            self.n()
        );
        let log_n: u32 = n.trailing_zeros();

        let start: u32 = SKIPSTART as u32;
        let end: u32 = log_n - (SKIPEND as u32);

        for layer in start..end {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            let t: usize = 2 * size;
            if layer == log_n - 1 {
                if LAZY {
                    izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                        let (a, b) = a.split_at_mut(size);
                        self.dit_inplace::<false>(&mut a[0], &mut b[0], psi);
                        debug_assert!(
                            a[0] < self.two_q,
                            "forward_inplace_core::<LAZY=true> output {} > {} (2q-1)",
                            a[0],
                            self.two_q - 1
                        );
                        debug_assert!(
                            b[0] < self.two_q,
                            "forward_inplace_core::<LAZY=true> output {} > {} (2q-1)",
                            b[0],
                            self.two_q - 1
                        );
                    });
                } else {
                    izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                        let (a, b) = a.split_at_mut(size);
                        self.dit_inplace::<true>(&mut a[0], &mut b[0], psi);
                        self.prime.barrett.reduce_assign::<BARRETT>(&mut a[0]);
                        self.prime.barrett.reduce_assign::<BARRETT>(&mut b[0]);
                        debug_assert!(
                            a[0] < self.q,
                            "forward_inplace_core::<LAZY=false> output {} > {} (q-1)",
                            a[0],
                            self.q - 1
                        );
                        debug_assert!(
                            b[0] < self.q,
                            "forward_inplace_core::<LAZY=false> output {} > {} (q-1)",
                            b[0],
                            self.q - 1
                        );
                    });
                }
            } else if t >= 16 {
                izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a.chunks_exact_mut(8), b.chunks_exact_mut(8)).for_each(|(a, b)| {
                        self.dit_inplace::<true>(&mut a[0], &mut b[0], psi);
                        self.dit_inplace::<true>(&mut a[1], &mut b[1], psi);
                        self.dit_inplace::<true>(&mut a[2], &mut b[2], psi);
                        self.dit_inplace::<true>(&mut a[3], &mut b[3], psi);
                        self.dit_inplace::<true>(&mut a[4], &mut b[4], psi);
                        self.dit_inplace::<true>(&mut a[5], &mut b[5], psi);
                        self.dit_inplace::<true>(&mut a[6], &mut b[6], psi);
                        self.dit_inplace::<true>(&mut a[7], &mut b[7], psi);
                    });
                });
            } else {
                izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dit_inplace::<true>(a, b, psi));
                });
            }
        }
    }

    /// Cooley-Tukey butterfly, inputs in [0, 4q).
    #[inline(always)]
    fn dit_inplace<const LAZY: bool>(&self, a: &mut u64, b: &mut u64, t: &Barrett<u64>) {
        debug_assert!(*a < self.four_q, "a:{} 4q:{}", a, self.four_q);
        debug_assert!(*b < self.four_q, "b:{} 4q:{}", b, self.four_q);
        a.reduce_once_assign(self.two_q);
        let bt: u64 = self.prime.barrett.mul_external::<NONE>(t, b);
        *b = *a + self.two_q - bt;
        *a += bt;
        if !LAZY {
            a.reduce_once_assign(self.two_q);
            b.reduce_once_assign(self.two_q);
        }
    }

    /// Input in [0, 2q), output in [0, q) or, if LAZY, in [0, 2q).
    pub fn backward_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        self.backward_inplace_core::<LAZY, 0, 0>(a);
    }

    pub fn backward_inplace_core<const LAZY: bool, const SKIPSTART: u8, const SKIPEND: u8>(&self, a: &mut [u64]) {
        let n: usize = a.len();
        assert!(
            n == self.n(),
            "invalid a.len()={} != table n={}",
            n,
            self.n()
        );
        let log_n: u32 = n.trailing_zeros();

        let start: u32 = SKIPEND as u32;
        let end: u32 = log_n - (SKIPSTART as u32);

        for layer in (start..end).rev() {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            let t: usize = 2 * size;
            if layer == 0 {
                let (a, b) = a.split_at_mut(size);
                izip!(a, b).for_each(|(a, b)| {
                    self.dif_last_inplace::<LAZY>(a, b);
                });
            } else if t >= 16 {
                izip!(a.chunks_exact_mut(t), &self.psi_backward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a.chunks_exact_mut(8), b.chunks_exact_mut(8)).for_each(|(a, b)| {
                        self.dif_inplace::<true>(&mut a[0], &mut b[0], psi);
                        self.dif_inplace::<true>(&mut a[1], &mut b[1], psi);
                        self.dif_inplace::<true>(&mut a[2], &mut b[2], psi);
                        self.dif_inplace::<true>(&mut a[3], &mut b[3], psi);
                        self.dif_inplace::<true>(&mut a[4], &mut b[4], psi);
                        self.dif_inplace::<true>(&mut a[5], &mut b[5], psi);
                        self.dif_inplace::<true>(&mut a[6], &mut b[6], psi);
                        self.dif_inplace::<true>(&mut a[7], &mut b[7], psi);
                    });
                });
            } else {
                izip!(a.chunks_exact_mut(t), &self.psi_backward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dif_inplace::<true>(a, b, psi));
                });
            }
        }

        // n = 1: the transform is the identity, only normalize.
        if log_n == 0 && !LAZY {
            a[0].reduce_once_assign(self.q);
        }
    }

    /// Gentleman-Sande butterfly, inputs in [0, 2q).
    #[inline(always)]
    fn dif_inplace<const LAZY: bool>(&self, a: &mut u64, b: &mut u64, t: &Barrett<u64>) {
        debug_assert!(*a < self.two_q, "a:{} 2q:{}", a, self.two_q);
        debug_assert!(*b < self.two_q, "b:{} 2q:{}", b, self.two_q);
        let d: u64 = self
            .prime
            .barrett
            .mul_external::<NONE>(t, &(*a + self.two_q - *b));
        *a += *b;
        a.reduce_once_assign(self.two_q);
        *b = d;
        if !LAZY {
            a.reduce_once_assign(self.q);
            b.reduce_once_assign(self.q);
        }
    }

    /// Last butterfly with n^-1 folded in.
    #[inline(always)]
    fn dif_last_inplace<const LAZY: bool>(&self, a: &mut u64, b: &mut u64) {
        debug_assert!(*a < self.two_q);
        debug_assert!(*b < self.two_q);
        if LAZY {
            let d: u64 = self
                .prime
                .barrett
                .mul_external::<NONE>(&self.psi_n_inv, &(*a + self.two_q - *b));
            *a = self
                .prime
                .barrett
                .mul_external::<NONE>(&self.n_inv, &(*a + *b));
            *b = d;
        } else {
            let d: u64 = self
                .prime
                .barrett
                .mul_external::<ONCE>(&self.psi_n_inv, &(*a + self.two_q - *b));
            *a = self
                .prime
                .barrett
                .mul_external::<ONCE>(&self.n_inv, &(*a + *b));
            *b = d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_evaluations(prime: &Prime<u64>, psi: u64, a: &[u64]) -> Vec<u64> {
        let n: usize = a.len();
        let log_n: u32 = n.trailing_zeros();
        (0..n)
            .map(|j| {
                let x: u64 = prime.pow(psi, 2 * j.reverse_bits_msb(log_n) as u64 + 1);
                let mut acc: u64 = 0;
                let mut x_pow: u64 = 1;
                for &c in a {
                    acc = (acc + prime.barrett.mul(c, x_pow)) % prime.q;
                    x_pow = prime.barrett.mul(x_pow, x);
                }
                acc
            })
            .collect()
    }

    #[test]
    fn test_ntt() {
        let prime: Prime<u64> = Prime::new(0x1fffffffffe00001).unwrap();
        for log_n in 0..8 {
            let n: usize = 1 << log_n;
            let table: Table<u64> = Table::new(prime, 2 * n as u64).unwrap();
            let a: Vec<u64> = (0..n as u64).map(|i| i.wrapping_mul(0x9e3779b97f4a7c15) % prime.q).collect();
            let mut b: Vec<u64> = a.clone();
            table.forward_inplace::<false>(&mut b);
            assert_eq!(b, naive_evaluations(&prime, table.psi(), &a), "n={}", n);
            table.backward_inplace::<false>(&mut b);
            assert_eq!(a, b, "n={}", n);
        }
    }

    #[test]
    fn test_ntt_lazy() {
        let prime: Prime<u64> = Prime::new(0x1fffffffffc80001).unwrap();
        let n: usize = 64;
        let table: Table<u64> = Table::new(prime, 2 * n as u64).unwrap();
        let a: Vec<u64> = (0..n as u64).map(|i| prime.q - 1 - i).collect();
        let mut b: Vec<u64> = a.clone();
        table.forward_inplace::<true>(&mut b);
        assert!(b.iter().all(|&x| x < 2 * prime.q));
        table.backward_inplace::<true>(&mut b);
        b.iter_mut().for_each(|x| x.reduce_once_assign(prime.q));
        assert_eq!(a, b);
    }

    #[test]
    fn psi_inv_is_inverse() {
        let prime: Prime<u64> = Prime::new(0x1fffffffffb40001).unwrap();
        let table: Table<u64> = Table::new(prime, 1 << 12).unwrap();
        assert_eq!(prime.barrett.mul(table.psi(), table.psi_inv()), 1);
    }
}
