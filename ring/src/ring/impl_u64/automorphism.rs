use crate::error::{Error, Result};
use crate::modulus::WordOps;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Context, Ring};
use itertools::izip;

/// Gather table of X -> X^gal_el in the bit-reversed NTT domain:
/// the automorphism maps b[j] = a[index[j]].
///
/// Panics if n is not a power of two or gal_el is even.
pub fn automorphism_index(n: usize, gal_el: usize) -> Vec<usize> {
    assert!(n.is_power_of_two(), "invalid n={}: not a power-of-two", n);
    assert!(gal_el & 1 == 1, "invalid gal_el={}: not coprime with 2n={}", gal_el, 2 * n);
    let mask: usize = (n << 1) - 1;
    let log_n: u32 = n.trailing_zeros();
    let gal_el: usize = gal_el & mask;
    (0..n)
        .map(|j| {
            let j_odd: usize = (j.reverse_bits_msb(log_n) << 1) | 1;
            let m: usize = ((j_odd * gal_el) & mask) >> 1;
            m.reverse_bits_msb(log_n)
        })
        .collect()
}

impl Ring<u64> {
    /// b(X) <- a(X^gal_el) for a in the coefficient domain.
    pub fn automorphism(&self, a: &Poly<u64>, gal_el: usize, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(gal_el & 1 == 1, "invalid gal_el={}: even", gal_el);
        let n: usize = self.n();
        let log_n: usize = self.log_n();
        let q: u64 = self.modulus.q;
        let gal_el: usize = gal_el & ((n << 1) - 1);
        a.0.iter().enumerate().for_each(|(i, &ai)| {
            let gal_el_i: usize = i * gal_el;
            let i_out: usize = gal_el_i & (n - 1);
            if (gal_el_i >> log_n) & 1 == 1 && ai != 0 {
                b.0[i_out] = q - ai;
            } else {
                b.0[i_out] = ai;
            }
        });
    }
}

impl Context {
    /// See [automorphism_index].
    pub fn automorphism_index(&self, gal_el: usize) -> Result<Vec<usize>> {
        if gal_el & 1 == 0 {
            return Err(Error::InvalidArgument(format!(
                "gal_el={} is not coprime with 2n={}",
                gal_el,
                2 * self.n
            )));
        }
        Ok(automorphism_index(self.n, gal_el))
    }

    /// b(X) <- a(X^gal_el), gal_el odd, a in the coefficient domain.
    pub fn automorphism(&self, a: &PolyRNS<u64>, gal_el: usize, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        if gal_el & 1 == 0 {
            return Err(Error::InvalidArgument(format!("gal_el={} is even", gal_el)));
        }
        debug_assert!(!a.is_ntt(), "automorphism expects the coefficient domain");
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.automorphism(a, gal_el, b));
        b.repr = a.repr;
        Ok(())
    }

    /// b(X) <- a(X^gal_el), gal_el odd, a in the NTT domain.
    pub fn automorphism_ntt(&self, a: &PolyRNS<u64>, gal_el: usize, b: &mut PolyRNS<u64>) -> Result<()> {
        let index: Vec<usize> = self.automorphism_index(gal_el)?;
        self.automorphism_ntt_with_index(a, &index, b)
    }

    /// [Context::automorphism_ntt] with a table from [Context::automorphism_index].
    pub fn automorphism_ntt_with_index(&self, a: &PolyRNS<u64>, index: &[usize], b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        if index.len() != self.n {
            return Err(Error::DegreeMismatch {
                expected: self.n,
                got: index.len(),
            });
        }
        debug_assert!(a.is_ntt(), "automorphism_ntt expects the NTT domain");
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.permute(a, index, b));
        b.repr = a.repr;
        Ok(())
    }
}
