use crate::error::{Error, Result};
use crate::modulus::{WordOps, BARRETT, ONCE};
use crate::num_bigint::modulus_product;
use crate::poly::{PolyRNS, Representation};
use crate::ring::{is_valid_degree, Context, Ring};
use itertools::izip;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;
use std::sync::Arc;
use tracing::debug;

impl Context {
    /// Builds the RNS context of Z_Q[X]/(X^n+1), Q = prod(moduli).
    ///
    /// n must be a power of two no larger than 2^[crate::ring::MAX_LOG_N].
    /// Every modulus must be a distinct prime of at most 61 bits with
    /// q = 1 mod 2n. The per-limb NTT tables and the bit-reversal table are
    /// derived here and never change afterwards.
    pub fn new(n: usize, moduli: &[u64]) -> Result<Self> {
        if !is_valid_degree(n) {
            return Err(Error::InvalidRingDegree { n });
        }
        if moduli.is_empty() {
            return Err(Error::EmptyModuli);
        }
        for (i, q) in moduli.iter().enumerate() {
            if moduli[..i].contains(q) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate modulus q={} at index {}",
                    q, i
                )));
            }
        }

        let rings: Vec<Arc<Ring<u64>>> = moduli
            .iter()
            .map(|&q| Ring::new(n, q).map(Arc::new))
            .collect::<Result<_>>()?;

        let log_n: u32 = n.trailing_zeros();
        let bit_reverse: Vec<usize> = (0..n).map(|i| i.reverse_bits_msb(log_n)).collect();

        debug!(n, limbs = moduli.len(), "context");

        Ok(Self {
            n,
            rings,
            bit_reverse: Arc::new(bit_reverse),
            modulus: Arc::new(modulus_product(moduli)),
        })
    }

    /// Context over the first level+1 limbs, sharing the tables of self.
    pub fn at_level(&self, level: usize) -> Result<Context> {
        if level > self.level() {
            return Err(Error::LevelMismatch {
                expected: self.limbs(),
                got: level + 1,
            });
        }
        let rings: Vec<Arc<Ring<u64>>> = self.rings[..level + 1].to_vec();
        let moduli: Vec<u64> = rings.iter().map(|r| r.modulus.q).collect();
        Ok(Self {
            n: self.n,
            rings,
            bit_reverse: self.bit_reverse.clone(),
            modulus: Arc::new(modulus_product(&moduli)),
        })
    }

    /// Fails unless a has degree n and exactly one limb per modulus.
    pub fn check_poly(&self, a: &PolyRNS<u64>) -> Result<()> {
        if a.limbs() != self.limbs() {
            return Err(Error::LevelMismatch {
                expected: self.limbs(),
                got: a.limbs(),
            });
        }
        if a.iter().any(|p| p.n() != self.n) {
            let got: usize = a.iter().map(|p| p.n()).find(|&n| n != self.n).unwrap_or(0);
            return Err(Error::DegreeMismatch {
                expected: self.n,
                got,
            });
        }
        Ok(())
    }

    pub(crate) fn check_polys(&self, polys: &[&PolyRNS<u64>]) -> Result<()> {
        polys.iter().try_for_each(|p| self.check_poly(p))
    }
}

impl Context {
    pub fn ntt(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.ntt::<false>(a, b));
        b.repr = Representation {
            ntt: true,
            montgomery: a.repr.montgomery,
        };
        Ok(())
    }

    pub fn ntt_inplace(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        izip!(self.rings.iter(), a.iter_mut()).for_each(|(ring, a)| ring.ntt_inplace::<false>(a));
        a.repr.ntt = true;
        Ok(())
    }

    pub fn inv_ntt(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.intt::<false>(a, b));
        b.repr = Representation {
            ntt: false,
            montgomery: a.repr.montgomery,
        };
        Ok(())
    }

    pub fn inv_ntt_inplace(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        izip!(self.rings.iter(), a.iter_mut()).for_each(|(ring, a)| ring.intt_inplace::<false>(a));
        a.repr.ntt = false;
        Ok(())
    }

    /// b[i][j] <- a[i][brv(j)]. An involution.
    pub fn bit_reverse(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.permute(a, &self.bit_reverse, b));
        b.repr = a.repr;
        Ok(())
    }

    pub fn bit_reverse_inplace(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        a.iter_mut().for_each(|p| {
            self.bit_reverse.iter().enumerate().for_each(|(i, &j)| {
                if i < j {
                    p.0.swap(i, j)
                }
            })
        });
        Ok(())
    }
}

impl Context {
    pub fn add(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, b, &*c])?;
        debug_assert!(a.repr == b.repr, "a.repr={:?} != b.repr={:?}", a.repr, b.repr);
        izip!(self.rings.iter(), a.iter(), b.iter(), c.iter_mut())
            .for_each(|(ring, a, b, c)| ring.add::<ONCE>(a, b, c));
        c.repr = a.repr;
        Ok(())
    }

    /// b <- b + a.
    pub fn add_inplace(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        debug_assert!(a.repr == b.repr, "a.repr={:?} != b.repr={:?}", a.repr, b.repr);
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.add_inplace::<ONCE>(a, b));
        Ok(())
    }

    /// c <- a - b.
    pub fn sub(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, b, &*c])?;
        debug_assert!(a.repr == b.repr, "a.repr={:?} != b.repr={:?}", a.repr, b.repr);
        izip!(self.rings.iter(), a.iter(), b.iter(), c.iter_mut())
            .for_each(|(ring, a, b, c)| ring.sub::<1, ONCE>(a, b, c));
        c.repr = a.repr;
        Ok(())
    }

    /// b <- b - a.
    pub fn sub_inplace(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        debug_assert!(a.repr == b.repr, "a.repr={:?} != b.repr={:?}", a.repr, b.repr);
        izip!(self.rings.iter(), a.iter(), b.iter_mut()).for_each(|(ring, a, b)| {
            ring.sub_inplace::<1, ONCE>(a, b);
            ring.neg_inplace::<1, ONCE>(b);
        });
        Ok(())
    }

    pub fn neg(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.neg::<1, ONCE>(a, b));
        b.repr = a.repr;
        Ok(())
    }

    pub fn neg_inplace(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        izip!(self.rings.iter(), a.iter_mut()).for_each(|(ring, a)| ring.neg_inplace::<1, ONCE>(a));
        Ok(())
    }

    /// Maps every coefficient into [0, q). Idempotent.
    pub fn reduce(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        b.copy(a);
        self.reduce_inplace(b)
    }

    pub fn reduce_inplace(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        izip!(self.rings.iter(), a.iter_mut()).for_each(|(ring, a)| ring.reduce_inplace::<BARRETT>(a));
        Ok(())
    }

    pub fn mform(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        debug_assert!(!a.is_montgomery(), "a is already in Montgomery form");
        izip!(self.rings.iter(), a.iter(), b.iter_mut()).for_each(|(ring, a, b)| ring.mform(a, b));
        b.repr = Representation {
            ntt: a.repr.ntt,
            montgomery: true,
        };
        Ok(())
    }

    pub fn mform_inplace(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        debug_assert!(!a.is_montgomery(), "a is already in Montgomery form");
        izip!(self.rings.iter(), a.iter_mut()).for_each(|(ring, a)| ring.mform_inplace(a));
        a.repr.montgomery = true;
        Ok(())
    }

    pub fn inv_mform(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        debug_assert!(a.is_montgomery(), "a is not in Montgomery form");
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.inv_mform(a, b));
        b.repr = Representation {
            ntt: a.repr.ntt,
            montgomery: false,
        };
        Ok(())
    }

    pub fn inv_mform_inplace(&self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        debug_assert!(a.is_montgomery(), "a is not in Montgomery form");
        izip!(self.rings.iter(), a.iter_mut()).for_each(|(ring, a)| ring.inv_mform_inplace(a));
        a.repr.montgomery = false;
        Ok(())
    }
}

impl Context {
    /// Deep copy of a.
    pub fn copy_new(&self, a: &PolyRNS<u64>) -> Result<PolyRNS<u64>> {
        self.check_poly(a)?;
        Ok(a.copy_new())
    }

    pub fn copy(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        b.copy(a);
        Ok(())
    }

    /// Exact comparison of every coefficient of every limb.
    pub fn equal(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>) -> bool {
        self.check_polys(&[a, &*b]).is_ok() && a == b
    }
}

impl Context {
    /// b[i] <- a[(i - k) mod n] on every limb.
    pub fn shift(&self, a: &PolyRNS<u64>, k: usize, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.shift(a, k, b));
        b.repr = a.repr;
        Ok(())
    }

    pub fn shift_inplace(&self, k: usize, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        izip!(self.rings.iter(), a.iter_mut()).for_each(|(ring, a)| ring.shift_inplace(k, a));
        Ok(())
    }

    /// b(X) <- a(psi_i^(-2k) X) on every limb i. a must be in the
    /// coefficient domain.
    ///
    /// Since the NTT of limb i evaluates at psi_i^(2brv(j)+1), bit reversing
    /// before the inverse NTT and after the forward NTT turns this into a
    /// cyclic shift by k.
    pub fn rotate(&self, a: &PolyRNS<u64>, k: usize, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        debug_assert!(!a.is_ntt(), "rotate expects the coefficient domain");
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.rotate(a, k, b));
        b.repr = a.repr;
        Ok(())
    }

    pub fn rotate_inplace(&self, k: usize, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        debug_assert!(!a.is_ntt(), "rotate expects the coefficient domain");
        izip!(self.rings.iter(), a.iter_mut()).for_each(|(ring, a)| ring.rotate_inplace(k, a));
        Ok(())
    }

    /// b <- a * X^k in Z_Q[X]/(X^n+1), k taken mod 2n.
    pub fn mult_by_monomial(&self, a: &PolyRNS<u64>, k: usize, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        debug_assert!(!a.is_ntt(), "mult_by_monomial expects the coefficient domain");
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.mult_by_monomial(a, k, b));
        b.repr = a.repr;
        Ok(())
    }

    pub fn mult_by_monomial_inplace(&self, k: usize, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        debug_assert!(!a.is_ntt(), "mult_by_monomial expects the coefficient domain");
        izip!(self.rings.iter(), a.iter_mut())
            .for_each(|(ring, a)| ring.mult_by_monomial_inplace(k, a));
        Ok(())
    }

    pub fn mul_scalar(&self, a: &PolyRNS<u64>, scalar: u64, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        izip!(self.rings.iter(), a.iter(), b.iter_mut())
            .for_each(|(ring, a, b)| ring.mul_scalar::<ONCE>(a, &scalar, b));
        b.repr = a.repr;
        Ok(())
    }

    pub fn mul_scalar_inplace(&self, scalar: u64, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        izip!(self.rings.iter(), a.iter_mut())
            .for_each(|(ring, a)| ring.mul_scalar_inplace::<ONCE>(&scalar, a));
        Ok(())
    }

    /// Multiplies by an arbitrary precision scalar, reduced per limb.
    /// Negative scalars multiply by their residue mod q_i.
    pub fn mul_scalar_bigint(&self, a: &PolyRNS<u64>, scalar: &BigInt, b: &mut PolyRNS<u64>) -> Result<()> {
        self.check_polys(&[a, &*b])?;
        let residues: Vec<u64> = self.scalar_residues(scalar);
        izip!(self.rings.iter(), a.iter(), b.iter_mut(), residues.iter())
            .for_each(|(ring, a, b, s)| ring.mul_scalar::<ONCE>(a, s, b));
        b.repr = a.repr;
        Ok(())
    }

    pub fn mul_scalar_bigint_inplace(&self, scalar: &BigInt, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        let residues: Vec<u64> = self.scalar_residues(scalar);
        izip!(self.rings.iter(), a.iter_mut(), residues.iter())
            .for_each(|(ring, a, s)| ring.mul_scalar_inplace::<ONCE>(s, a));
        Ok(())
    }

    /// scalar mod q_i in [0, q_i) for every limb.
    pub(crate) fn scalar_residues(&self, scalar: &BigInt) -> Vec<u64> {
        let magnitude: &BigUint = scalar.magnitude();
        self.rings
            .iter()
            .map(|ring| {
                let q: u64 = ring.modulus.q;
                let r: u64 = (magnitude % q).to_u64().unwrap_or(0);
                if scalar.sign() == Sign::Minus && r != 0 {
                    q - r
                } else {
                    r
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODULI: [u64; 3] = [0x1fffffffffe00001, 0x1fffffffffc80001, 0x1fffffffffb40001];

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(Context::new(24, &MODULI), Err(Error::InvalidRingDegree { n: 24 })));
        assert!(matches!(
            Context::new(1 << 21, &MODULI),
            Err(Error::InvalidRingDegree { n: 2097152 })
        ));
        assert!(matches!(Context::new(16, &[]), Err(Error::EmptyModuli)));
        assert!(matches!(
            Context::new(16, &[MODULI[0], MODULI[0]]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Context::new(16, &[MODULI[0], 95]),
            Err(Error::NotPrime { .. })
        ));
    }

    #[test]
    fn modulus_is_product_of_limbs() {
        let context = Context::new(16, &MODULI).unwrap();
        let want: BigUint = MODULI.iter().map(|&q| BigUint::from(q)).product();
        assert_eq!(context.modulus(), &want);
        assert_eq!(context.moduli(), MODULI.to_vec());

        let lower = context.at_level(1).unwrap();
        assert_eq!(lower.limbs(), 2);
        assert_eq!(lower.modulus(), &(BigUint::from(MODULI[0]) * MODULI[1]));
        assert!(context.at_level(3).is_err());
    }

    #[test]
    fn shape_mismatch_does_not_mutate() {
        let context = Context::new(16, &MODULI).unwrap();
        let mut a = context.new_poly();
        a.set_all(&3);
        let b = context.new_poly_lvl(1);
        let mut c = context.new_poly();
        c.set_all(&9);

        assert!(matches!(
            context.add(&a, &b, &mut c),
            Err(Error::LevelMismatch { expected: 3, got: 2 })
        ));
        assert!(c.iter().all(|p| p.0.iter().all(|&x| x == 9)));

        let d: PolyRNS<u64> = PolyRNS::new(32, 2);
        assert!(matches!(
            context.add_inplace(&d, &mut a),
            Err(Error::DegreeMismatch { expected: 16, got: 32 })
        ));
        assert!(a.iter().all(|p| p.0.iter().all(|&x| x == 3)));
    }

    #[test]
    fn sub_inplace_subtracts_a_from_b() {
        let context = Context::new(16, &MODULI).unwrap();
        let mut a = context.new_poly();
        let mut b = context.new_poly();
        a.set_all(&5);
        b.set_all(&3);
        context.sub_inplace(&a, &mut b).unwrap();
        izip!(b.iter(), MODULI.iter()).for_each(|(p, q)| assert!(p.0.iter().all(|&x| x == q - 2)));

        let mut c = context.new_poly();
        context.sub(&a, &b, &mut c).unwrap();
        assert!(c.iter().all(|p| p.0.iter().all(|&x| x == 7)));
    }

    #[test]
    fn bit_reverse_is_an_involution() {
        let context = Context::new(32, &MODULI).unwrap();
        let mut a = context.new_poly();
        a.iter_mut()
            .for_each(|p| p.0.iter_mut().enumerate().for_each(|(j, x)| *x = j as u64));
        let mut b = context.new_poly();
        context.bit_reverse(&a, &mut b).unwrap();
        assert_eq!(b.at(0).0[1], 16);
        let mut c = b.copy_new();
        context.bit_reverse_inplace(&mut c).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn negative_scalar_residues() {
        let context = Context::new(16, &MODULI).unwrap();
        let residues = context.scalar_residues(&BigInt::from(-1));
        assert_eq!(residues, MODULI.iter().map(|q| q - 1).collect::<Vec<_>>());
        let residues = context.scalar_residues(&BigInt::from(MODULI[1]));
        assert_eq!(residues[1], 0);
    }
}
