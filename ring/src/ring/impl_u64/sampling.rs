use crate::error::{Error, Result};
use crate::modulus::WordOps;
use crate::poly::{Poly, PolyRNS, Representation};
use crate::ring::{Context, Ring};
use rand_core::{OsRng, TryRngCore};

impl Ring<u64> {
    /// Fills a with uniform values in [0, q) by masked rejection sampling.
    pub fn fill_uniform<R: TryRngCore + ?Sized>(&self, source: &mut R, a: &mut Poly<u64>) -> std::result::Result<(), R::Error> {
        let q: u64 = self.modulus.q;
        let mask: u64 = q.mask();
        for x in a.0.iter_mut() {
            let mut r: u64 = source.try_next_u64()? & mask;
            while r >= q {
                r = source.try_next_u64()? & mask;
            }
            *x = r;
        }
        Ok(())
    }

    /// Writes the residues of small signed values into a.
    pub fn fill_signed(&self, values: &[i64], a: &mut Poly<u64>) {
        debug_assert!(values.len() == a.n(), "values.len()={} != a.n()={}", values.len(), a.n());
        let q: u64 = self.modulus.q;
        a.0.iter_mut().zip(values.iter()).for_each(|(x, &v)| {
            let r: u64 = v.unsigned_abs() % q;
            *x = if v < 0 && r != 0 { q - r } else { r };
        });
    }
}

impl Context {
    /// Fills every limb of a with independent uniform residues.
    pub fn fill_uniform<R: TryRngCore + ?Sized>(&self, source: &mut R, a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        for (ring, p) in self.rings.iter().zip(a.iter_mut()) {
            ring.fill_uniform(source, p).map_err(Error::entropy)?;
        }
        a.set_representation(Representation::COEFFS);
        Ok(())
    }

    /// Uniform polynomial drawn from the operating system RNG.
    pub fn new_uniform_poly(&self) -> Result<PolyRNS<u64>> {
        self.new_uniform_poly_from(&mut OsRng)
    }

    /// Uniform polynomial drawn from source.
    pub fn new_uniform_poly_from<R: TryRngCore + ?Sized>(&self, source: &mut R) -> Result<PolyRNS<u64>> {
        let mut a: PolyRNS<u64> = self.new_poly();
        self.fill_uniform(source, &mut a)?;
        Ok(a)
    }

    /// Writes the same small signed polynomial into every limb of a.
    pub fn set_small_coefficients(&self, values: &[i64], a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        if values.len() != self.n {
            return Err(Error::DegreeMismatch {
                expected: self.n,
                got: values.len(),
            });
        }
        self.rings
            .iter()
            .zip(a.iter_mut())
            .for_each(|(ring, p)| ring.fill_signed(values, p));
        a.set_representation(Representation::COEFFS);
        Ok(())
    }
}
