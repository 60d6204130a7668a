use crate::error::{Error, Result};
use crate::num_bigint::{center, reduce};
use crate::poly::{PolyRNS, Representation};
use crate::ring::Context;
use num_bigint::{BigInt, BigUint};
use num_traits::{ToPrimitive, Zero};

impl Context {
    /// (Q/q_i) * ((Q/q_i)^-1 mod q_i) for every limb i.
    pub(crate) fn crt_coefficients(&self) -> Vec<BigUint> {
        let modulus: &BigUint = self.modulus();
        self.rings
            .iter()
            .map(|ring| {
                let q: u64 = ring.modulus.q;
                let q_hat: BigUint = modulus / q;
                let q_hat_mod_q: u64 = (&q_hat % q).to_u64().unwrap_or(0);
                q_hat * ring.modulus.inv(q_hat_mod_q)
            })
            .collect()
    }

    fn check_coefficients(&self, len: usize) -> Result<()> {
        if len != self.n {
            return Err(Error::DegreeMismatch {
                expected: self.n,
                got: len,
            });
        }
        Ok(())
    }

    /// Writes coeffs mod q_i into every limb of a. Negative values map to
    /// their positive residue.
    pub fn set_coefficients_bigint(&self, coeffs: &[BigInt], a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        self.check_coefficients(coeffs.len())?;
        self.rings.iter().zip(a.iter_mut()).for_each(|(ring, p)| {
            let q: BigUint = BigUint::from(ring.modulus.q);
            p.0.iter_mut()
                .zip(coeffs.iter())
                .for_each(|(x, c)| *x = reduce(c, &q).to_u64().unwrap_or(0));
        });
        a.repr = Representation::COEFFS;
        Ok(())
    }

    pub fn set_coefficients_u64(&self, coeffs: &[u64], a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        self.check_coefficients(coeffs.len())?;
        self.rings.iter().zip(a.iter_mut()).for_each(|(ring, p)| {
            let q: u64 = ring.modulus.q;
            p.0.iter_mut()
                .zip(coeffs.iter())
                .for_each(|(x, &c)| *x = c % q);
        });
        a.repr = Representation::COEFFS;
        Ok(())
    }

    pub fn set_coefficients_i64(&self, coeffs: &[i64], a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        self.check_coefficients(coeffs.len())?;
        self.rings.iter().zip(a.iter_mut()).for_each(|(ring, p)| {
            let q: u64 = ring.modulus.q;
            p.0.iter_mut().zip(coeffs.iter()).for_each(|(x, &c)| {
                let r: u64 = c.unsigned_abs() % q;
                *x = if c < 0 && r != 0 { q - r } else { r };
            });
        });
        a.repr = Representation::COEFFS;
        Ok(())
    }

    /// CRT reconstruction of every coefficient, in [0, Q).
    pub fn to_biguint(&self, a: &PolyRNS<u64>) -> Result<Vec<BigUint>> {
        self.check_poly(a)?;
        debug_assert!(!a.is_ntt() && !a.is_montgomery(), "to_biguint expects plain coefficients");
        let crt: Vec<BigUint> = self.crt_coefficients();
        let modulus: &BigUint = self.modulus();
        Ok((0..self.n)
            .map(|j| {
                let sum: BigUint = a
                    .iter()
                    .zip(crt.iter())
                    .fold(BigUint::zero(), |acc, (p, c)| acc + c * p.0[j]);
                sum % modulus
            })
            .collect())
    }

    /// CRT reconstruction of every coefficient, in (-Q/2, Q/2].
    pub fn to_bigint_centered(&self, a: &PolyRNS<u64>) -> Result<Vec<BigInt>> {
        let modulus: &BigUint = self.modulus();
        Ok(self
            .to_biguint(a)?
            .into_iter()
            .map(|x| center(x, modulus))
            .collect())
    }

    /// Decimal strings of the coefficients, in [0, Q).
    pub fn poly_to_string(&self, a: &PolyRNS<u64>) -> Result<Vec<String>> {
        Ok(self
            .to_biguint(a)?
            .iter()
            .map(|x| x.to_str_radix(10))
            .collect())
    }

    /// Parses decimal (optionally negative) coefficients into a.
    pub fn set_coefficients_string<S: AsRef<str>>(&self, coeffs: &[S], a: &mut PolyRNS<u64>) -> Result<()> {
        self.check_poly(a)?;
        self.check_coefficients(coeffs.len())?;
        let values: Vec<BigInt> = coeffs
            .iter()
            .map(|s| {
                let s: &str = s.as_ref();
                BigInt::parse_bytes(s.as_bytes(), 10).ok_or_else(|| Error::InvalidBigInt(s.to_string()))
            })
            .collect::<Result<_>>()?;
        self.set_coefficients_bigint(&values, a)
    }
}
