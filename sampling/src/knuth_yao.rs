use rand_core::TryRngCore;

/// Number of fractional bits of each probability in the matrix.
pub const PRECISION: u32 = 63;

/// Knuth-Yao sampler for the discrete Gaussian of standard deviation
/// `sigma` centred at zero and truncated to [-bound, bound].
///
/// Row `x` of the probability matrix stores `Pr[|X| = x]` as a fixed-point
/// value with [`PRECISION`] fractional bits. A sample walks the
/// discrete-distribution-generating tree column by column, consuming one
/// random bit per column, and restarts when it falls off the truncated tree.
#[derive(Clone, Debug)]
pub struct KnuthYao {
    sigma: f64,
    bound: usize,
    matrix: Vec<u64>,
}

impl KnuthYao {
    /// Returns `None` if `sigma` is not a positive finite value or `bound` is zero.
    pub fn new(sigma: f64, bound: usize) -> Option<Self> {
        if !sigma.is_finite() || sigma <= 0.0 || bound == 0 {
            return None;
        }

        let two_sigma_sq: f64 = 2.0 * sigma * sigma;
        let rho: Vec<f64> = (0..=bound)
            .map(|x| (-((x * x) as f64) / two_sigma_sq).exp())
            .collect();
        let total: f64 = rho[0] + 2.0 * rho[1..].iter().sum::<f64>();
        let scale: f64 = (1u64 << PRECISION) as f64;

        let matrix: Vec<u64> = rho
            .iter()
            .enumerate()
            .map(|(x, r)| {
                let p: f64 = if x == 0 { r / total } else { 2.0 * r / total };
                (p * scale) as u64
            })
            .collect();

        Some(Self {
            sigma,
            bound,
            matrix,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Draws one signed sample in [-bound, bound].
    pub fn sample<R: TryRngCore + ?Sized>(&self, rng: &mut R) -> Result<i64, R::Error> {
        loop {
            let r: u64 = rng.try_next_u64()?;
            let negative: bool = r >> 63 == 1;
            let mut d: i64 = 0;
            for col in 0..PRECISION {
                d = 2 * d + ((r >> col) & 1) as i64;
                let shift: u32 = PRECISION - 1 - col;
                for (row, p) in self.matrix.iter().enumerate().rev() {
                    d -= ((p >> shift) & 1) as i64;
                    if d == -1 {
                        let x: i64 = row as i64;
                        return Ok(if negative { -x } else { x });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;

    #[test]
    fn rejects_invalid_parameters() {
        assert!(KnuthYao::new(0.0, 19).is_none());
        assert!(KnuthYao::new(-1.0, 19).is_none());
        assert!(KnuthYao::new(f64::NAN, 19).is_none());
        assert!(KnuthYao::new(3.19, 0).is_none());
    }

    #[test]
    fn matrix_mass_is_close_to_one() {
        let ky: KnuthYao = KnuthYao::new(3.19, 19).unwrap();
        let mass: f64 = ky.matrix.iter().map(|p| *p as f64).sum::<f64>() / (1u64 << PRECISION) as f64;
        assert!((mass - 1.0).abs() < 1e-9, "mass = {mass}");
    }

    #[test]
    fn statistics_match_sigma() {
        let sigma: f64 = 3.19;
        let bound: usize = (6.0 * sigma) as usize;
        let ky: KnuthYao = KnuthYao::new(sigma, bound).unwrap();
        let mut source: Source = Source::new([0u8; 32]);

        let samples: Vec<i64> = (0..1 << 16).map(|_| ky.sample(&mut source).unwrap()).collect();

        assert!(samples.iter().all(|x| x.unsigned_abs() as usize <= bound));

        let n: f64 = samples.len() as f64;
        let mean: f64 = samples.iter().map(|x| *x as f64).sum::<f64>() / n;
        let var: f64 = samples.iter().map(|x| (*x as f64 - mean).powi(2)).sum::<f64>() / n;

        assert!(mean.abs() < 0.1, "mean = {mean}");
        assert!((var.sqrt() - sigma).abs() < 0.1, "std = {}", var.sqrt());
    }

    #[test]
    fn different_sources_differ() {
        let ky: KnuthYao = KnuthYao::new(3.19, 19).unwrap();
        let mut a: Source = Source::new([0u8; 32]);
        let mut b: Source = Source::new([1u8; 32]);
        let va: Vec<i64> = (0..256).map(|_| ky.sample(&mut a).unwrap()).collect();
        let vb: Vec<i64> = (0..256).map(|_| ky.sample(&mut b).unwrap()).collect();
        assert_ne!(va, vb);
    }
}
