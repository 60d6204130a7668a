use std::cmp::PartialEq;

/// Coefficients of a polynomial modulo a single prime.
#[derive(Clone, Debug, Eq)]
pub struct Poly<O>(pub Vec<O>);

impl<O> Poly<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize) -> Self {
        Self(vec![O::default(); n])
    }

    pub fn n(&self) -> usize {
        self.0.len()
    }

    pub fn log_n(&self) -> usize {
        self.n().trailing_zeros() as usize
    }

    pub fn resize(&mut self, n: usize) {
        self.0.resize(n, O::default());
    }

    pub fn set_all(&mut self, v: &O) {
        self.0.fill(*v)
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    pub fn copy_from(&mut self, other: &Poly<O>) {
        if std::ptr::eq(self, other) {
            return;
        }
        self.resize(other.n());
        self.0.copy_from_slice(&other.0)
    }
}

impl<O: PartialEq> PartialEq for Poly<O> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || (self.0 == other.0)
    }
}

/// Domain and form a [PolyRNS] is currently held in.
///
/// Transforms update the tags; kernels check them in debug builds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Representation {
    /// Evaluations in bit-reversed order instead of coefficients.
    pub ntt: bool,
    /// Each residue multiplied by 2^64 mod q.
    pub montgomery: bool,
}

impl Representation {
    pub const COEFFS: Representation = Representation {
        ntt: false,
        montgomery: false,
    };
    pub const NTT: Representation = Representation {
        ntt: true,
        montgomery: false,
    };
}

/// A polynomial in RNS form, indexed `[limb][coefficient]`.
///
/// Equality compares coefficients only. Clones are deep.
#[derive(Clone, Debug, Eq)]
pub struct PolyRNS<O> {
    pub(crate) limbs: Vec<Poly<O>>,
    pub(crate) repr: Representation,
}

impl<O> PolyRNS<O>
where
    O: Default + Clone + Copy,
{
    /// Zero polynomial of degree n over level+1 limbs.
    pub fn new(n: usize, level: usize) -> Self {
        Self {
            limbs: (0..level + 1).map(|_| Poly::new(n)).collect(),
            repr: Representation::COEFFS,
        }
    }

    pub fn from_limbs(limbs: Vec<Poly<O>>) -> Self {
        Self {
            limbs,
            repr: Representation::COEFFS,
        }
    }

    pub fn n(&self) -> usize {
        self.limbs.first().map(|p| p.n()).unwrap_or(0)
    }

    pub fn log_n(&self) -> usize {
        self.n().trailing_zeros() as usize
    }

    /// Index of the last limb, 0 for a polynomial without limbs.
    pub fn level(&self) -> usize {
        self.limbs.len().saturating_sub(1)
    }

    pub fn limbs(&self) -> usize {
        self.limbs.len()
    }

    pub fn representation(&self) -> Representation {
        self.repr
    }

    pub fn is_ntt(&self) -> bool {
        self.repr.ntt
    }

    pub fn is_montgomery(&self) -> bool {
        self.repr.montgomery
    }

    /// Overrides the representation tags without touching the coefficients.
    pub fn set_representation(&mut self, repr: Representation) {
        self.repr = repr
    }

    pub fn resize(&mut self, level: usize) {
        let n: usize = self.n();
        self.limbs.resize(level + 1, Poly::<O>::new(n));
    }

    /// Removes and returns the last limb.
    pub fn pop_limb(&mut self) -> Option<Poly<O>> {
        self.limbs.pop()
    }

    pub fn split_at_mut(&mut self, level: usize) -> (&mut [Poly<O>], &mut [Poly<O>]) {
        self.limbs.split_at_mut(level)
    }

    pub fn at(&self, level: usize) -> &Poly<O> {
        assert!(
            level < self.limbs(),
            "invalid argument level: level={} >= self.limbs()={}",
            level,
            self.limbs()
        );
        &self.limbs[level]
    }

    pub fn at_mut(&mut self, level: usize) -> &mut Poly<O> {
        &mut self.limbs[level]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Poly<O>> {
        self.limbs.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Poly<O>> {
        self.limbs.iter_mut()
    }

    pub fn set_all(&mut self, v: &O) {
        self.limbs.iter_mut().for_each(|p| p.set_all(v))
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    /// Deep copy.
    pub fn copy_new(&self) -> Self {
        self.clone()
    }

    /// Makes self a copy of other, resizing if needed.
    pub fn copy(&mut self, other: &PolyRNS<O>) {
        if std::ptr::eq(self, other) {
            return;
        }
        self.limbs.resize(other.limbs(), Poly::new(other.n()));
        self.limbs
            .iter_mut()
            .zip(other.limbs.iter())
            .for_each(|(a, b)| a.copy_from(b));
        self.repr = other.repr;
    }

    /// Copies the limbs 0..=level of other into self.
    pub fn copy_level(&mut self, level: usize, other: &PolyRNS<O>) {
        assert!(
            level < self.limbs(),
            "invalid argument level: level={} >= self.limbs()={}",
            level,
            self.limbs()
        );
        assert!(
            level < other.limbs(),
            "invalid argument level: level={} >= other.limbs()={}",
            level,
            other.limbs()
        );
        (0..level + 1).for_each(|i| self.at_mut(i).copy_from(other.at(i)));
        self.repr = other.repr;
    }
}

impl<O: PartialEq> PartialEq for PolyRNS<O> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || (self.limbs == other.limbs)
    }
}

impl<O> Default for PolyRNS<O> {
    fn default() -> Self {
        Self {
            limbs: Vec::new(),
            repr: Representation::COEFFS,
        }
    }
}
