pub mod barrett;
pub mod generation;
pub mod montgomery;
pub mod operations;
pub mod prime;

pub type REDUCEMOD = u8;

pub const NONE: REDUCEMOD = 0;
pub const ONCE: REDUCEMOD = 1;
pub const TWICE: REDUCEMOD = 2;
pub const FOURTIMES: REDUCEMOD = 3;
pub const BARRETT: REDUCEMOD = 4;
pub const BARRETTLAZY: REDUCEMOD = 5;

/// Largest supported modulus bit-size: lazy kernels keep values in [0, 4q) which must fit in 63 bits.
pub const MAX_MODULUS_BITS: u32 = 61;

pub trait WordOps<O> {
    fn log2(self) -> O;
    fn reverse_bits_msb(self, n: u32) -> O;
    fn mask(self) -> O;
}

impl WordOps<u64> for u64 {
    #[inline(always)]
    fn log2(self) -> u64 {
        (u64::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> u64 {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (u64::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> u64 {
        (1 << self.log2()) - 1
    }
}

impl WordOps<usize> for usize {
    #[inline(always)]
    fn log2(self) -> usize {
        (usize::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> usize {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (usize::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> usize {
        (1 << self.log2()) - 1
    }
}

/// Full 64x64 -> 128 bit product split into words.
pub trait WideMul<O> {
    /// Returns (lo, hi) of self * rhs.
    fn mul_wide(self, rhs: O) -> (O, O);
    /// Returns the high word of self * rhs.
    fn mul_hi(self, rhs: O) -> O;
}

impl WideMul<u64> for u64 {
    #[inline(always)]
    fn mul_wide(self, rhs: u64) -> (u64, u64) {
        let r: u128 = self as u128 * rhs as u128;
        (r as u64, (r >> 64) as u64)
    }

    #[inline(always)]
    fn mul_hi(self, rhs: u64) -> u64 {
        ((self as u128 * rhs as u128) >> 64) as u64
    }
}

pub trait ReduceOnce<O> {
    /// Assigns self-q to self if self >= q.
    /// User must ensure that 2q fits in O.
    fn reduce_once_assign(&mut self, q: O);
    /// Returns self-q if self >= q else self.
    /// User must ensure that 2q fits in O.
    fn reduce_once(&self, q: O) -> O;
}

impl ReduceOnce<u64> for u64 {
    #[inline(always)]
    fn reduce_once_assign(&mut self, q: u64) {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        *self = (*self).min(self.wrapping_sub(q))
    }

    #[inline(always)]
    fn reduce_once(&self, q: u64) -> u64 {
        debug_assert!(q < 0x8000000000000000, "2q >= 2^64");
        (*self).min(self.wrapping_sub(q))
    }
}

pub trait ScalarOperations<O> {
    // Applies a parameterized modular reduction.
    fn sa_reduce_into_sa<const REDUCE: REDUCEMOD>(&self, x: &mut O);

    // Assigns a + b to c.
    fn sa_add_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);

    // Assigns a + b to b.
    fn sa_add_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // Assigns a - b to c, b in [0, SBRANGE * q).
    fn sa_sub_sb_into_sc<const SBRANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &O, b: &O, c: &mut O);

    // Assigns a - b to b, b in [0, SBRANGE * q).
    fn sa_sub_sb_into_sb<const SBRANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // Assigns -a to a, a in [0, SARANGE * q).
    fn sa_neg_into_sa<const SARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &mut O);

    // Assigns -a to b, a in [0, SARANGE * q).
    fn sa_neg_into_sb<const SARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut O);

    // Assigns a * 2^64 to b.
    fn sa_prep_mont_into_sb<const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut montgomery::Montgomery<O>);

    // Assigns a * 2^-64 to b.
    fn sa_unprep_mont_into_sb<const REDUCE: REDUCEMOD>(&self, a: &montgomery::Montgomery<O>, b: &mut O);

    // Assigns a * b * 2^-64 to c.
    fn sa_mont_mul_sb_into_sc<const REDUCE: REDUCEMOD>(
        &self,
        a: &montgomery::Montgomery<O>,
        b: &O,
        c: &mut O,
    );

    // Assigns a * b * 2^-64 to b.
    fn sa_mont_mul_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &montgomery::Montgomery<O>, b: &mut O);

    // Assigns a * b to c.
    fn sa_barrett_mul_sb_into_sc<const REDUCE: REDUCEMOD>(&self, a: &barrett::Barrett<O>, b: &O, c: &mut O);

    // Assigns a * b to b.
    fn sa_barrett_mul_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &barrett::Barrett<O>, b: &mut O);

    // Assigns a * b mod q to c, a and b both in [0, q).
    fn sa_mul_sb_into_sc(&self, a: &O, b: &O, c: &mut O);

    // Assigns (a + SBRANGE * q - b) * c to d.
    fn sa_sub_sb_mul_sc_into_sd<const SBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &O,
        b: &O,
        c: &barrett::Barrett<O>,
        d: &mut O,
    );

    // Assigns (a + SBRANGE * q - b) * c to b.
    fn sa_sub_sb_mul_sc_into_sb<const SBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &O,
        c: &barrett::Barrett<O>,
        b: &mut O,
    );
}

pub trait VectorOperations<O> {
    // vec(a) <- reduce(vec(a)).
    fn va_reduce_into_va<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &mut [O]);

    // vec(c) <- vec(a) + vec(b).
    fn va_add_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &[O], c: &mut [O]);

    // vec(b) <- vec(a) + vec(b).
    fn va_add_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);

    // vec(b) <- vec(b) + scalar(a).
    fn sa_add_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(&self, a: &O, b: &mut [O]);

    // vec(c) <- vec(a) - vec(b).
    fn va_sub_vb_into_vc<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &mut [O],
    );

    // vec(b) <- vec(a) - vec(b).
    fn va_sub_vb_into_vb<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);

    // vec(a) <- -vec(a).
    fn va_neg_into_va<const CHUNK: usize, const VARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &mut [O]);

    // vec(b) <- -vec(a).
    fn va_neg_into_vb<const CHUNK: usize, const VARANGE: u8, const REDUCE: REDUCEMOD>(&self, a: &[O], b: &mut [O]);

    // vec(b) <- vec(a) * 2^64.
    fn va_prep_mont_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &mut [montgomery::Montgomery<O>],
    );

    // vec(b) <- vec(a) * 2^-64.
    fn va_unprep_mont_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[montgomery::Montgomery<O>],
        b: &mut [O],
    );

    // vec(c) <- vec(a) * vec(b) * 2^-64.
    fn va_mont_mul_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[montgomery::Montgomery<O>],
        b: &[O],
        c: &mut [O],
    );

    // vec(b) <- vec(a) * vec(b) * 2^-64.
    fn va_mont_mul_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &[montgomery::Montgomery<O>],
        b: &mut [O],
    );

    // vec(c) <- vec(a) * vec(b) mod q.
    fn va_mul_vb_into_vc<const CHUNK: usize>(&self, a: &[O], b: &[O], c: &mut [O]);

    // vec(b) <- vec(b) * scalar(a).
    fn sa_barrett_mul_vb_into_vb<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &barrett::Barrett<O>,
        b: &mut [O],
    );

    // vec(c) <- vec(b) * scalar(a).
    fn sa_barrett_mul_vb_into_vc<const CHUNK: usize, const REDUCE: REDUCEMOD>(
        &self,
        a: &barrett::Barrett<O>,
        b: &[O],
        c: &mut [O],
    );

    // vec(d) <- (vec(a) + VBRANGE * q - vec(b)) * scalar(c).
    fn va_sub_vb_mul_sc_into_vd<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        b: &[O],
        c: &barrett::Barrett<O>,
        d: &mut [O],
    );

    // vec(b) <- (vec(a) + VBRANGE * q - vec(b)) * scalar(c).
    fn va_sub_vb_mul_sc_into_vb<const CHUNK: usize, const VBRANGE: u8, const REDUCE: REDUCEMOD>(
        &self,
        a: &[O],
        c: &barrett::Barrett<O>,
        b: &mut [O],
    );
}
