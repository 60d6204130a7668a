use crate::error::{Error, Result};
use crate::poly::PolyRNS;
use crate::ring::Context;
use sampling::source::Source;
use tracing::{debug, trace};

/// Common reference polynomials: a uniform sequence fully determined by a
/// 32-byte seed, so that parties sharing the seed regenerate the same
/// public polynomials without exchanging them.
///
/// The clock counts the polynomials emitted since the last [CRPGenerator::seed].
/// After `set_clock(v)`, [CRPGenerator::clock] returns the v-th polynomial
/// of the sequence (0-based).
pub struct CRPGenerator {
    context: Context,
    seed: [u8; 32],
    source: Source,
    clock: u64,
}

impl CRPGenerator {
    pub fn new(context: &Context, seed: [u8; 32]) -> Self {
        debug!(n = context.n(), limbs = context.limbs(), "crp generator seeded");
        Self {
            context: context.clone(),
            seed,
            source: Source::new(seed),
            clock: 0,
        }
    }

    /// Restarts the sequence from seed.
    pub fn seed(&mut self, seed: [u8; 32]) {
        debug!(previous_clock = self.clock, "crp generator reseeded");
        self.seed = seed;
        self.source = Source::new(seed);
        self.clock = 0;
    }

    pub fn current_seed(&self) -> [u8; 32] {
        self.seed
    }

    /// Number of polynomials emitted so far.
    pub fn current_clock(&self) -> u64 {
        self.clock
    }

    /// Writes the next polynomial of the sequence into a.
    pub fn clock_into(&mut self, a: &mut PolyRNS<u64>) -> Result<()> {
        self.context.fill_uniform(&mut self.source, a)?;
        self.clock += 1;
        Ok(())
    }

    /// Returns the next polynomial of the sequence.
    pub fn clock(&mut self) -> PolyRNS<u64> {
        let mut a: PolyRNS<u64> = self.context.new_poly();
        for (ring, p) in self.context.rings().iter().zip(a.iter_mut()) {
            match ring.fill_uniform(&mut self.source, p) {
                Ok(()) => {}
                Err(never) => match never {},
            }
        }
        self.clock += 1;
        a
    }

    /// Advances to clock value v by generating and discarding polynomials.
    /// The sequence cannot be rewound without reseeding.
    pub fn set_clock(&mut self, v: u64) -> Result<()> {
        if v < self.clock {
            return Err(Error::InvalidArgument(format!(
                "clock={} is behind the current clock={}",
                v, self.clock
            )));
        }
        let mut discard: PolyRNS<u64> = self.context.new_poly();
        while self.clock < v {
            self.clock_into(&mut discard)?;
        }
        trace!(clock = self.clock, "crp generator advanced");
        Ok(())
    }
}
