use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Single owned generator feeding the per-sweep random buffer.
///
/// Seeded once at construction (or on [`reset`](Self::reset)); never
/// reseeded mid-run.
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: Xoshiro256StarStar,
}

impl RandomStream {
    /// Deterministic stream for a fixed seed, entropy-seeded for `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => Xoshiro256StarStar::seed_from_u64(s),
            None => Xoshiro256StarStar::from_entropy(),
        };
        Self { rng }
    }

    pub fn reset(&mut self, seed: Option<u64>) {
        *self = Self::new(seed);
    }

    /// Overwrite every cell with an independent uniform draw in `[0, 1)`.
    pub fn refill(&mut self, buffer: &mut [f64]) {
        for cell in buffer.iter_mut() {
            *cell = self.rng.gen::<f64>();
        }
    }

    /// Uniform ±1 value.
    #[inline]
    pub fn spin(&mut self) -> i8 {
        if self.rng.gen::<f64>() < 0.5 {
            -1
        } else {
            1
        }
    }
}
