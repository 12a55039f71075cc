use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fitness-proportionate parent selection over a sweeping cursor.
///
/// Each call draws a threshold and walks the fitness table from where the
/// previous call stopped, wrapping at the end, until the accumulated fitness
/// reaches the threshold. The cursor is never reset between generations, so
/// successive selections continue one sweep through the table instead of
/// being independent spins.
#[derive(Debug, Clone)]
pub struct RouletteSampler {
    cursor: usize,
    threshold: Uniform<f64>,
    rng: StdRng,
}

impl RouletteSampler {
    /// `range` is the half-open interval thresholds are drawn from.
    pub fn new(seed: u64, range: (f64, f64)) -> Self {
        Self {
            cursor: 0,
            threshold: Uniform::new(range.0, range.1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Pick one index from `fitness`.
    ///
    /// At least one entry is always consumed. If a full sweep accumulates
    /// nothing (every weight is zero) the pick falls back to a uniform draw.
    ///
    /// Every lap adds the same total, so once the first lap falls short the
    /// threshold is reduced modulo that total and the pick lands within the
    /// second lap, however small the weights are.
    pub fn select(&mut self, fitness: &[f64]) -> usize {
        let len = fitness.len();
        if len == 0 {
            return 0;
        }
        if self.cursor >= len {
            self.cursor = 0;
        }

        let mut needed = self.threshold.sample(&mut self.rng);
        let mut accumulated: f64 = 0.0;
        let mut visited = 0;

        loop {
            let selected = self.cursor;
            accumulated += fitness[selected];
            visited += 1;
            self.cursor = (self.cursor + 1) % len;

            if accumulated >= needed {
                return selected;
            }
            if visited == len {
                let lap_total = accumulated;
                if lap_total.is_nan() || lap_total <= 0.0 {
                    return self.rng.gen_range(0..len);
                }
                // An exact multiple stops where the lap total is reached.
                let rest = needed % lap_total;
                needed = if rest > 0.0 { rest } else { lap_total };
                accumulated = 0.0;
            }
        }
    }
}
