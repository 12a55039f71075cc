use crate::config::SearchConfig;
use crate::engines::generation::{
    genome::{Genome, Population, CHANNELS},
    operators::recombine,
};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Builds the initial population and every population after it.
#[derive(Debug, Clone)]
pub struct PopulationManager {
    const_scope: f64,
    min_power: u8,
    pow_scope: u8,
}

impl PopulationManager {
    pub fn new(const_scope: f64, min_power: u8, pow_scope: u8) -> Self {
        Self {
            const_scope,
            min_power,
            pow_scope,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.const_scope, config.min_power(), config.pow_scope)
    }

    /// Seeded random population.
    ///
    /// One generator feeds every draw in a fixed order (per genome: all
    /// constants, then the channel powers), so a seed reproduces the same
    /// population bit for bit.
    pub fn initialize(&self, size: usize, seed: u64) -> Population {
        let mut rng = StdRng::seed_from_u64(seed);
        let constants = Uniform::new_inclusive(-self.const_scope, self.const_scope);
        let powers = Uniform::new_inclusive(self.min_power, self.pow_scope);

        (0..size)
            .map(|_| {
                let mut genome = Genome::default();
                for constant in genome.constants.iter_mut() {
                    *constant = constants.sample(&mut rng);
                }
                for power in genome.powers[..CHANNELS].iter_mut() {
                    *power = powers.sample(&mut rng);
                }
                genome
            })
            .collect()
    }

    /// Fill `next` from `previous`.
    ///
    /// Slot 0 receives `elite` unchanged. Every other slot asks `select` for
    /// two parent indices into `previous` and takes its powers from the first
    /// and its constants from the second. No mutation is applied.
    pub fn repopulate<F>(&self, previous: &[Genome], elite: &Genome, next: &mut [Genome], mut select: F)
    where
        F: FnMut() -> usize,
    {
        let Some((head, rest)) = next.split_first_mut() else {
            return;
        };
        *head = *elite;

        for slot in rest.iter_mut() {
            let power_parent = &previous[select()];
            let constant_parent = &previous[select()];
            *slot = recombine(power_parent, constant_parent);
        }
    }

    pub fn const_scope(&self) -> f64 {
        self.const_scope
    }

    pub fn power_range(&self) -> (u8, u8) {
        (self.min_power, self.pow_scope)
    }
}
