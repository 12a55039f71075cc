//! Genome representation for the polynomial search
//!
//! A genome encodes the transformation
//!
//! ```text
//! acc = c0·x^p0 + c1·y^p1 + c2·z^p2 + c3
//! ```
//!
//! with one constant/power pair per source channel plus a bias constant. The
//! bias carries no channel, so `powers[3]` is always 0 and never read.
//!
//! Genomes are plain values: copying one is cheap and nothing shares them.
//! Range invariants (`|c| <= const_scope`, `p <= pow_scope`) are established
//! by [`PopulationManager`](super::population::PopulationManager) when genomes
//! are generated and are not rechecked on read.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Constant/power slots per genome: three channels and the bias.
pub const GENOME_SIZE: usize = 4;

/// Number of source channels a genome transforms.
pub const CHANNELS: usize = 3;

/// Index of the bias constant.
pub const BIAS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Genome {
    pub constants: [f64; GENOME_SIZE],
    pub powers: [u8; GENOME_SIZE],
}

/// An ordered, fixed-length set of genomes evaluated together.
pub type Population = Vec<Genome>;

impl Genome {
    pub fn new(constants: [f64; GENOME_SIZE], powers: [u8; GENOME_SIZE]) -> Self {
        Self { constants, powers }
    }

    /// Apply the transformation to one sample.
    #[inline]
    pub fn transform(&self, x: f64, y: f64, z: f64) -> f64 {
        let c = &self.constants;
        let p = &self.powers;
        c[0] * x.powi(p[0] as i32) + c[1] * y.powi(p[1] as i32) + c[2] * z.powi(p[2] as i32) + c[BIAS]
    }

    pub fn is_within(&self, const_scope: f64, min_power: u8, pow_scope: u8) -> bool {
        self.constants.iter().all(|c| c.abs() <= const_scope)
            && self.powers[..CHANNELS]
                .iter()
                .all(|&p| (min_power..=pow_scope).contains(&p))
            && self.powers[BIAS] == 0
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.constants;
        let p = &self.powers;
        write!(
            f,
            "{:.4}·x^{} + {:.4}·y^{} + {:.4}·z^{} + {:.4}",
            c[0], p[0], c[1], p[1], c[2], p[2], c[BIAS]
        )
    }
}
