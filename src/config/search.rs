use super::traits::{section_error, ConfigSection};
use crate::error::PolycorrError;
use serde::{Deserialize, Serialize};

/// Population sizes must be a multiple of this so device buffers keep a regular shape.
pub const VECTOR_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub population_size: usize,
    pub max_step_count: usize,
    pub desired_correlation: f64,
    pub seed: u64,
    /// Constants are drawn from `[-const_scope, const_scope]`.
    pub const_scope: f64,
    /// Highest exponent a genome may carry.
    pub pow_scope: u8,
    /// When false, exponents are drawn from `[1, pow_scope]` instead of `[0, pow_scope]`.
    pub allow_zero_power: bool,
    /// Progress is reported every `report_interval` generations.
    pub report_interval: usize,
    /// Range the roulette threshold is drawn from.
    pub selection_range: (f64, f64),
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 112,
            max_step_count: 50,
            desired_correlation: 0.9,
            seed: 69,
            const_scope: 1000.0,
            pow_scope: 5,
            allow_zero_power: true,
            report_interval: 10,
            selection_range: (0.0, 1.0),
        }
    }
}

impl SearchConfig {
    pub fn min_power(&self) -> u8 {
        if self.allow_zero_power {
            0
        } else {
            1
        }
    }
}

impl ConfigSection for SearchConfig {
    fn section_name() -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<(), PolycorrError> {
        if self.population_size == 0 {
            return Err(section_error::<Self>("Population size must be positive"));
        }
        if self.population_size % VECTOR_SIZE != 0 {
            return Err(section_error::<Self>(format!(
                "Population size {} must be a multiple of {}",
                self.population_size, VECTOR_SIZE
            )));
        }
        if !(0.0..=1.0).contains(&self.desired_correlation) {
            return Err(section_error::<Self>(
                "Desired correlation must be between 0 and 1",
            ));
        }
        if !self.const_scope.is_finite() || self.const_scope <= 0.0 {
            return Err(section_error::<Self>(
                "Constant scope must be a positive finite number",
            ));
        }
        if !self.allow_zero_power && self.pow_scope == 0 {
            return Err(section_error::<Self>(
                "Power scope must be at least 1 when zero powers are disallowed",
            ));
        }
        if self.report_interval == 0 {
            return Err(section_error::<Self>("Report interval must be positive"));
        }
        let (lo, hi) = self.selection_range;
        if !(0.0..1.0).contains(&lo) || hi > 1.0 || lo >= hi {
            return Err(section_error::<Self>(
                "Selection range must be a non-empty sub-range of [0, 1)",
            ));
        }
        Ok(())
    }
}
