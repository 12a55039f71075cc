use crate::data::SignalSet;
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Running sums over a transformed signal: `Σacc`, `Σacc²` and `Σ(acc·target)`.
///
/// Both backends reduce to this value, the sequential one in a single pass and
/// the device one from per-block partials, before the shared formula below is
/// applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSums {
    pub sum: f64,
    pub sum_sq: f64,
    pub sum_product: f64,
}

impl CorrelationSums {
    #[inline]
    pub fn accumulate(&mut self, acc: f64, target: f64) {
        self.sum += acc;
        self.sum_sq += acc * acc;
        self.sum_product += acc * target;
    }

    /// Absolute Pearson coefficient against the target channel of `signals`.
    pub fn abs_correlation(&self, samples: usize, signals: &SignalSet) -> f64 {
        abs_correlation(
            samples as f64,
            self,
            signals.target_sum(),
            signals.squared_hr_corr_sum(),
        )
    }
}

impl Add for CorrelationSums {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            sum_sq: self.sum_sq + other.sum_sq,
            sum_product: self.sum_product + other.sum_product,
        }
    }
}

/// Relative spread below which a transform counts as constant.
const DEGENERATE_SPREAD: f64 = 1e-12;

/// `|N·Σxy − Σy·Σx| / (sqrt(N·Σy² − (Σy)²) · sqrt(N·Σx² − (Σx)²))`
///
/// Any non-finite intermediate, or a transform with no variance, yields 0.
/// The result is clamped to `[0, 1]`.
pub fn abs_correlation(n: f64, sums: &CorrelationSums, target_sum: f64, squared_hr_corr_sum: f64) -> f64 {
    let numerator = (n * sums.sum_product - target_sum * sums.sum).abs();
    let spread = n * sums.sum_sq - sums.sum * sums.sum;

    // Cancellation noise on a constant transform must not read as variance.
    if !spread.is_finite() || spread <= DEGENERATE_SPREAD * n * sums.sum_sq {
        return 0.0;
    }

    let denominator = squared_hr_corr_sum * spread.sqrt();
    if !numerator.is_finite() || !denominator.is_finite() || denominator <= 0.0 {
        return 0.0;
    }

    let corr = numerator / denominator;
    if corr.is_finite() {
        corr.min(1.0)
    } else {
        0.0
    }
}
