use crate::error::{PolycorrError, Result};

/// Three source channels and the target channel, all of equal length.
///
/// Built once before a search starts and only ever borrowed afterwards. The
/// target-channel aggregates used by the correlation formula do not depend on
/// the genome, so they are computed here rather than on every evaluation.
#[derive(Debug, Clone)]
pub struct SignalSet {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    target: Vec<f64>,
    target_sum: f64,
    target_denominator: f64,
}

impl SignalSet {
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, target: Vec<f64>) -> Result<Self> {
        let len = target.len();
        if len == 0 {
            return Err(PolycorrError::Validation(
                "Signal set must contain at least one sample".to_string(),
            ));
        }
        for (name, channel) in [("x", &x), ("y", &y), ("z", &z)] {
            if channel.len() != len {
                return Err(PolycorrError::Validation(format!(
                    "Channel {} has {} samples, target has {}",
                    name,
                    channel.len(),
                    len
                )));
            }
        }

        let (sum, sum_sq) = target
            .iter()
            .fold((0.0, 0.0), |(s, s2), &v| (s + v, s2 + v * v));
        let target_denominator = len as f64 * sum_sq - sum * sum;

        Ok(Self {
            x,
            y,
            z,
            target,
            target_sum: sum,
            target_denominator,
        })
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// `Σy` over the target channel.
    pub fn target_sum(&self) -> f64 {
        self.target_sum
    }

    /// `N·Σy² − (Σy)²` over the target channel.
    pub fn target_denominator(&self) -> f64 {
        self.target_denominator
    }

    /// Square root of [`Self::target_denominator`], the target half of the
    /// correlation denominator.
    pub fn squared_hr_corr_sum(&self) -> f64 {
        self.target_denominator.sqrt()
    }
}
