use crate::data::SignalSet;
use crate::engines::generation::Genome;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Outcome of scoring one population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub best_index: usize,
    pub best_correlation: f64,
}

/// Scores a population against a signal set.
///
/// Implementations write the absolute correlation of `population[i]` into
/// `fitness[i]` (never negative, never non-finite) and report the first
/// genome holding the maximum.
pub trait FitnessEvaluator {
    fn name(&self) -> &'static str;

    /// One-time setup before the first evaluation. Must be idempotent.
    fn prepare(&mut self, signals: &SignalSet) -> Result<()>;

    fn evaluate(
        &mut self,
        population: &[Genome],
        signals: &SignalSet,
        fitness: &mut [f64],
    ) -> Result<Evaluation>;
}

impl<E: FitnessEvaluator + ?Sized> FitnessEvaluator for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn prepare(&mut self, signals: &SignalSet) -> Result<()> {
        (**self).prepare(signals)
    }

    fn evaluate(
        &mut self,
        population: &[Genome],
        signals: &SignalSet,
        fitness: &mut [f64],
    ) -> Result<Evaluation> {
        (**self).evaluate(population, signals, fitness)
    }
}
