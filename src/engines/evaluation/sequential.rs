use crate::data::SignalSet;
use crate::engines::evaluation::{
    correlation::CorrelationSums,
    evaluator::{Evaluation, FitnessEvaluator},
};
use crate::engines::generation::{operators::locate_best, Genome};
use crate::error::{PolycorrError, Result};

/// Single-threaded evaluator.
///
/// Each genome is transformed into a reusable buffer and then reduced in one
/// pass. The buffer keeps the last genome's transform for reporting.
#[derive(Debug, Default)]
pub struct SequentialEvaluator {
    transformation: Vec<f64>,
}

impl SequentialEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transformed signal of the most recently evaluated genome.
    pub fn transformation(&self) -> &[f64] {
        &self.transformation
    }

    /// Score a single genome, leaving its transform in the buffer.
    pub fn correlation_of(&mut self, genome: &Genome, signals: &SignalSet) -> f64 {
        self.transformation.resize(signals.len(), 0.0);
        transform_into(genome, signals, &mut self.transformation);

        let mut sums = CorrelationSums::default();
        for (&acc, &target) in self.transformation.iter().zip(signals.target()) {
            sums.accumulate(acc, target);
        }
        sums.abs_correlation(signals.len(), signals)
    }
}

impl FitnessEvaluator for SequentialEvaluator {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn prepare(&mut self, signals: &SignalSet) -> Result<()> {
        if self.transformation.len() != signals.len() {
            self.transformation = vec![0.0; signals.len()];
        }
        Ok(())
    }

    fn evaluate(
        &mut self,
        population: &[Genome],
        signals: &SignalSet,
        fitness: &mut [f64],
    ) -> Result<Evaluation> {
        if fitness.len() != population.len() {
            return Err(PolycorrError::Validation(format!(
                "Fitness table holds {} entries for {} genomes",
                fitness.len(),
                population.len()
            )));
        }

        for (genome, slot) in population.iter().zip(fitness.iter_mut()) {
            *slot = self.correlation_of(genome, signals);
        }

        let (best_index, best_correlation) = locate_best(fitness);
        Ok(Evaluation {
            best_index,
            best_correlation,
        })
    }
}

/// Apply `genome` to every sample of `signals`.
pub fn transform_signal(genome: &Genome, signals: &SignalSet) -> Vec<f64> {
    let mut out = vec![0.0; signals.len()];
    transform_into(genome, signals, &mut out);
    out
}

fn transform_into(genome: &Genome, signals: &SignalSet, out: &mut [f64]) {
    let samples = signals.x().iter().zip(signals.y()).zip(signals.z());
    for (slot, ((&x, &y), &z)) in out.iter_mut().zip(samples) {
        *slot = genome.transform(x, y, z);
    }
}
