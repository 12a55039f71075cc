use crate::config::{traits::ConfigSection, SearchConfig};
use crate::data::SignalSet;
use crate::engines::evaluation::{Evaluation, FitnessEvaluator};
use crate::engines::generation::{
    genome::{Genome, Population},
    population::PopulationManager,
    selection::RouletteSampler,
};
use crate::error::{PolycorrError, Result};
use serde::{Deserialize, Serialize};

/// Offsets the selection generator's seed so it does not replay the population stream.
const SELECTION_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchState {
    Initializing,
    Evaluating,
    Regenerating,
    Converged,
    Terminated,
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Converged | Self::Terminated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStatus {
    /// The desired correlation was reached.
    Converged,
    /// The step budget ran out first.
    BudgetExhausted,
}

/// Result of a finished search, detached from the scheduler's buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub best_genome: Genome,
    pub best_correlation: f64,
    /// Regenerations performed.
    pub steps: usize,
    pub status: SearchStatus,
    /// Best correlation of every evaluated generation, in order.
    pub history: Vec<f64>,
}

pub trait ProgressCallback: Send {
    fn on_generation_complete(&mut self, step: usize, best_correlation: f64);

    fn on_search_complete(&mut self, _outcome: &SearchOutcome) {}
}

/// Drives the generation loop.
///
/// `Initializing → Evaluating → (Converged | Regenerating → Evaluating) → Terminated`
///
/// Two population buffers are kept and swap roles every regeneration; the
/// fitness table is overwritten by each evaluation and consumed by the
/// sampler during the following regeneration.
pub struct SearchScheduler<'a, E: FitnessEvaluator> {
    config: SearchConfig,
    signals: &'a SignalSet,
    evaluator: E,
    manager: PopulationManager,
    sampler: RouletteSampler,
    current: Population,
    previous: Population,
    fitness: Vec<f64>,
    state: SearchState,
    step: usize,
    best: Evaluation,
    history: Vec<f64>,
}

impl<'a, E: FitnessEvaluator> SearchScheduler<'a, E> {
    /// Fails on an invalid configuration before any work starts.
    pub fn new(config: SearchConfig, signals: &'a SignalSet, evaluator: E) -> Result<Self> {
        config.validate()?;

        let size = config.population_size;
        Ok(Self {
            manager: PopulationManager::from_config(&config),
            sampler: RouletteSampler::new(
                config.seed.wrapping_add(SELECTION_STREAM),
                config.selection_range,
            ),
            current: vec![Genome::default(); size],
            previous: vec![Genome::default(); size],
            fitness: vec![0.0; size],
            state: SearchState::Initializing,
            step: 0,
            best: Evaluation {
                best_index: 0,
                best_correlation: 0.0,
            },
            history: Vec::new(),
            config,
            signals,
            evaluator,
        })
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn population(&self) -> &[Genome] {
        &self.current
    }

    /// Fitness of the most recently evaluated population.
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    pub fn best(&self) -> Evaluation {
        self.best
    }

    pub fn best_genome(&self) -> Genome {
        self.current[self.best.best_index]
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn sampler(&self) -> &RouletteSampler {
        &self.sampler
    }

    /// Perform one state transition and return the new state.
    ///
    /// Terminal states are sticky.
    pub fn advance(&mut self) -> Result<SearchState> {
        self.state = match self.state {
            SearchState::Initializing => {
                self.current = self
                    .manager
                    .initialize(self.config.population_size, self.config.seed);
                self.evaluator.prepare(self.signals)?;
                SearchState::Evaluating
            }
            SearchState::Evaluating => {
                self.best = self
                    .evaluator
                    .evaluate(&self.current, self.signals, &mut self.fitness)?;
                self.history.push(self.best.best_correlation);
                log::debug!(
                    "Step {}: best correlation {:.6} at index {}",
                    self.step,
                    self.best.best_correlation,
                    self.best.best_index
                );

                if self.best.best_correlation >= self.config.desired_correlation {
                    SearchState::Converged
                } else if self.step >= self.config.max_step_count {
                    SearchState::Terminated
                } else {
                    SearchState::Regenerating
                }
            }
            SearchState::Regenerating => {
                std::mem::swap(&mut self.current, &mut self.previous);
                let elite = self.previous[self.best.best_index];

                let fitness = &self.fitness;
                let sampler = &mut self.sampler;
                self.manager
                    .repopulate(&self.previous, &elite, &mut self.current, || sampler.select(fitness));

                // The elite now sits in slot 0.
                self.best.best_index = 0;
                self.step += 1;
                SearchState::Evaluating
            }
            terminal => terminal,
        };
        Ok(self.state)
    }

    /// Run to a terminal state, reporting every `report_interval` generations.
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<SearchOutcome> {
        log::info!(
            "Starting search: {} genomes, {} samples, {} backend, budget {} steps",
            self.config.population_size,
            self.signals.len(),
            self.evaluator.name(),
            self.config.max_step_count
        );
        log::debug!(
            "Constants within ±{}, powers within {:?}",
            self.manager.const_scope(),
            self.manager.power_range()
        );

        loop {
            let evaluated = self.state == SearchState::Evaluating;
            let state = self.advance()?;

            if evaluated && (state.is_terminal() || self.step % self.config.report_interval == 0) {
                callback.on_generation_complete(self.step, self.best.best_correlation);
            }
            if state.is_terminal() {
                break;
            }
        }

        let outcome = self.outcome().ok_or_else(|| {
            PolycorrError::Computation("Search stopped before a terminal state".to_string())
        })?;
        log::info!(
            "Search finished with {:?} after {} steps: correlation {:.6}",
            outcome.status,
            outcome.steps,
            outcome.best_correlation
        );
        callback.on_search_complete(&outcome);
        Ok(outcome)
    }

    /// The finished result; `None` until a terminal state is reached.
    pub fn outcome(&self) -> Option<SearchOutcome> {
        let status = match self.state {
            SearchState::Converged => SearchStatus::Converged,
            SearchState::Terminated => SearchStatus::BudgetExhausted,
            _ => return None,
        };
        Some(SearchOutcome {
            best_genome: self.best_genome(),
            best_correlation: self.best.best_correlation,
            steps: self.step,
            status,
            history: self.history.clone(),
        })
    }
}
