use polycorr::config::SearchConfig;
use polycorr::data::SignalSet;
use polycorr::engines::evaluation::{FitnessEvaluator, SequentialEvaluator};
use polycorr::engines::generation::{
    ChannelProgressCallback, Genome, NoProgress, PopulationManager, ProgressMessage,
    SearchScheduler, SearchState, SearchStatus,
};
use polycorr::PolycorrError;
use std::sync::mpsc::channel;

/// Three channels in [0, 1] and a target built from them plus a wobble.
fn synthetic_signals(n: usize) -> SignalSet {
    let x: Vec<f64> = (0..n).map(|i| ((i as f64) * 0.013).sin() * 0.5 + 0.5).collect();
    let y: Vec<f64> = (0..n).map(|i| ((i as f64) * 0.029).cos() * 0.5 + 0.5).collect();
    let z: Vec<f64> = (0..n).map(|i| ((i * 37) % 101) as f64 / 100.0).collect();
    let target = x
        .iter()
        .zip(&y)
        .enumerate()
        .map(|(i, (a, b))| 0.6 * a * a - 0.3 * b + 0.05 * ((i as f64) * 0.7).sin())
        .collect();
    SignalSet::new(x, y, z, target).unwrap()
}

fn test_config() -> SearchConfig {
    SearchConfig {
        population_size: 32,
        max_step_count: 15,
        desired_correlation: 1.0,
        seed: 42,
        const_scope: 10.0,
        pow_scope: 4,
        report_interval: 5,
        ..Default::default()
    }
}

#[test]
fn test_identity_genome_scores_one() {
    let x: Vec<f64> = (0..256).map(|i| ((i * 13) % 29) as f64 / 29.0).collect();
    let other: Vec<f64> = (0..256).map(|i| ((i * 5) % 17) as f64 / 17.0).collect();
    let signals = SignalSet::new(x.clone(), other.clone(), other, x).unwrap();

    let population = vec![Genome::new([1.0, 0.0, 0.0, 0.0], [1, 0, 0, 0]); 16];
    let mut fitness = vec![0.0; 16];
    let mut evaluator = SequentialEvaluator::new();
    evaluator.prepare(&signals).unwrap();
    let result = evaluator.evaluate(&population, &signals, &mut fitness).unwrap();

    assert_eq!(result.best_index, 0);
    assert!((result.best_correlation - 1.0).abs() < 1e-9);
    assert_eq!(evaluator.transformation(), signals.x());
}

#[test]
fn test_zero_constants_score_zero() {
    let signals = synthetic_signals(200);
    let population: Vec<Genome> = PopulationManager::new(10.0, 0, 5)
        .initialize(16, 3)
        .into_iter()
        .map(|g| Genome::new([0.0; 4], g.powers))
        .collect();

    let mut fitness = vec![f64::NAN; 16];
    let mut evaluator = SequentialEvaluator::new();
    let result = evaluator.evaluate(&population, &signals, &mut fitness).unwrap();

    assert!(fitness.iter().all(|&f| f == 0.0));
    assert_eq!(result.best_index, 0);
    assert_eq!(result.best_correlation, 0.0);
}

#[test]
fn test_extreme_genomes_stay_finite() {
    let signals = synthetic_signals(64);
    let population = vec![
        Genome::new([f64::MAX, f64::MAX, f64::MAX, f64::MAX], [5, 5, 5, 0]),
        Genome::new([1e308, -1e308, 1e308, 0.0], [1, 1, 1, 0]),
        Genome::new([1.0, 2.0, 3.0, 4.0], [1, 2, 3, 0]),
    ];
    let mut fitness = vec![0.0; 3];
    let mut evaluator = SequentialEvaluator::new();
    let result = evaluator.evaluate(&population, &signals, &mut fitness).unwrap();

    for f in &fitness {
        assert!(f.is_finite() && (0.0..=1.0).contains(f), "{}", f);
    }
    assert_eq!(fitness[0], 0.0);
    assert_eq!(result.best_index, 2);
}

#[test]
fn test_reported_best_dominates_population() {
    let signals = synthetic_signals(300);
    let mut scheduler =
        SearchScheduler::new(test_config(), &signals, SequentialEvaluator::new()).unwrap();

    while !scheduler.advance().unwrap().is_terminal() {
        if scheduler.state() == SearchState::Regenerating {
            let best = scheduler.best();
            assert!(scheduler.fitness().iter().all(|&f| f <= best.best_correlation));
            assert!(scheduler.fitness().iter().all(|f| (0.0..=1.0).contains(f)));
            assert_eq!(scheduler.fitness()[best.best_index], best.best_correlation);
        }
    }
}

#[test]
fn test_elite_survives_every_regeneration() {
    let signals = synthetic_signals(300);
    let mut scheduler =
        SearchScheduler::new(test_config(), &signals, SequentialEvaluator::new()).unwrap();

    let mut elite = None;
    loop {
        let before = scheduler.state();
        if before == SearchState::Regenerating {
            elite = Some(scheduler.best_genome());
        }
        let after = scheduler.advance().unwrap();
        if before == SearchState::Regenerating {
            assert_eq!(scheduler.population()[0], elite.unwrap());
            assert_eq!(scheduler.population().len(), 32);
        }
        if after.is_terminal() {
            break;
        }
    }
    assert!(elite.is_some(), "search never regenerated");
}

#[test]
fn test_best_correlation_never_decreases() {
    let signals = synthetic_signals(400);
    let mut scheduler =
        SearchScheduler::new(test_config(), &signals, SequentialEvaluator::new()).unwrap();
    let outcome = scheduler.run(NoProgress).unwrap();

    assert_eq!(outcome.status, SearchStatus::BudgetExhausted);
    assert_eq!(outcome.steps, 15);
    assert_eq!(outcome.history.len(), 16);
    for pair in outcome.history.windows(2) {
        assert!(pair[1] >= pair[0], "{:?}", outcome.history);
    }
    assert_eq!(outcome.best_correlation, *outcome.history.last().unwrap());
}

#[test]
fn test_outcome_genome_reproduces_reported_correlation() {
    let signals = synthetic_signals(400);
    let mut scheduler =
        SearchScheduler::new(test_config(), &signals, SequentialEvaluator::new()).unwrap();
    let outcome = scheduler.run(NoProgress).unwrap();

    let rescored = SequentialEvaluator::new().correlation_of(&outcome.best_genome, &signals);
    assert_eq!(rescored, outcome.best_correlation);
}

#[test]
fn test_zero_budget_evaluates_initial_population_only() {
    let signals = synthetic_signals(200);
    let config = SearchConfig {
        max_step_count: 0,
        ..test_config()
    };
    let initial = PopulationManager::from_config(&config).initialize(config.population_size, config.seed);

    let mut scheduler = SearchScheduler::new(config, &signals, SequentialEvaluator::new()).unwrap();
    let outcome = scheduler.run(NoProgress).unwrap();

    assert_eq!(outcome.status, SearchStatus::BudgetExhausted);
    assert_eq!(outcome.steps, 0);
    assert_eq!(outcome.history.len(), 1);
    assert_eq!(scheduler.population(), initial.as_slice());
    assert_eq!(outcome.best_genome, initial[scheduler.best().best_index]);
}

#[test]
fn test_zero_threshold_converges_immediately() {
    let signals = synthetic_signals(200);
    let config = SearchConfig {
        desired_correlation: 0.0,
        ..test_config()
    };
    let mut scheduler = SearchScheduler::new(config, &signals, SequentialEvaluator::new()).unwrap();
    let outcome = scheduler.run(NoProgress).unwrap();

    assert_eq!(outcome.status, SearchStatus::Converged);
    assert_eq!(outcome.steps, 0);
    assert_eq!(scheduler.state(), SearchState::Converged);
    // Terminal states are sticky.
    assert_eq!(scheduler.advance().unwrap(), SearchState::Converged);
}

#[test]
fn test_search_is_reproducible() {
    let signals = synthetic_signals(250);
    let run = || {
        SearchScheduler::new(test_config(), &signals, SequentialEvaluator::new())
            .unwrap()
            .run(NoProgress)
            .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_search_finds_strong_correlation() {
    let signals = synthetic_signals(500);
    let config = SearchConfig {
        population_size: 64,
        max_step_count: 30,
        desired_correlation: 0.8,
        ..test_config()
    };
    let mut scheduler = SearchScheduler::new(config, &signals, SequentialEvaluator::new()).unwrap();
    let outcome = scheduler.run(NoProgress).unwrap();

    assert!(outcome.best_correlation > 0.5, "{:?}", outcome);
    match outcome.status {
        SearchStatus::Converged => assert!(outcome.best_correlation >= 0.8),
        SearchStatus::BudgetExhausted => assert_eq!(outcome.steps, 30),
    }
}

#[test]
fn test_converges_at_first_generation_reaching_threshold() {
    let signals = synthetic_signals(400);
    let exhausted = SearchScheduler::new(test_config(), &signals, SequentialEvaluator::new())
        .unwrap()
        .run(NoProgress)
        .unwrap();

    // Same seed, so the trajectory is identical until the threshold is met.
    let desired = *exhausted.history.last().unwrap();
    let first_reach = exhausted
        .history
        .iter()
        .position(|&best| best >= desired)
        .unwrap();
    assert!(desired > 0.0);

    let config = SearchConfig {
        desired_correlation: desired,
        ..test_config()
    };
    let mut scheduler = SearchScheduler::new(config, &signals, SequentialEvaluator::new()).unwrap();
    let outcome = scheduler.run(NoProgress).unwrap();

    assert_eq!(outcome.status, SearchStatus::Converged);
    assert_eq!(outcome.steps, first_reach);
    assert!(outcome.best_correlation >= desired);
    assert_eq!(outcome.history, exhausted.history[..=first_reach].to_vec());
}

#[test]
fn test_progress_reported_on_interval_and_completion() {
    let signals = synthetic_signals(200);
    let (tx, rx) = channel();
    let mut scheduler =
        SearchScheduler::new(test_config(), &signals, SequentialEvaluator::new()).unwrap();
    let outcome = scheduler.run(ChannelProgressCallback::new(tx)).unwrap();

    let messages: Vec<ProgressMessage> = rx.try_iter().collect();
    let steps: Vec<usize> = messages
        .iter()
        .filter_map(|m| match m {
            ProgressMessage::GenerationComplete { step, .. } => Some(*step),
            _ => None,
        })
        .collect();
    assert_eq!(steps, vec![0, 5, 10, 15]);

    match messages.last() {
        Some(ProgressMessage::SearchComplete(reported)) => assert_eq!(reported, &outcome),
        other => panic!("unexpected final message {:?}", other),
    }
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let signals = synthetic_signals(32);
    for config in [
        SearchConfig { population_size: 0, ..test_config() },
        SearchConfig { population_size: 20, ..test_config() },
        SearchConfig { desired_correlation: 1.01, ..test_config() },
    ] {
        let result = SearchScheduler::new(config, &signals, SequentialEvaluator::new());
        assert!(matches!(result, Err(PolycorrError::Configuration(_))));
    }
}

#[test]
fn test_boxed_evaluator_drives_search() {
    let signals = synthetic_signals(128);
    let evaluator: Box<dyn FitnessEvaluator> = Box::new(SequentialEvaluator::new());
    let mut scheduler = SearchScheduler::new(test_config(), &signals, evaluator).unwrap();
    let outcome = scheduler.run(NoProgress).unwrap();
    assert_eq!(scheduler.evaluator().name(), "sequential");
    assert!((0.0..=1.0).contains(&outcome.best_correlation));
}

#[cfg(feature = "gpu")]
mod gpu {
    use super::*;
    use polycorr::config::DeviceConfig;
    use polycorr::engines::evaluation::DeviceEvaluator;

    fn device_or_skip(config: &DeviceConfig) -> Option<DeviceEvaluator> {
        match DeviceEvaluator::new(config) {
            Ok(evaluator) => Some(evaluator),
            Err(e) => {
                println!("Skipping GPU test: {}", e);
                None
            }
        }
    }

    #[test]
    fn test_device_matches_sequential() {
        let Some(mut device) = device_or_skip(&DeviceConfig {
            block_size: Some(128),
            ..Default::default()
        }) else {
            return;
        };

        // Not a multiple of the block size, so padding is exercised.
        let signals = synthetic_signals(1000);
        let population = PopulationManager::new(1000.0, 0, 5).initialize(64, 69);
        let mut device_fitness = vec![0.0; 64];
        let mut host_fitness = vec![0.0; 64];

        let device_best = device.evaluate(&population, &signals, &mut device_fitness).unwrap();
        let host_best = SequentialEvaluator::new()
            .evaluate(&population, &signals, &mut host_fitness)
            .unwrap();

        assert_eq!(device.geometry().unwrap().padding(), 24);
        for (d, h) in device_fitness.iter().zip(&host_fitness) {
            assert!((d - h).abs() <= 1e-9 * h.abs().max(1e-12), "{} vs {}", d, h);
        }
        assert_eq!(device_best.best_index, host_best.best_index);
    }

    #[test]
    fn test_device_rejects_signals_of_another_length() {
        let Some(mut device) = device_or_skip(&DeviceConfig::default()) else {
            return;
        };

        let first = synthetic_signals(1000);
        let second = synthetic_signals(500);
        let population = PopulationManager::new(10.0, 0, 5).initialize(16, 1);
        let mut fitness = vec![0.0; 16];

        device.prepare(&first).unwrap();
        device.evaluate(&population, &first, &mut fitness).unwrap();

        assert!(matches!(device.prepare(&second), Err(PolycorrError::Validation(_))));
        let result = device.evaluate(&population, &second, &mut fitness);
        assert!(matches!(result, Err(PolycorrError::Validation(_))));
        assert_eq!(device.geometry().unwrap().samples, 1000);
    }

    #[test]
    fn test_unknown_device_name_is_fatal() {
        let result = DeviceEvaluator::new(&DeviceConfig {
            device_name: Some("no such accelerator".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(PolycorrError::Device(_))));
    }
}
