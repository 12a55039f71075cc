use anyhow::{Context, Result};
use polycorr::config::{Backend, ConfigManager, DeviceConfig};
use polycorr::data::CsvConnector;
use polycorr::engines::evaluation::{FitnessEvaluator, SequentialEvaluator};
use polycorr::engines::generation::{LogProgressCallback, SearchScheduler};

fn main() -> Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    match std::env::args().nth(1) {
        Some(path) => manager
            .load_from_file(&path)
            .with_context(|| format!("Failed to load config {}", path))?,
        None => manager
            .load_from_env()
            .context("Failed to load config from environment")?,
    }
    let config = manager.get();

    let signals = CsvConnector::load_signals(&config.data).context("Failed to load signals")?;
    let evaluator = build_evaluator(&config.device)?;

    let mut scheduler = SearchScheduler::new(config.search.clone(), &signals, evaluator)?;
    let outcome = scheduler.run(LogProgressCallback)?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn build_evaluator(device: &DeviceConfig) -> Result<Box<dyn FitnessEvaluator>> {
    match device.backend {
        Backend::Sequential => Ok(Box::new(SequentialEvaluator::new())),
        #[cfg(feature = "gpu")]
        Backend::Gpu => {
            let evaluator = polycorr::engines::evaluation::DeviceEvaluator::new(device)
                .context("GPU backend initialization failed")?;
            Ok(Box::new(evaluator))
        }
        #[cfg(not(feature = "gpu"))]
        Backend::Gpu => anyhow::bail!("GPU backend requested but polycorr was built without the `gpu` feature"),
    }
}
