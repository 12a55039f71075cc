use super::scheduler::{ProgressCallback, SearchOutcome};

/// Reports progress through the `log` facade.
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_generation_complete(&mut self, step: usize, best_correlation: f64) {
        log::info!("Step {}: best correlation {:.6}", step, best_correlation);
    }

    fn on_search_complete(&mut self, outcome: &SearchOutcome) {
        log::info!(
            "Search {:?} after {} steps, correlation {:.6}: {}",
            outcome.status,
            outcome.steps,
            outcome.best_correlation,
            outcome.best_genome
        );
    }
}

/// Ignores every report.
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_generation_complete(&mut self, _step: usize, _best_correlation: f64) {}
}

// For reporting to another thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone)]
pub enum ProgressMessage {
    GenerationComplete { step: usize, best_correlation: f64 },
    SearchComplete(SearchOutcome),
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_complete(&mut self, step: usize, best_correlation: f64) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            step,
            best_correlation,
        });
    }

    fn on_search_complete(&mut self, outcome: &SearchOutcome) {
        let _ = self.sender.send(ProgressMessage::SearchComplete(outcome.clone()));
    }
}
