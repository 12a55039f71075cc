pub mod correlation;
pub mod evaluator;
pub mod gpu;
pub mod sequential;

pub use correlation::{abs_correlation, CorrelationSums};
pub use evaluator::{Evaluation, FitnessEvaluator};
pub use sequential::{transform_signal, SequentialEvaluator};

#[cfg(feature = "gpu")]
pub use gpu::DeviceEvaluator;
