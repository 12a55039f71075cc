pub mod geometry;

#[cfg(feature = "gpu")]
mod device;
#[cfg(feature = "gpu")]
mod evaluator;
#[cfg(feature = "gpu")]
mod kernel;

pub use geometry::{reduce_partials, LaunchGeometry};

#[cfg(feature = "gpu")]
pub use device::select_device;
#[cfg(feature = "gpu")]
pub use evaluator::DeviceEvaluator;
