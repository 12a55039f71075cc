pub mod genome;
pub mod operators;
pub mod population;
pub mod progress;
pub mod scheduler;
pub mod selection;

pub use genome::{Genome, Population, GENOME_SIZE};
pub use population::PopulationManager;
pub use progress::{ChannelProgressCallback, LogProgressCallback, NoProgress, ProgressMessage};
pub use scheduler::{ProgressCallback, SearchOutcome, SearchScheduler, SearchState, SearchStatus};
pub use selection::RouletteSampler;
