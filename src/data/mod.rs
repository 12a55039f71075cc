pub mod connectors;
pub mod normalize;
pub mod signals;

pub use connectors::CsvConnector;
pub use normalize::{find_min_max, normalize_min_max};
pub use signals::SignalSet;
