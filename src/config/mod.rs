pub mod traits;
pub mod search;
pub mod device;
pub mod data;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use search::{SearchConfig, VECTOR_SIZE};
pub use device::{DeviceConfig, Backend};
pub use data::DataConfig;
