use super::traits::{section_error, ConfigSection};
use crate::error::PolycorrError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Sequential,
    Gpu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub backend: Backend,
    /// Preferred device name; the first available GPU is used when unset.
    pub device_name: Option<String>,
    /// Threads per block; the device's maximum is used when unset.
    pub block_size: Option<u32>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Sequential,
            device_name: None,
            block_size: None,
        }
    }
}

impl ConfigSection for DeviceConfig {
    fn section_name() -> &'static str {
        "device"
    }

    fn validate(&self) -> Result<(), PolycorrError> {
        if let Some(block_size) = self.block_size {
            // The in-block tree reduction halves the stride each round.
            if block_size == 0 || !block_size.is_power_of_two() {
                return Err(section_error::<Self>(format!(
                    "Block size {} must be a positive power of two",
                    block_size
                )));
            }
        }
        if let Some(name) = &self.device_name {
            if name.trim().is_empty() {
                return Err(section_error::<Self>("Device name must not be blank"));
            }
        }
        Ok(())
    }
}
