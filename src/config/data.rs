use super::traits::{section_error, ConfigSection};
use crate::error::PolycorrError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the aligned signal table lives and which columns feed the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub input_path: PathBuf,
    pub x_column: String,
    pub y_column: String,
    pub z_column: String,
    pub target_column: String,
    pub normalize: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("signals.csv"),
            x_column: "acc_x".to_string(),
            y_column: "acc_y".to_string(),
            z_column: "acc_z".to_string(),
            target_column: "hr".to_string(),
            normalize: true,
        }
    }
}

impl DataConfig {
    pub fn columns(&self) -> [&str; 4] {
        [
            self.x_column.as_str(),
            self.y_column.as_str(),
            self.z_column.as_str(),
            self.target_column.as_str(),
        ]
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), PolycorrError> {
        if self.columns().iter().any(|c| c.trim().is_empty()) {
            return Err(section_error::<Self>("Column names must not be empty"));
        }
        Ok(())
    }
}
