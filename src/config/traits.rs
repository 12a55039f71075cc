use crate::error::PolycorrError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), PolycorrError>;
}

/// Builds a configuration error prefixed with the section it came from.
pub(crate) fn section_error<S: ConfigSection>(message: impl Into<String>) -> PolycorrError {
    PolycorrError::Configuration(format!("[{}] {}", S::section_name(), message.into()))
}
