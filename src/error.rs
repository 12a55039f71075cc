use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolycorrError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Computation error: {0}")]
    Computation(String),

    /// Device enumeration, context creation or kernel build failed.
    #[error("Device error: {0}")]
    Device(String),

    /// Kernel launch or readback failed mid-run.
    #[error("Execution error: {0}")]
    Execution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PolycorrError>;
