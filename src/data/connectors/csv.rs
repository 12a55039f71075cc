use crate::config::DataConfig;
use crate::data::{normalize_min_max, SignalSet};
use crate::error::{PolycorrError, Result};
use polars::prelude::*;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| PolycorrError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load the configured columns as a signal set, normalizing when requested.
    pub fn load_signals(config: &DataConfig) -> Result<SignalSet> {
        let df = Self::load(&config.input_path)?;
        let signals = Self::signals_from_frame(&df, config)?;
        log::info!(
            "Loaded {} samples from {}",
            signals.len(),
            config.input_path.display()
        );
        Ok(signals)
    }

    pub fn signals_from_frame(df: &DataFrame, config: &DataConfig) -> Result<SignalSet> {
        let [x, y, z, target] = config.columns();
        let mut channels = [
            Self::extract_column(df, x)?,
            Self::extract_column(df, y)?,
            Self::extract_column(df, z)?,
            Self::extract_column(df, target)?,
        ];

        if config.normalize {
            for channel in channels.iter_mut() {
                normalize_min_max(channel);
            }
        }

        let [x, y, z, target] = channels;
        SignalSet::new(x, y, z, target)
    }

    /// Read one numeric column as `f64`; nulls are rejected.
    fn extract_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        let column = df.column(name).map_err(|_| {
            PolycorrError::DataLoading(format!("Missing required column: {}", name))
        })?;

        let casted = column.cast(&DataType::Float64).map_err(|e| {
            PolycorrError::DataLoading(format!("Column '{}' must be numeric: {}", name, e))
        })?;
        let values = casted.f64()?;

        if values.null_count() > 0 {
            return Err(PolycorrError::DataLoading(format!(
                "Column '{}' contains {} null values",
                name,
                values.null_count()
            )));
        }

        Ok(values.into_no_null_iter().collect())
    }
}
