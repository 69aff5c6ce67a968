use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file not found at '{0}'")]
    SourceMissing(PathBuf, #[source] std::io::Error),

    #[error("Failed to read dataset CSV at '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Required column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("Dataset contains no rows")]
    EmptyDataset,

    #[error("Malformed calendar date '{value}' in 'date' column")]
    MalformedDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
