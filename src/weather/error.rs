use chrono::NaiveDate;
use polars::error::PolarsError;
use reqwest::StatusCode;
use std::path::PathBuf;
use std::time::SystemTimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read metadata for cache file '{0}'")]
    CacheMetadataRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to calculate cache age for '{0}'")]
    CacheAgeCalculation(PathBuf, #[source] SystemTimeError),

    #[error("Failed to delete cache file '{0}'")]
    CacheDeletion(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing parquet cache file '{0}'")]
    ParquetWriteIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing parquet cache file '{0}'")]
    ParquetWritePolars(PathBuf, #[source] PolarsError),

    #[error("I/O error opening parquet cache file '{0}'")]
    ParquetReadIo(PathBuf, #[source] std::io::Error),

    #[error("Failed to read parquet cache file '{0}'")]
    ParquetReadPolars(PathBuf, #[source] PolarsError),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode archive response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Archive response contains an empty hourly time axis")]
    EmptyTimeAxis,

    #[error("Hourly series '{variable}' has {found} values but the time axis has {expected}")]
    SeriesLengthMismatch {
        variable: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Hourly time axis is not evenly spaced at index {index}")]
    IrregularTimeAxis { index: usize },

    #[error("Hourly time axis contains an invalid unix timestamp {0}")]
    InvalidTimestamp(i64),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}

impl WeatherDataError {
    /// Whether a retry could plausibly succeed. Connection failures and
    /// server-side statuses are transient; everything else fails immediately.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            WeatherDataError::NetworkRequest(..) => true,
            WeatherDataError::HttpStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}
