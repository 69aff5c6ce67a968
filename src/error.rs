use crate::dataset::error::DatasetError;
use crate::weather::error::WeatherDataError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RideWeatherError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] polars::error::PolarsError),
}
