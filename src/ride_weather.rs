//! The main entry point for turning a raw ridership CSV into a weather-
//! enriched table. Wires the dataset cleaner, the archive fetcher and the
//! weather cleaner together and owns the cache directory.

use crate::dataset::cleaner::{clean_dataset, CleanedDataset};
use crate::error::RideWeatherError;
use crate::types::date_range::DateRange;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use crate::weather::cleaner::clean_weather;
use crate::weather::fetcher::{
    ArchiveFetcher, CacheExpiry, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES,
};
use bon::bon;
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tokio::task;

/// The pipeline client.
///
/// Create one with [`RideWeather::new`] (default cache directory) or
/// [`RideWeather::with_options`] to override the cache directory, the cache
/// expiry policy, or the retry behavior.
///
/// # Examples
///
/// ```no_run
/// # use rideweather::{RideWeather, RideWeatherError};
/// # use std::path::Path;
/// # #[tokio::main]
/// # async fn main() -> Result<(), RideWeatherError> {
/// let client = RideWeather::new().await?;
/// let enriched = client.enrich(Path::new("data.csv")).await?;
/// println!("{}", enriched.head(Some(5)));
/// # Ok(())
/// # }
/// ```
pub struct RideWeather {
    fetcher: ArchiveFetcher,
}

#[bon]
impl RideWeather {
    /// Creates a client with explicit options.
    ///
    /// # Arguments
    ///
    /// * `.cache_folder(PathBuf)`: Optional. Where cached archive responses
    ///   live. Defaults to the system cache directory. Created if absent.
    /// * `.cache_expiry(CacheExpiry)`: Optional. When cached archive data
    ///   stops being served. Defaults to [`CacheExpiry::Never`].
    /// * `.max_retries(u32)`: Optional. Retry attempts for transient archive
    ///   failures. Defaults to 5.
    /// * `.backoff_factor(f64)`: Optional. Base factor of the exponential
    ///   backoff between retries, in seconds. Defaults to 0.2.
    #[builder]
    pub async fn with_options(
        cache_folder: Option<PathBuf>,
        cache_expiry: Option<CacheExpiry>,
        max_retries: Option<u32>,
        backoff_factor: Option<f64>,
    ) -> Result<Self, RideWeatherError> {
        let cache_folder = match cache_folder {
            Some(folder) => folder,
            None => get_cache_dir().map_err(RideWeatherError::CacheDirResolution)?,
        };
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| RideWeatherError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            fetcher: ArchiveFetcher::with_policy(
                &cache_folder,
                cache_expiry.unwrap_or(CacheExpiry::Never),
                max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
                backoff_factor.unwrap_or(DEFAULT_BACKOFF_FACTOR),
            ),
        })
    }
}

impl RideWeather {
    /// Creates a client with the default cache directory and policies.
    pub async fn new() -> Result<Self, RideWeatherError> {
        Self::with_options().call().await
    }

    /// Creates a client caching under `cache_folder`.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, RideWeatherError> {
        Self::with_options().cache_folder(cache_folder).call().await
    }

    /// Cleans the ridership CSV at `source`. See [`clean_dataset`] for the
    /// derived columns and failure modes.
    pub async fn clean_dataset(&self, source: &Path) -> Result<CleanedDataset, RideWeatherError> {
        let source = source.to_path_buf();
        let cleaned = task::spawn_blocking(move || clean_dataset(&source)).await??;
        Ok(cleaned)
    }

    /// Fetches the raw hourly weather table for `range`.
    pub async fn fetch_weather(&self, range: &DateRange) -> Result<DataFrame, RideWeatherError> {
        let frame = self.fetcher.fetch_hourly(range).await?;
        Ok(frame)
    }

    /// Fetches the hourly weather table for `range` and cleans it: weather
    /// codes labeled, temperatures in °F.
    pub async fn fetch_clean_weather(
        &self,
        range: &DateRange,
    ) -> Result<DataFrame, RideWeatherError> {
        let hourly = self.fetcher.fetch_hourly(range).await?;
        let cleaned = clean_weather(hourly)?;
        Ok(cleaned)
    }

    /// Runs the full pipeline: clean the dataset, fetch and clean the weather
    /// for its date range, and join the two tables on `exact_date`.
    ///
    /// The join is a left join: ridership rows are the primary record, so
    /// dates without archive coverage survive with null weather columns. Each
    /// row pairs with every hourly observation of its date.
    pub async fn enrich(&self, source: &Path) -> Result<DataFrame, RideWeatherError> {
        let CleanedDataset { frame, range } = self.clean_dataset(source).await?;
        let weather = self.fetch_clean_weather(&range).await?;
        let enriched = join_on_date(frame, weather)?;
        info!("Enriched dataset: {} rows for {}", enriched.height(), range);
        Ok(enriched)
    }

    /// Removes the cached archive data for `range`, forcing the next fetch to
    /// re-query.
    pub async fn clear_weather_cache(&self, range: &DateRange) -> Result<(), RideWeatherError> {
        self.fetcher.clear_cache(range).await?;
        Ok(())
    }
}

pub(crate) fn join_on_date(
    dataset: DataFrame,
    weather: DataFrame,
) -> Result<DataFrame, PolarsError> {
    dataset
        .lazy()
        .join(
            weather.lazy(),
            [col("exact_date")],
            [col("exact_date")],
            JoinArgs::new(JoinType::Left),
        )
        .collect()
}
