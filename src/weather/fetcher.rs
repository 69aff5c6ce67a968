//! Fetches hourly observations from the Open-Meteo archive for the fixed
//! dataset coordinate, with an on-disk parquet cache and retried requests.

use crate::types::date_range::DateRange;
use crate::weather::api::{ArchiveResponse, HourlyBlock};
use crate::weather::error::WeatherDataError;
use chrono::DateTime;
use log::{info, warn};
use polars::prelude::*;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::NamedTempFile;
use tokio::{fs, task};

/// The archive endpoint. Query parameters select the coordinate, the date
/// range and the hourly variables.
pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// The dataset's single coordinate. Multi-location support is out of scope.
pub const LATITUDE: f64 = 37.8716;
pub const LONGITUDE: f64 = -122.2728;

/// The hourly variables requested from the archive. The response is decoded
/// by named field, so this list only drives the query string.
pub(crate) const HOURLY_VARIABLES: [&str; 3] = ["temperature_2m", "rain", "weather_code"];

pub(crate) const DEFAULT_MAX_RETRIES: u32 = 5;
pub(crate) const DEFAULT_BACKOFF_FACTOR: f64 = 0.2;

/// When a cached archive response stops being served.
///
/// Archive data is historical, so `Never` is the default: a repeated query
/// returns the cached table indefinitely. `After` bounds staleness for
/// callers that prefer re-querying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheExpiry {
    Never,
    After(Duration),
}

/// Fetches hourly archive data, caching reshaped tables as parquet files
/// keyed by the request signature.
pub struct ArchiveFetcher {
    cache_dir: PathBuf,
    client: Client,
    cache_expiry: CacheExpiry,
    max_retries: u32,
    backoff_factor: f64,
}

impl ArchiveFetcher {
    pub fn new(cache_dir: &Path) -> Self {
        Self::with_policy(
            cache_dir,
            CacheExpiry::Never,
            DEFAULT_MAX_RETRIES,
            DEFAULT_BACKOFF_FACTOR,
        )
    }

    pub fn with_policy(
        cache_dir: &Path,
        cache_expiry: CacheExpiry,
        max_retries: u32,
        backoff_factor: f64,
    ) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            client: Client::new(),
            cache_expiry,
            max_retries,
            backoff_factor,
        }
    }

    /// Fetches the hourly table for `range`, one row per hour, with columns
    /// `exact_date`, `hour`, `rain_cm`, `temperature_2m`, `weather_code`.
    ///
    /// A fresh cache entry short-circuits the request entirely. Transient
    /// failures are retried with exponential backoff; after the retries are
    /// exhausted the last error is returned. No partial data.
    pub async fn fetch_hourly(&self, range: &DateRange) -> Result<DataFrame, WeatherDataError> {
        if range.start > range.end {
            return Err(WeatherDataError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }

        let cache_path = self.cache_dir.join(cache_file_name(range));
        if self.cache_is_fresh(&cache_path).await? {
            info!("Cache hit for archive range {} at {:?}", range, cache_path);
            return read_cached_frame(&cache_path).await;
        }
        warn!("Cache miss for archive range {}. Querying the archive.", range);

        let response = self.request_with_retry(range).await?;
        info!(
            "Archive location {:.4}°N {:.4}°E, elevation {:?} m, UTC offset {}s",
            response.latitude, response.longitude, response.elevation, response.utc_offset_seconds
        );
        response.hourly.validate()?;
        let frame = reshape_hourly(&response.hourly)?;

        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| WeatherDataError::CacheDirCreation(self.cache_dir.clone(), e))?;
        write_cached_frame(frame.clone(), &cache_path).await?;
        info!("Cached archive data for {} to {:?}", range, cache_path);

        Ok(frame)
    }

    /// Removes the cache entry for `range`, if any.
    pub async fn clear_cache(&self, range: &DateRange) -> Result<(), WeatherDataError> {
        let path = self.cache_dir.join(cache_file_name(range));
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Removed cached archive data at {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WeatherDataError::CacheDeletion(path, e)),
        }
    }

    async fn cache_is_fresh(&self, path: &Path) -> Result<bool, WeatherDataError> {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(WeatherDataError::CacheMetadataRead(path.to_path_buf(), e)),
        };
        match self.cache_expiry {
            CacheExpiry::Never => Ok(true),
            CacheExpiry::After(ttl) => {
                let modified = metadata
                    .modified()
                    .map_err(|e| WeatherDataError::CacheMetadataRead(path.to_path_buf(), e))?;
                let age = SystemTime::now()
                    .duration_since(modified)
                    .map_err(|e| WeatherDataError::CacheAgeCalculation(path.to_path_buf(), e))?;
                Ok(age < ttl)
            }
        }
    }

    async fn request_with_retry(
        &self,
        range: &DateRange,
    ) -> Result<ArchiveResponse, WeatherDataError> {
        let mut attempt: u32 = 0;
        loop {
            match self.request(range).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.max_retries && e.is_transient() => {
                    let delay = backoff_delay(self.backoff_factor, attempt);
                    warn!(
                        "Archive request failed (attempt {} of {}), retrying in {:.1}s: {}",
                        attempt + 1,
                        self.max_retries,
                        delay.as_secs_f64(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn request(&self, range: &DateRange) -> Result<ArchiveResponse, WeatherDataError> {
        let response = self
            .client
            .get(ARCHIVE_URL)
            .query(&[
                ("latitude", LATITUDE.to_string()),
                ("longitude", LONGITUDE.to_string()),
                ("start_date", range.start.format("%Y-%m-%d").to_string()),
                ("end_date", range.end.format("%Y-%m-%d").to_string()),
                ("hourly", HOURLY_VARIABLES.join(",")),
                ("timeformat", "unixtime".to_string()),
            ])
            .send()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(ARCHIVE_URL.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    WeatherDataError::HttpStatus {
                        url: ARCHIVE_URL.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    WeatherDataError::NetworkRequest(ARCHIVE_URL.to_string(), e)
                });
            }
        };

        response
            .json::<ArchiveResponse>()
            .await
            .map_err(|e| WeatherDataError::Decode {
                url: ARCHIVE_URL.to_string(),
                source: e,
            })
    }
}

/// The request signature: coordinate, range and variable list. Two calls
/// with the same parameters share one cache entry.
pub(crate) fn cache_file_name(range: &DateRange) -> String {
    format!(
        "archive-{}_{}-{}-{}-{}.parquet",
        LATITUDE,
        LONGITUDE,
        range.start,
        range.end,
        HOURLY_VARIABLES.join("_")
    )
}

fn backoff_delay(factor: f64, attempt: u32) -> Duration {
    Duration::from_secs_f64(factor * f64::from(1u32 << attempt))
}

/// Reshapes a validated hourly block into the flat observation table.
pub(crate) fn reshape_hourly(hourly: &HourlyBlock) -> Result<DataFrame, WeatherDataError> {
    let datetime = hourly
        .time
        .iter()
        .map(|&seconds| {
            DateTime::from_timestamp(seconds, 0)
                .map(|dt| dt.naive_utc())
                .ok_or(WeatherDataError::InvalidTimestamp(seconds))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let frame = df!(
        "datetime" => datetime,
        "temperature_2m" => &hourly.temperature_2m,
        "rain" => &hourly.rain,
        "weather_code" => &hourly.weather_code,
    )?;

    let frame = frame
        .lazy()
        .with_columns([
            col("datetime").dt().hour().cast(DataType::Int32).alias("hour"),
            col("datetime").cast(DataType::Date).alias("exact_date"),
        ])
        .select([
            col("exact_date"),
            col("hour"),
            col("rain").alias("rain_cm"),
            col("temperature_2m"),
            col("weather_code"),
        ])
        .collect()?;
    Ok(frame)
}

async fn read_cached_frame(path: &Path) -> Result<DataFrame, WeatherDataError> {
    let path = path.to_path_buf();
    task::spawn_blocking(move || {
        let file = std::fs::File::open(&path)
            .map_err(|e| WeatherDataError::ParquetReadIo(path.clone(), e))?;
        ParquetReader::new(file)
            .finish()
            .map_err(|e| WeatherDataError::ParquetReadPolars(path.clone(), e))
    })
    .await?
}

/// Writes through a temp file in the same directory so a crashed write never
/// leaves a torn cache entry.
pub(crate) async fn write_cached_frame(
    mut frame: DataFrame,
    path: &Path,
) -> Result<(), WeatherDataError> {
    let path = path.to_path_buf();
    task::spawn_blocking(move || {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| WeatherDataError::ParquetWriteIo(path.clone(), e))?;
        ParquetWriter::new(&mut tmp)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut frame)
            .map_err(|e| WeatherDataError::ParquetWritePolars(path.clone(), e))?;
        tmp.persist(&path)
            .map_err(|e| WeatherDataError::ParquetWriteIo(path.clone(), e.error))?;
        Ok::<(), WeatherDataError>(())
    })
    .await??;
    Ok(())
}
