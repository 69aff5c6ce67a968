mod dataset;
mod error;
mod ride_weather;
mod types;
mod utils;
mod weather;

pub use error::RideWeatherError;
pub use ride_weather::*;

pub use dataset::cleaner::{clean_dataset, CleanedDataset};
pub use dataset::error::DatasetError;

pub use types::date_range::DateRange;
pub use types::weather_condition::WeatherCondition;

pub use weather::api::{ArchiveResponse, HourlyBlock};
pub use weather::cleaner::clean_weather;
pub use weather::error::WeatherDataError;
pub use weather::fetcher::{ArchiveFetcher, CacheExpiry, ARCHIVE_URL, LATITUDE, LONGITUDE};
