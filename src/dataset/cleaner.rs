//! Cleans the raw ridership CSV: normalizes column types, derives calendar
//! features, and extracts the covered date range.

use crate::dataset::error::DatasetError;
use crate::types::date_range::DateRange;
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use std::path::Path;

/// Columns the source file must provide. Anything else passes through
/// untouched.
const REQUIRED_COLUMNS: [&str; 7] = [
    "date",
    "timestamp",
    "temperature",
    "is_weekend",
    "is_holiday",
    "is_start_of_semester",
    "is_during_semester",
];

const FLAG_COLUMNS: [&str; 4] = [
    "is_weekend",
    "is_holiday",
    "is_start_of_semester",
    "is_during_semester",
];

const WEEKEND_DAYS: [&str; 2] = ["Saturday", "Sunday"];

/// Redundant once the calendar features are derived.
const DROPPED_COLUMNS: [&str; 3] = ["date", "timestamp", "temperature"];

/// A cleaned ridership table together with the calendar span it covers.
pub struct CleanedDataset {
    /// The cleaned table: derived calendar columns plus every pass-through
    /// column of the source.
    pub frame: DataFrame,
    /// Min/max calendar date observed in the source, used to parameterize the
    /// weather query.
    pub range: DateRange,
}

/// Reads the ridership CSV at `source` and returns the cleaned table plus its
/// date range.
///
/// The `date` column must hold timestamps whose first 10 characters form an
/// ISO calendar date. Derived columns: `exact_date` (date only), `year`,
/// `minute` (time of day rounded to the nearest 10-minute bucket, minute
/// component), `day`, `day_of_week` (full weekday name), and the four flag
/// columns coerced to booleans. `is_weekend` is recomputed from
/// `day_of_week` because the source values are known to be wrong. `date`,
/// `timestamp` and `temperature` are dropped as redundant.
///
/// # Errors
///
/// Fatal on a missing or unreadable file, a missing required column, a
/// malformed date, or an empty dataset. No partial results.
pub fn clean_dataset(source: &Path) -> Result<CleanedDataset, DatasetError> {
    std::fs::metadata(source)
        .map_err(|e| DatasetError::SourceMissing(source.to_path_buf(), e))?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(source.to_path_buf()))
        .map_err(|e| DatasetError::CsvRead(source.to_path_buf(), e))?
        .finish()
        .map_err(|e| DatasetError::CsvRead(source.to_path_buf(), e))?;

    let names = df.get_column_names();
    for column in REQUIRED_COLUMNS {
        if !names.iter().any(|name| name.as_str() == column) {
            return Err(DatasetError::MissingColumn(column.to_string()));
        }
    }

    // The range is taken from the 10-character prefixes while they are still
    // strings; ISO date prefixes sort lexicographically = chronologically.
    let with_prefix = df
        .lazy()
        .with_column(col("date").str().slice(lit(0), lit(10)).alias("exact_date"))
        .collect()?;
    let range = date_range(&with_prefix)?;

    let frame = with_prefix
        .lazy()
        .with_columns([
            col("exact_date").str().to_date(StrptimeOptions {
                format: Some("%Y-%m-%d".into()),
                ..Default::default()
            }),
            col("date").str().to_datetime(
                Some(TimeUnit::Milliseconds),
                Some("UTC".into()),
                StrptimeOptions {
                    strict: false,
                    ..Default::default()
                },
                lit("raise"),
            ),
        ])
        .with_columns(FLAG_COLUMNS.map(|name| col(name).cast(DataType::Boolean)))
        .with_columns([
            col("date").dt().year().alias("year"),
            col("date")
                .dt()
                .round(lit("10m"))
                .dt()
                .minute()
                .cast(DataType::Int32)
                .alias("minute"),
            col("date").dt().day().cast(DataType::Int32).alias("day"),
            col("date").dt().strftime("%A").alias("day_of_week"),
        ])
        // The source flag is known to be wrong; recompute from the weekday.
        .with_column(
            col("day_of_week")
                .eq(lit(WEEKEND_DAYS[0]))
                .or(col("day_of_week").eq(lit(WEEKEND_DAYS[1])))
                .alias("is_weekend"),
        )
        .drop(DROPPED_COLUMNS)
        .collect()?;

    info!(
        "Cleaned dataset from {:?}: {} rows covering {}",
        source,
        frame.height(),
        range
    );
    Ok(CleanedDataset { frame, range })
}

fn date_range(frame: &DataFrame) -> Result<DateRange, DatasetError> {
    let bounds = frame
        .clone()
        .lazy()
        .select([
            col("exact_date").min().alias("start"),
            col("exact_date").max().alias("end"),
        ])
        .collect()?;
    Ok(DateRange::new(
        parse_bound(&bounds, "start")?,
        parse_bound(&bounds, "end")?,
    ))
}

fn parse_bound(bounds: &DataFrame, name: &str) -> Result<NaiveDate, DatasetError> {
    let value = bounds
        .column(name)?
        .str()?
        .get(0)
        .ok_or(DatasetError::EmptyDataset)?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| DatasetError::MalformedDate {
        value: value.to_string(),
        source,
    })
}
