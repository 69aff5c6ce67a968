//! Maps weather codes to labels and converts units on a fetched hourly table.

use crate::types::weather_condition::WeatherCondition;
use crate::weather::error::WeatherDataError;
use polars::prelude::*;

/// Cleans a fetched hourly table: `weather_code` becomes a descriptive
/// `weather_type` label and `temperature_2m` (°C) becomes `temp_f`.
///
/// Unmapped codes label as `"Unknown"` so the gap stays visible; a null code
/// (missing measurement) stays null. The replaced columns are dropped. Pure:
/// no network, input consumed by value.
pub fn clean_weather(frame: DataFrame) -> Result<DataFrame, WeatherDataError> {
    let labels: StringChunked = {
        let codes = frame.column("weather_code")?.i64()?;
        codes
            .into_iter()
            .map(|code| code.map(|code| WeatherCondition::from_code(code).label()))
            .collect()
    };

    let mut frame = frame;
    frame.with_column(labels.with_name("weather_type".into()).into_series())?;

    let frame = frame
        .lazy()
        .with_column(
            (col("temperature_2m") * lit(9.0) / lit(5.0) + lit(32.0)).alias("temp_f"),
        )
        .drop(["weather_code", "temperature_2m"])
        .collect()?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        df!(
            "exact_date" => ["2023-01-05", "2023-01-05", "2023-01-05", "2023-01-06"],
            "hour" => [0i32, 1, 2, 3],
            "rain_cm" => [Some(0.0f64), Some(0.4), None, Some(0.1)],
            "temperature_2m" => [Some(20.0f64), Some(0.0), Some(-5.5), None],
            "weather_code" => [Some(61i64), Some(0), Some(999), None],
        )
        .unwrap()
    }

    #[test]
    fn test_codes_map_to_labels() {
        let cleaned = clean_weather(sample_frame()).unwrap();
        let types = cleaned.column("weather_type").unwrap();
        let types = types.str().unwrap();
        assert_eq!(types.get(0), Some("Rain: slight"));
        assert_eq!(types.get(1), Some("Clear sky"));
        // Unmapped codes are made visible, not silently dropped.
        assert_eq!(types.get(2), Some("Unknown"));
        // A missing measurement stays missing.
        assert_eq!(types.get(3), None);
    }

    #[test]
    fn test_temperature_converted_to_fahrenheit() {
        let cleaned = clean_weather(sample_frame()).unwrap();
        let temp_f = cleaned.column("temp_f").unwrap();
        let temp_f = temp_f.f64().unwrap();
        assert_eq!(temp_f.get(0), Some(68.0));
        assert_eq!(temp_f.get(1), Some(32.0));
        assert!((temp_f.get(2).unwrap() - 22.1).abs() < 1e-9);
        assert_eq!(temp_f.get(3), None);
    }

    #[test]
    fn test_fahrenheit_round_trips_to_celsius() {
        let celsius = [-40.0, -5.5, 0.0, 14.3, 20.0, 37.8];
        let frame = df!(
            "exact_date" => vec!["2023-01-05"; celsius.len()],
            "hour" => (0..celsius.len() as i32).collect::<Vec<_>>(),
            "rain_cm" => vec![0.0f64; celsius.len()],
            "temperature_2m" => celsius.to_vec(),
            "weather_code" => vec![0i64; celsius.len()],
        )
        .unwrap();
        let cleaned = clean_weather(frame).unwrap();
        let temp_f = cleaned.column("temp_f").unwrap();
        let temp_f = temp_f.f64().unwrap();
        for (row, c) in celsius.iter().enumerate() {
            let f = temp_f.get(row).unwrap();
            assert!(((f - 32.0) * 5.0 / 9.0 - c).abs() < 1e-9);
        }
    }

    #[test]
    fn test_replaced_columns_dropped() {
        let cleaned = clean_weather(sample_frame()).unwrap();
        let names: Vec<&str> = cleaned
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(
            names,
            ["exact_date", "hour", "rain_cm", "weather_type", "temp_f"]
        );
    }
}
