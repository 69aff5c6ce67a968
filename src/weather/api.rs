//! Serde structures for the Open-Meteo archive response, decoded by named
//! field and validated before any reshaping.

use crate::weather::error::WeatherDataError;
use serde::Deserialize;

/// One archive response for a single coordinate.
///
/// The archive serves exactly one location per request; multi-location
/// queries are unsupported by this crate, so there is no list to index into.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveResponse {
    /// Latitude of the model grid cell actually used (may differ slightly
    /// from the requested coordinate).
    pub latitude: f64,
    /// Longitude of the model grid cell actually used.
    pub longitude: f64,
    #[serde(default)]
    pub elevation: Option<f64>,
    pub utc_offset_seconds: i64,
    pub hourly: HourlyBlock,
}

/// The hourly time series block.
///
/// Every requested variable is a named field here; a response missing one of
/// them fails to deserialize instead of silently shifting values between
/// columns. [`HourlyBlock::validate`] checks the remaining shape invariants.
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyBlock {
    /// Unix timestamps (seconds, UTC), one per observation.
    pub time: Vec<i64>,
    pub temperature_2m: Vec<Option<f64>>,
    pub rain: Vec<Option<f64>>,
    pub weather_code: Vec<Option<i64>>,
}

impl HourlyBlock {
    /// Validates the shape of the block: a non-empty time axis, every
    /// variable series exactly as long as the axis, and timestamps strictly
    /// increasing with a constant step.
    pub fn validate(&self) -> Result<(), WeatherDataError> {
        if self.time.is_empty() {
            return Err(WeatherDataError::EmptyTimeAxis);
        }
        for (variable, found) in [
            ("temperature_2m", self.temperature_2m.len()),
            ("rain", self.rain.len()),
            ("weather_code", self.weather_code.len()),
        ] {
            if found != self.time.len() {
                return Err(WeatherDataError::SeriesLengthMismatch {
                    variable,
                    expected: self.time.len(),
                    found,
                });
            }
        }
        if self.time.len() > 1 {
            let step = self.time[1] - self.time[0];
            if step <= 0 {
                return Err(WeatherDataError::IrregularTimeAxis { index: 1 });
            }
            for (index, pair) in self.time.windows(2).enumerate() {
                if pair[1] - pair[0] != step {
                    return Err(WeatherDataError::IrregularTimeAxis { index: index + 1 });
                }
            }
        }
        Ok(())
    }

    /// The sampling interval in seconds, or `None` for a single observation.
    pub fn interval_seconds(&self) -> Option<i64> {
        (self.time.len() > 1).then(|| self.time[1] - self.time[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds the half-open axis `[start, end)` stepped by `interval`, the
    /// shape the archive reports for a contiguous hourly range.
    fn time_axis(start: i64, end: i64, interval: i64) -> Vec<i64> {
        (start..end).step_by(interval as usize).collect()
    }

    fn block(time: Vec<i64>) -> HourlyBlock {
        let n = time.len();
        HourlyBlock {
            time,
            temperature_2m: vec![Some(10.0); n],
            rain: vec![Some(0.0); n],
            weather_code: vec![Some(0); n],
        }
    }

    #[test]
    fn test_decodes_named_fields_with_nulls() {
        let payload = r#"{
            "latitude": 37.86902,
            "longitude": -122.2538,
            "elevation": 96.0,
            "utc_offset_seconds": 0,
            "hourly_units": {"temperature_2m": "°C", "rain": "mm", "weather_code": "wmo code"},
            "hourly": {
                "time": [1672531200, 1672534800, 1672538400],
                "temperature_2m": [9.6, null, 10.1],
                "rain": [0.0, 0.2, null],
                "weather_code": [2, 61, null]
            }
        }"#;
        let response: ArchiveResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.hourly.time.len(), 3);
        assert_eq!(response.hourly.temperature_2m[1], None);
        assert_eq!(response.hourly.rain[2], None);
        assert_eq!(response.hourly.weather_code[1], Some(61));
        assert!(response.hourly.validate().is_ok());
        assert_eq!(response.hourly.interval_seconds(), Some(3600));
    }

    #[test]
    fn test_missing_variable_fails_to_decode() {
        // "rain" absent: decoding must fail rather than misassign columns.
        let payload = r#"{
            "latitude": 37.86902,
            "longitude": -122.2538,
            "utc_offset_seconds": 0,
            "hourly": {
                "time": [1672531200],
                "temperature_2m": [9.6],
                "weather_code": [2]
            }
        }"#;
        assert!(serde_json::from_str::<ArchiveResponse>(payload).is_err());
    }

    #[test]
    fn test_axis_length_matches_interval_arithmetic() {
        let start = 1672531200; // 2023-01-01T00:00:00Z
        let end = start + 7 * 24 * 3600;
        let axis = time_axis(start, end, 3600);
        assert_eq!(axis.len() as i64, (end - start) / 3600);
        let b = block(axis);
        assert!(b.validate().is_ok());
        assert_eq!(b.interval_seconds(), Some(3600));
    }

    #[test]
    fn test_axis_is_strictly_increasing_with_constant_step() {
        let axis = time_axis(0, 48 * 3600, 3600);
        for pair in axis.windows(2) {
            assert_eq!(pair[1] - pair[0], 3600);
        }
    }

    #[test]
    fn test_empty_axis_rejected() {
        let b = block(vec![]);
        assert!(matches!(b.validate(), Err(WeatherDataError::EmptyTimeAxis)));
    }

    #[test]
    fn test_series_length_mismatch_rejected() {
        let mut b = block(time_axis(0, 3 * 3600, 3600));
        b.rain.pop();
        assert!(matches!(
            b.validate(),
            Err(WeatherDataError::SeriesLengthMismatch {
                variable: "rain",
                expected: 3,
                found: 2,
            })
        ));
    }

    #[test]
    fn test_irregular_axis_rejected() {
        let b = block(vec![0, 3600, 7200, 7200 + 1800]);
        assert!(matches!(
            b.validate(),
            Err(WeatherDataError::IrregularTimeAxis { index: 3 })
        ));
    }

    #[test]
    fn test_decreasing_axis_rejected() {
        let b = block(vec![7200, 3600, 0]);
        assert!(matches!(
            b.validate(),
            Err(WeatherDataError::IrregularTimeAxis { .. })
        ));
    }

    #[test]
    fn test_single_observation_has_no_interval() {
        let b = block(vec![1672531200]);
        assert!(b.validate().is_ok());
        assert_eq!(b.interval_seconds(), None);
    }
}
