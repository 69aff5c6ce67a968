//! Defines the `WeatherCondition` enum, mapping WMO weather codes reported by
//! the archive API to descriptive variants.

/// Represents the WMO weather code reported in the `weather_code` hourly
/// variable.
///
/// This enum maps the integer codes found in archive responses to meaningful
/// weather condition descriptions. The mapping follows the WMO code table
/// used by Open-Meteo; it is an approximation, not an authoritative decoding
/// of the full WMO 4677 standard.
///
/// Codes outside the known set decode to [`WeatherCondition::Unknown`] so the
/// gap stays visible to downstream consumers instead of silently turning into
/// a missing value.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WeatherCondition {
    /// Code 0: clear sky.
    ClearSky,
    /// Code 1: mainly clear.
    MainlyClear,
    /// Code 2: partly cloudy.
    PartlyCloudy,
    /// Code 3: overcast.
    Overcast,
    /// Code 45: fog.
    Fog,
    /// Code 48: depositing rime fog.
    DepositingRimeFog,
    /// Code 51: light drizzle.
    LightDrizzle,
    /// Code 53: moderate drizzle.
    ModerateDrizzle,
    /// Code 55: dense drizzle.
    DenseDrizzle,
    /// Code 56: light freezing drizzle.
    LightFreezingDrizzle,
    /// Code 57: dense freezing drizzle.
    DenseFreezingDrizzle,
    /// Code 61: slight rain.
    SlightRain,
    /// Code 63: moderate rain.
    ModerateRain,
    /// Code 65: heavy rain.
    HeavyRain,
    /// Code 66: light freezing rain.
    LightFreezingRain,
    /// Code 67: heavy freezing rain.
    HeavyFreezingRain,
    /// Code 71: slight snow fall.
    SlightSnowFall,
    /// Code 73: moderate snow fall.
    ModerateSnowFall,
    /// Code 75: heavy snow fall.
    HeavySnowFall,
    /// Code 77: snow grains.
    SnowGrains,
    /// Code 80: slight rain showers.
    SlightRainShowers,
    /// Code 81: moderate rain showers.
    ModerateRainShowers,
    /// Code 82: violent rain showers.
    ViolentRainShowers,
    /// Code 85: slight snow showers.
    SlightSnowShowers,
    /// Code 86: heavy snow showers.
    HeavySnowShowers,
    /// Code 95: moderate thunderstorm.
    Thunderstorm,
    /// Code 96: thunderstorm with slight hail.
    ThunderstormSlightHail,
    /// Code 99: thunderstorm with heavy hail.
    ThunderstormHeavyHail,
    /// Any code outside the known table.
    Unknown,
}

impl WeatherCondition {
    /// Converts a WMO weather code into a `WeatherCondition` variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rideweather::WeatherCondition;
    ///
    /// assert_eq!(WeatherCondition::from_code(61), WeatherCondition::SlightRain);
    /// assert_eq!(WeatherCondition::from_code(999), WeatherCondition::Unknown);
    /// ```
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => WeatherCondition::ClearSky,
            1 => WeatherCondition::MainlyClear,
            2 => WeatherCondition::PartlyCloudy,
            3 => WeatherCondition::Overcast,
            45 => WeatherCondition::Fog,
            48 => WeatherCondition::DepositingRimeFog,
            51 => WeatherCondition::LightDrizzle,
            53 => WeatherCondition::ModerateDrizzle,
            55 => WeatherCondition::DenseDrizzle,
            56 => WeatherCondition::LightFreezingDrizzle,
            57 => WeatherCondition::DenseFreezingDrizzle,
            61 => WeatherCondition::SlightRain,
            63 => WeatherCondition::ModerateRain,
            65 => WeatherCondition::HeavyRain,
            66 => WeatherCondition::LightFreezingRain,
            67 => WeatherCondition::HeavyFreezingRain,
            71 => WeatherCondition::SlightSnowFall,
            73 => WeatherCondition::ModerateSnowFall,
            75 => WeatherCondition::HeavySnowFall,
            77 => WeatherCondition::SnowGrains,
            80 => WeatherCondition::SlightRainShowers,
            81 => WeatherCondition::ModerateRainShowers,
            82 => WeatherCondition::ViolentRainShowers,
            85 => WeatherCondition::SlightSnowShowers,
            86 => WeatherCondition::HeavySnowShowers,
            95 => WeatherCondition::Thunderstorm,
            96 => WeatherCondition::ThunderstormSlightHail,
            99 => WeatherCondition::ThunderstormHeavyHail,
            _ => WeatherCondition::Unknown,
        }
    }

    /// Returns the descriptive label for this condition, as written into the
    /// `weather_type` column.
    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::ClearSky => "Clear sky",
            WeatherCondition::MainlyClear => "Mainly clear",
            WeatherCondition::PartlyCloudy => "Partly cloudy",
            WeatherCondition::Overcast => "Overcast",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::DepositingRimeFog => "Depositing rime fog",
            WeatherCondition::LightDrizzle => "Drizzle: light",
            WeatherCondition::ModerateDrizzle => "Drizzle: moderate",
            WeatherCondition::DenseDrizzle => "Drizzle: dense",
            WeatherCondition::LightFreezingDrizzle => "Freezing drizzle: light",
            WeatherCondition::DenseFreezingDrizzle => "Freezing drizzle: dense",
            WeatherCondition::SlightRain => "Rain: slight",
            WeatherCondition::ModerateRain => "Rain: moderate",
            WeatherCondition::HeavyRain => "Rain: heavy",
            WeatherCondition::LightFreezingRain => "Freezing rain: light",
            WeatherCondition::HeavyFreezingRain => "Freezing rain: heavy",
            WeatherCondition::SlightSnowFall => "Snow fall: slight",
            WeatherCondition::ModerateSnowFall => "Snow fall: moderate",
            WeatherCondition::HeavySnowFall => "Snow fall: heavy",
            WeatherCondition::SnowGrains => "Snow grains",
            WeatherCondition::SlightRainShowers => "Rain showers: slight",
            WeatherCondition::ModerateRainShowers => "Rain showers: moderate",
            WeatherCondition::ViolentRainShowers => "Rain showers: violent",
            WeatherCondition::SlightSnowShowers => "Snow showers: slight",
            WeatherCondition::HeavySnowShowers => "Snow showers: heavy",
            WeatherCondition::Thunderstorm => "Thunderstorm: moderate",
            WeatherCondition::ThunderstormSlightHail => "Thunderstorm with slight hail",
            WeatherCondition::ThunderstormHeavyHail => "Thunderstorm with heavy hail",
            WeatherCondition::Unknown => "Unknown",
        }
    }
}
