use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

pub const CITY_NOT_FOUND: &str = "City not found";
pub const FETCH_FAILED: &str = "Failed to fetch weather data.";
pub const FETCH_SUCCEEDED: &str = "weather data fetched successfully.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// First geocoder match for a city name.
#[derive(Debug, Clone, PartialEq)]
pub struct CityInfo {
    pub coordinate: Coordinate,
    pub country: Option<String>,
    pub region: Option<String>,
}

/// Four-point compass direction derived from the wind bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindDirection {
    North,
    East,
    South,
    West,
}

impl WindDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindDirection::North => "North",
            WindDirection::East => "East",
            WindDirection::South => "South",
            WindDirection::West => "West",
        }
    }
}

impl std::fmt::Display for WindDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-ready weather for one city. Every measurement is already
/// formatted with its unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub city: String,
    pub temperature: String,
    pub min_temperature: String,
    pub max_temperature: String,
    pub humidity: String,
    pub pressure: String,
    pub wind_speed: String,
    pub wind_direction: WindDirection,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEnvelope {
    pub error: bool,
    pub message: String,
    pub data: Option<WeatherReport>,
}

impl WeatherEnvelope {
    pub fn success(report: WeatherReport) -> Self {
        Self {
            error: false,
            message: FETCH_SUCCEEDED.to_string(),
            data: Some(report),
        }
    }

    pub fn failure(err: &WeatherError) -> Self {
        Self {
            error: true,
            message: err.envelope_message().to_string(),
            data: None,
        }
    }
}

impl From<Result<WeatherReport, WeatherError>> for WeatherEnvelope {
    fn from(result: Result<WeatherReport, WeatherError>) -> Self {
        match result {
            Ok(report) => Self::success(report),
            Err(err) => Self::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> WeatherReport {
        WeatherReport {
            city: "London".into(),
            temperature: "25.5 °C".into(),
            min_temperature: "24.1 °C".into(),
            max_temperature: "27 °C".into(),
            humidity: "60%".into(),
            pressure: "1012 hPa".into(),
            wind_speed: "4.1 m/s".into(),
            wind_direction: WindDirection::East,
            description: "clear sky".into(),
        }
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(report()).unwrap();

        assert_eq!(json["minTemperature"], "24.1 °C");
        assert_eq!(json["maxTemperature"], "27 °C");
        assert_eq!(json["windSpeed"], "4.1 m/s");
        assert_eq!(json["windDirection"], "East");
        assert!(json.get("min_temperature").is_none());
    }

    #[test]
    fn failure_envelope_has_no_data() {
        let env = WeatherEnvelope::failure(&WeatherError::NotFound { city: "x".into() });
        let json = serde_json::to_value(&env).unwrap();

        assert_eq!(json["error"], true);
        assert_eq!(json["message"], CITY_NOT_FOUND);
        assert!(json["data"].is_null());
    }

    #[test]
    fn envelope_from_result() {
        let env = WeatherEnvelope::from(Ok(report()));
        assert!(!env.error);
        assert_eq!(env.message, FETCH_SUCCEEDED);
        assert_eq!(env.data, Some(report()));

        let env = WeatherEnvelope::from(Err(WeatherError::UpstreamFailure("boom".into())));
        assert!(env.error);
        assert_eq!(env.message, FETCH_FAILED);
        assert!(env.data.is_none());
    }
}
