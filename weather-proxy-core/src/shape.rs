//! Turns a raw current-weather payload into a [`WeatherReport`].
//!
//! Numbers are rendered with `serde_json`'s own formatting: integers stay
//! integers and floats keep a fractional part, so `25.5` stays `25.5`, `27.0`
//! stays `27.0` and a humidity of `80` stays `80`. Exponent forms use the
//! shortest notation (`1e-7`).

use serde_json::Value;

use crate::{
    error::WeatherError,
    model::{WeatherReport, WindDirection},
};

/// Build the report for `payload`. `requested_city` is used when the payload
/// carries no `name`.
pub fn shape_report(payload: &Value, requested_city: &str) -> Result<WeatherReport, WeatherError> {
    let main = section(payload, "main")?;
    let wind = section(payload, "wind")?;

    let description = payload
        .get("weather")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get("description"))
        .and_then(Value::as_str)
        .ok_or_else(|| missing("weather[0].description"))?;

    let deg = wind
        .get("deg")
        .and_then(Value::as_f64)
        .ok_or_else(|| missing("wind.deg"))?;

    let city = payload
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(requested_city);

    Ok(WeatherReport {
        city: city.to_string(),
        temperature: format!("{} °C", number(main, "main", "temp")?),
        min_temperature: format!("{} °C", number(main, "main", "temp_min")?),
        max_temperature: format!("{} °C", number(main, "main", "temp_max")?),
        humidity: format!("{}%", number(main, "main", "humidity")?),
        pressure: format!("{} hPa", number(main, "main", "pressure")?),
        wind_speed: format!("{} m/s", number(wind, "wind", "speed")?),
        wind_direction: wind_direction(deg),
        description: description.to_string(),
    })
}

/// Collapse a bearing in degrees onto four compass points.
///
/// Bands are closed on their upper bound. Anything outside (45, 315],
/// including negative, >360 and NaN bearings, is North.
pub fn wind_direction(deg: f64) -> WindDirection {
    if deg > 45.0 && deg <= 135.0 {
        WindDirection::East
    } else if deg > 135.0 && deg <= 225.0 {
        WindDirection::South
    } else if deg > 225.0 && deg <= 315.0 {
        WindDirection::West
    } else {
        WindDirection::North
    }
}

fn section<'a>(payload: &'a Value, key: &str) -> Result<&'a Value, WeatherError> {
    payload
        .get(key)
        .filter(|v| v.is_object())
        .ok_or_else(|| missing(key))
}

fn number<'a>(
    section: &'a Value,
    section_name: &str,
    key: &str,
) -> Result<&'a serde_json::Number, WeatherError> {
    match section.get(key) {
        Some(Value::Number(n)) => Ok(n),
        _ => Err(missing(&format!("{section_name}.{key}"))),
    }
}

fn missing(path: &str) -> WeatherError {
    WeatherError::MalformedPayload(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "name": "London",
            "main": {
                "temp": 25.5,
                "temp_min": 24.0,
                "temp_max": 27.2,
                "humidity": 60,
                "pressure": 1012
            },
            "wind": { "speed": 4.1, "deg": 90 },
            "weather": [
                { "main": "Clear", "description": "clear sky" },
                { "main": "Haze", "description": "haze" }
            ]
        })
    }

    #[test]
    fn shapes_full_payload() {
        let report = shape_report(&payload(), "london").unwrap();

        assert_eq!(report.city, "London");
        assert_eq!(report.temperature, "25.5 °C");
        assert_eq!(report.min_temperature, "24.0 °C");
        assert_eq!(report.max_temperature, "27.2 °C");
        assert_eq!(report.humidity, "60%");
        assert_eq!(report.pressure, "1012 hPa");
        assert_eq!(report.wind_speed, "4.1 m/s");
        assert_eq!(report.wind_direction, WindDirection::East);
        assert_eq!(report.description, "clear sky");
    }

    #[test]
    fn shaping_is_deterministic() {
        let p = payload();
        assert_eq!(shape_report(&p, "London").unwrap(), shape_report(&p, "London").unwrap());
    }

    #[test]
    fn falls_back_to_requested_city_without_name() {
        let mut p = payload();
        p.as_object_mut().unwrap().remove("name");

        let report = shape_report(&p, "Paris").unwrap();
        assert_eq!(report.city, "Paris");
    }

    #[test]
    fn missing_wind_section_is_malformed() {
        let mut p = payload();
        p.as_object_mut().unwrap().remove("wind");

        let err = shape_report(&p, "London").unwrap_err();
        assert!(matches!(err, WeatherError::MalformedPayload(ref path) if path == "wind"));
    }

    #[test]
    fn missing_nested_field_reports_its_path() {
        let mut p = payload();
        p["main"].as_object_mut().unwrap().remove("pressure");

        let err = shape_report(&p, "London").unwrap_err();
        assert!(matches!(err, WeatherError::MalformedPayload(ref path) if path == "main.pressure"));
    }

    #[test]
    fn empty_weather_list_is_malformed() {
        let mut p = payload();
        p["weather"] = json!([]);

        let err = shape_report(&p, "London").unwrap_err();
        assert!(
            matches!(err, WeatherError::MalformedPayload(ref path) if path == "weather[0].description")
        );
    }

    #[test]
    fn only_temperature_payload_is_malformed() {
        let err = shape_report(&json!({ "main": { "temp": 25.5 } }), "London").unwrap_err();
        assert!(matches!(err, WeatherError::MalformedPayload(_)));
    }

    #[test]
    fn tiny_values_use_short_exponent() {
        let mut p = payload();
        p["main"]["temp"] = json!(1e-7);

        let report = shape_report(&p, "London").unwrap();
        assert_eq!(report.temperature, "1e-7 °C");
    }

    #[test]
    fn wind_direction_bands() {
        assert_eq!(wind_direction(90.0), WindDirection::East);
        assert_eq!(wind_direction(135.0), WindDirection::East);
        assert_eq!(wind_direction(136.0), WindDirection::South);
        assert_eq!(wind_direction(225.0), WindDirection::South);
        assert_eq!(wind_direction(226.0), WindDirection::West);
        assert_eq!(wind_direction(315.0), WindDirection::West);
        assert_eq!(wind_direction(10.0), WindDirection::North);
        assert_eq!(wind_direction(45.0), WindDirection::North);
        assert_eq!(wind_direction(0.0), WindDirection::North);
        assert_eq!(wind_direction(316.0), WindDirection::North);
        assert_eq!(wind_direction(400.0), WindDirection::North);
        assert_eq!(wind_direction(-90.0), WindDirection::North);
        assert_eq!(wind_direction(f64::NAN), WindDirection::North);
    }
}
