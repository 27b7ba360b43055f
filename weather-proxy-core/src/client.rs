use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::ClientConfig,
    error::WeatherError,
    model::{CityInfo, Coordinate, WeatherEnvelope, WeatherReport},
    shape::shape_report,
};

const GEOCODE_PATH: &str = "geo/1.0/direct";
const CURRENT_WEATHER_PATH: &str = "data/2.5/weather";

/// OpenWeatherMap client: geocodes a city, then fetches its current weather.
///
/// Holds only read-only configuration and a pooled HTTP client, so one
/// instance can serve any number of concurrent lookups.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    config: ClientConfig,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { config, http })
    }

    /// Look up `city`, fetch its weather and wrap the outcome in an envelope.
    /// Never fails; every error becomes an `error: true` envelope.
    #[instrument(skip(self))]
    pub async fn get_weather(&self, city: &str) -> WeatherEnvelope {
        let result = self.fetch_report(city).await;

        match &result {
            Ok(_) => info!("Weather data fetched successfully for {city}"),
            Err(WeatherError::NotFound { .. }) => warn!("City not found for {city}"),
            Err(err @ WeatherError::LookupFailed(_)) => {
                error!("City not found for {city}: {err}")
            }
            Err(err) => error!("Failed to fetch weather data for {city}: {err}"),
        }

        WeatherEnvelope::from(result)
    }

    /// Same sequence as [`Self::get_weather`] with the error kept typed.
    pub async fn fetch_report(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let info = self
            .city_info(city)
            .await?
            .ok_or_else(|| WeatherError::NotFound { city: city.to_string() })?;

        debug!(
            country = info.country.as_deref(),
            region = info.region.as_deref(),
            "Resolved {city} to ({}, {})",
            info.coordinate.latitude,
            info.coordinate.longitude,
        );

        let payload = self.weather_data(info.coordinate).await?;
        shape_report(&payload, city)
    }

    /// First geocoder match for `city`, or `None` when the provider knows no
    /// such place.
    pub async fn city_info(&self, city: &str) -> Result<Option<CityInfo>, WeatherError> {
        let url = format!("{}{GEOCODE_PATH}", self.config.base_url);
        debug!("Geocoding {city}");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("limit", "1"),
                ("appid", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::LookupFailed(format!("request error: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::LookupFailed(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::LookupFailed(format!(
                "status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let matches: Vec<GeoMatch> = serde_json::from_str(&body)
            .map_err(|e| WeatherError::LookupFailed(format!("invalid JSON: {e}")))?;

        Ok(matches.into_iter().next().and_then(GeoMatch::into_city_info))
    }

    /// Raw current-weather payload for `coordinate`, in metric units.
    pub async fn weather_data(&self, coordinate: Coordinate) -> Result<Value, WeatherError> {
        let url = format!("{}{CURRENT_WEATHER_PATH}", self.config.base_url);
        let lat = coordinate.latitude.to_string();
        let lon = coordinate.longitude.to_string();
        debug!("Fetching current weather at ({lat}, {lon})");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "metric"),
                ("appid", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::UpstreamFailure(format!("request error: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::UpstreamFailure(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::UpstreamFailure(format!(
                "status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::UpstreamFailure(format!("invalid JSON: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    lat: Option<f64>,
    lon: Option<f64>,
    country: Option<String>,
    state: Option<String>,
}

impl GeoMatch {
    fn into_city_info(self) -> Option<CityInfo> {
        Some(CityInfo {
            coordinate: Coordinate {
                latitude: self.lat?,
                longitude: self.lon?,
            },
            country: self.country,
            region: self.state,
        })
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
