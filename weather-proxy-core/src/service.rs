//! Request handling on top of [`OpenWeatherClient`]: status mapping plus a
//! per-city cache of successful responses.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::{collections::HashMap, time::Duration};
use tokio::sync::RwLock;
use tracing::{debug, error, instrument};

use crate::{client::OpenWeatherClient, model::WeatherEnvelope};

/// Status code and JSON body for one city request.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl WeatherResponse {
    /// Successful envelopes answer 200 with the bare report. Error envelopes
    /// answer 404 with the envelope itself.
    pub fn from_envelope(envelope: &WeatherEnvelope) -> Self {
        match (&envelope.data, envelope.error) {
            (Some(report), false) => Self {
                status: StatusCode::OK,
                body: json_body(report),
            },
            _ => Self {
                status: StatusCode::NOT_FOUND,
                body: json_body(envelope),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[derive(Debug, Clone)]
struct CachedResponse {
    response: WeatherResponse,
    stored_at: DateTime<Utc>,
}

pub struct WeatherService {
    client: OpenWeatherClient,
    ttl: chrono::Duration,
    cache: RwLock<HashMap<String, CachedResponse>>,
}

impl WeatherService {
    /// A `ttl` of zero disables caching.
    pub fn new(client: OpenWeatherClient, ttl: Duration) -> Self {
        Self {
            client,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            cache: RwLock::new(HashMap::new()),
        }
    }

    #[instrument(skip(self))]
    pub async fn respond(&self, city: &str) -> WeatherResponse {
        let now = Utc::now();

        if let Some(cached) = self.cache.read().await.get(city) {
            if self.is_fresh(cached, now) {
                debug!("Returning cached weather response for {city}");
                return cached.response.clone();
            }
        }

        let envelope = self.client.get_weather(city).await;
        let response = WeatherResponse::from_envelope(&envelope);

        let stored_at = Utc::now();
        let mut cache = self.cache.write().await;
        cache.retain(|_, cached| self.is_fresh(cached, stored_at));

        if response.status == StatusCode::OK && self.ttl > chrono::Duration::zero() {
            cache.insert(
                city.to_string(),
                CachedResponse {
                    response: response.clone(),
                    stored_at,
                },
            );
        }

        response
    }

    fn is_fresh(&self, cached: &CachedResponse, now: DateTime<Utc>) -> bool {
        now - cached.stored_at < self.ttl
    }
}

fn json_body<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        error!("Failed to serialize response body: {err}");
        Value::Null
    })
}
