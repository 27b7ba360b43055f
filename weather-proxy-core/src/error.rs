use thiserror::Error;

/// Everything that can end a single city lookup.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("No geocoding match for city '{city}'")]
    NotFound { city: String },

    #[error("Geocoding request failed: {0}")]
    LookupFailed(String),

    #[error("Weather request failed: {0}")]
    UpstreamFailure(String),

    #[error("Weather payload is missing '{0}'")]
    MalformedPayload(String),
}

impl WeatherError {
    /// Message placed in the error envelope handed back to callers.
    ///
    /// A failed geocoder call reads the same as an empty match list, and a
    /// malformed payload reads the same as a failed fetch.
    pub fn envelope_message(&self) -> &'static str {
        match self {
            Self::NotFound { .. } | Self::LookupFailed(_) => crate::model::CITY_NOT_FOUND,
            Self::UpstreamFailure(_) | Self::MalformedPayload(_) => crate::model::FETCH_FAILED,
        }
    }
}
