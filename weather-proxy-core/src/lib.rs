//! Core library for the `weather-proxy` service.
//!
//! This crate defines:
//! - Configuration loading (file + environment)
//! - The OpenWeatherMap client: geocode a city, then fetch its current weather
//! - Shaping raw payloads into display-ready reports
//! - Request handling with status mapping and a per-city response cache
//!
//! It is used by `weather-proxy-cli`, but can also back an HTTP front end.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod shape;

pub use client::OpenWeatherClient;
pub use config::{ClientConfig, Config};
pub use error::WeatherError;
pub use model::{CityInfo, Coordinate, WeatherEnvelope, WeatherReport, WindDirection};
pub use service::{WeatherResponse, WeatherService};
