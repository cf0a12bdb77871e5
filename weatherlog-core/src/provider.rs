use crate::model::{CurrentConditions, Forecast};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Environment variable holding the weather API key.
pub const API_KEY_VAR: &str = "WEATHER_API_KEY";

/// Abstraction over the live weather API.
///
/// The logger and the trend views only depend on this trait, so tests can
/// drive them with a scripted in-memory provider.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a point, used by the logger run loop.
    async fn current_by_coords(&self, lat: f64, lon: f64) -> anyhow::Result<CurrentConditions>;

    /// Current conditions for a named city, used by the live views.
    async fn current_by_city(&self, city: &str) -> anyhow::Result<CurrentConditions>;

    /// 5-day / 3-hour forecast for a named city.
    async fn forecast_by_city(&self, city: &str) -> anyhow::Result<Forecast>;
}

/// Construct the production provider from the environment.
///
/// A missing key is fatal for the whole run; no request is attempted.
pub fn provider_from_env() -> anyhow::Result<OpenWeatherProvider> {
    let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
        anyhow::anyhow!(
            "{API_KEY_VAR} is not set.\n\
             Hint: export your OpenWeatherMap API key as {API_KEY_VAR} before running."
        )
    })?;

    Ok(OpenWeatherProvider::new(api_key))
}
