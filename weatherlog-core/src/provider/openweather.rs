use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{CurrentConditions, Forecast, ForecastEntry};

use super::WeatherProvider;

const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// OpenWeatherMap client. Requests always use `units=metric` so the rest of
/// the library can treat Celsius as canonical.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    async fn fetch_current(&self, query: &[(&str, &str)]) -> Result<CurrentConditions> {
        let res = self
            .http
            .get(CURRENT_URL)
            .query(query)
            .query(&[
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", "en"),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        let condition = parsed.weather.first();

        Ok(CurrentConditions {
            city: parsed.name,
            observed_at: parsed.dt,
            timezone_offset: parsed.timezone,
            temp_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            description: condition
                .map(|w| w.description.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            icon: condition.map(|w| w.icon.clone()),
            latitude: parsed.coord.lat,
            longitude: parsed.coord.lon,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    timezone: i64,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_by_coords(&self, lat: f64, lon: f64) -> Result<CurrentConditions> {
        let lat = lat.to_string();
        let lon = lon.to_string();
        self.fetch_current(&[("lat", lat.as_str()), ("lon", lon.as_str())])
            .await
    }

    async fn current_by_city(&self, city: &str) -> Result<CurrentConditions> {
        self.fetch_current(&[("q", city)]).await
    }

    async fn forecast_by_city(&self, city: &str) -> Result<Forecast> {
        let res = self
            .http
            .get(FORECAST_URL)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", "en"),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (5-day forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwForecastResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather forecast JSON")?;

        if parsed.list.is_empty() {
            return Err(anyhow!("OpenWeather forecast response contained no data"));
        }

        Ok(Forecast {
            city: parsed.city.name,
            timezone_offset: parsed.city.timezone,
            entries: parsed
                .list
                .into_iter()
                .map(|e| ForecastEntry {
                    at: e.dt,
                    temp_c: e.main.temp,
                })
                .collect(),
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
