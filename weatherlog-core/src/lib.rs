//! Core library for the `weatherlog` tools.
//!
//! This crate defines:
//! - The city catalog and the logging run that builds the historical dataset
//! - The append-only CSV dataset schema and its reader/writer
//! - Aggregation over the logged series (daily means, lookback windows)
//! - Unit conversion, packing suggestions, and persisted user settings
//!
//! It is used by `weatherlog-cli`, but can also be reused by other binaries
//! or services.

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod localtime;
pub mod logger;
pub mod model;
pub mod packing;
pub mod provider;
pub mod units;

pub use catalog::CityRecord;
pub use config::Settings;
pub use model::{CurrentConditions, Forecast, ForecastEntry, Observation};
pub use provider::{OpenWeatherProvider, WeatherProvider, provider_from_env};
pub use units::UnitSystem;
