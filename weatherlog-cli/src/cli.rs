use anyhow::{Context, Result};
use chrono::Duration;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use weatherlog_core::{
    Settings, UnitSystem, WeatherProvider, aggregate, catalog, dataset,
    dataset::DatasetWriter, logger, packing, provider::provider_from_env, units,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherlog", version, about = "Weather logger and trends CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch current conditions for every catalog city and append them to
    /// the dataset.
    Log {
        /// Dataset CSV to append to.
        #[arg(long, default_value = "weather_data.csv")]
        output: PathBuf,

        /// Custom city catalog (JSON); defaults to the built-in 40 cities.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show live conditions and a packing list for a city.
    Current {
        /// City name; defaults to the configured default city.
        city: Option<String>,
    },

    /// Show the forecast: the next ~24 hours plus per-day means.
    Forecast {
        /// City name; defaults to the configured default city.
        city: Option<String>,
    },

    /// Show trends over the logged dataset.
    History {
        /// City name; defaults to the configured default city.
        city: Option<String>,

        #[arg(long, value_enum, default_value_t = View::Daily)]
        view: View,

        /// Dataset location: a local path or an http(s) URL.
        #[arg(long, default_value = "weather_data.csv")]
        source: String,
    },

    /// Manage the favorite-city shortcuts.
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },

    /// Set the display unit system.
    SetUnits {
        /// "metric" or "imperial".
        system: String,
    },

    /// Set the default city used when a command gets no city argument.
    SetDefault {
        city: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Mean temperature per calendar day, whole history.
    Daily,
    /// Daily means over the trailing 7 days.
    Weekly,
    /// Raw readings over the trailing 24 hours.
    Pulse,
}

#[derive(Debug, Subcommand)]
pub enum FavoriteAction {
    /// Add a city; prompts with the catalog when no name is given.
    Add { city: Option<String> },
    /// Remove a city.
    Remove { city: String },
    /// List favorites in the order they were added.
    List,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let settings = Settings::load()?;

        match self.command {
            Command::Log { output, catalog } => cmd_log(output, catalog).await,
            Command::Current { city } => cmd_current(&settings, city).await,
            Command::Forecast { city } => cmd_forecast(&settings, city).await,
            Command::History { city, view, source } => {
                cmd_history(&settings, city, view, &source).await
            }
            Command::Favorite { action } => cmd_favorite(settings, action),
            Command::SetUnits { system } => {
                let units = UnitSystem::try_from(system.as_str())?;
                let settings = settings.with_units(units);
                settings.save()?;
                println!("Display units set to {units}.");
                Ok(())
            }
            Command::SetDefault { city } => {
                let cities = catalog::builtin()?;
                if catalog::find(&cities, &city).is_none() {
                    println!("Note: '{city}' is not in the built-in catalog.");
                }
                let settings = settings.with_default_city(&city);
                settings.save()?;
                println!("Default city set to {city}.");
                Ok(())
            }
        }
    }
}

fn resolve_city(settings: &Settings, city: Option<String>) -> String {
    city.unwrap_or_else(|| settings.default_city.clone())
}

fn fmt_temp(temp_c: f64, units: UnitSystem) -> String {
    format!("{}{}", units::display_degrees(temp_c, units), units.symbol())
}

async fn cmd_log(output: PathBuf, catalog_path: Option<PathBuf>) -> Result<()> {
    // A missing API key aborts here, before the dataset is touched.
    let provider = provider_from_env()?;

    let cities = match catalog_path {
        Some(path) => catalog::from_path(&path)?,
        None => catalog::builtin()?,
    };

    let mut out = DatasetWriter::append_to_path(&output)?;
    let summary = logger::run(&provider, &cities, &mut out).await?;

    println!(
        "Logged data for {} of {} cities ({} failed).",
        summary.logged,
        cities.len(),
        summary.failed
    );

    Ok(())
}

async fn cmd_current(settings: &Settings, city: Option<String>) -> Result<()> {
    let city = resolve_city(settings, city);
    let provider = provider_from_env()?;

    let conditions = provider
        .current_by_city(&city)
        .await
        .with_context(|| format!("Could not fetch current conditions for {city}"))?;

    let local = conditions
        .local_datetime()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("{} — {}", conditions.city, conditions.description);
    println!(
        "  {}  humidity {}%  (local time {})",
        fmt_temp(conditions.temp_c, settings.units),
        conditions.humidity_pct,
        local
    );

    // Packing decisions always run on the canonical Celsius value.
    let category = packing::category_for(conditions.temp_c);
    println!("Packing list ({} weather):", category.label());
    for item in packing::packing_list(conditions.temp_c) {
        println!("  - {item}");
    }

    Ok(())
}

async fn cmd_forecast(settings: &Settings, city: Option<String>) -> Result<()> {
    let city = resolve_city(settings, city);
    let provider = provider_from_env()?;

    let forecast = match provider.forecast_by_city(&city).await {
        Ok(f) => f,
        Err(e) => {
            println!("Forecast for {city} is unavailable: {e:#}");
            return Ok(());
        }
    };

    let series = aggregate::forecast_series(&forecast);
    if series.is_empty() {
        println!("Forecast for {city} contained no usable entries.");
        return Ok(());
    }

    println!("Next 24 hours in {}:", forecast.city);
    let pulse = aggregate::forecast_pulse(&series);
    let hours = aggregate::relative_hours(pulse);
    for (point, hour) in pulse.iter().zip(hours) {
        println!(
            "  +{hour:>4.1}h  {}  ({})",
            fmt_temp(point.temp_c, settings.units),
            point.at.format("%Y-%m-%d %H:%M")
        );
    }

    println!("Daily means:");
    for day in aggregate::daily_mean(&series) {
        println!("  {}  {}", day.day, fmt_temp(day.mean_c, settings.units));
    }

    Ok(())
}

async fn cmd_history(
    settings: &Settings,
    city: Option<String>,
    view: View,
    source: &str,
) -> Result<()> {
    let city = resolve_city(settings, city);
    let http = reqwest::Client::new();

    let rows = match dataset::load(source, &http).await {
        Ok(rows) => rows,
        Err(e) => {
            println!("Historical data is unavailable: {e:#}");
            return Ok(());
        }
    };

    let series = aggregate::city_series(&rows, &city);
    if series.is_empty() {
        println!("No logged observations for {city} in {source}.");
        return Ok(());
    }

    match view {
        View::Daily => {
            println!("Daily mean temperature in {city}:");
            for day in aggregate::daily_mean(&series) {
                println!("  {}  {}", day.day, fmt_temp(day.mean_c, settings.units));
            }
        }
        View::Weekly | View::Pulse => {
            // The window is anchored to the city's live local clock, derived
            // the same way the logger derives local_time.
            let provider = provider_from_env()?;
            let now = match provider.current_by_city(&city).await {
                Ok(conditions) => conditions.local_datetime(),
                Err(e) => {
                    println!("Cannot anchor the window without live conditions: {e:#}");
                    return Ok(());
                }
            };
            let Some(now) = now else {
                println!("Live conditions for {city} carried an unusable timestamp.");
                return Ok(());
            };

            let lookback = match view {
                View::Weekly => Duration::days(7),
                _ => Duration::hours(24),
            };

            let window = aggregate::lookback_window(&series, now, lookback);
            if window.is_empty() {
                println!("No observations for {city} in the selected window.");
                return Ok(());
            }

            if view == View::Weekly {
                println!("Daily means over the last 7 days in {city}:");
                for day in aggregate::daily_mean(&window) {
                    println!("  {}  {}", day.day, fmt_temp(day.mean_c, settings.units));
                }
            } else {
                println!("Last 24 hours in {city} (hours from window start):");
                let hours = aggregate::relative_hours(&window);
                for (point, hour) in window.iter().zip(hours) {
                    println!("  +{hour:>4.1}h  {}", fmt_temp(point.temp_c, settings.units));
                }
            }
        }
    }

    Ok(())
}

fn cmd_favorite(settings: Settings, action: FavoriteAction) -> Result<()> {
    match action {
        FavoriteAction::Add { city } => {
            let city = match city {
                Some(city) => city,
                None => {
                    let cities = catalog::builtin()?;
                    let names: Vec<String> = cities
                        .iter()
                        .filter(|c| !settings.is_favorite(&c.name))
                        .map(|c| c.name.clone())
                        .collect();

                    inquire::Select::new("City to add:", names)
                        .prompt()
                        .context("City selection cancelled")?
                }
            };

            let settings = settings.with_favorite(&city);
            settings.save()?;
            println!("Added {city} to favorites.");
        }
        FavoriteAction::Remove { city } => {
            if !settings.is_favorite(&city) {
                println!("{city} is not a favorite.");
                return Ok(());
            }
            let settings = settings.without_favorite(&city);
            settings.save()?;
            println!("Removed {city} from favorites.");
        }
        FavoriteAction::List => {
            if settings.favorites.is_empty() {
                println!("No favorites yet. Add one with `weatherlog favorite add`.");
            } else {
                for city in &settings.favorites {
                    println!("{city}");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_argument_overrides_the_configured_default() {
        let settings = Settings::default();
        assert_eq!(resolve_city(&settings, None), "New York");
        assert_eq!(
            resolve_city(&settings, Some("Paris".to_string())),
            "Paris"
        );
    }

    #[test]
    fn temps_format_in_the_configured_unit_system() {
        assert_eq!(fmt_temp(10.0, UnitSystem::Metric), "10°C");
        assert_eq!(fmt_temp(10.0, UnitSystem::Imperial), "50°F");
        assert_eq!(fmt_temp(12.6, UnitSystem::Metric), "13°C");
    }

    #[test]
    fn cli_parses_the_documented_subcommands() {
        Cli::try_parse_from(["weatherlog", "log", "--output", "out.csv"]).expect("log parses");
        Cli::try_parse_from(["weatherlog", "current", "Paris"]).expect("current parses");
        Cli::try_parse_from(["weatherlog", "history", "--view", "pulse"]).expect("history parses");
        Cli::try_parse_from(["weatherlog", "favorite", "add", "Tokyo"]).expect("favorite parses");
        Cli::try_parse_from(["weatherlog", "set-units", "imperial"]).expect("set-units parses");
        assert!(Cli::try_parse_from(["weatherlog", "history", "--view", "hourly"]).is_err());
    }
}
