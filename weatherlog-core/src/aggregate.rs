//! The trend views' numeric core: daily means, lookback windows, and the
//! relative-hour axis for sub-day series.
//!
//! All temperatures stay Celsius here. Rounding and unit conversion happen
//! at display time, after aggregation (see [`crate::units`]).

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::localtime;
use crate::model::{Forecast, Observation};

/// One point of a per-city temperature series, keyed by city-local time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempPoint {
    pub at: NaiveDateTime,
    pub temp_c: f64,
}

/// One day of the daily-mean view. The mean is unrounded Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyMean {
    pub day: NaiveDate,
    pub mean_c: f64,
}

/// Forecast entries taken as the ~24-hour pulse window (3-hour granularity).
pub const FORECAST_PULSE_ENTRIES: usize = 8;

/// Extract the (local_time, temp) series for one city, in insertion order.
///
/// Rows whose `local_time` does not parse are dropped; the dataset is
/// append-only and occasionally carries hand-edited rows.
pub fn city_series(rows: &[Observation], city: &str) -> Vec<TempPoint> {
    rows.iter()
        .filter(|r| r.city.eq_ignore_ascii_case(city))
        .filter_map(|r| {
            localtime::parse_local_time(&r.local_time).map(|at| TempPoint {
                at,
                temp_c: r.temp,
            })
        })
        .collect()
}

/// Localize a forecast response into a series, same derivation as the logger.
pub fn forecast_series(forecast: &Forecast) -> Vec<TempPoint> {
    forecast
        .entries
        .iter()
        .filter_map(|e| {
            localtime::local_datetime(e.at, forecast.timezone_offset).map(|at| TempPoint {
                at,
                temp_c: e.temp_c,
            })
        })
        .collect()
}

/// The leading ~24 hours of a forecast series.
pub fn forecast_pulse(series: &[TempPoint]) -> &[TempPoint] {
    &series[..series.len().min(FORECAST_PULSE_ENTRIES)]
}

/// Group by calendar day and average, ordered by day ascending.
///
/// An empty series yields an empty result.
pub fn daily_mean(series: &[TempPoint]) -> Vec<DailyMean> {
    let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for point in series {
        let entry = by_day.entry(point.at.date()).or_insert((0.0, 0));
        entry.0 += point.temp_c;
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .map(|(day, (sum, count))| DailyMean {
            day,
            mean_c: sum / count as f64,
        })
        .collect()
}

/// Points strictly newer than `now - lookback`. The boundary point itself is
/// excluded.
pub fn lookback_window(
    series: &[TempPoint],
    now: NaiveDateTime,
    lookback: Duration,
) -> Vec<TempPoint> {
    let cutoff = now - lookback;
    series.iter().filter(|p| p.at > cutoff).copied().collect()
}

/// Fractional hour offsets from the earliest point, for the pulse axis.
///
/// The input need not be sorted; offsets are relative to the minimum.
pub fn relative_hours(series: &[TempPoint]) -> Vec<f64> {
    let Some(min) = series.iter().map(|p| p.at).min() else {
        return Vec::new();
    };

    series
        .iter()
        .map(|p| (p.at - min).num_seconds() as f64 / 3600.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForecastEntry;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("test datetime")
    }

    fn point(s: &str, temp_c: f64) -> TempPoint {
        TempPoint { at: at(s), temp_c }
    }

    fn paris_row(local_time: &str, temp: f64) -> Observation {
        Observation {
            timestamp: 0,
            local_time: local_time.to_string(),
            city: "Paris".to_string(),
            country: "France".to_string(),
            continent: "Europe".to_string(),
            temp,
            humidity: 60,
            description: "clear sky".to_string(),
        }
    }

    #[test]
    fn daily_mean_of_empty_series_is_empty() {
        assert!(daily_mean(&[]).is_empty());
    }

    #[test]
    fn daily_mean_groups_by_calendar_day_ascending() {
        let series = vec![
            point("2023-11-15 08:00:00", 12.0),
            point("2023-11-14 12:00:00", 10.0),
            point("2023-11-15 20:00:00", 18.0),
        ];

        let means = daily_mean(&series);
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].day, at("2023-11-14 00:00:00").date());
        assert_eq!(means[0].mean_c, 10.0);
        assert_eq!(means[1].mean_c, 15.0);
    }

    #[test]
    fn one_reading_per_day_passes_through_unchanged() {
        let rows = vec![
            paris_row("2023-11-14 12:00:00", 10.0),
            paris_row("2023-11-15 12:00:00", 20.0),
            paris_row("2023-11-16 12:00:00", 30.0),
        ];

        let series = city_series(&rows, "Paris");
        let means: Vec<f64> = daily_mean(&series).iter().map(|m| m.mean_c).collect();
        assert_eq!(means, vec![10.0, 20.0, 30.0]);

        // Switching display units converts per value, after aggregation.
        let imperial: Vec<i64> = means
            .iter()
            .map(|&c| crate::units::display_degrees(c, crate::units::UnitSystem::Imperial))
            .collect();
        assert_eq!(imperial, vec![50, 68, 86]);
    }

    #[test]
    fn city_filter_ignores_other_cities_and_bad_rows() {
        let mut rows = vec![
            paris_row("2023-11-14 12:00:00", 10.0),
            paris_row("garbage", 11.0),
        ];
        rows.push(Observation {
            city: "London".to_string(),
            ..paris_row("2023-11-14 13:00:00", 9.0)
        });

        let series = city_series(&rows, "paris");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].temp_c, 10.0);
    }

    #[test]
    fn lookback_window_excludes_the_exact_boundary() {
        let now = at("2023-11-21 12:00:00");
        let series = vec![
            point("2023-11-14 12:00:00", 1.0), // exactly now - 7d
            point("2023-11-14 12:00:01", 2.0),
            point("2023-11-20 12:00:00", 3.0),
        ];

        let window = lookback_window(&series, now, Duration::days(7));
        let temps: Vec<f64> = window.iter().map(|p| p.temp_c).collect();
        assert_eq!(temps, vec![2.0, 3.0]);
    }

    #[test]
    fn lookback_window_can_be_empty() {
        let now = at("2024-01-01 00:00:00");
        let series = vec![point("2023-11-14 12:00:00", 1.0)];
        assert!(lookback_window(&series, now, Duration::hours(24)).is_empty());
    }

    #[test]
    fn relative_hours_are_offsets_from_the_window_minimum() {
        let series = vec![
            point("2023-11-14 12:00:00", 1.0),
            point("2023-11-14 13:30:00", 2.0),
            point("2023-11-15 00:00:00", 3.0),
        ];

        assert_eq!(relative_hours(&series), vec![0.0, 1.5, 12.0]);
        assert!(relative_hours(&[]).is_empty());
    }

    #[test]
    fn forecast_series_localizes_with_the_city_offset() {
        let forecast = Forecast {
            city: "Tokyo".to_string(),
            timezone_offset: 32_400,
            entries: vec![ForecastEntry {
                at: 1_700_000_000,
                temp_c: 18.0,
            }],
        };

        let series = forecast_series(&forecast);
        // 2023-11-14 22:13:20 UTC + 9h
        assert_eq!(series[0].at, at("2023-11-15 07:13:20"));
    }

    #[test]
    fn forecast_pulse_takes_at_most_eight_entries() {
        let forecast = Forecast {
            city: "Tokyo".to_string(),
            timezone_offset: 0,
            entries: (0..12)
                .map(|i| ForecastEntry {
                    at: 1_700_000_000 + i * 10_800,
                    temp_c: i as f64,
                })
                .collect(),
        };

        let series = forecast_series(&forecast);
        assert_eq!(forecast_pulse(&series).len(), 8);

        let short = &series[..3];
        assert_eq!(forecast_pulse(short).len(), 3);
    }
}
