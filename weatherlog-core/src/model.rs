use serde::{Deserialize, Serialize};

use crate::catalog::CityRecord;
use crate::localtime;

/// Current conditions for one city, normalized from a provider response.
///
/// Temperatures are always Celsius here; unit conversion is a display
/// concern (see [`crate::units`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    /// Observation time as a UTC epoch timestamp, seconds.
    pub observed_at: i64,
    /// Offset of the city's wall clock from UTC, seconds.
    pub timezone_offset: i64,
    pub temp_c: f64,
    pub humidity_pct: u8,
    pub description: String,
    pub icon: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl CurrentConditions {
    /// Wall-clock time at the observed city, if the timestamp is representable.
    pub fn local_datetime(&self) -> Option<chrono::NaiveDateTime> {
        localtime::local_datetime(self.observed_at, self.timezone_offset)
    }
}

/// A 3-hour forecast sample. Ephemeral, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Sample time as a UTC epoch timestamp, seconds.
    pub at: i64,
    pub temp_c: f64,
}

/// One forecast response for a city: a run of 3-hour samples plus the
/// city-level timezone offset used to localize them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub timezone_offset: i64,
    pub entries: Vec<ForecastEntry>,
}

/// One row of the historical dataset. Appended by the logger, never
/// mutated; the dashboard side treats the dataset as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: i64,
    /// `YYYY-MM-DD HH:MM:SS` city-local wall clock, no timezone marker.
    pub local_time: String,
    pub city: String,
    pub country: String,
    pub continent: String,
    pub temp: f64,
    pub humidity: u8,
    pub description: String,
}

impl Observation {
    /// Build a dataset row from a catalog entry and live conditions.
    ///
    /// Returns `None` when the observation timestamp cannot be
    /// represented as a calendar datetime.
    pub fn from_conditions(city: &CityRecord, conditions: &CurrentConditions) -> Option<Self> {
        let local_time =
            localtime::local_time_string(conditions.observed_at, conditions.timezone_offset)?;

        Some(Observation {
            timestamp: conditions.observed_at,
            local_time,
            city: city.name.clone(),
            country: city.country.clone(),
            continent: city.continent.clone(),
            temp: conditions.temp_c,
            humidity: conditions.humidity_pct,
            description: conditions.description.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> CityRecord {
        CityRecord {
            name: "Paris".to_string(),
            lat: 48.8566,
            lon: 2.3522,
            continent: "Europe".to_string(),
            country: "France".to_string(),
        }
    }

    #[test]
    fn observation_carries_catalog_identity_and_local_time() {
        let conditions = CurrentConditions {
            city: "Paris".to_string(),
            observed_at: 1_700_000_000,
            timezone_offset: 3_600,
            temp_c: 12.3,
            humidity_pct: 71,
            description: "light rain".to_string(),
            icon: None,
            latitude: 48.8566,
            longitude: 2.3522,
        };

        let row = Observation::from_conditions(&paris(), &conditions).expect("valid timestamp");
        assert_eq!(row.timestamp, 1_700_000_000);
        assert_eq!(row.local_time, "2023-11-14 23:13:20");
        assert_eq!(row.country, "France");
        assert_eq!(row.continent, "Europe");
        assert_eq!(row.humidity, 71);
    }
}
