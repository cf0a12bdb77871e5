//! Unit-of-measure boundary.
//!
//! Every temperature inside the library is Celsius. Conversion to the
//! configured display unit happens once, at the edge, and always before
//! rounding; decisions (packing categories, thresholds) never see converted
//! values.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    /// Convert a canonical Celsius value to this system's display value.
    /// No rounding; rounding is the caller's last step.
    pub fn from_celsius(&self, temp_c: f64) -> f64 {
        match self {
            UnitSystem::Metric => temp_c,
            UnitSystem::Imperial => celsius_to_fahrenheit(temp_c),
        }
    }

    /// Convert a displayed value back to canonical Celsius.
    pub fn to_celsius(&self, displayed: f64) -> f64 {
        match self {
            UnitSystem::Metric => displayed,
            UnitSystem::Imperial => fahrenheit_to_celsius(displayed),
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported systems: metric, imperial."
            )),
        }
    }
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Display value rounded to the nearest whole degree, converted first.
pub fn display_degrees(temp_c: f64, units: UnitSystem) -> i64 {
    units.from_celsius(temp_c).round() as i64
}
