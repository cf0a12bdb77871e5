//! Static city reference data.
//!
//! The logger walks a fixed, ordered catalog of cities. The catalog is a JSON
//! asset rather than hardcoded records so the run loop stays free of domain
//! data; a custom catalog can be supplied from disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// One city in the catalog. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub continent: String,
    pub country: String,
}

const BUILTIN_CATALOG: &str = include_str!("../assets/cities.json");

/// The embedded 40-city catalog.
pub fn builtin() -> Result<Vec<CityRecord>> {
    serde_json::from_str(BUILTIN_CATALOG).context("Failed to parse the embedded city catalog")
}

/// Load a catalog from a JSON file with the same shape as the embedded asset.
pub fn from_path(path: &Path) -> Result<Vec<CityRecord>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read city catalog: {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse city catalog: {}", path.display()))
}

/// Case-insensitive lookup by city name.
pub fn find<'a>(cities: &'a [CityRecord], name: &str) -> Option<&'a CityRecord> {
    cities.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses_and_is_ordered() {
        let cities = builtin().expect("embedded catalog must parse");
        assert_eq!(cities.len(), 40);
        // Insertion order is the fetch order; New York leads the catalog.
        assert_eq!(cities[0].name, "New York");
        assert_eq!(cities[0].country, "USA");
    }

    #[test]
    fn find_is_case_insensitive() {
        let cities = builtin().expect("embedded catalog must parse");
        let tokyo = find(&cities, "tokyo").expect("Tokyo is in the catalog");
        assert_eq!(tokyo.continent, "Asia");
        assert!(find(&cities, "Atlantis").is_none());
    }
}
