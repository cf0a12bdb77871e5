use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::units::UnitSystem;

/// User preferences persisted between sessions as a single JSON object.
///
/// Mutation helpers consume `self` and return the updated value; callers
/// thread the new state through and persist it with [`Settings::save`].
/// The file is overwritten wholesale on every save — last write wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Favorite city names, in the order the user added them.
    #[serde(default)]
    pub favorites: Vec<String>,

    #[serde(default = "default_city")]
    pub default_city: String,

    #[serde(default)]
    pub units: UnitSystem,
}

fn default_city() -> String {
    "New York".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            favorites: Vec::new(),
            default_city: default_city(),
            units: UnitSystem::Metric,
        }
    }
}

impl Settings {
    /// Load settings from the platform config directory, or defaults when
    /// the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_file_path()?)
    }

    /// Load settings from an explicit path; absent file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save to the platform config directory, creating parents as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize settings to JSON")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the settings file.
    pub fn settings_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherlog", "weatherlog")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("settings.json"))
    }

    /// Add a favorite, preserving order and ignoring duplicates.
    pub fn with_favorite(mut self, city: &str) -> Self {
        if !self.favorites.iter().any(|f| f == city) {
            self.favorites.push(city.to_string());
        }
        self
    }

    pub fn without_favorite(mut self, city: &str) -> Self {
        self.favorites.retain(|f| f != city);
        self
    }

    pub fn with_units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    pub fn with_default_city(mut self, city: &str) -> Self {
        self.default_city = city.to_string();
        self
    }

    pub fn is_favorite(&self, city: &str) -> bool {
        self.favorites.iter().any(|f| f == city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("weatherlog-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn absent_file_loads_defaults() {
        let settings =
            Settings::load_from(Path::new("/nonexistent/weatherlog/settings.json")).expect("load");

        assert!(settings.favorites.is_empty());
        assert_eq!(settings.default_city, "New York");
        assert_eq!(settings.units, UnitSystem::Metric);
    }

    #[test]
    fn favorites_survive_a_save_and_reload() {
        let path = temp_path("favorites");
        let settings = Settings::default().with_favorite("Tokyo");
        settings.save_to(&path).expect("save");

        let reloaded = Settings::load_from(&path).expect("reload");
        assert_eq!(reloaded.favorites, vec!["Tokyo".to_string()]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn favorites_preserve_order_and_dedupe() {
        let settings = Settings::default()
            .with_favorite("Tokyo")
            .with_favorite("Paris")
            .with_favorite("Tokyo");

        assert_eq!(settings.favorites, vec!["Tokyo", "Paris"]);

        let settings = settings.without_favorite("Tokyo");
        assert_eq!(settings.favorites, vec!["Paris"]);
        assert!(!settings.is_favorite("Tokyo"));
    }

    #[test]
    fn units_serialize_as_lowercase_strings() {
        let settings = Settings::default().with_units(UnitSystem::Imperial);
        let json = serde_json::to_string(&settings).expect("serialize");
        assert!(json.contains("\"units\":\"imperial\""));

        let parsed: Settings = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.units, UnitSystem::Imperial);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let parsed: Settings = serde_json::from_str("{\"favorites\":[\"Rome\"]}").expect("parse");
        assert_eq!(parsed.favorites, vec!["Rome"]);
        assert_eq!(parsed.default_city, "New York");
        assert_eq!(parsed.units, UnitSystem::Metric);
    }
}
