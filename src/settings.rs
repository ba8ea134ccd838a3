//! Simulation settings
//!
//! Persisted as JSON next to the host binary (or wherever the host points).

use std::fs;
use std::path::Path;
use std::time::Duration;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Color;

/// Simulation tuning and host cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Size of the initial shape and of random spawns
    pub default_size: f64,
    /// Velocity of random spawns and of shapes restarted from a standstill
    pub default_velocity: DVec2,

    /// Double-click window in milliseconds
    pub double_click_ms: u64,
    /// Tick cadence in milliseconds
    pub tick_interval_ms: u64,

    /// Colours handed out round-robin to new shapes
    pub palette: [Color; 3],

    /// Seed for random spawns; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_SIZE,
            default_velocity: DEFAULT_VELOCITY,

            double_click_ms: DOUBLE_CLICK_MS,
            tick_interval_ms: TICK_INTERVAL_MS,

            palette: [Color::Blue, Color::Red, Color::Green],

            seed: None,
        }
    }
}

impl Settings {
    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::info!("Using default settings ({}: {})", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let settings = Settings::default();
        assert_eq!(settings.default_size, 50.0);
        assert_eq!(settings.default_velocity, DVec2::new(5.0, 5.0));
        assert_eq!(settings.double_click_window(), Duration::from_millis(300));
        assert_eq!(settings.tick_interval(), Duration::from_millis(16));
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "default_size": 80.0, "seed": 7 }"#).unwrap();
        assert_eq!(settings.default_size, 80.0);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.double_click_ms, 300);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            palette: [Color::Rgb(255, 128, 0), Color::Red, Color::Blue],
            seed: Some(42),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(dir.path().join("absent.json"));
        assert_eq!(settings, Settings::default());
    }
}
