// src/config.rs
//! Persistent playback defaults

use crate::display::DisplayMode;
use crate::error::{Result, TimelapseError};
use crate::timelapse::segmenter::validate_speed;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub speed_multiplier: f64, // recorded seconds per real second
    pub display: String,       // "terminal", "plain"
    pub render_delay_ms: u64,  // simulated draw latency per batch
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 300.0,
            display: DisplayMode::Terminal.as_str().to_string(),
            render_delay_ms: 0,
        }
    }
}

impl PlaybackConfig {
    /// Load from the default location, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| TimelapseError::Other(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| TimelapseError::Other(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TimelapseError::Other(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|e| TimelapseError::Other(format!("Failed to write config file: {}", e)))?;

        tracing::debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// `$HOME/.config/gpx-timelapse/config.json`
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| TimelapseError::Other("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home)
            .join(".config")
            .join("gpx-timelapse")
            .join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        validate_speed(self.speed_multiplier)?;
        self.display_mode()?;
        Ok(())
    }

    pub fn display_mode(&self) -> Result<DisplayMode> {
        DisplayMode::parse(&self.display).ok_or_else(|| {
            TimelapseError::Configuration(format!(
                "unknown display '{}' (expected 'terminal' or 'plain')",
                self.display
            ))
        })
    }

    pub fn update_speed(&mut self, speed_multiplier: f64) -> Result<()> {
        validate_speed(speed_multiplier)?;
        self.speed_multiplier = speed_multiplier;
        Ok(())
    }

    pub fn update_display(&mut self, mode: DisplayMode) {
        self.display = mode.as_str().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("gpx-timelapse-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.speed_multiplier, 300.0);
        assert_eq!(config.display_mode().unwrap(), DisplayMode::Terminal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_update_speed() {
        let mut config = PlaybackConfig::default();
        config.update_speed(60.0).unwrap();
        assert_eq!(config.speed_multiplier, 60.0);

        assert!(matches!(
            config.update_speed(-1.0),
            Err(TimelapseError::Configuration(_))
        ));
        assert_eq!(config.speed_multiplier, 60.0);
    }

    #[test]
    fn test_unknown_display_rejected() {
        let config = PlaybackConfig {
            display: "hologram".to_string(),
            ..PlaybackConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TimelapseError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = PlaybackConfig::load_from(&temp_path("missing")).unwrap();
        assert_eq!(config, PlaybackConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let mut config = PlaybackConfig::default();
        config.update_speed(120.0).unwrap();
        config.update_display(DisplayMode::Plain);
        config.save_to(&path).unwrap();

        let loaded = PlaybackConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"speed_multiplier": 90.0}"#).unwrap();

        let loaded = PlaybackConfig::load_from(&path).unwrap();
        assert_eq!(loaded.speed_multiplier, 90.0);
        assert_eq!(loaded.display, "terminal");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
