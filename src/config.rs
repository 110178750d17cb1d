//! Configuration management for motioncheck
//!
//! `AnalysisConfig` is the validated option set for one analysis run.
//! `Settings` persists defaults and scheduler tuning as TOML.
//! Location: ~/.motioncheck/config.toml

use crate::errors::{CheckError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MIN_MAX_SPEED: f64 = 0.1;
pub const MAX_MAX_SPEED: f64 = 10.0;
pub const MIN_FRAME_STEP: i64 = 1;
pub const MAX_FRAME_STEP: i64 = 10;

/// Options for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Violation threshold in distance·step units
    pub max_speed: f64,
    /// Restrict bones to the Roblox rig list
    pub roblox_bones_only: bool,
    /// Sampling stride in frames
    pub frame_step: i64,
    /// Restrict armatures to the host selection
    pub selected_only: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_speed: 1.0,
            roblox_bones_only: true,
            frame_step: 1,
            selected_only: false,
        }
    }
}

impl AnalysisConfig {
    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_frame_step(mut self, frame_step: i64) -> Self {
        self.frame_step = frame_step;
        self
    }

    pub fn with_roblox_bones_only(mut self, roblox_bones_only: bool) -> Self {
        self.roblox_bones_only = roblox_bones_only;
        self
    }

    pub fn with_selected_only(mut self, selected_only: bool) -> Self {
        self.selected_only = selected_only;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.max_speed.is_finite()
            || self.max_speed < MIN_MAX_SPEED
            || self.max_speed > MAX_MAX_SPEED
        {
            return Err(CheckError::InvalidConfig(format!(
                "max_speed must be between {} and {}, got {}",
                MIN_MAX_SPEED, MAX_MAX_SPEED, self.max_speed
            )));
        }

        if self.frame_step < MIN_FRAME_STEP || self.frame_step > MAX_FRAME_STEP {
            return Err(CheckError::InvalidConfig(format!(
                "frame_step must be between {} and {}, got {}",
                MIN_FRAME_STEP, MAX_FRAME_STEP, self.frame_step
            )));
        }

        Ok(())
    }
}

/// Scheduler tuning: how much work one slice may do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Maximum frame pairs evaluated per slice
    pub slice_units: usize,
    /// Wall-clock budget per slice
    pub slice_budget_ms: u64,
    /// Pause between slices
    pub slice_pause_ms: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            slice_units: 20,
            slice_budget_ms: 50,
            slice_pause_ms: 10,
        }
    }
}

impl SchedulerSettings {
    pub fn slice_budget(&self) -> Duration {
        Duration::from_millis(self.slice_budget_ms)
    }

    pub fn slice_pause(&self) -> Duration {
        Duration::from_millis(self.slice_pause_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.slice_units == 0 {
            return Err(CheckError::InvalidConfig(
                "slice_units must be greater than 0".to_string(),
            ));
        }
        if self.slice_budget_ms == 0 {
            return Err(CheckError::InvalidConfig(
                "slice_budget_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Persisted settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
}

impl Settings {
    /// Load settings from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(&path),
            None => Self::load_default(),
        }
    }

    /// Load settings from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from the standard location, falling back to built-in defaults
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Settings::default()),
        }
    }

    /// Save settings to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.scheduler.validate()
    }

    /// `~/.motioncheck/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".motioncheck").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_speed, 1.0);
        assert!(config.roblox_bones_only);
        assert_eq!(config.frame_step, 1);
        assert!(!config.selected_only);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_max_speed() {
        assert!(AnalysisConfig::default().with_max_speed(0.0).validate().is_err());
        assert!(AnalysisConfig::default().with_max_speed(12.0).validate().is_err());
        assert!(AnalysisConfig::default()
            .with_max_speed(f64::NAN)
            .validate()
            .is_err());
        assert!(AnalysisConfig::default().with_max_speed(0.1).validate().is_ok());
    }

    #[test]
    fn test_validation_frame_step() {
        assert!(AnalysisConfig::default().with_frame_step(0).validate().is_err());
        assert!(AnalysisConfig::default().with_frame_step(11).validate().is_err());
        assert!(AnalysisConfig::default().with_frame_step(10).validate().is_ok());
    }

    #[test]
    fn test_scheduler_validation() {
        let mut settings = SchedulerSettings::default();
        assert!(settings.validate().is_ok());
        settings.slice_units = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str("[analysis]\nframe_step = 2\n").unwrap();
        assert_eq!(settings.analysis.frame_step, 2);
        assert_eq!(settings.analysis.max_speed, 1.0);
        assert_eq!(settings.scheduler.slice_units, 20);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.analysis.max_speed = 2.5;
        settings.scheduler.slice_pause_ms = 0;
        settings.save(&path).unwrap();

        let loaded = Settings::load(Some(path)).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analysis]\nmax_speed = 50.0\n").unwrap();
        assert!(matches!(
            Settings::load_from_file(&path),
            Err(CheckError::InvalidConfig(_))
        ));
    }
}
