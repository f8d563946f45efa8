//! Run settings
//!
//! Loaded from an optional JSON file by the native runner. Every field has a
//! default so partial files work.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "norm" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    /// Enemies produced per spawn
    pub fn spawn_count(&self) -> u32 {
        match self {
            DifficultyPreset::Easy => 1,
            DifficultyPreset::Normal => ENEMY_SPAWN_COUNT,
            DifficultyPreset::Hard => ENEMY_SPAWN_COUNT + 1,
        }
    }

    /// Simultaneous enemy cap
    pub fn max_enemies(&self) -> usize {
        match self {
            DifficultyPreset::Easy => MAX_ENEMIES / 2,
            DifficultyPreset::Normal => MAX_ENEMIES,
            DifficultyPreset::Hard => MAX_ENEMIES + MAX_ENEMIES / 2,
        }
    }

    /// Starting spawn interval (ms)
    pub fn base_spawn_interval(&self) -> f32 {
        match self {
            DifficultyPreset::Easy => ENEMY_SPAWN_INTERVAL_MS * 1.5,
            DifficultyPreset::Normal => ENEMY_SPAWN_INTERVAL_MS,
            DifficultyPreset::Hard => ENEMY_SPAWN_INTERVAL_MS * 0.75,
        }
    }
}

/// Simulation and runner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (random when absent)
    pub seed: Option<u64>,
    /// Difficulty preset
    pub preset: DifficultyPreset,

    // === World ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub world_width: f32,
    pub world_height: f32,

    // === Timing ===
    /// Longest frame delta the clock will report (ms)
    pub max_frame_delta_ms: f32,

    // === Headless runner ===
    /// Simulated run length (seconds)
    pub run_duration_secs: f32,
    /// Simulated frame length (ms)
    pub frame_ms: f32,
    /// Drive the player with the built-in autopilot
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            preset: DifficultyPreset::Normal,

            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            max_frame_delta_ms: 250.0,

            run_duration_secs: 300.0,
            frame_ms: REFERENCE_FRAME_MS,
            autopilot: true,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    /// Same defaults with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Load and validate settings from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&contents)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 {
            return Err(SettingsError::Invalid("viewport must be positive".into()));
        }
        if self.world_width < self.viewport_width || self.world_height < self.viewport_height {
            return Err(SettingsError::Invalid(
                "world must be at least as large as the viewport".into(),
            ));
        }
        if self.max_frame_delta_ms <= 0.0 {
            return Err(SettingsError::Invalid("max_frame_delta_ms must be positive".into()));
        }
        if self.frame_ms <= 0.0 {
            return Err(SettingsError::Invalid("frame_ms must be positive".into()));
        }
        if self.run_duration_secs < 0.0 {
            return Err(SettingsError::Invalid("run_duration_secs must not be negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "preset": "Hard" }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.preset, DifficultyPreset::Hard);
        assert_eq!(settings.world_width, WORLD_WIDTH);
        assert!(settings.autopilot);
    }

    #[test]
    fn test_invalid_world_rejected() {
        let result = Settings::from_json(r#"{ "world_width": 100.0 }"#);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let result = Settings::from_json("{ not json");
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(DifficultyPreset::from_str("EASY"), Some(DifficultyPreset::Easy));
        assert_eq!(DifficultyPreset::from_str("norm"), Some(DifficultyPreset::Normal));
        assert_eq!(DifficultyPreset::from_str("brutal"), None);
        assert_eq!(DifficultyPreset::Hard.as_str(), "Hard");
    }

    #[test]
    fn test_from_preset_keeps_defaults() {
        let settings = Settings::from_preset(DifficultyPreset::Easy);
        assert_eq!(settings.preset, DifficultyPreset::Easy);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.frame_ms, REFERENCE_FRAME_MS);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_presets_scale_pressure() {
        assert!(DifficultyPreset::Hard.spawn_count() > DifficultyPreset::Easy.spawn_count());
        assert!(DifficultyPreset::Hard.max_enemies() > DifficultyPreset::Normal.max_enemies());
        assert!(
            DifficultyPreset::Hard.base_spawn_interval()
                < DifficultyPreset::Easy.base_spawn_interval()
        );
    }
}
