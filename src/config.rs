//! Configuration file support.
//!
//! This module provides serialization and deserialization of engine settings,
//! allowing users to tune the day table and crossfade timing without a rebuild.

use serde::{Deserialize, Serialize};

use crate::color::ColorSample;
use crate::constants::{
    CLOCK_JUMP_THRESHOLD_MS, DEFAULT_BACKGROUND_RGB8, GROUND_LEVEL_DEPTH, TRANSITION_DURATION_MS,
    TURNS_PER_DAY,
};
use crate::day_cycle::{DaySegment, DaySegmentTable, STANDARD_SEGMENTS};
use crate::error::DayCycleError;
use crate::transition::{TransitionController, TransitionSettings};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Engine configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Crossfade between colors instead of switching instantly
    #[serde(default = "default_smooth_transitions")]
    pub smooth_transitions: bool,

    /// Length of a full crossfade in milliseconds
    #[serde(default = "default_transition_duration_ms")]
    pub transition_duration_ms: u64,

    /// Frame deltas at or above this many milliseconds are ignored
    #[serde(default = "default_clock_jump_threshold_ms")]
    pub clock_jump_threshold_ms: u64,

    /// Depth of the outdoor surface
    #[serde(default = "default_ground_level_depth")]
    pub ground_level_depth: i32,

    /// Turns in one in-game day
    #[serde(default = "default_turns_per_day")]
    pub turns_per_day: u32,

    /// Default background color (RGB)
    #[serde(default = "default_background")]
    pub default_color: [u8; 3],

    /// Day segments in cyclic order
    #[serde(default = "default_segments")]
    pub day_segments: Vec<SegmentConfig>,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_smooth_transitions() -> bool {
    true
}

fn default_transition_duration_ms() -> u64 {
    TRANSITION_DURATION_MS
}

fn default_clock_jump_threshold_ms() -> u64 {
    CLOCK_JUMP_THRESHOLD_MS
}

fn default_ground_level_depth() -> i32 {
    GROUND_LEVEL_DEPTH
}

fn default_turns_per_day() -> u32 {
    TURNS_PER_DAY
}

fn default_background() -> [u8; 3] {
    DEFAULT_BACKGROUND_RGB8
}

fn default_segments() -> Vec<SegmentConfig> {
    STANDARD_SEGMENTS
        .iter()
        .map(|&(name, anchor, color, brightness)| SegmentConfig {
            name: name.to_string(),
            anchor,
            color,
            brightness,
        })
        .collect()
}

/// One day segment for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Display name of the segment
    pub name: String,
    /// Turn at which the segment starts
    pub anchor: u32,
    /// RGB hue source for the segment
    pub color: [u8; 3],
    /// Brightness as a fraction of the default background's brightness
    #[serde(default = "default_segment_brightness")]
    pub brightness: f32,
}

fn default_segment_brightness() -> f32 {
    1.0
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            smooth_transitions: default_smooth_transitions(),
            transition_duration_ms: default_transition_duration_ms(),
            clock_jump_threshold_ms: default_clock_jump_threshold_ms(),
            ground_level_depth: default_ground_level_depth(),
            turns_per_day: default_turns_per_day(),
            default_color: default_background(),
            day_segments: default_segments(),
            log_level: LogLevel::default(),
        }
    }

    /// Default background as a color sample.
    pub fn default_color(&self) -> ColorSample {
        ColorSample::from_rgb8(self.default_color)
    }

    /// Build the day table described by this config.
    pub fn build_table(&self) -> Result<DaySegmentTable, DayCycleError> {
        let reference = self.default_color();
        let segments = self
            .day_segments
            .iter()
            .map(|s| {
                DaySegment::with_relative_brightness(
                    s.name.as_str(),
                    s.anchor,
                    ColorSample::from_rgb8(s.color),
                    s.brightness,
                    reference,
                )
            })
            .collect();
        DaySegmentTable::new(self.turns_per_day, segments)
    }

    /// Controller timings and toggles.
    pub fn transition_settings(&self) -> TransitionSettings {
        TransitionSettings {
            smooth_transitions: self.smooth_transitions,
            duration_ms: self.transition_duration_ms,
            jump_threshold_ms: self.clock_jump_threshold_ms,
            ground_level_depth: self.ground_level_depth,
        }
    }

    /// Build a ready-to-run controller.
    pub fn build_controller(&self) -> Result<TransitionController, ConfigError> {
        let table = self.build_table()?;
        Ok(TransitionController::new(
            self.default_color(),
            table,
            self.transition_settings(),
        ))
    }

    /// Check that the config describes a usable engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Only deltas strictly below the threshold advance a crossfade
        if self.clock_jump_threshold_ms < 2 {
            return Err(ConfigError::InvalidValue(format!(
                "clock_jump_threshold_ms {} rejects every non-zero tick",
                self.clock_jump_threshold_ms
            )));
        }
        for segment in &self.day_segments {
            if !(0.0..=1.0).contains(&segment.brightness) {
                return Err(ConfigError::InvalidValue(format!(
                    "segment '{}' brightness {} outside [0, 1]",
                    segment.name, segment.brightness
                )));
            }
        }
        self.build_table()?;
        Ok(())
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "dynback-config.json"
    }

    /// Load configuration from an explicit path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path for auto-load/save.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("dynback").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("dynback")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to an explicit path, creating parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Day table described by the config is unusable
    #[error("Invalid day table: {0}")]
    DayCycle(#[from] DayCycleError),

    /// A setting is out of range
    #[error("Invalid setting: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use crate::world::WorldContext;

    #[test]
    fn test_default_config_builds_standard_table() {
        let config = EngineConfig::default();
        let table = config.build_table().unwrap();
        let standard = DaySegmentTable::standard(config.default_color());
        assert_eq!(table.segments(), standard.segments());
        assert_eq!(table.turns_per_day(), 1200);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = EngineConfig::default();
        config.smooth_transitions = false;
        config.transition_duration_ms = 2500;
        config.log_level = LogLevel::Trace;

        let json = config.to_json().unwrap();
        assert!(json.contains("\"log_level\": \"trace\""));
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let parsed = EngineConfig::from_json(r#"{ "version": 1 }"#).unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }

    #[test]
    fn test_version_too_new() {
        let err = EngineConfig::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            }
        ));
    }

    #[test]
    fn test_invalid_table_is_rejected() {
        let json = r#"{
            "version": 1,
            "turns_per_day": 100,
            "day_segments": [
                { "name": "day", "anchor": 10, "color": [200, 200, 100] },
                { "name": "night", "anchor": 150, "color": [0, 0, 40] }
            ]
        }"#;
        let err = EngineConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::DayCycle(DayCycleError::InvalidTable { .. })));
    }

    #[test]
    fn test_custom_table() {
        let json = r#"{
            "version": 1,
            "turns_per_day": 100,
            "day_segments": [
                { "name": "day", "anchor": 10, "color": [200, 200, 100] },
                { "name": "night", "anchor": 60, "color": [0, 0, 40], "brightness": 0.5 }
            ]
        }"#;
        let config = EngineConfig::from_json(json).unwrap();
        let table = config.build_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.segment_index_for(5).unwrap(), 1);
        assert_eq!(table.segment_index_for(99).unwrap(), 1);
        assert_eq!(table.segment_index_for(10).unwrap(), 0);
        let night = table.segments()[1].color();
        let expected = 0.5 * config.default_color().brightness();
        assert!((night.brightness() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_brightness_out_of_range() {
        let mut config = EngineConfig::default();
        config.day_segments[0].brightness = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_jump_threshold_must_let_ticks_through() {
        for threshold in [0, 1] {
            let json = format!(r#"{{ "version": 1, "clock_jump_threshold_ms": {threshold} }}"#);
            let err = EngineConfig::from_json(&json).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(_)));
        }

        // The smallest accepted threshold still finishes a crossfade with 1ms ticks
        let config =
            EngineConfig::from_json(r#"{ "version": 1, "clock_jump_threshold_ms": 2 }"#).unwrap();
        let mut controller = config.build_controller().unwrap();
        let mut sink = RecordingSink::new();
        let underground = WorldContext::new(15, true, 0);
        controller.update(1, &underground, &mut sink).unwrap();
        assert!(controller.is_running());
        for _ in 0..config.transition_duration_ms {
            controller.update(1, &underground, &mut sink).unwrap();
        }
        assert!(!controller.is_running());
        assert_eq!(sink.last_final(), Some(controller.target_color()));
    }

    #[test]
    fn test_huge_day_length_is_rejected() {
        let json = r#"{
            "version": 1,
            "turns_per_day": 4000000000,
            "day_segments": [
                { "name": "always", "anchor": 0, "color": [20, 20, 20] }
            ]
        }"#;
        let err = EngineConfig::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DayCycle(DayCycleError::InvalidDayLength {
                turns_per_day: 4_000_000_000
            })
        ));
    }

    #[test]
    fn test_transition_settings_follow_config() {
        let mut config = EngineConfig::default();
        config.ground_level_depth = 3;
        config.clock_jump_threshold_ms = 250;
        let controller = config.build_controller().unwrap();
        assert_eq!(controller.settings().ground_level_depth, 3);
        assert_eq!(controller.settings().jump_threshold_ms, 250);
        assert!(controller.settings().smooth_transitions);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("dynback-config-test-{}", std::process::id()));
        let path = dir.join(EngineConfig::default_filename());
        let mut config = EngineConfig::default();
        config.transition_duration_ms = 400;

        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
