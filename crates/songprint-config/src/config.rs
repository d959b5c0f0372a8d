//! Recognizer configuration file format.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, FileOp};
use crate::paths::default_config_path;

/// Longest segment the engine will analyse, in seconds.
pub const MAX_SEGMENT_SECONDS: u32 = 3600;

/// Largest accepted peak suppression radius.
pub const MAX_PEAK_RADIUS: usize = 64;

/// Settings for a signature engine.
///
/// # TOML Format
///
/// ```toml
/// segment_duration_seconds = 10
/// workers = 4
///
/// [context]
/// altitude = 300
/// latitude = 45
/// longitude = 2
/// timezone = "Europe/Paris"
///
/// [peaks]
/// time_radius = 8
/// freq_radius = 8
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecognizerConfig {
    /// Seconds of resampled audio analysed per call; longer input is cut to
    /// its centred window of this length.
    #[serde(default = "default_segment_duration")]
    pub segment_duration_seconds: u32,

    /// Concurrent pipelines; `None` uses the available parallelism.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Request context attached to every signature.
    #[serde(default)]
    pub context: ContextConfig,

    /// Peak suppression neighbourhood.
    #[serde(default)]
    pub peaks: PeakSettings,
}

fn default_segment_duration() -> u32 {
    10
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            segment_duration_seconds: default_segment_duration(),
            workers: None,
            context: ContextConfig::default(),
            peaks: PeakSettings::default(),
        }
    }
}

/// Geolocation and timezone sent alongside a signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContextConfig {
    /// Altitude in metres.
    pub altitude: i16,
    /// Latitude in whole degrees.
    pub latitude: i8,
    /// Longitude in whole degrees.
    pub longitude: i8,
    /// IANA timezone name.
    pub timezone: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            altitude: 300,
            latitude: 45,
            longitude: 2,
            timezone: "Europe/Paris".to_string(),
        }
    }
}

/// Frames and bins on each side of a peak candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PeakSettings {
    /// Frames on each side.
    pub time_radius: usize,
    /// Bins on each side.
    pub freq_radius: usize,
}

impl Default for PeakSettings {
    fn default() -> Self {
        Self {
            time_radius: 8,
            freq_radius: 8,
        }
    }
}

impl RecognizerConfig {
    /// Load a configuration from a TOML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::file(FileOp::Read, path, e))?;
        Self::from_toml(&content)
    }

    /// Load the file at [`default_config_path`], or defaults if there is none.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse a configuration from a TOML string and validate it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: RecognizerConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::file(FileOp::CreateDir, parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::file(FileOp::Write, path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value is within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_duration_seconds == 0 {
            return Err(ConfigError::invalid(
                "segment_duration_seconds",
                "must be at least 1",
            ));
        }
        if self.segment_duration_seconds > MAX_SEGMENT_SECONDS {
            return Err(ConfigError::invalid(
                "segment_duration_seconds",
                format!("must be at most {MAX_SEGMENT_SECONDS}"),
            ));
        }
        if self.workers == Some(0) {
            return Err(ConfigError::invalid("workers", "must be at least 1"));
        }
        if self.context.timezone.trim().is_empty() {
            return Err(ConfigError::invalid("context.timezone", "must not be empty"));
        }
        if self.peaks.time_radius > MAX_PEAK_RADIUS {
            return Err(ConfigError::invalid(
                "peaks.time_radius",
                format!("must be at most {MAX_PEAK_RADIUS}"),
            ));
        }
        if self.peaks.freq_radius > MAX_PEAK_RADIUS {
            return Err(ConfigError::invalid(
                "peaks.freq_radius",
                format!("must be at most {MAX_PEAK_RADIUS}"),
            ));
        }
        Ok(())
    }

    /// Worker count after applying the default.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        })
    }
}
