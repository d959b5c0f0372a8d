//! Configuration for the songprint signature engine.
//!
//! # Features
//!
//! - **Recognizer settings**: segment length, worker pool size, peak neighbourhood
//! - **Request context**: default geolocation and timezone attached to signatures
//! - **Paths**: platform-specific config file location
//!
//! # Example
//!
//! ```rust,no_run
//! use songprint_config::{RecognizerConfig, default_config_path};
//!
//! let mut config = RecognizerConfig::load_or_default().unwrap();
//! config.segment_duration_seconds = 12;
//! config.save(default_config_path()).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod paths;

pub use config::{
    ContextConfig, MAX_PEAK_RADIUS, MAX_SEGMENT_SECONDS, PeakSettings, RecognizerConfig,
};
pub use error::{ConfigError, FileOp};
pub use paths::{default_config_path, user_config_dir};
