//! Platform-specific configuration paths.
//!
//! - Linux: `~/.config/songprint/config.toml`
//! - macOS: `~/Library/Application Support/songprint/config.toml`
//! - Windows: `%APPDATA%\songprint\config.toml`

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "songprint";

/// File name of the recognizer configuration.
const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the default configuration file.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_under_app_dir() {
        let path = default_config_path();
        assert!(path.ends_with("songprint/config.toml"));
        assert_eq!(path.parent(), Some(user_config_dir().as_path()));
    }
}
