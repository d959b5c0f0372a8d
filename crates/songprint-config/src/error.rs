//! Configuration errors.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filesystem step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    /// Reading a config file.
    Read,
    /// Writing a config file.
    Write,
    /// Creating the directory that holds it.
    CreateDir,
}

impl std::fmt::Display for FileOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FileOp::Read => "read",
            FileOp::Write => "write",
            FileOp::CreateDir => "create directory",
        })
    }
}

/// Everything that can go wrong loading, saving, or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A filesystem call failed.
    #[error("could not {op} '{}': {source}", path.display())]
    File {
        /// What was being attempted.
        op: FileOp,
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is outside its allowed range.
    #[error("invalid value for '{field}': {reason}")]
    Invalid {
        /// Dotted name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn file(op: FileOp, path: &Path, source: std::io::Error) -> Self {
        ConfigError::File {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the rejected field, for [`Invalid`](Self::Invalid) errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn file_error_names_op_and_path() {
        let err = ConfigError::file(
            FileOp::Read,
            Path::new("/a/b.toml"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "could not read '/a/b.toml': gone");
        assert!(err.source().is_some());
        assert_eq!(err.field(), None);
    }

    #[test]
    fn invalid_display() {
        let err = ConfigError::invalid("workers", "must be at least 1");
        assert_eq!(err.to_string(), "invalid value for 'workers': must be at least 1");
        assert_eq!(err.field(), Some("workers"));
        assert!(err.source().is_none());
    }
}
