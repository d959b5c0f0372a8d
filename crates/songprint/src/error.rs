//! The single failure type surfaced by the facade.

use std::error::Error as StdError;
use std::fmt;

use songprint_analysis::AnalysisError;
use songprint_config::ConfigError;
use songprint_format::FormatError;

/// Which stage a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Empty or unusable input: no bytes, or too little audio for one frame.
    Input,
    /// The path could not be read.
    Io,
    /// The audio could not be decoded or resampled.
    Decode,
    /// Signature encoding or decoding failed.
    Format,
    /// An unexpected fault inside the engine.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Input => "input error",
            ErrorKind::Io => "I/O error",
            ErrorKind::Decode => "decode error",
            ErrorKind::Format => "format error",
            ErrorKind::Internal => "internal error",
        })
    }
}

/// A failed signature operation.
///
/// Carries a human-readable message, the [`ErrorKind`] as structured data, and
/// the originating error as [`source`](StdError::source).
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SignatureError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl SignatureError {
    /// Error without an underlying cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Error wrapping an underlying cause; the message is taken from it.
    pub fn with_source(kind: ErrorKind, source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            kind,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Stage the failure came from.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable description without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AnalysisError> for SignatureError {
    fn from(err: AnalysisError) -> Self {
        let kind = match err {
            AnalysisError::EmptyInput | AnalysisError::TooShort { .. } => ErrorKind::Input,
            AnalysisError::InvalidSampleRate(_)
            | AnalysisError::InvalidChannelCount(_)
            | AnalysisError::ChannelMismatch { .. } => ErrorKind::Decode,
            AnalysisError::TooLong(_) => ErrorKind::Format,
        };
        Self::with_source(kind, err)
    }
}

impl From<FormatError> for SignatureError {
    fn from(err: FormatError) -> Self {
        Self::with_source(ErrorKind::Format, err)
    }
}

impl From<songprint_io::Error> for SignatureError {
    fn from(err: songprint_io::Error) -> Self {
        let kind = match err {
            songprint_io::Error::Empty => ErrorKind::Input,
            songprint_io::Error::Io { .. } => ErrorKind::Io,
            _ => ErrorKind::Decode,
        };
        Self::with_source(kind, err)
    }
}

impl From<ConfigError> for SignatureError {
    fn from(err: ConfigError) -> Self {
        Self::with_source(ErrorKind::Input, err)
    }
}

impl From<tokio::task::JoinError> for SignatureError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::with_source(ErrorKind::Internal, err)
    }
}

impl From<serde_json::Error> for SignatureError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Format, err)
    }
}

/// Convenience result type for facade operations.
pub type Result<T> = std::result::Result<T, SignatureError>;
