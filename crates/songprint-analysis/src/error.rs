//! Error types for the analysis pipeline.

use thiserror::Error;

/// Errors raised while turning PCM into peaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The sample buffer contained no samples.
    #[error("empty sample buffer")]
    EmptyInput,

    /// The declared sample rate is outside the supported range.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// The declared channel count is zero.
    #[error("invalid channel count: {0}")]
    InvalidChannelCount(u16),

    /// The interleaved buffer does not divide evenly into channel frames.
    #[error("{len} interleaved samples do not divide into {channels} channels")]
    ChannelMismatch {
        /// Number of interleaved samples received.
        len: usize,
        /// Declared channel count.
        channels: u16,
    },

    /// Not enough audio for a single analysis frame.
    #[error("audio too short: {samples} samples at 16 kHz, need at least {needed}")]
    TooShort {
        /// Samples available after resampling.
        samples: usize,
        /// Samples required for one frame.
        needed: usize,
    },

    /// More samples than the signature header can count.
    #[error("audio too long: {0} samples exceed the 32-bit sample counter")]
    TooLong(usize),
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
