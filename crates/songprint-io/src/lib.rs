//! Audio source layer for songprint.
//!
//! This crate provides:
//!
//! - **WAV decoding**: [`decode_wav`] and [`write_wav`] through `hound`
//! - **Compressed audio**: [`decode_media`] for mp3, aac/m4a, ogg/vorbis and
//!   flac through `symphonia`
//! - **Source abstraction**: the [`AudioSource`] trait and [`DefaultAudioSource`],
//!   which sniffs RIFF/WAVE buffers and falls back to the general decoder
//!
//! Everything comes out as interleaved `f32` in `[-1.0, 1.0]` with its original
//! rate and channel count; resampling happens downstream.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use songprint_io::{AudioSource, DefaultAudioSource};
//!
//! let audio = DefaultAudioSource.read_path("clip.mp3".as_ref())?;
//! println!("{} Hz, {} channels, {:.1} s", audio.sample_rate, audio.channels, audio.duration_seconds());
//! ```

mod media;
mod source;
mod wav;

pub use media::decode_media;
pub use source::{AudioSource, DefaultAudioSource, PcmAudio};
pub use wav::{decode_wav, is_wav, write_wav};

use std::path::PathBuf;

/// Error types for audio source operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The buffer held no bytes.
    #[error("empty audio buffer")]
    Empty,

    /// The file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// WAV parse error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Demuxer or codec error.
    #[error("audio decode error: {0}")]
    Media(#[from] symphonia::core::errors::Error),

    /// The stream decoded but cannot be used.
    #[error("unsupported audio: {0}")]
    Unsupported(String),
}

/// Convenience result type for audio source operations.
pub type Result<T> = std::result::Result<T, Error>;
