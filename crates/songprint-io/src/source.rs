//! The audio source abstraction.

use std::path::Path;

use crate::media::decode_media;
use crate::wav::{decode_wav, is_wav};
use crate::{Error, Result};

/// Decoded audio before any rate conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    /// Interleaved samples, nominally in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

impl PcmAudio {
    /// Samples per channel.
    pub fn frames(&self) -> usize {
        match self.channels {
            0 => 0,
            c => self.samples.len() / c as usize,
        }
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }
}

/// Supplies PCM from files or in-memory buffers.
///
/// Implementations are shared across worker threads.
pub trait AudioSource: Send + Sync {
    /// Read and decode the file at `path`.
    fn read_path(&self, path: &Path) -> Result<PcmAudio>;

    /// Decode an in-memory file. `extension` is a format hint such as `"mp3"`.
    fn read_bytes(&self, bytes: Vec<u8>, extension: Option<&str>) -> Result<PcmAudio>;
}

/// Decodes WAV with hound and everything else with symphonia.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAudioSource;

impl AudioSource for DefaultAudioSource {
    fn read_path(&self, path: &Path) -> Result<PcmAudio> {
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read audio file");

        let extension = path.extension().and_then(|ext| ext.to_str());
        self.read_bytes(bytes, extension)
    }

    fn read_bytes(&self, bytes: Vec<u8>, extension: Option<&str>) -> Result<PcmAudio> {
        if bytes.is_empty() {
            return Err(Error::Empty);
        }

        if is_wav(&bytes) {
            match decode_wav(&bytes) {
                Ok(audio) => return Ok(audio),
                // Compressed or extensible WAV variants hound does not read
                Err(e) => tracing::warn!(error = %e, "WAV reader failed, trying general decoder"),
            }
        }

        decode_media(bytes, extension)
    }
}
