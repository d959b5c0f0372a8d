//! WAV decoding and writing.

use crate::source::PcmAudio;
use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::io::Cursor;
use std::path::Path;

/// Whether `bytes` start with a RIFF/WAVE header.
pub fn is_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

/// Decode an in-memory WAV file into interleaved normalized samples.
///
/// Integer PCM of any bit depth up to 32 is scaled so full scale maps to ±1.0.
pub fn decode_wav(bytes: &[u8]) -> Result<PcmAudio> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            if bits == 0 || bits > 32 {
                return Err(Error::Unsupported(format!("{bits}-bit integer WAV")));
            }
            let max_val = (1i64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    tracing::debug!(
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        samples = samples.len(),
        "decoded WAV"
    );

    Ok(PcmAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Write interleaved samples as 16-bit PCM WAV.
pub fn write_wav<P: AsRef<Path>>(path: P, audio: &PcmAudio) -> Result<()> {
    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;

    let max_val = i16::MAX as f32;
    for &sample in &audio.samples {
        writer.write_sample((sample * max_val).clamp(-max_val - 1.0, max_val) as i16)?;
    }

    writer.finalize()?;
    Ok(())
}
