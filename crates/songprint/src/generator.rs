//! Synchronous signature generation.

use songprint_analysis::{ANALYSIS_SAMPLE_RATE, PeakConfig, extract_peaks, resample_to_analysis_rate};
use songprint_config::{PeakSettings, RecognizerConfig};
use songprint_format::SignatureContainer;
use songprint_io::PcmAudio;

use crate::error::Result;

/// Runs resampling, analysis, and container assembly on the calling thread.
///
/// Holds no mutable state, so one generator can serve any number of threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureGenerator {
    segment_samples: usize,
    peaks: PeakConfig,
}

impl SignatureGenerator {
    /// Generator analysing at most `segment_duration_seconds` of audio.
    pub fn new(segment_duration_seconds: u32, peaks: PeakConfig) -> Self {
        Self {
            segment_samples: segment_duration_seconds as usize * ANALYSIS_SAMPLE_RATE as usize,
            peaks,
        }
    }

    /// Generator using the segment length and peak settings of `config`.
    pub fn from_config(config: &RecognizerConfig) -> Self {
        Self::new(config.segment_duration_seconds, peak_config(config.peaks))
    }

    /// Largest number of 16 kHz samples analysed per call.
    pub fn segment_samples(&self) -> usize {
        self.segment_samples
    }

    /// Produce the container for decoded audio at its native rate.
    pub fn generate(&self, audio: &PcmAudio) -> Result<SignatureContainer> {
        let pcm = resample_to_analysis_rate(&audio.samples, audio.sample_rate, audio.channels)?;
        tracing::debug!(
            source_rate = audio.sample_rate,
            channels = audio.channels,
            resampled = pcm.len(),
            "resampled to analysis rate"
        );
        self.generate_pcm16(&pcm)
    }

    /// Produce the container for 16 kHz mono PCM.
    pub fn generate_pcm16(&self, pcm: &[i16]) -> Result<SignatureContainer> {
        let segment = centred_segment(pcm, self.segment_samples);
        let peaks = extract_peaks(segment, &self.peaks)?;

        // extract_peaks bounds the windowed count to u32
        let total_samples = peaks.windowed_samples() as u32;
        tracing::debug!(
            segment = segment.len(),
            windowed = total_samples,
            frames = peaks.frame_count(),
            peaks = peaks.peak_count(),
            "extracted peaks"
        );

        Ok(SignatureContainer::from_peaks(
            ANALYSIS_SAMPLE_RATE,
            total_samples,
            peaks.into_bands(),
        ))
    }
}

impl Default for SignatureGenerator {
    fn default() -> Self {
        Self::from_config(&RecognizerConfig::default())
    }
}

fn peak_config(settings: PeakSettings) -> PeakConfig {
    PeakConfig {
        time_radius: settings.time_radius,
        freq_radius: settings.freq_radius,
    }
}

/// The centred `len` samples of `pcm`, or all of it when shorter.
pub fn centred_segment(pcm: &[i16], len: usize) -> &[i16] {
    if pcm.len() <= len {
        return pcm;
    }
    let start = (pcm.len() - len) / 2;
    &pcm[start..start + len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use songprint_analysis::Band;

    fn tone(freq_hz: f64, sample_rate: u32, seconds: f64) -> PcmAudio {
        let sr = f64::from(sample_rate);
        let n = (sr * seconds) as usize;
        PcmAudio {
            samples: (0..n)
                .map(|i| (0.5 * (2.0 * std::f64::consts::PI * freq_hz * i as f64 / sr).sin()) as f32)
                .collect(),
            sample_rate,
            channels: 1,
        }
    }

    #[test]
    fn centred_segment_takes_the_middle() {
        let pcm: Vec<i16> = (0..10).collect();
        assert_eq!(centred_segment(&pcm, 4), &[3, 4, 5, 6]);
        assert_eq!(centred_segment(&pcm, 10), pcm.as_slice());
        assert_eq!(centred_segment(&pcm, 50), pcm.as_slice());
    }

    #[test]
    fn long_input_is_cut_to_segment() {
        let generator = SignatureGenerator::new(2, PeakConfig::default());
        let container = generator.generate(&tone(1000.0, 16_000, 5.0)).unwrap();
        assert_eq!(container.sample_rate, ANALYSIS_SAMPLE_RATE);
        assert_eq!(container.total_samples, 32_000);
        assert!(container.block(Band::LowMid).is_some());
    }

    #[test]
    fn too_short_is_input_error() {
        let err = SignatureGenerator::default()
            .generate(&tone(1000.0, 16_000, 0.1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn zero_rate_is_decode_error() {
        let audio = PcmAudio {
            samples: vec![0.0; 4096],
            sample_rate: 0,
            channels: 1,
        };
        let err = SignatureGenerator::default().generate(&audio).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn from_config_uses_settings() {
        let mut config = RecognizerConfig::default();
        config.segment_duration_seconds = 3;
        config.peaks.time_radius = 2;
        let generator = SignatureGenerator::from_config(&config);
        assert_eq!(generator.segment_samples(), 48_000);
        assert_eq!(generator.peaks.time_radius, 2);
    }
}
