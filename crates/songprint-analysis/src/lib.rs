//! Songprint Analysis - the signal path from raw PCM to spectral peaks
//!
//! This crate implements the numeric half of signature generation:
//!
//! - [`resample`] - Channel downmix and polyphase rate conversion to 16 kHz `i16`
//! - [`frame`] - Overlapping 2048-sample frames with a Hann window
//! - [`fft`] - FFT wrapper and window functions
//! - [`spectrum`] - Power spectrum, magnitude quantization, and frequency bands
//! - [`peaks`] - Per-band time-frequency peak picking
//! - [`pipeline`] - The frames → spectra → peaks driver
//!
//! Every stage is deterministic: identical input produces identical peaks,
//! which is what keeps signatures reproducible bit-for-bit.
//!
//! ## Example
//!
//! ```rust
//! use songprint_analysis::{PeakConfig, extract_peaks, resample_to_analysis_rate};
//!
//! let sr = 44100;
//! let tone: Vec<f32> = (0..sr as usize)
//!     .map(|i| (0.5 * (2.0 * std::f64::consts::PI * 1000.0 * i as f64 / f64::from(sr)).sin()) as f32)
//!     .collect();
//!
//! let pcm = resample_to_analysis_rate(&tone, sr, 1).unwrap();
//! let peaks = extract_peaks(&pcm, &PeakConfig::default()).unwrap();
//! assert!(peaks.peak_count() > 0);
//! ```

pub mod error;
pub mod fft;
pub mod frame;
pub mod peaks;
pub mod pipeline;
pub mod resample;
pub mod spectrum;

/// Sample rate every signature is computed at, in Hz.
pub const ANALYSIS_SAMPLE_RATE: u32 = 16_000;

pub use error::{AnalysisError, Result};
pub use fft::{Fft, Window};
pub use frame::{FRAME_SIZE, Frame, Framer, HOP_SIZE, frame_count, windowed_sample_count};
pub use peaks::{BIN_SUBDIVISIONS, Peak, PeakConfig, PeakExtractor};
pub use pipeline::{PeakMap, extract_peaks};
pub use resample::{
    MAX_PHASES, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE, Resampler, downmix, resample, resample_to_analysis_rate,
    to_pcm16,
};
pub use spectrum::{
    BIN_WIDTH_HZ, Band, MAGNITUDE_FLOOR, NUM_BINS, SpectralAnalyzer, SpectralFrame, dequantize_magnitude,
    quantize_magnitude,
};
