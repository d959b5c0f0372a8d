//! Power spectrum, magnitude quantization, and frequency bands.
//!
//! Each frame's 1025 positive-frequency bins are turned into power values and
//! then into quantized `u16` log magnitudes. The quantizer is shared by the
//! encoder and the decoder: both sides agree on
//!
//! ```text
//! q = ln(power).max(1/64) * 1477.3 + 6144
//! ```
//!
//! where `power = |X[k]|² / 2^17` for `i16`-scale input. Silent bins all land
//! on [`MAGNITUDE_FLOOR`].
//!
//! Peaks are only kept in four bands spanning 250 Hz to 5.5 kHz, see [`Band`].

use std::ops::Range;

use crate::ANALYSIS_SAMPLE_RATE;
use crate::fft::{Fft, power};
use crate::frame::{FRAME_SIZE, Frame};

/// Positive-frequency bins per frame (DC to Nyquist).
pub const NUM_BINS: usize = FRAME_SIZE / 2 + 1;

/// Width of one bin in Hz (7.8125 Hz at 16 kHz / 2048).
pub const BIN_WIDTH_HZ: f32 = ANALYSIS_SAMPLE_RATE as f32 / FRAME_SIZE as f32;

const POWER_NORMALIZATION: f32 = (1 << 17) as f32;
const MIN_POWER: f32 = 1e-10;
const LOG_FLOOR: f32 = 1.0 / 64.0;
const MAGNITUDE_SCALE: f32 = 1477.3;
const MAGNITUDE_OFFSET: f32 = 6144.0;

/// Quantized magnitude of a bin whose power is at or below the log floor.
pub const MAGNITUDE_FLOOR: u16 = (LOG_FLOOR * MAGNITUDE_SCALE + MAGNITUDE_OFFSET) as u16;

/// Quantize a power value into the format's `u16` magnitude.
pub fn quantize_magnitude(power: f32) -> u16 {
    let q = power.max(MIN_POWER).ln().max(LOG_FLOOR) * MAGNITUDE_SCALE + MAGNITUDE_OFFSET;
    q.clamp(0.0, u16::MAX as f32) as u16
}

/// Approximate power a quantized magnitude stands for.
pub fn dequantize_magnitude(magnitude: u16) -> f32 {
    ((magnitude as f32 - MAGNITUDE_OFFSET) / MAGNITUDE_SCALE).exp()
}

/// Frequency bands peaks are grouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Band {
    /// 250 Hz – 520 Hz
    Low = 0,
    /// 520 Hz – 1450 Hz
    LowMid = 1,
    /// 1450 Hz – 3500 Hz
    HighMid = 2,
    /// 3500 Hz – 5500 Hz
    High = 3,
}

impl Band {
    /// All bands in index order.
    pub const ALL: [Band; 4] = [Band::Low, Band::LowMid, Band::HighMid, Band::High];

    /// Band index as stored in the signature's band table.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Band for a stored index.
    pub fn from_index(index: u8) -> Option<Band> {
        Band::ALL.get(index as usize).copied()
    }

    /// Frequency range in Hz (lower bound inclusive, upper exclusive).
    pub fn frequency_range(self) -> (u32, u32) {
        match self {
            Band::Low => (250, 520),
            Band::LowMid => (520, 1450),
            Band::HighMid => (1450, 3500),
            Band::High => (3500, 5500),
        }
    }

    /// Bins whose centre frequency falls inside the band.
    pub fn bin_range(self) -> Range<usize> {
        let (lo, hi) = self.frequency_range();
        first_bin_at_or_above(lo)..first_bin_at_or_above(hi)
    }

    /// Band containing `bin`, if any.
    pub fn for_bin(bin: usize) -> Option<Band> {
        Band::ALL.into_iter().find(|b| b.bin_range().contains(&bin))
    }
}

fn first_bin_at_or_above(hz: u32) -> usize {
    (hz as usize * FRAME_SIZE).div_ceil(ANALYSIS_SAMPLE_RATE as usize)
}

/// Quantized magnitude spectrum of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectralFrame {
    /// Index of the frame this spectrum was computed from.
    pub index: u32,
    /// One quantized magnitude per bin, `NUM_BINS` long.
    pub magnitudes: Vec<u16>,
}

impl SpectralFrame {
    /// The magnitude profile of a single band.
    pub fn band(&self, band: Band) -> &[u16] {
        &self.magnitudes[band.bin_range()]
    }
}

/// Computes quantized spectra frame by frame.
pub struct SpectralAnalyzer {
    fft: Fft,
}

impl SpectralAnalyzer {
    /// Create an analyzer sized for [`FRAME_SIZE`] frames.
    pub fn new() -> Self {
        Self {
            fft: Fft::new(FRAME_SIZE),
        }
    }

    /// Transform one windowed frame into its quantized spectrum.
    pub fn analyze(&mut self, frame: &Frame) -> SpectralFrame {
        let spectrum = self.fft.forward(&frame.samples);
        let magnitudes = power(spectrum)
            .map(|p| quantize_magnitude(p / POWER_NORMALIZATION))
            .collect();

        SpectralFrame {
            index: frame.index,
            magnitudes,
        }
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
