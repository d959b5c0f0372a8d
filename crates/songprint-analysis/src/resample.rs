//! Rate conversion to the 16 kHz analysis rate.
//!
//! [`Resampler`] converts between two integer rates by the reduced ratio
//! `up/down` (44.1 kHz to 16 kHz is 160/441). The kernel is a Blackman-windowed
//! sinc cut off at 90% of the lower Nyquist limit and spanning a fixed number
//! of zero crossings at the lower rate, so its length depends on the ratio of
//! the rates but not on how far the ratio reduces. It is tabulated at up to
//! [`MAX_PHASES`] fractional offsets; ratios with more phases than that use
//! the nearest tabulated one.
//!
//! Source rates outside [`MIN_SAMPLE_RATE`]..=[`MAX_SAMPLE_RATE`] are rejected.
//!
//! Output depends only on the input samples and the two rates, so repeated
//! runs are bit-identical.
//!
//! # Example
//!
//! ```rust
//! use songprint_analysis::resample::{resample, resample_to_analysis_rate};
//!
//! let sr = 48000.0_f32;
//! let signal: Vec<f32> = (0..4800)
//!     .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / sr).sin())
//!     .collect();
//!
//! // 48 kHz → 16 kHz is a plain decimation by 3
//! let resampled = resample(&signal, 48000, 16000).unwrap();
//! assert_eq!(resampled.len(), 1600);
//!
//! // Same conversion, clipped to i16
//! let pcm = resample_to_analysis_rate(&signal, 48000, 1).unwrap();
//! assert_eq!(pcm.len(), 1600);
//! ```

use std::f64::consts::PI;

use crate::ANALYSIS_SAMPLE_RATE;
use crate::error::{AnalysisError, Result};

/// Lowest sample rate accepted, in Hz.
pub const MIN_SAMPLE_RATE: u32 = 1_000;

/// Highest sample rate accepted, in Hz.
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Most fractional offsets the kernel is tabulated at.
pub const MAX_PHASES: usize = 1024;

/// Sinc zero crossings on each side of the kernel centre, at the lower rate.
const ZERO_CROSSINGS: f64 = 16.0;

/// Passband edge as a fraction of the lower Nyquist limit.
const CUTOFF: f64 = 0.9;

fn check_rate(rate: u32) -> Result<()> {
    if (MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&rate) {
        Ok(())
    } else {
        Err(AnalysisError::InvalidSampleRate(rate))
    }
}

/// Windowed-sinc FIR rate converter between two fixed sample rates.
///
/// The phase table is built once in [`new`](Self::new) and reused by every
/// [`process`](Self::process) call.
#[derive(Debug, Clone)]
pub struct Resampler {
    up: usize,
    down: usize,
    /// Input samples the kernel reaches on each side of an output position.
    half_width: usize,
    /// `phases[p][t]` weights input sample `centre + 1 + t - half_width` for
    /// the fractional offset `p / phases.len()`. Empty for a 1:1 ratio.
    phases: Vec<Vec<f32>>,
}

impl Resampler {
    /// Converter from `from_rate` to `to_rate`, both in Hz.
    pub fn new(from_rate: u32, to_rate: u32) -> Result<Self> {
        check_rate(from_rate)?;
        check_rate(to_rate)?;

        let g = gcd(from_rate as usize, to_rate as usize);
        let up = to_rate as usize / g;
        let down = from_rate as usize / g;
        if up == 1 && down == 1 {
            return Ok(Self {
                up,
                down,
                half_width: 0,
                phases: Vec::new(),
            });
        }

        // cycles per input sample, doubled
        let bandwidth = CUTOFF * (up as f64 / down as f64).min(1.0);
        let half_width = (ZERO_CROSSINGS / bandwidth).ceil() as usize;
        let count = up.min(MAX_PHASES);
        let phases = (0..count)
            .map(|p| kernel_phase(p as f64 / count as f64, half_width, bandwidth))
            .collect();

        Ok(Self {
            up,
            down,
            half_width,
            phases,
        })
    }

    /// Reduced conversion ratio as `(up, down)`.
    pub fn ratio(&self) -> (usize, usize) {
        (self.up, self.down)
    }

    /// Kernel taps applied per output sample.
    pub fn taps(&self) -> usize {
        2 * self.half_width
    }

    /// Fractional offsets the kernel is tabulated at.
    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Output length for `input_len` samples: `ceil(input_len * up / down)`.
    pub fn output_len(&self, input_len: usize) -> usize {
        (input_len * self.up).div_ceil(self.down)
    }

    /// Convert one contiguous block.
    ///
    /// Output sample `m` is centred on input time `m * down / up`.
    pub fn process(&self, input: &[f32]) -> Vec<f32> {
        if self.phases.is_empty() {
            return input.to_vec();
        }

        let count = self.phases.len();
        let hw = self.half_width;
        (0..self.output_len(input.len()))
            .map(|m| {
                let pos = m * self.down;
                let mut centre = pos / self.up;
                // nearest tabulated offset, rounding half up
                let mut p = (2 * (pos % self.up) * count + self.up) / (2 * self.up);
                if p == count {
                    centre += 1;
                    p = 0;
                }
                let taps = &self.phases[p];

                // taps that reach before the start or past the end read zeros
                let first = (hw - 1).saturating_sub(centre);
                let last = taps.len().min((input.len() + hw - 1).saturating_sub(centre));
                (first..last)
                    .map(|t| taps[t] * input[centre + 1 + t - hw])
                    .sum()
            })
            .collect()
    }
}

/// Convert `signal` from `from_rate` to `to_rate`.
pub fn resample(signal: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    Ok(Resampler::new(from_rate, to_rate)?.process(signal))
}

/// Kernel taps for an output position `frac` input samples past a whole
/// sample, normalised to unit DC gain.
fn kernel_phase(frac: f64, half_width: usize, bandwidth: f64) -> Vec<f32> {
    let hw = half_width as f64;
    let taps: Vec<f64> = (0..2 * half_width)
        .map(|t| windowed_sinc(t as f64 - (hw - 1.0) - frac, hw, bandwidth))
        .collect();

    let total: f64 = taps.iter().sum();
    let scale = if total.abs() > f64::EPSILON { 1.0 / total } else { 1.0 };
    taps.iter().map(|&h| (h * scale) as f32).collect()
}

/// Blackman-windowed sinc at offset `x`, zero outside `(-hw, hw)`.
fn windowed_sinc(x: f64, hw: f64, bandwidth: f64) -> f64 {
    if x.abs() >= hw {
        return 0.0;
    }
    let sinc = if x == 0.0 {
        1.0
    } else {
        let a = PI * bandwidth * x;
        a.sin() / a
    };
    let w = PI * x / hw;
    sinc * (0.42 + 0.5 * w.cos() + 0.08 * (2.0 * w).cos())
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Average interleaved channels into a mono signal.
pub fn downmix(interleaved: &[f32], channels: u16) -> Result<Vec<f32>> {
    if channels == 0 {
        return Err(AnalysisError::InvalidChannelCount(channels));
    }
    let width = channels as usize;
    if interleaved.len() % width != 0 {
        return Err(AnalysisError::ChannelMismatch {
            len: interleaved.len(),
            channels,
        });
    }

    if width == 1 {
        return Ok(interleaved.to_vec());
    }

    Ok(interleaved
        .chunks_exact(width)
        .map(|frame| frame.iter().sum::<f32>() / width as f32)
        .collect())
}

/// Scale normalized samples (±1.0 full scale) to `i16`, clipping out-of-range values.
pub fn to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s * i16::MAX as f32).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16)
        .collect()
}

/// Convert interleaved normalized PCM at any rate into 16 kHz mono `i16`.
///
/// Channels are averaged before rate conversion.
pub fn resample_to_analysis_rate(
    interleaved: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<Vec<i16>> {
    check_rate(sample_rate)?;
    if interleaved.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let mono = downmix(interleaved, channels)?;
    let converted = resample(&mono, sample_rate, ANALYSIS_SAMPLE_RATE)?;
    Ok(to_pcm16(&converted))
}
