//! Per-band time-frequency peak picking.
//!
//! Each band runs its own small state machine over the stream of
//! [`SpectralFrame`]s. A tracker keeps the last `2 * time_radius + 1` band
//! profiles and decides a frame once every neighbour it can be compared with
//! has arrived.
//!
//! A bin is a peak when:
//!
//! - its magnitude is strictly above [`MAGNITUDE_FLOOR`]
//! - no other bin of the same band within `±time_radius` frames and
//!   `±freq_radius` bins dominates it
//!
//! Dominance is the total order *magnitude desc, frame asc, bin asc*, so two
//! peaks of one band can never sit inside the same collision window and equal
//! plateaus resolve to their earliest, lowest point.
//!
//! The stored frequency is refined below bin resolution with a parabolic fit
//! over the quantized neighbours, in units of 1/64 bin.

use std::collections::{BTreeMap, VecDeque};
use std::ops::Range;

use crate::spectrum::{Band, MAGNITUDE_FLOOR, SpectralFrame};

/// Fixed-point steps per FFT bin in [`Peak::frequency_bin`].
pub const BIN_SUBDIVISIONS: i32 = 64;

const MAX_OFFSET: i32 = BIN_SUBDIVISIONS / 2;

/// A locally dominant time-frequency point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Peak {
    /// Band the peak was found in.
    pub band: Band,
    /// Index of the frame holding the peak.
    pub frame_index: u32,
    /// Interpolated bin position in 1/64-bin steps.
    pub frequency_bin: u16,
    /// Quantized magnitude at the peak bin.
    pub magnitude: u16,
}

impl Peak {
    /// Peak frequency in Hz.
    pub fn frequency_hz(&self) -> f32 {
        self.frequency_bin as f32 / BIN_SUBDIVISIONS as f32 * crate::spectrum::BIN_WIDTH_HZ
    }

    /// Nearest whole FFT bin.
    pub fn nearest_bin(&self) -> usize {
        (self.frequency_bin as usize + MAX_OFFSET as usize) / BIN_SUBDIVISIONS as usize
    }
}

/// Neighbourhood used for peak suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakConfig {
    /// Frames on each side of a candidate it is compared with.
    pub time_radius: usize,
    /// Bins on each side of a candidate it is compared with.
    pub freq_radius: usize,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            time_radius: 8,
            freq_radius: 8,
        }
    }
}

/// One remembered band profile.
///
/// `magnitudes` spans the band plus one guard bin on each side, used only for
/// interpolation.
struct Profile {
    frame_index: u32,
    magnitudes: Vec<u16>,
}

struct BandTracker {
    band: Band,
    bins: Range<usize>,
    history: VecDeque<Profile>,
    /// Position in `history` of the oldest undecided frame.
    pending: usize,
    peaks: Vec<Peak>,
}

impl BandTracker {
    fn new(band: Band) -> Self {
        Self {
            band,
            bins: band.bin_range(),
            history: VecDeque::new(),
            pending: 0,
            peaks: Vec::new(),
        }
    }

    fn push(&mut self, frame: &SpectralFrame, config: &PeakConfig) {
        let guarded = self.bins.start - 1..self.bins.end + 1;
        self.history.push_back(Profile {
            frame_index: frame.index,
            magnitudes: frame.magnitudes[guarded].to_vec(),
        });

        while self.pending + config.time_radius < self.history.len() {
            self.decide(self.pending, config);
            self.pending += 1;
        }
        while self.pending > config.time_radius {
            self.history.pop_front();
            self.pending -= 1;
        }
    }

    fn finish(&mut self, config: &PeakConfig) {
        while self.pending < self.history.len() {
            self.decide(self.pending, config);
            self.pending += 1;
        }
    }

    fn decide(&mut self, t: usize, config: &PeakConfig) {
        let width = self.bins.len();
        let times = t.saturating_sub(config.time_radius)
            ..(t + config.time_radius + 1).min(self.history.len());

        for j in 0..width {
            let magnitude = self.history[t].magnitudes[j + 1];
            if magnitude <= MAGNITUDE_FLOOR {
                continue;
            }

            let bins = j.saturating_sub(config.freq_radius)..(j + config.freq_radius + 1).min(width);
            let dominated = times.clone().any(|dt| {
                let profile = &self.history[dt].magnitudes;
                bins.clone().any(|dj| {
                    let other = profile[dj + 1];
                    other > magnitude || (other == magnitude && (dt, dj) < (t, j))
                })
            });
            if dominated {
                continue;
            }

            let profile = &self.history[t];
            let before = profile.magnitudes[j] as i32;
            let after = profile.magnitudes[j + 2] as i32;
            let offset = interpolate(before, magnitude as i32, after);
            let centre = (self.bins.start + j) as i32 * BIN_SUBDIVISIONS;

            self.peaks.push(Peak {
                band: self.band,
                frame_index: profile.frame_index,
                frequency_bin: (centre + offset) as u16,
                magnitude,
            });
        }
    }
}

/// Sub-bin offset of a parabola through three quantized magnitudes.
fn interpolate(before: i32, peak: i32, after: i32) -> i32 {
    let denominator = 2 * peak - before - after;
    if denominator <= 0 {
        // flat or convex: snap toward the louder neighbour
        return MAX_OFFSET * (after - before).signum();
    }
    ((after - before) * MAX_OFFSET / denominator).clamp(-MAX_OFFSET, MAX_OFFSET)
}

/// Streaming peak extractor over all bands.
///
/// Frames must be pushed in index order. Peaks come out per band ordered by
/// frame, then by bin.
pub struct PeakExtractor {
    config: PeakConfig,
    trackers: Vec<BandTracker>,
}

impl PeakExtractor {
    /// Create an extractor with the given suppression neighbourhood.
    pub fn new(config: PeakConfig) -> Self {
        Self {
            config,
            trackers: Band::ALL.into_iter().map(BandTracker::new).collect(),
        }
    }

    /// Feed the next spectral frame.
    pub fn push(&mut self, frame: &SpectralFrame) {
        for tracker in &mut self.trackers {
            tracker.push(frame, &self.config);
        }
    }

    /// Decide the frames still waiting for look-ahead and return every peak.
    pub fn finish(mut self) -> BTreeMap<Band, Vec<Peak>> {
        self.trackers
            .iter_mut()
            .map(|tracker| {
                tracker.finish(&self.config);
                (tracker.band, std::mem::take(&mut tracker.peaks))
            })
            .collect()
    }
}

impl Default for PeakExtractor {
    fn default() -> Self {
        Self::new(PeakConfig::default())
    }
}
