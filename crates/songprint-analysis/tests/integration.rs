//! Integration tests for songprint-analysis.
//!
//! Drive the full resample → frame → spectrum → peaks path with synthetic
//! signals whose peaks are known in advance.

use std::f64::consts::PI;

use proptest::prelude::*;
use songprint_analysis::{
    Band, MAGNITUDE_FLOOR, NUM_BINS, Peak, PeakConfig, PeakExtractor, SpectralFrame, extract_peaks,
    resample_to_analysis_rate, windowed_sample_count,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sine(freq_hz: f64, sample_rate: u32, seconds: f64, amplitude: f64) -> Vec<f32> {
    let sr = f64::from(sample_rate);
    let n = (sr * seconds) as usize;
    (0..n)
        .map(|i| (amplitude * (2.0 * PI * freq_hz * i as f64 / sr).sin()) as f32)
        .collect()
}

/// Linear sweep from `f0` to `f1` Hz.
fn sweep(f0: f64, f1: f64, sample_rate: u32, seconds: f64) -> Vec<f32> {
    let sr = f64::from(sample_rate);
    let n = (sr * seconds) as usize;
    let k = (f1 - f0) / seconds;
    (0..n)
        .map(|i| {
            let t = i as f64 / sr;
            (0.5 * (2.0 * PI * (f0 * t + 0.5 * k * t * t)).sin()) as f32
        })
        .collect()
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[test]
fn sweep_at_44100_hz_covers_every_band() {
    let audio = sweep(200.0, 6000.0, 44_100, 10.0);
    let pcm = resample_to_analysis_rate(&audio, 44_100, 1).unwrap();
    assert_eq!(pcm.len(), 160_000);

    let map = extract_peaks(&pcm, &PeakConfig::default()).unwrap();
    assert_eq!(map.windowed_samples(), windowed_sample_count(pcm.len()));
    assert!(map.windowed_samples().abs_diff(160_000) < 128);

    for band in Band::ALL {
        assert!(!map.band(band).is_empty(), "no peaks in {band:?}");
    }
}

#[test]
fn tone_peaks_stay_on_its_bin() {
    // 1 kHz at 16 kHz is bin 128
    let audio = sine(1000.0, 16_000, 2.0, 0.5);
    let pcm = resample_to_analysis_rate(&audio, 16_000, 1).unwrap();
    let map = extract_peaks(&pcm, &PeakConfig::default()).unwrap();

    let peaks = map.band(Band::LowMid);
    assert!(!peaks.is_empty());
    for peak in peaks {
        assert_eq!(peak.nearest_bin(), 128);
        assert!((peak.frequency_hz() - 1000.0).abs() < 4.0);
    }
    assert!(map.band(Band::High).is_empty());
}

#[test]
fn silence_has_no_peaks() {
    let pcm = resample_to_analysis_rate(&vec![0.0; 48_000], 48_000, 1).unwrap();
    let map = extract_peaks(&pcm, &PeakConfig::default()).unwrap();
    assert_eq!(map.peak_count(), 0);
    assert!(map.frame_count() > 0);
}

#[test]
fn stereo_downmix_matches_mono() {
    let mono = sine(700.0, 22_050, 1.0, 0.4);
    let stereo: Vec<f32> = mono.iter().flat_map(|&s| [s, s]).collect();

    let a = resample_to_analysis_rate(&mono, 22_050, 1).unwrap();
    let b = resample_to_analysis_rate(&stereo, 22_050, 2).unwrap();
    assert_eq!(a, b);
}

#[test]
fn analysis_is_deterministic() {
    let audio = sweep(300.0, 4000.0, 32_000, 3.0);
    let run = || {
        let pcm = resample_to_analysis_rate(&audio, 32_000, 1).unwrap();
        extract_peaks(&pcm, &PeakConfig::default()).unwrap()
    };
    assert_eq!(run(), run());
}

// ---------------------------------------------------------------------------
// Collision-window sparsity
// ---------------------------------------------------------------------------

fn arb_frames() -> impl Strategy<Value = Vec<SpectralFrame>> {
    // Coarse magnitudes make ties common
    prop::collection::vec(
        prop::collection::vec(
            prop_oneof![Just(MAGNITUDE_FLOOR), (0u16..8).prop_map(|m| 8000 + m * 500)],
            NUM_BINS,
        ),
        1..40,
    )
    .prop_map(|spectra| {
        spectra
            .into_iter()
            .enumerate()
            .map(|(i, magnitudes)| SpectralFrame {
                index: i as u32,
                magnitudes,
            })
            .collect()
    })
}

/// The whole bin a peak was picked at.
///
/// Interpolation moves the stored position by at most half a bin, and when it
/// lands exactly between two in-band bins the lower one is the peak.
fn source_bin(peak: &Peak, frames: &[SpectralFrame]) -> usize {
    let frame = &frames[peak.frame_index as usize];
    peak.band
        .bin_range()
        .find(|&b| {
            (b as i64 * 64 - peak.frequency_bin as i64).abs() <= 32
                && frame.magnitudes[b] == peak.magnitude
        })
        .expect("peak has a source bin")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn no_two_peaks_share_a_collision_window(
        frames in arb_frames(),
        time_radius in 0usize..6,
        freq_radius in 1usize..6,
    ) {
        let config = PeakConfig { time_radius, freq_radius };
        let mut extractor = PeakExtractor::new(config);
        for frame in &frames {
            extractor.push(frame);
        }

        for peaks in extractor.finish().into_values() {
            for (i, a) in peaks.iter().enumerate() {
                prop_assert!(a.magnitude > MAGNITUDE_FLOOR);
                let a_bin = source_bin(a, &frames);
                for b in &peaks[i + 1..] {
                    let dt = a.frame_index.abs_diff(b.frame_index) as usize;
                    let db = a_bin.abs_diff(source_bin(b, &frames));
                    prop_assert!(dt > time_radius || db > freq_radius, "{a:?} and {b:?} collide");
                }
            }
        }
    }
}
