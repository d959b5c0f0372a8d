//! The frames → spectra → peaks driver.

use std::collections::BTreeMap;

use crate::error::{AnalysisError, Result};
use crate::frame::{FRAME_SIZE, Framer};
use crate::peaks::{Peak, PeakConfig, PeakExtractor};
use crate::spectrum::{Band, SpectralAnalyzer};

/// Peaks of one analysed buffer, grouped by band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakMap {
    bands: BTreeMap<Band, Vec<Peak>>,
    frame_count: usize,
    windowed_samples: usize,
}

impl PeakMap {
    /// Peaks of one band, ordered by frame.
    pub fn band(&self, band: Band) -> &[Peak] {
        self.bands.get(&band).map_or(&[], Vec::as_slice)
    }

    /// Bands in index order with their peaks, including empty bands.
    pub fn iter(&self) -> impl Iterator<Item = (Band, &[Peak])> {
        self.bands.iter().map(|(&band, peaks)| (band, peaks.as_slice()))
    }

    /// Total peaks across all bands.
    pub fn peak_count(&self) -> usize {
        self.bands.values().map(Vec::len).sum()
    }

    /// Frames analysed.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// 16 kHz samples covered by at least one frame.
    pub fn windowed_samples(&self) -> usize {
        self.windowed_samples
    }

    /// Take ownership of the per-band peak lists.
    pub fn into_bands(self) -> BTreeMap<Band, Vec<Peak>> {
        self.bands
    }
}

/// Run framing, spectral analysis, and peak extraction over 16 kHz PCM.
///
/// Only one frame and its spectrum are alive at a time; the extractor keeps
/// the band history it needs for suppression.
pub fn extract_peaks(pcm: &[i16], config: &PeakConfig) -> Result<PeakMap> {
    if pcm.len() < FRAME_SIZE {
        return Err(AnalysisError::TooShort {
            samples: pcm.len(),
            needed: FRAME_SIZE,
        });
    }

    let framer = Framer::new(pcm);
    let windowed_samples = framer.windowed_samples();
    if u32::try_from(windowed_samples).is_err() {
        return Err(AnalysisError::TooLong(windowed_samples));
    }
    let frame_count = framer.len();

    let mut analyzer = SpectralAnalyzer::new();
    let mut extractor = PeakExtractor::new(*config);
    for frame in framer {
        extractor.push(&analyzer.analyze(&frame));
    }

    Ok(PeakMap {
        bands: extractor.finish(),
        frame_count,
        windowed_samples,
    })
}
