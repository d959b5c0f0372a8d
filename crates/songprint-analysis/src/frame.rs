//! Overlapping analysis frames.
//!
//! The 16 kHz stream is cut into 2048-sample frames every 128 samples (8 ms).
//! Each frame is windowed in place before it is handed to the spectral stage.
//! A trailing remainder shorter than one frame is discarded, so the frame
//! count depends only on the input length.

use crate::fft::Window;

/// Samples per analysis frame.
pub const FRAME_SIZE: usize = 2048;

/// Samples between the starts of consecutive frames.
pub const HOP_SIZE: usize = 128;

/// Number of frames [`Framer`] yields for `num_samples` input samples.
pub fn frame_count(num_samples: usize) -> usize {
    if num_samples >= FRAME_SIZE {
        (num_samples - FRAME_SIZE) / HOP_SIZE + 1
    } else {
        0
    }
}

/// Number of input samples covered by at least one frame.
pub fn windowed_sample_count(num_samples: usize) -> usize {
    match frame_count(num_samples) {
        0 => 0,
        n => (n - 1) * HOP_SIZE + FRAME_SIZE,
    }
}

/// One windowed slice of audio.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Sequence number, starting at 0 for the first frame.
    pub index: u32,
    /// Windowed samples, `FRAME_SIZE` long, in `i16` scale.
    pub samples: Vec<f32>,
}

/// Iterator producing windowed frames from 16 kHz `i16` PCM.
pub struct Framer<'a> {
    pcm: &'a [i16],
    window: Vec<f32>,
    next: usize,
    total: usize,
}

impl<'a> Framer<'a> {
    /// Create a framer over `pcm` using a Hann window.
    pub fn new(pcm: &'a [i16]) -> Self {
        Self::with_window(pcm, Window::Hann)
    }

    /// Create a framer with an explicit window function.
    pub fn with_window(pcm: &'a [i16], window: Window) -> Self {
        Self {
            pcm,
            window: window.coefficients(FRAME_SIZE),
            next: 0,
            total: frame_count(pcm.len()),
        }
    }

    /// Total frames this framer yields.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Whether the input is too short for a single frame.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Samples covered by the yielded frames.
    pub fn windowed_samples(&self) -> usize {
        windowed_sample_count(self.pcm.len())
    }
}

impl Iterator for Framer<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.next >= self.total {
            return None;
        }

        let start = self.next * HOP_SIZE;
        let samples = self.pcm[start..start + FRAME_SIZE]
            .iter()
            .zip(&self.window)
            .map(|(&s, &w)| s as f32 * w)
            .collect();

        let frame = Frame {
            index: self.next as u32,
            samples,
        };
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Framer<'_> {}
