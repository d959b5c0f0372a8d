//! Real-input forward transform and analysis windows.

use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;
use std::sync::Arc;

/// Analysis window applied to each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// All ones.
    Rectangular,
    /// Periodic Hann, `0.5 * (1 - cos(2πi/n))`.
    Hann,
}

impl Window {
    /// Multiply `buffer` by the window in place.
    pub fn apply(&self, buffer: &mut [f32]) {
        if *self == Window::Rectangular {
            return;
        }
        let step = 2.0 * PI / buffer.len() as f32;
        for (i, x) in buffer.iter_mut().enumerate() {
            *x *= 0.5 - 0.5 * (step * i as f32).cos();
        }
    }

    /// The window's `size` coefficients.
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        let mut w = vec![1.0; size];
        self.apply(&mut w);
        w
    }
}

/// Forward transform of a fixed size over real input.
///
/// Reuses its plan and buffers, so repeated calls do not allocate.
pub struct Fft {
    plan: Arc<dyn rustfft::Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl Fft {
    /// Transform of `size` points.
    pub fn new(size: usize) -> Self {
        let plan = FftPlanner::new().plan_fft_forward(size);
        let zero = Complex::new(0.0, 0.0);
        Self {
            scratch: vec![zero; plan.get_inplace_scratch_len()],
            buffer: vec![zero; size],
            plan,
        }
    }

    /// Number of points.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Bins `0..=size/2` of the transform of `input`.
    ///
    /// Short input is zero-padded; long input is truncated.
    pub fn forward(&mut self, input: &[f32]) -> &[Complex<f32>] {
        for (slot, &x) in self
            .buffer
            .iter_mut()
            .zip(input.iter().chain(std::iter::repeat(&0.0)))
        {
            *slot = Complex::new(x, 0.0);
        }

        self.plan
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let bins = self.size() / 2 + 1;
        &self.buffer[..bins]
    }
}

/// Squared magnitude of each bin.
pub fn power(spectrum: &[Complex<f32>]) -> impl Iterator<Item = f32> + '_ {
    spectrum.iter().map(|c| c.re * c.re + c.im * c.im)
}
