//! Magnitude spectrum of one block.

use crate::fixed::{saturate_q31, Magnitude, Sample};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("transform size must be a power of two of at least 2, got {0}")]
    InvalidSize(usize),
    #[error("transform consumes {transform} samples but blocks hold {block}")]
    SizeMismatch { transform: usize, block: usize },
}

/// Converts a block of samples into the usable half of its magnitude spectrum.
pub trait SpectralTransform {
    /// Number of samples consumed per call.
    fn size(&self) -> usize;

    /// Return `size() / 2` magnitudes, bin 0 first.
    ///
    /// Magnitudes stay in the sample domain and saturate instead of wrapping.
    fn magnitudes(&mut self, block: &[Sample]) -> &[Magnitude];
}

/// Forward FFT followed by a scaled complex modulus.
///
/// All buffers are allocated up front so repeated calls do not allocate.
/// Each bin is divided by the transform size, so a sinusoid of amplitude `A`
/// centered on a bin reads as roughly `A / 2`.
pub struct FftMagnitude {
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<Magnitude>,
}

impl FftMagnitude {
    pub fn new(size: usize) -> Result<Self, TransformError> {
        if size < 2 || !size.is_power_of_two() {
            return Err(TransformError::InvalidSize(size));
        }
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        Ok(Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); size],
            scratch,
            magnitudes: vec![0; size / 2],
        })
    }
}

impl SpectralTransform for FftMagnitude {
    fn size(&self) -> usize {
        self.buffer.len()
    }

    fn magnitudes(&mut self, block: &[Sample]) -> &[Magnitude] {
        debug_assert_eq!(block.len(), self.buffer.len(), "block/transform size mismatch");

        // Load a private copy; the caller's block is left untouched.
        for (slot, &x) in self.buffer.iter_mut().zip(block) {
            *slot = Complex::new(x as f32, 0.0);
        }
        if block.len() < self.buffer.len() {
            for slot in &mut self.buffer[block.len()..] {
                *slot = Complex::new(0.0, 0.0);
            }
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = 1.0 / self.buffer.len() as f32;
        for (mag, bin) in self.magnitudes.iter_mut().zip(&self.buffer) {
            *mag = saturate_q31(f64::from(bin.norm() * scale));
        }
        &self.magnitudes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f64, rate_hz: f64, amplitude: f64, n: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                let t = i as f64 / rate_hz;
                (amplitude * (std::f64::consts::TAU * freq_hz * t).sin()).round() as Sample
            })
            .collect()
    }

    #[test]
    fn rejects_invalid_sizes() {
        assert!(matches!(FftMagnitude::new(0), Err(TransformError::InvalidSize(0))));
        assert!(matches!(FftMagnitude::new(1), Err(TransformError::InvalidSize(1))));
        assert!(matches!(FftMagnitude::new(1000), Err(TransformError::InvalidSize(1000))));
    }

    #[test]
    fn zero_input_is_zero_output() {
        let mut fft = FftMagnitude::new(256).expect("plan");
        let out = fft.magnitudes(&[0; 256]);
        assert_eq!(out.len(), 128);
        assert!(out.iter().all(|&m| m == 0));
    }

    #[test]
    fn on_bin_sine_peaks_at_half_amplitude() {
        // Bin 16 of a 256-point transform at 8 kHz is 500 Hz.
        let mut fft = FftMagnitude::new(256).expect("plan");
        let block = sine(500.0, 8000.0, 1.0e6, 256);
        let out = fft.magnitudes(&block);
        let (peak_bin, &peak) = out
            .iter()
            .enumerate()
            .max_by_key(|&(_, &m)| m)
            .expect("non-empty");
        assert_eq!(peak_bin, 16);
        assert!((peak - 500_000).abs() < 50, "peak {}", peak);
    }

    #[test]
    fn full_scale_dc_saturates() {
        let mut fft = FftMagnitude::new(64).expect("plan");
        let out = fft.magnitudes(&[i32::MAX; 64]);
        assert!(out[0] > i32::MAX - 1024, "dc {}", out[0]);
    }

    #[test]
    fn repeated_calls_do_not_leak_state() {
        let mut fft = FftMagnitude::new(128).expect("plan");
        let block = sine(1000.0, 8000.0, 1.0e6, 128);
        let first = fft.magnitudes(&block).to_vec();
        fft.magnitudes(&[0; 128]);
        let again = fft.magnitudes(&block).to_vec();
        assert_eq!(first, again);
    }
}
