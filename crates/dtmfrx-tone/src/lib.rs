pub mod generator;
pub mod keys;
mod sine_oscillator;

pub use generator::{DualToneGenerator, ToneSequence};
pub use keys::{key_tones, ToneError};
