//! Block-based DTMF classification.
//!
//! A full block of Q31 samples is turned into a magnitude spectrum, the seven
//! keypad tones are read out of their bins, and the strongest row and column
//! above the threshold select a key from the 4×3 grid.

pub mod analyzer;
pub mod classify;
pub mod config;
pub mod fixed;
pub mod spectrum;
pub mod tones;

pub use analyzer::BlockAnalyzer;
pub use classify::{Classifier, Detection, Key};
pub use config::{ConfigError, DetectorConfig, DetectorConfigBuilder};
pub use fixed::{Magnitude, Sample};
pub use spectrum::{FftMagnitude, SpectralTransform, TransformError};
pub use tones::{ToneEnergies, ToneTable};
