use crate::fixed::Magnitude;
use thiserror::Error;

pub const DEFAULT_SAMPLE_RATE_HZ: f32 = 8000.0;
pub const DEFAULT_BLOCK_SIZE: usize = 1024;
pub const DEFAULT_THRESHOLD: Magnitude = 10_000;

pub const ROW_FREQS_HZ: [f32; 4] = [697.0, 770.0, 852.0, 941.0];
pub const COLUMN_FREQS_HZ: [f32; 3] = [1209.0, 1336.0, 1477.0];

pub const KEYPAD: [[char; 3]; 4] = [
    ['1', '2', '3'],
    ['4', '5', '6'],
    ['7', '8', '9'],
    ['*', '0', '#'],
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sample rate must be a positive finite number, got {0} Hz")]
    InvalidSampleRate(f32),
    #[error("block size must be a power of two of at least 2, got {0}")]
    InvalidBlockSize(usize),
    #[error("transform size must be a power of two of at least 2, got {0}")]
    InvalidTransformSize(usize),
    #[error("transform size {transform} does not match block size {block}")]
    SizeMismatch { block: usize, transform: usize },
    #[error("magnitude threshold must not be negative, got {0}")]
    NegativeThreshold(Magnitude),
    #[error("tone frequency must be a positive finite number, got {0} Hz")]
    InvalidFrequency(f32),
}

/// Fixed detection parameters, validated once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    sample_rate_hz: f32,
    block_size: usize,
    transform_size: usize,
    row_freqs_hz: [f32; 4],
    column_freqs_hz: [f32; 3],
    keypad: [[char; 3]; 4],
    threshold: Magnitude,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            block_size: DEFAULT_BLOCK_SIZE,
            transform_size: DEFAULT_BLOCK_SIZE,
            row_freqs_hz: ROW_FREQS_HZ,
            column_freqs_hz: COLUMN_FREQS_HZ,
            keypad: KEYPAD,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl DetectorConfig {
    /// Create a builder with the reference 8 kHz / 1024-sample settings.
    pub fn builder() -> DetectorConfigBuilder {
        DetectorConfigBuilder::new()
    }

    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate_hz
    }

    /// Number of samples per analysis block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn transform_size(&self) -> usize {
        self.transform_size
    }

    /// Width of one spectrum bin in Hz.
    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate_hz / self.transform_size as f32
    }

    pub fn row_freqs_hz(&self) -> &[f32; 4] {
        &self.row_freqs_hz
    }

    pub fn column_freqs_hz(&self) -> &[f32; 3] {
        &self.column_freqs_hz
    }

    /// All seven tones, rows first.
    pub fn tone_freqs_hz(&self) -> [f32; 7] {
        std::array::from_fn(|i| {
            if i < 4 {
                self.row_freqs_hz[i]
            } else {
                self.column_freqs_hz[i - 4]
            }
        })
    }

    pub fn keypad(&self) -> &[[char; 3]; 4] {
        &self.keypad
    }

    /// Energy a tone must strictly exceed to be a candidate.
    pub fn threshold(&self) -> Magnitude {
        self.threshold
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate_hz));
        }
        if !valid_size(self.block_size) {
            return Err(ConfigError::InvalidBlockSize(self.block_size));
        }
        if !valid_size(self.transform_size) {
            return Err(ConfigError::InvalidTransformSize(self.transform_size));
        }
        if self.block_size != self.transform_size {
            return Err(ConfigError::SizeMismatch {
                block: self.block_size,
                transform: self.transform_size,
            });
        }
        if self.threshold < 0 {
            return Err(ConfigError::NegativeThreshold(self.threshold));
        }
        if let Some(&bad) = self
            .tone_freqs_hz()
            .iter()
            .find(|f| !(f.is_finite() && **f > 0.0))
        {
            return Err(ConfigError::InvalidFrequency(bad));
        }
        Ok(())
    }
}

fn valid_size(n: usize) -> bool {
    n >= 2 && n.is_power_of_two()
}

/// Builder for a validated [`DetectorConfig`].
pub struct DetectorConfigBuilder {
    config: DetectorConfig,
}

impl Default for DetectorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: DetectorConfig::default(),
        }
    }

    pub fn sample_rate_hz(mut self, sample_rate_hz: f32) -> Self {
        self.config.sample_rate_hz = sample_rate_hz;
        self
    }

    /// Set the block size. The transform size follows unless set explicitly afterwards.
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.config.block_size = block_size;
        self.config.transform_size = block_size;
        self
    }

    pub fn transform_size(mut self, transform_size: usize) -> Self {
        self.config.transform_size = transform_size;
        self
    }

    pub fn row_freqs_hz(mut self, freqs: [f32; 4]) -> Self {
        self.config.row_freqs_hz = freqs;
        self
    }

    pub fn column_freqs_hz(mut self, freqs: [f32; 3]) -> Self {
        self.config.column_freqs_hz = freqs;
        self
    }

    pub fn keypad(mut self, keypad: [[char; 3]; 4]) -> Self {
        self.config.keypad = keypad;
        self
    }

    pub fn threshold(mut self, threshold: Magnitude) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<DetectorConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = DetectorConfig::builder().build().expect("defaults");
        assert_eq!(config, DetectorConfig::default());
        assert_eq!(config.bin_width_hz(), 7.8125);
    }

    #[test]
    fn rejects_mismatched_transform() {
        let err = DetectorConfig::builder()
            .block_size(2048)
            .transform_size(1024)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::SizeMismatch {
                block: 2048,
                transform: 1024
            }
        );
    }

    #[test]
    fn block_size_carries_transform_size() {
        let config = DetectorConfig::builder()
            .block_size(2048)
            .build()
            .expect("2048");
        assert_eq!(config.transform_size(), 2048);
    }

    #[test]
    fn rejects_non_power_of_two() {
        let err = DetectorConfig::builder().block_size(1000).build().unwrap_err();
        assert_eq!(err, ConfigError::InvalidBlockSize(1000));
        let err = DetectorConfig::builder().block_size(0).build().unwrap_err();
        assert_eq!(err, ConfigError::InvalidBlockSize(0));
    }

    #[test]
    fn rejects_bad_rate_and_threshold() {
        let err = DetectorConfig::builder()
            .sample_rate_hz(0.0)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidSampleRate(0.0));

        let err = DetectorConfig::builder().threshold(-1).build().unwrap_err();
        assert_eq!(err, ConfigError::NegativeThreshold(-1));
    }

    #[test]
    fn rejects_bad_frequency() {
        let err = DetectorConfig::builder()
            .column_freqs_hz([1209.0, -1.0, 1477.0])
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidFrequency(-1.0));
    }

    #[test]
    fn tones_are_rows_then_columns() {
        let config = DetectorConfig::default();
        assert_eq!(
            config.tone_freqs_hz(),
            [697.0, 770.0, 852.0, 941.0, 1209.0, 1336.0, 1477.0]
        );
    }
}
