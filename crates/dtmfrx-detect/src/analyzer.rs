use crate::classify::{Classifier, Detection};
use crate::config::DetectorConfig;
use crate::fixed::Sample;
use crate::spectrum::{FftMagnitude, SpectralTransform, TransformError};
use crate::tones::{ToneEnergies, ToneTable};
use tracing::trace;

/// Spectrum, tone extraction and classification for one full block.
pub struct BlockAnalyzer<T = FftMagnitude> {
    transform: T,
    table: ToneTable,
    classifier: Classifier,
}

impl BlockAnalyzer<FftMagnitude> {
    /// Plan an FFT of the configured transform size.
    pub fn new(config: &DetectorConfig) -> Result<Self, TransformError> {
        let transform = FftMagnitude::new(config.transform_size())?;
        Self::with_transform(config, transform)
    }
}

impl<T: SpectralTransform> BlockAnalyzer<T> {
    /// Use a custom transform. Its size must equal the block size exactly.
    pub fn with_transform(config: &DetectorConfig, transform: T) -> Result<Self, TransformError> {
        if transform.size() != config.block_size() {
            return Err(TransformError::SizeMismatch {
                transform: transform.size(),
                block: config.block_size(),
            });
        }
        Ok(Self {
            transform,
            table: ToneTable::new(config),
            classifier: Classifier::new(config),
        })
    }

    /// Number of samples each call to [`analyze`](Self::analyze) expects.
    pub fn block_size(&self) -> usize {
        self.transform.size()
    }

    /// Energies of the seven tones in `block`.
    pub fn energies(&mut self, block: &[Sample]) -> ToneEnergies {
        let spectrum = self.transform.magnitudes(block);
        let energies = self.table.energies(spectrum);
        trace!(?energies, "tone energies");
        energies
    }

    pub fn analyze(&mut self, block: &[Sample]) -> Detection {
        let energies = self.energies(block);
        self.classifier.classify(&energies)
    }
}
