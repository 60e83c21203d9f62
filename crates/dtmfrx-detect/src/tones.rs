use crate::config::DetectorConfig;
use crate::fixed::Magnitude;

pub const ROW_TONES: usize = 4;
pub const COLUMN_TONES: usize = 3;
pub const TOTAL_TONES: usize = ROW_TONES + COLUMN_TONES;

/// Spectrum bins of the seven keypad tones, rows first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneTable {
    bins: [usize; TOTAL_TONES],
    usable_bins: usize,
}

impl ToneTable {
    pub fn new(config: &DetectorConfig) -> Self {
        let bin_width_hz = config.bin_width_hz();
        let freqs = config.tone_freqs_hz();
        Self {
            bins: std::array::from_fn(|i| nearest_bin(freqs[i], bin_width_hz)),
            usable_bins: config.transform_size() / 2,
        }
    }

    /// Bin index of every tone, whether or not it is inside the usable spectrum.
    pub fn bins(&self) -> &[usize; TOTAL_TONES] {
        &self.bins
    }

    /// Read the tone energies out of a half spectrum.
    ///
    /// A tone whose bin lies outside the usable half spectrum has zero energy.
    pub fn energies(&self, spectrum: &[Magnitude]) -> ToneEnergies {
        let usable = self.usable_bins.min(spectrum.len());
        ToneEnergies(std::array::from_fn(|i| {
            let bin = self.bins[i];
            if bin < usable {
                spectrum[bin]
            } else {
                0
            }
        }))
    }
}

/// `round(freq / bin_width)`, with halves rounding up.
fn nearest_bin(freq_hz: f32, bin_width_hz: f32) -> usize {
    (freq_hz / bin_width_hz + 0.5).floor() as usize
}

/// Energy of each keypad tone for one block, rows first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToneEnergies(pub [Magnitude; TOTAL_TONES]);

impl ToneEnergies {
    pub fn rows(&self) -> &[Magnitude] {
        &self.0[..ROW_TONES]
    }

    pub fn columns(&self) -> &[Magnitude] {
        &self.0[ROW_TONES..]
    }
}
