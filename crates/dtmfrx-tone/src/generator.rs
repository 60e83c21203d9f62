use crate::keys::{key_tones, ToneError};
use crate::sine_oscillator::SineOscillator;
use dtmfrx_detect::fixed::{q31_from_f32, Sample};

/// Sum of a row and a column tone, as Q31 samples.
///
/// Each tone gets half of `level`, so the sum never exceeds full scale.
pub struct DualToneGenerator {
    row: SineOscillator,
    column: SineOscillator,
    level: f32,
}

impl DualToneGenerator {
    pub fn new(
        sample_rate_hz: f32,
        row_hz: f32,
        column_hz: f32,
        level: f32,
    ) -> Result<Self, ToneError> {
        if !(level > 0.0 && level <= 1.0) {
            return Err(ToneError::InvalidLevel(level));
        }
        Ok(Self {
            row: SineOscillator::new(sample_rate_hz, row_hz),
            column: SineOscillator::new(sample_rate_hz, column_hz),
            level,
        })
    }

    /// Generator for the tone pair of a keypad symbol.
    pub fn for_key(sample_rate_hz: f32, key: char, level: f32) -> Result<Self, ToneError> {
        let (row_hz, column_hz) = key_tones(key)?;
        Self::new(sample_rate_hz, row_hz, column_hz, level)
    }

    pub fn next_sample(&mut self) -> Sample {
        let mixed = (self.row.next() + self.column.next()) * 0.5 * self.level;
        q31_from_f32(mixed)
    }

    /// Fill `out` with consecutive samples.
    pub fn fill(&mut self, out: &mut [Sample]) {
        for sample in out {
            *sample = self.next_sample();
        }
    }

    pub fn reset_phase(&mut self) {
        self.row.reset();
        self.column.reset();
    }
}

/// Plays keys one after another, each followed by a silent gap, then stays silent.
pub struct ToneSequence {
    tones: Vec<DualToneGenerator>,
    tone_samples: usize,
    gap_samples: usize,
    current: usize,
    pos: usize,
}

impl ToneSequence {
    pub fn new(
        sample_rate_hz: f32,
        keys: &str,
        tone_samples: usize,
        gap_samples: usize,
        level: f32,
    ) -> Result<Self, ToneError> {
        let tones = keys
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|key| DualToneGenerator::for_key(sample_rate_hz, key, level))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            tones,
            tone_samples,
            gap_samples,
            current: 0,
            pos: 0,
        })
    }

    /// Total number of samples before the sequence falls silent.
    pub fn len_samples(&self) -> usize {
        self.tones.len() * (self.tone_samples + self.gap_samples)
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.tones.len()
    }

    pub fn next_sample(&mut self) -> Sample {
        let Some(tone) = self.tones.get_mut(self.current) else {
            return 0;
        };
        let sample = if self.pos < self.tone_samples {
            tone.next_sample()
        } else {
            0
        };
        self.pos += 1;
        if self.pos >= self.tone_samples + self.gap_samples {
            self.pos = 0;
            self.current += 1;
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_level() {
        assert!(matches!(
            DualToneGenerator::for_key(8000.0, '5', 0.0),
            Err(ToneError::InvalidLevel(_))
        ));
        assert!(matches!(
            DualToneGenerator::for_key(8000.0, '5', 1.5),
            Err(ToneError::InvalidLevel(_))
        ));
        assert!(matches!(
            DualToneGenerator::for_key(8000.0, '5', f32::NAN),
            Err(ToneError::InvalidLevel(_))
        ));
    }

    #[test]
    fn full_level_stays_in_range() {
        let mut gen = DualToneGenerator::for_key(8000.0, '#', 1.0).expect("gen");
        let mut out = vec![0; 8000];
        gen.fill(&mut out);
        let peak = out.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
        assert!(peak > (1u32 << 30), "peak {}", peak);
    }

    #[test]
    fn reset_phase_repeats_output() {
        let mut gen = DualToneGenerator::for_key(8000.0, '8', 0.5).expect("gen");
        let mut first = vec![0; 64];
        gen.fill(&mut first);
        gen.reset_phase();
        let mut second = vec![0; 64];
        gen.fill(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn sequence_alternates_tone_and_gap() {
        let mut seq = ToneSequence::new(8000.0, "1 2", 100, 50, 0.5).expect("seq");
        assert_eq!(seq.len_samples(), 300);
        let out: Vec<Sample> = (0..400).map(|_| seq.next_sample()).collect();
        assert!(out[..100].iter().any(|&s| s != 0));
        assert!(out[100..150].iter().all(|&s| s == 0));
        assert!(out[150..250].iter().any(|&s| s != 0));
        assert!(out[250..].iter().all(|&s| s == 0));
        assert!(seq.is_finished());
    }

    #[test]
    fn sequence_rejects_unknown_key() {
        assert!(matches!(
            ToneSequence::new(8000.0, "12D", 10, 10, 0.5),
            Err(ToneError::UnknownKey('D'))
        ));
    }
}
