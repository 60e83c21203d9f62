use crate::config::DetectorConfig;
use crate::fixed::Magnitude;
use crate::tones::ToneEnergies;
use std::fmt;

/// A resolved keypad position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub row: usize,
    pub column: usize,
    pub symbol: char,
}

/// Outcome of one analysis cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Tone(Key),
    NoTone,
}

impl Detection {
    /// The detected keypad symbol, if any.
    pub fn symbol(&self) -> Option<char> {
        match self {
            Detection::Tone(key) => Some(key.symbol),
            Detection::NoTone => None,
        }
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detection::Tone(key) => write!(f, "DTMF Tone Detected: {}", key.symbol),
            Detection::NoTone => write!(f, "No DTMF Tone Detected"),
        }
    }
}

/// Picks the strongest row and column tone and looks up the key.
#[derive(Debug, Clone)]
pub struct Classifier {
    threshold: Magnitude,
    keypad: [[char; 3]; 4],
}

impl Classifier {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            threshold: config.threshold(),
            keypad: *config.keypad(),
        }
    }

    /// Both groups must produce a candidate, otherwise the result is `NoTone`.
    pub fn classify(&self, energies: &ToneEnergies) -> Detection {
        let row = strongest(energies.rows(), self.threshold);
        let column = strongest(energies.columns(), self.threshold);
        match (row, column) {
            (Some(row), Some(column)) => Detection::Tone(Key {
                row,
                column,
                symbol: self.keypad[row][column],
            }),
            _ => Detection::NoTone,
        }
    }
}

/// Index of the largest value strictly above `threshold`.
///
/// Equal values keep the earliest index.
fn strongest(values: &[Magnitude], threshold: Magnitude) -> Option<usize> {
    let mut best: Option<(usize, Magnitude)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v <= threshold {
            continue;
        }
        match best {
            Some((_, best_v)) if v <= best_v => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_THRESHOLD;

    fn classifier() -> Classifier {
        Classifier::new(&DetectorConfig::default())
    }

    fn energies(row: Option<usize>, column: Option<usize>, level: Magnitude) -> ToneEnergies {
        let mut e = [0; 7];
        if let Some(r) = row {
            e[r] = level;
        }
        if let Some(c) = column {
            e[4 + c] = level;
        }
        ToneEnergies(e)
    }

    #[test]
    fn every_pair_resolves_to_its_key() {
        let c = classifier();
        let keypad = DetectorConfig::default().keypad().to_owned();
        for row in 0..4 {
            for column in 0..3 {
                let detection = c.classify(&energies(Some(row), Some(column), 50_000));
                assert_eq!(
                    detection,
                    Detection::Tone(Key {
                        row,
                        column,
                        symbol: keypad[row][column]
                    })
                );
            }
        }
    }

    #[test]
    fn silence_is_no_tone() {
        assert_eq!(classifier().classify(&ToneEnergies::default()), Detection::NoTone);
        let at = ToneEnergies([DEFAULT_THRESHOLD; 7]);
        assert_eq!(classifier().classify(&at), Detection::NoTone);
    }

    #[test]
    fn threshold_is_strict() {
        let c = classifier();
        let at = energies(Some(0), Some(0), DEFAULT_THRESHOLD);
        assert_eq!(c.classify(&at), Detection::NoTone);
        let above = energies(Some(0), Some(0), DEFAULT_THRESHOLD + 1);
        assert_eq!(c.classify(&above).symbol(), Some('1'));
    }

    #[test]
    fn ties_pick_the_lower_index() {
        let c = classifier();
        let e = ToneEnergies([0, 40_000, 40_000, 0, 20_000, 30_000, 30_000]);
        match c.classify(&e) {
            Detection::Tone(key) => {
                assert_eq!((key.row, key.column), (1, 1));
                assert_eq!(key.symbol, '5');
            }
            Detection::NoTone => panic!("expected a key"),
        }
    }

    #[test]
    fn strongest_wins_within_group() {
        let c = classifier();
        let e = ToneEnergies([20_000, 15_000, 90_000, 30_000, 12_000, 11_000, 80_000]);
        assert_eq!(c.classify(&e).symbol(), Some('9'));
    }

    #[test]
    fn single_group_is_no_tone() {
        let c = classifier();
        assert_eq!(c.classify(&energies(Some(2), None, 90_000)), Detection::NoTone);
        assert_eq!(c.classify(&energies(None, Some(1), 90_000)), Detection::NoTone);
    }

    #[test]
    fn renders_reference_lines() {
        let c = classifier();
        let five = c.classify(&energies(Some(1), Some(1), 90_000));
        assert_eq!(five.to_string(), "DTMF Tone Detected: 5");
        assert_eq!(Detection::NoTone.to_string(), "No DTMF Tone Detected");
    }

    #[test]
    fn strongest_handles_empty_and_below() {
        assert_eq!(strongest(&[], 0), None);
        assert_eq!(strongest(&[1, 2, 3], 3), None);
        assert_eq!(strongest(&[4, 2, 4], 3), Some(0));
    }
}
