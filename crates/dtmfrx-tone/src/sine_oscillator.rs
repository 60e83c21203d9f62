use std::sync::OnceLock;

const TABLE_LEN: usize = 4096;

static SINE_TABLE: OnceLock<Vec<f32>> = OnceLock::new();

fn sine_table() -> &'static [f32] {
    SINE_TABLE.get_or_init(|| {
        (0..TABLE_LEN)
            .map(|i| ((i as f64) * std::f64::consts::TAU / TABLE_LEN as f64).sin() as f32)
            .collect()
    })
}

/// Table-driven sine with linear interpolation. Phase is kept in table units.
pub(crate) struct SineOscillator {
    phase: f64,
    phase_inc: f64,
}

impl SineOscillator {
    pub(crate) fn new(sample_rate_hz: f32, tone_freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: f64::from(tone_freq_hz) * TABLE_LEN as f64 / f64::from(sample_rate_hz),
        }
    }

    pub(crate) fn next(&mut self) -> f32 {
        let table = sine_table();
        let idx = self.phase.floor() as usize % TABLE_LEN;
        let frac = (self.phase - self.phase.floor()) as f32;
        let next = (idx + 1) % TABLE_LEN;
        let value = table[idx] * (1.0 - frac) + table[next] * frac;

        self.phase += self.phase_inc;
        let table_len = TABLE_LEN as f64;
        if self.phase >= table_len {
            self.phase %= table_len;
        }

        value
    }

    pub(crate) fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_reference_sine() {
        let mut osc = SineOscillator::new(8000.0, 697.0);
        for i in 0..2000 {
            let expected = (std::f64::consts::TAU * 697.0 * i as f64 / 8000.0).sin() as f32;
            let got = osc.next();
            assert!((got - expected).abs() < 1e-4, "sample {}: {} vs {}", i, got, expected);
        }
    }

    #[test]
    fn reset_restarts_at_zero() {
        let mut osc = SineOscillator::new(8000.0, 1209.0);
        osc.next();
        osc.next();
        osc.reset();
        assert_eq!(osc.next(), 0.0);
    }
}
