use phf::phf_map;
use thiserror::Error;

static KEY_TONES: phf::Map<char, (f32, f32)> = phf_map! {
    '1' => (697.0, 1209.0),
    '2' => (697.0, 1336.0),
    '3' => (697.0, 1477.0),
    '4' => (770.0, 1209.0),
    '5' => (770.0, 1336.0),
    '6' => (770.0, 1477.0),
    '7' => (852.0, 1209.0),
    '8' => (852.0, 1336.0),
    '9' => (852.0, 1477.0),
    '*' => (941.0, 1209.0),
    '0' => (941.0, 1336.0),
    '#' => (941.0, 1477.0),
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToneError {
    #[error("no DTMF tone pair for key {0:?}")]
    UnknownKey(char),
    #[error("level must be in (0, 1], got {0}")]
    InvalidLevel(f32),
}

/// Row and column frequency in Hz for a keypad symbol.
pub fn key_tones(key: char) -> Result<(f32, f32), ToneError> {
    KEY_TONES.get(&key).copied().ok_or(ToneError::UnknownKey(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys() {
        assert_eq!(key_tones('1'), Ok((697.0, 1209.0)));
        assert_eq!(key_tones('0'), Ok((941.0, 1336.0)));
        assert_eq!(key_tones('#'), Ok((941.0, 1477.0)));
    }

    #[test]
    fn fourth_column_is_not_supported() {
        assert_eq!(key_tones('A'), Err(ToneError::UnknownKey('A')));
        assert_eq!(key_tones('x'), Err(ToneError::UnknownKey('x')));
    }

    #[test]
    fn all_twelve_keys_are_distinct() {
        let mut pairs: Vec<(u32, u32)> = "123456789*0#"
            .chars()
            .map(|k| key_tones(k).expect("key"))
            .map(|(r, c)| (r as u32, c as u32))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        assert_eq!(pairs.len(), 12);
    }
}
