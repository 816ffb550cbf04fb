//! Key number to pitch helpers.
//!
//! The note player counts octaves from key 0, so key 9 is "A0" at 13.75 Hz and
//! key 69 is "A5" at 440 Hz. Frequencies are 12-tone equal temperament.

const NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Frequency of key 9.
pub const BASE_HZ: f64 = 440.0 / 32.0;

/// `(440 / 32) * 2^((key - 9) / 12)`
pub fn key_to_hz(key: u8) -> f64 {
    let steps = i32::from(key) - 9;
    // Whole octaves via powi keep doublings exact.
    let octaves = steps.div_euclid(12);
    let semis = steps.rem_euclid(12);
    BASE_HZ * 2f64.powi(octaves) * 2f64.powf(f64::from(semis) / 12.0)
}

pub fn octave(key: u8) -> u8 {
    key / 12
}

pub fn pitch_class(key: u8) -> u8 {
    key % 12
}

pub fn note_name(key: u8) -> String {
    format!("{}{}", NAMES[usize::from(pitch_class(key))], octave(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors() {
        assert_eq!(key_to_hz(9), 13.75);
        assert_eq!(key_to_hz(69), 440.0);
        assert!((key_to_hz(60) - 261.6256).abs() < 1e-3);
        assert!((key_to_hz(0) - 8.1758).abs() < 1e-3);
    }

    #[test]
    fn twelve_keys_up_doubles() {
        for key in 0..=115u8 {
            assert_eq!(key_to_hz(key + 12), key_to_hz(key) * 2.0, "key {key}");
        }
    }

    #[test]
    fn names() {
        assert_eq!(note_name(69), "A5");
        assert_eq!(note_name(9), "A0");
        assert_eq!(note_name(61), "C#5");
        assert_eq!(octave(127), 10);
        assert_eq!(pitch_class(127), 7);
    }
}
