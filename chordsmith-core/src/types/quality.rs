//! Chord vocabulary table
//!
//! Flat, immutable mapping from chord-quality tokens to semitone intervals
//! above the root. Intervals are listed in stacking order (root first), and
//! may exceed an octave for extensions; the resolver reduces them mod 12.

/// Interval table entries: `(token, intervals)`
pub const CHORD_QUALITIES: &[(&str, &[u8])] = &[
    // Triads
    ("", &[0, 4, 7]),
    ("maj", &[0, 4, 7]),
    ("M", &[0, 4, 7]),
    ("m", &[0, 3, 7]),
    ("min", &[0, 3, 7]),
    ("dim", &[0, 3, 6]),
    ("°", &[0, 3, 6]),
    ("aug", &[0, 4, 8]),
    ("+", &[0, 4, 8]),
    ("sus2", &[0, 2, 7]),
    ("sus4", &[0, 5, 7]),
    ("sus", &[0, 5, 7]),
    // Forced single note and power chord
    ("1", &[0]),
    ("5", &[0, 7]),
    // Sixths
    ("6", &[0, 4, 7, 9]),
    ("m6", &[0, 3, 7, 9]),
    ("69", &[0, 4, 7, 9, 14]),
    // Sevenths
    ("7", &[0, 4, 7, 10]),
    ("maj7", &[0, 4, 7, 11]),
    ("M7", &[0, 4, 7, 11]),
    ("^7", &[0, 4, 7, 11]),
    ("m7", &[0, 3, 7, 10]),
    ("min7", &[0, 3, 7, 10]),
    ("mMaj7", &[0, 3, 7, 11]),
    ("m(maj7)", &[0, 3, 7, 11]),
    ("m7b5", &[0, 3, 6, 10]),
    ("ø", &[0, 3, 6, 10]),
    ("ø7", &[0, 3, 6, 10]),
    ("dim7", &[0, 3, 6, 9]),
    ("°7", &[0, 3, 6, 9]),
    ("aug7", &[0, 4, 8, 10]),
    ("7#5", &[0, 4, 8, 10]),
    ("7b5", &[0, 4, 6, 10]),
    ("7sus4", &[0, 5, 7, 10]),
    ("7sus2", &[0, 2, 7, 10]),
    // Added tones
    ("add9", &[0, 4, 7, 14]),
    ("madd9", &[0, 3, 7, 14]),
    ("add11", &[0, 4, 7, 17]),
    // Extensions
    ("9", &[0, 4, 7, 10, 14]),
    ("maj9", &[0, 4, 7, 11, 14]),
    ("M9", &[0, 4, 7, 11, 14]),
    ("m9", &[0, 3, 7, 10, 14]),
    ("7b9", &[0, 4, 7, 10, 13]),
    ("7#9", &[0, 4, 7, 10, 15]),
    ("11", &[0, 4, 7, 10, 14, 17]),
    ("m11", &[0, 3, 7, 10, 14, 17]),
    ("maj11", &[0, 4, 7, 11, 14, 17]),
    ("13", &[0, 4, 7, 10, 14, 21]),
    ("m13", &[0, 3, 7, 10, 14, 21]),
    ("maj13", &[0, 4, 7, 11, 14, 21]),
];

/// Look up the interval list for a quality token (case-sensitive: `M7` and
/// `m7` are different chords)
pub fn intervals_for(quality: &str) -> Option<&'static [u8]> {
    CHORD_QUALITIES
        .iter()
        .find(|(token, _)| *token == quality)
        .map(|(_, intervals)| *intervals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup() {
        assert_eq!(intervals_for(""), Some(&[0u8, 4, 7][..]));
        assert_eq!(intervals_for("m7"), Some(&[0u8, 3, 7, 10][..]));
        assert_eq!(intervals_for("M7"), Some(&[0u8, 4, 7, 11][..]));
        assert_eq!(intervals_for("1"), Some(&[0u8][..]));
        assert_eq!(intervals_for("Xyz123"), None);
    }

    #[test]
    fn test_table_well_formed() {
        let mut seen = HashSet::new();
        for (token, intervals) in CHORD_QUALITIES {
            assert!(seen.insert(*token), "duplicate token {:?}", token);
            assert_eq!(intervals.first(), Some(&0), "{:?} must start at the root", token);
            assert!(
                intervals.windows(2).all(|w| w[0] < w[1]),
                "{:?} intervals must ascend",
                token
            );
        }
    }
}
