//! Exact musical timing
//!
//! Bar lengths are rationals so that `1.5` bars or `3/8` of a bar convert to
//! ticks without rounding. Anything that does not land on a whole tick is
//! rejected by the caller rather than rounded.

use num_rational::Ratio;
use num_traits::{ToPrimitive, Zero};

/// Ticks per quarter note, shared by parser, voicing engine and encoder
pub const TICKS_PER_QUARTER: u32 = 128;

/// Latest tick a progression may reach; the largest MIDI delta time
pub const MAX_TICKS: u32 = 0x0FFF_FFFF;

/// Length measured in bars
pub type Bars = Ratio<i64>;

/// Meter used to convert bars to ticks and written to the MIDI file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    pub numerator: u8,
    /// Note value of one beat; must be a power of two
    pub denominator: u8,
}

impl TimeSignature {
    pub const COMMON: TimeSignature = TimeSignature {
        numerator: 4,
        denominator: 4,
    };

    pub fn new(numerator: u8, denominator: u8) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Valid when the numerator is non-zero and the denominator is a power
    /// of two no larger than a 64th note
    pub fn is_valid(&self) -> bool {
        self.numerator > 0 && self.denominator.is_power_of_two() && self.denominator <= 64
    }

    /// Ticks in one beat of this meter
    pub fn ticks_per_beat(&self) -> u32 {
        TICKS_PER_QUARTER * 4 / self.denominator.max(1) as u32
    }

    /// Ticks in one full bar
    pub fn ticks_per_bar(&self) -> u32 {
        self.ticks_per_beat() * self.numerator as u32
    }

    /// Denominator as the power of two stored in the time-signature meta event
    pub fn denominator_power(&self) -> u8 {
        self.denominator.max(1).trailing_zeros() as u8
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::COMMON
    }
}

/// Helper to create a bar length n/d
#[inline]
pub fn bars(n: i64, d: i64) -> Bars {
    Ratio::new(n, d)
}

/// Convert a bar length to ticks.
///
/// Returns `None` for non-positive lengths, lengths that fall between two
/// ticks, and lengths too long to express in 32 bits.
pub fn bars_to_ticks(length: Bars, meter: TimeSignature) -> Option<u32> {
    if length <= Bars::zero() {
        return None;
    }
    let ticks = length * Ratio::from_integer(meter.ticks_per_bar() as i64);
    if !ticks.is_integer() {
        return None;
    }
    ticks.to_integer().to_u32()
}

/// Convert ticks to seconds at a given tempo (display only)
pub fn ticks_to_seconds(ticks: u32, bpm: u32) -> f64 {
    if bpm == 0 {
        return 0.0;
    }
    ticks as f64 / TICKS_PER_QUARTER as f64 * 60.0 / bpm as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_time() {
        let meter = TimeSignature::COMMON;
        assert_eq!(meter.ticks_per_beat(), 128);
        assert_eq!(meter.ticks_per_bar(), 512);
        assert_eq!(meter.denominator_power(), 2);
    }

    #[test]
    fn test_other_meters() {
        let waltz = TimeSignature::new(3, 4);
        assert_eq!(waltz.ticks_per_bar(), 384);

        let six_eight = TimeSignature::new(6, 8);
        assert_eq!(six_eight.ticks_per_beat(), 64);
        assert_eq!(six_eight.ticks_per_bar(), 384);
        assert_eq!(six_eight.denominator_power(), 3);

        assert!(!TimeSignature::new(4, 3).is_valid());
        assert!(!TimeSignature::new(0, 4).is_valid());
    }

    #[test]
    fn test_bars_to_ticks() {
        let meter = TimeSignature::COMMON;
        assert_eq!(bars_to_ticks(bars(1, 1), meter), Some(512));
        assert_eq!(bars_to_ticks(bars(3, 2), meter), Some(768));
        assert_eq!(bars_to_ticks(bars(3, 16), meter), Some(96));
        assert_eq!(bars_to_ticks(bars(1, 512), meter), Some(1));
    }

    #[test]
    fn test_bars_to_ticks_rejects() {
        let meter = TimeSignature::COMMON;
        assert_eq!(bars_to_ticks(bars(0, 1), meter), None);
        assert_eq!(bars_to_ticks(bars(-1, 2), meter), None);
        // A third of a bar is 170.67 ticks
        assert_eq!(bars_to_ticks(bars(1, 3), meter), None);
    }

    #[test]
    fn test_ticks_to_seconds() {
        // One bar of 4/4 at 120 BPM is two seconds
        assert!((ticks_to_seconds(512, 120) - 2.0).abs() < 1e-9);
        assert_eq!(ticks_to_seconds(512, 0), 0.0);
    }
}
