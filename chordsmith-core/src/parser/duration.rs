//! Duration codes
//!
//! A duration is one of:
//! - a positive decimal bar count (`1`, `0.5`, `1.5`, `.25`)
//! - a named code from [`NAMED_DURATIONS`], a fixed fraction of one bar
//! - `T<n>`, an absolute tick count used verbatim

use crate::parser::error::DurationError;
use crate::types::time::{bars, bars_to_ticks, Bars, TimeSignature, MAX_TICKS};
use num_traits::Zero;

/// Named codes and their length in bars
pub const NAMED_DURATIONS: &[(&str, (i64, i64))] = &[
    ("4w", (4, 1)),
    ("2w", (2, 1)),
    ("w", (1, 1)),
    ("dh", (3, 4)),
    ("h", (1, 2)),
    ("dq", (3, 8)),
    ("q", (1, 4)),
    ("de", (3, 16)),
    ("e", (1, 8)),
    ("s", (1, 16)),
];

/// Longest accepted bar count
const MAX_BARS: i64 = 4096;

/// Digits accepted in a decimal bar count
const MAX_DECIMAL_DIGITS: usize = 9;

/// Resolve a duration string to ticks in the given meter
pub fn parse_duration(text: &str, meter: TimeSignature) -> Result<u32, DurationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DurationError::Empty);
    }

    if let Some(ticks) = text.strip_prefix('T').or_else(|| text.strip_prefix('t')) {
        return parse_ticks(text, ticks);
    }

    let length = match NAMED_DURATIONS.iter().find(|(code, _)| *code == text) {
        Some((_, (n, d))) => bars(*n, *d),
        None => parse_decimal_bars(text)?,
    };
    if length > Bars::from_integer(MAX_BARS) {
        return Err(DurationError::TooLong);
    }
    let ticks = bars_to_ticks(length, meter)
        .ok_or_else(|| DurationError::FractionalTicks(text.to_string()))?;
    within_limit(ticks)
}

fn parse_ticks(text: &str, digits: &str) -> Result<u32, DurationError> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(DurationError::Unrecognized(text.to_string()));
    }
    let ticks: u32 = digits.parse().map_err(|_| DurationError::TooLong)?;
    if ticks == 0 {
        return Err(DurationError::NotPositive);
    }
    within_limit(ticks)
}

fn within_limit(ticks: u32) -> Result<u32, DurationError> {
    if ticks > MAX_TICKS {
        return Err(DurationError::TooLong);
    }
    Ok(ticks)
}

/// Parse `12`, `1.5` or `.25` exactly as a rational number of bars
fn parse_decimal_bars(text: &str) -> Result<Bars, DurationError> {
    let unrecognized = || DurationError::Unrecognized(text.to_string());

    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (text, ""),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !all_digits(frac) || (whole.is_empty() && frac.is_empty()) {
        return Err(unrecognized());
    }
    if whole.len() + frac.len() > MAX_DECIMAL_DIGITS {
        return Err(DurationError::TooLong);
    }

    let digits = format!("{}{}", whole, frac);
    let numer: i64 = digits.parse().map_err(|_| unrecognized())?;
    let denom = 10i64.pow(frac.len() as u32);
    let length = bars(numer, denom);
    if length.is_zero() {
        return Err(DurationError::NotPositive);
    }
    Ok(length)
}
