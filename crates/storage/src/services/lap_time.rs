//! Conversion between human-entered lap times and integer milliseconds.
//!
//! Accepted inputs, decided by which separator is present:
//!
//! - `M:SS[.fff]` (`"1:23.456"`, `"01:23"`)
//! - `S.fff` (`"83.456"`)
//! - `S` (`"83"`), whole seconds
//!
//! The canonical display form is `M:SS.mmm`, which always parses back to
//! the same number of milliseconds.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;

const FRACTION_DIGITS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LapTimeError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),
}

fn invalid(reason: impl Into<String>) -> LapTimeError {
    LapTimeError::InvalidFormat(reason.into())
}

/// Parse a lap time entered by a rider into milliseconds.
pub fn parse_lap_time(text: &str) -> Result<i64, LapTimeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(invalid("empty time"));
    }

    if text.contains(':') {
        parse_minutes_seconds(text)
    } else if text.contains('.') {
        parse_decimal_seconds(text)
    } else {
        let seconds = parse_component(text, "seconds")?;
        seconds
            .checked_mul(MS_PER_SECOND)
            .ok_or_else(|| invalid("time out of range"))
    }
}

/// Render milliseconds as `M:SS.mmm`. Negative values render as zero.
pub fn format_lap_time(ms: i64) -> String {
    let ms = ms.max(0);
    let minutes = ms / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;
    format!("{}:{:02}.{:03}", minutes, seconds, millis)
}

fn parse_minutes_seconds(text: &str) -> Result<i64, LapTimeError> {
    let mut parts = text.split(':');
    let (minutes, rest) = match (parts.next(), parts.next(), parts.next()) {
        (Some(minutes), Some(rest), None) => (minutes, rest),
        _ => return Err(invalid("expected a single ':' between minutes and seconds")),
    };

    let minutes = parse_component(minutes, "minutes")?;
    let (seconds, millis) = match split_fraction(rest)? {
        Some((seconds, fraction)) => (parse_component(seconds, "seconds")?, fraction_to_millis(fraction)?),
        None => (parse_component(rest, "seconds")?, 0),
    };

    if seconds >= 60 {
        return Err(invalid("seconds must be below 60"));
    }

    minutes
        .checked_mul(MS_PER_MINUTE)
        .and_then(|total| total.checked_add(seconds * MS_PER_SECOND + millis))
        .ok_or_else(|| invalid("time out of range"))
}

fn parse_decimal_seconds(text: &str) -> Result<i64, LapTimeError> {
    let (seconds, fraction) =
        split_fraction(text)?.ok_or_else(|| invalid("expected seconds.fraction"))?;

    let seconds = parse_component(seconds, "seconds")?;
    let millis = fraction_to_millis(fraction)?;

    seconds
        .checked_mul(MS_PER_SECOND)
        .and_then(|total| total.checked_add(millis))
        .ok_or_else(|| invalid("time out of range"))
}

/// Split `seconds.fraction`; a dot needs digits on both sides.
fn split_fraction(text: &str) -> Result<Option<(&str, &str)>, LapTimeError> {
    let Some((seconds, fraction)) = text.split_once('.') else {
        return Ok(None);
    };

    if seconds.trim().is_empty() {
        return Err(invalid("missing seconds before '.'"));
    }
    if fraction.is_empty() {
        return Err(invalid("missing digits after '.'"));
    }

    Ok(Some((seconds, fraction)))
}

fn parse_component(text: &str, name: &str) -> Result<i64, LapTimeError> {
    let text = text.trim();
    if text.starts_with('-') {
        return Err(invalid(format!("{} cannot be negative", name)));
    }

    text.parse::<i64>()
        .map_err(|_| invalid(format!("{} is not a number: '{}'", name, text)))
}

/// Right-pad or truncate a decimal fraction to exactly three digits.
fn fraction_to_millis(fraction: &str) -> Result<i64, LapTimeError> {
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(format!("fraction is not a number: '{}'", fraction)));
    }

    let digits: String = fraction
        .chars()
        .chain(std::iter::repeat('0'))
        .take(FRACTION_DIGITS)
        .collect();

    digits
        .parse::<i64>()
        .map_err(|_| invalid(format!("fraction is not a number: '{}'", fraction)))
}

/// A validated, non-negative lap time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LapTime(i64);

impl LapTime {
    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

impl FromStr for LapTime {
    type Err = LapTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_lap_time(s).map(Self)
    }
}

impl fmt::Display for LapTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_lap_time(self.0))
    }
}
