//! Compact duration strings.
//!
//! `--after` takes durations such as `1h`, `1h30m`, `90s`, `1.5h` or
//! `250ms`. The detached removal process receives its delay in the same
//! notation, so [`format_duration`] always produces a string that
//! [`parse_duration`] reads back to the same value.

use std::time::Duration;

use thiserror::Error;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Errors produced while parsing a duration string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationError {
    /// The string was empty.
    #[error("empty duration")]
    Empty,

    /// A number was expected but not found.
    #[error("invalid duration '{0}': expected a number")]
    MissingNumber(String),

    /// A number had no unit after it.
    #[error("invalid duration '{0}': missing unit (use ns, us, ms, s, m or h)")]
    MissingUnit(String),

    /// The unit is not recognized.
    #[error("invalid duration '{input}': unknown unit '{unit}'")]
    UnknownUnit {
        /// The full input.
        input: String,
        /// The unrecognized unit.
        unit: String,
    },

    /// Negative durations cannot be waited out.
    #[error("invalid duration '{0}': must not be negative")]
    Negative(String),

    /// The value does not fit in a duration.
    #[error("invalid duration '{0}': out of range")]
    Overflow(String),
}

/// Parse a compact duration string.
pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ParseDurationError::Empty);
    }

    let s = match s.strip_prefix('-') {
        Some(rest) if rest.trim_start_matches(['0', '.']).chars().all(char::is_alphabetic) => {
            // "-0s" is still zero
            rest
        }
        Some(_) => return Err(ParseDurationError::Negative(input.to_string())),
        None => s.strip_prefix('+').unwrap_or(s),
    };

    if s.is_empty() {
        return Err(ParseDurationError::MissingNumber(input.to_string()));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total: u128 = 0;
    let mut rest = s;

    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let int_part = &rest[..int_len];
        rest = &rest[int_len..];

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            frac_part = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseDurationError::MissingNumber(input.to_string()));
        }

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        if unit.is_empty() {
            return Err(ParseDurationError::MissingUnit(input.to_string()));
        }

        let scale = unit_nanos(unit).ok_or_else(|| ParseDurationError::UnknownUnit {
            input: input.to_string(),
            unit: unit.to_string(),
        })?;

        let overflow = || ParseDurationError::Overflow(input.to_string());

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;

        if !frac_part.is_empty() {
            // Digits beyond nanosecond precision cannot contribute
            let digits = &frac_part[..frac_part.len().min(18)];
            let frac: u128 = digits.parse().map_err(|_| overflow())?;
            let denom = 10u128.pow(digits.len() as u32);
            nanos = nanos
                .checked_add(frac * scale / denom)
                .ok_or_else(overflow)?;
        }

        total = total.checked_add(nanos).ok_or_else(overflow)?;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC)
        .map_err(|_| ParseDurationError::Overflow(input.to_string()))?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

/// Format a duration in the compact notation, e.g. `1h0m0s` or `1.5s`.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < NANOS_PER_SEC {
        return match nanos {
            n if n < 1_000 => format!("{n}ns"),
            n if n < 1_000_000 => with_fraction(n, 1_000, 3, "us"),
            n => with_fraction(n, 1_000_000, 6, "ms"),
        };
    }

    let secs = nanos / NANOS_PER_SEC;
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    let sub_minute = (secs % 60) * NANOS_PER_SEC + nanos % NANOS_PER_SEC;
    out.push_str(&with_fraction(sub_minute, NANOS_PER_SEC, 9, "s"));
    out
}

/// Render `value / scale` with trailing fractional zeros trimmed.
fn with_fraction(value: u128, scale: u128, digits: usize, unit: &str) -> String {
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return format!("{whole}{unit}");
    }
    let frac = format!("{frac:0digits$}");
    format!("{whole}.{}{unit}", frac.trim_end_matches('0'))
}

fn unit_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3600 * NANOS_PER_SEC,
        _ => return None,
    })
}
