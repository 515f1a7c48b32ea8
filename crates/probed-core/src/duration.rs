// ABOUTME: Parser for unit-suffixed duration strings such as "1s", "250ms" or "1h30m".
// ABOUTME: Accepts decimal magnitudes and the ns/us/µs/ms/s/m/h units; rejects anything else.

use std::time::Duration;

use thiserror::Error;

/// Largest span representable, in nanoseconds (a signed 64-bit count).
const MAX_NANOS: u128 = i64::MAX as u128;

/// Fraction digits beyond this are dropped; they are below nanosecond precision for every unit.
const MAX_FRACTION_DIGITS: u32 = 20;

/// Errors produced while parsing a duration string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("invalid duration \"{0}\"")]
    Invalid(String),

    #[error("missing unit in duration \"{0}\"")]
    MissingUnit(String),

    #[error("unknown unit \"{unit}\" in duration \"{input}\"")]
    UnknownUnit { unit: String, input: String },

    #[error("duration \"{0}\" is out of range")]
    Overflow(String),
}

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 60 * 60 * 1_000_000_000,
        _ => return None,
    };
    Some(nanos)
}

/// Parse a duration string into a [`Duration`].
///
/// The grammar is an optional sign followed by one or more `<number><unit>`
/// segments, e.g. `"300ms"`, `"-1.5h"` or `"2h45m"`. A number is `digits`,
/// `digits.`, `.digits` or `digits.digits`. The bare string `"0"` needs no unit.
///
/// Negative spans parse successfully and clamp to [`Duration::ZERO`], since a
/// wait of negative length completes immediately.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let first = rest.as_bytes()[0];
        if !(first == b'.' || first.is_ascii_digit()) {
            return Err(invalid());
        }

        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let whole: u128 = if int_len == 0 {
            0
        } else {
            rest[..int_len]
                .parse()
                .map_err(|_| DurationError::Overflow(input.to_string()))?
        };
        rest = &rest[int_len..];

        let mut fraction: u128 = 0;
        let mut scale: u128 = 1;
        let mut frac_len = 0;
        if let Some(after_dot) = rest.strip_prefix('.') {
            frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            for digit in after_dot[..frac_len].bytes().take(MAX_FRACTION_DIGITS as usize) {
                fraction = fraction * 10 + u128::from(digit - b'0');
                scale *= 10;
            }
            rest = &after_dot[frac_len..];
        }
        if int_len == 0 && frac_len == 0 {
            return Err(invalid());
        }

        let unit_len = rest
            .char_indices()
            .find(|(_, c)| *c == '.' || c.is_ascii_digit())
            .map_or(rest.len(), |(idx, _)| idx);
        if unit_len == 0 {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let unit = &rest[..unit_len];
        let per_unit = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;
        rest = &rest[unit_len..];

        let segment = whole
            .checked_mul(per_unit)
            .and_then(|nanos| nanos.checked_add(fraction * per_unit / scale))
            .filter(|nanos| *nanos <= MAX_NANOS)
            .ok_or_else(|| DurationError::Overflow(input.to_string()))?;
        total += segment;
        if total > MAX_NANOS {
            return Err(DurationError::Overflow(input.to_string()));
        }
    }

    if negative {
        return Ok(Duration::ZERO);
    }
    // MAX_NANOS fits in u64
    Ok(Duration::from_nanos(total as u64))
}
