use crate::error::ThresholdError;
use crate::types::{Bound, Direction, ThresholdSpec};

pub const KIBIBYTE: u64 = 1024;
pub const MEBIBYTE: u64 = 1024 * 1024;
pub const GIBIBYTE: u64 = 1024 * 1024 * 1024;
pub const TEBIBYTE: u64 = 1024_u64.pow(4);

pub fn parse_size_to_bytes(q: &str) -> Option<u64> {
    let q = q.trim();
    if q.is_empty() {
        return None;
    }

    const UNITS: &[(char, u64)] = &[
        ('k', KIBIBYTE),
        ('K', KIBIBYTE),
        ('m', MEBIBYTE),
        ('M', MEBIBYTE),
        ('g', GIBIBYTE),
        ('G', GIBIBYTE),
        ('t', TEBIBYTE),
        ('T', TEBIBYTE),
    ];

    for (suf, mul) in UNITS {
        if let Some(stripped) = q.strip_suffix(*suf) {
            if !is_decimal(stripped) {
                return None;
            }
            let v = stripped.parse::<f64>().ok()?;
            let bytes = (v * (*mul as f64)).round();
            if bytes >= u64::MAX as f64 {
                return None;
            }
            return Some(bytes as u64);
        }
    }
    // plain bytes must be whole
    if !q.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    q.parse::<u64>().ok()
}

/// Digits with at most one `.` between digits. No sign or exponent.
fn is_decimal(q: &str) -> bool {
    let mut parts = q.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match parts.next() {
        Some(frac) => digits(whole) && digits(frac),
        None => digits(whole),
    }
}

pub fn parse_percent(q: &str) -> Option<f64> {
    let stripped = q.trim().strip_suffix('%')?.trim();
    if !is_decimal(stripped) {
        return None;
    }
    let v = stripped.parse::<f64>().ok()?;
    if v.is_finite() && (0.0..=100.0).contains(&v) {
        Some(v)
    } else {
        None
    }
}

pub fn parse_bound(q: &str) -> Option<Bound> {
    if q.trim().ends_with('%') {
        parse_percent(q).map(Bound::Percent)
    } else {
        parse_size_to_bytes(q).map(Bound::Bytes)
    }
}

/// Parse a threshold argument: `V`, `LOW:HIGH`, `LOW:` or `:HIGH`.
///
/// A bare `V` lands on the bad side of `direction`.
pub fn parse_threshold(
    flag: &'static str,
    raw: &str,
    direction: Direction,
) -> Result<ThresholdSpec, ThresholdError> {
    let invalid = || ThresholdError::InvalidValue {
        flag,
        value: raw.to_string(),
    };

    let parts: Vec<&str> = raw.trim().split(':').collect();
    let spec = match parts.as_slice() {
        [single] => {
            let bound = parse_bound(single).ok_or_else(invalid)?;
            match direction {
                Direction::LowIsBad => ThresholdSpec { low: Some(bound), high: None },
                Direction::HighIsBad => ThresholdSpec { low: None, high: Some(bound) },
            }
        }
        [low, high] => {
            let low = parse_optional_bound(low).ok_or_else(invalid)?;
            let high = parse_optional_bound(high).ok_or_else(invalid)?;
            if low.is_none() && high.is_none() {
                return Err(invalid());
            }
            ThresholdSpec { low, high }
        }
        _ => return Err(invalid()),
    };

    if let (Some(low), Some(high)) = (spec.low, spec.high) {
        match low.partial_cmp(&high) {
            None => return Err(ThresholdError::MixedUnits),
            Some(std::cmp::Ordering::Less) => {}
            Some(_) => {
                return Err(ThresholdError::EmptyRange {
                    flag,
                    value: raw.to_string(),
                })
            }
        }
    }

    Ok(spec)
}

// Outer None: unparsable. Inner None: side left empty.
fn parse_optional_bound(q: &str) -> Option<Option<Bound>> {
    if q.trim().is_empty() {
        Some(None)
    } else {
        parse_bound(q).map(Some)
    }
}

pub fn format_bytes(number: u64) -> String {
    if number >= GIBIBYTE {
        format!("{:.3}GB", number as f64 / GIBIBYTE as f64)
    } else if number >= MEBIBYTE {
        format!("{:.3}MB", number as f64 / MEBIBYTE as f64)
    } else if number >= KIBIBYTE {
        format!("{:.3}KB", number as f64 / KIBIBYTE as f64)
    } else {
        format!("{} bytes", number)
    }
}

pub fn percent_of(part: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(part as f64 / total as f64 * 100.0)
}
