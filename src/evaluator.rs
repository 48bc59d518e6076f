//! Threshold evaluation shared by every check.
//!
//! Critical is tested before warning, and bounds are inclusive: a value equal
//! to a bound has crossed it.

use crate::error::MeasurementError;
use crate::parsing::format_bytes;
use crate::types::{Crossing, Evaluation, Measurement, Status, ThresholdPair};

/// Classify a value against a threshold pair.
pub fn classify(value: u64, thresholds: &ThresholdPair) -> (Status, Option<Crossing>) {
    if let Some(crossing) = thresholds.critical.and_then(|t| t.crossing(value)) {
        return (Status::Critical, Some(crossing));
    }
    if let Some(crossing) = thresholds.warning.and_then(|t| t.crossing(value)) {
        return (Status::Warning, Some(crossing));
    }
    (Status::Ok, None)
}

/// Evaluate a measurement outcome. A failed measurement is UNKNOWN no matter
/// what the thresholds are.
pub fn evaluate(
    outcome: &Result<Measurement, MeasurementError>,
    thresholds: &ThresholdPair,
) -> Evaluation {
    let measurement = match outcome {
        Ok(m) => m,
        Err(err) => {
            return Evaluation {
                status: Status::Unknown,
                message: err.to_string(),
            }
        }
    };

    let (status, crossing) = classify(measurement.value, thresholds);
    let message = match crossing {
        Some(crossing) => format!(
            "{}, {} {} threshold {}",
            measurement.summary,
            crossing,
            severity_name(status),
            format_bytes(crossing.bound())
        ),
        None => measurement.summary.clone(),
    };

    Evaluation { status, message }
}

fn severity_name(status: Status) -> &'static str {
    match status {
        Status::Critical => "critical",
        _ => "warning",
    }
}
