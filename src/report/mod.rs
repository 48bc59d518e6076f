use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::types::*;

/// Outcome of one check invocation, ready to print.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub check: &'static str,
    pub status: Status,
    pub exit_code: u8,
    pub message: String,
    pub value: Option<u64>,
    pub total: Option<u64>,
    pub perfdata: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl CheckReport {
    pub fn new(
        check: &'static str,
        evaluation: Evaluation,
        measurement: Option<&Measurement>,
        thresholds: &ThresholdPair,
    ) -> Self {
        let perfdata = measurement.map(|m| Perfdata::new(m, thresholds).to_string());
        Self {
            check,
            status: evaluation.status,
            exit_code: evaluation.status.exit_code(),
            message: evaluation.message,
            value: measurement.map(|m| m.value),
            total: measurement.and_then(|m| m.total),
            perfdata,
            checked_at: Utc::now(),
        }
    }

    /// `STATUS - message | perfdata`
    pub fn render_text(&self) -> String {
        match &self.perfdata {
            Some(perf) => format!("{} - {} | {}", self.status, self.message, perf),
            None => format!("{} - {}", self.status, self.message),
        }
    }

    pub fn render_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serialize check report")
    }
}

/// Performance data in `label=value[UOM];warn;crit;min;max` form.
pub struct Perfdata<'a> {
    measurement: &'a Measurement,
    thresholds: &'a ThresholdPair,
}

impl<'a> Perfdata<'a> {
    pub fn new(measurement: &'a Measurement, thresholds: &'a ThresholdPair) -> Self {
        Self { measurement, thresholds }
    }
}

impl fmt::Display for Perfdata<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = |t: Option<Threshold>| t.map(|t| t.perf_range()).unwrap_or_default();
        write!(
            f,
            "{}={}B;{};{};0;{}",
            self.measurement.label,
            self.measurement.value,
            range(self.thresholds.warning),
            range(self.thresholds.critical),
            self.measurement.total.map(|t| t.to_string()).unwrap_or_default()
        )
    }
}
