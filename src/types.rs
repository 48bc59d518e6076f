use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use crate::error::MeasurementError;
use crate::parsing::format_bytes;

/// Monitoring plugin status, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Process exit code understood by monitoring daemons.
    pub fn exit_code(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which way a measured quantity goes bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LowIsBad,
    HighIsBad,
}

/// A single threshold bound as written on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Bytes(u64),
    Percent(f64),
}

impl Bound {
    pub fn is_percent(&self) -> bool {
        matches!(self, Bound::Percent(_))
    }

    /// Resolve to bytes. Percentages need the measurement's total.
    pub fn resolve(&self, total: Option<u64>) -> Result<u64, MeasurementError> {
        match *self {
            Bound::Bytes(bytes) => Ok(bytes),
            Bound::Percent(percent) => {
                let total = total.ok_or(MeasurementError::NoTotal { percent })?;
                Ok((total as f64 * percent / 100.0).round() as u64)
            }
        }
    }
}

// Bounds of different kinds are incomparable.
impl PartialOrd for Bound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Bound::Bytes(a), Bound::Bytes(b)) => Some(a.cmp(b)),
            (Bound::Percent(a), Bound::Percent(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Bytes(bytes) => f.write_str(&format_bytes(*bytes)),
            Bound::Percent(percent) => write!(f, "{}%", percent),
        }
    }
}

/// A threshold as parsed from the command line, before percentages are
/// resolved against a total.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThresholdSpec {
    pub low: Option<Bound>,
    pub high: Option<Bound>,
}

impl ThresholdSpec {
    pub fn bounds(&self) -> impl Iterator<Item = Bound> {
        self.low.into_iter().chain(self.high)
    }

    pub fn resolve(&self, total: Option<u64>) -> Result<Threshold, MeasurementError> {
        Ok(Threshold {
            low: self.low.map(|b| b.resolve(total)).transpose()?,
            high: self.high.map(|b| b.resolve(total)).transpose()?,
        })
    }
}

/// Warning and critical thresholds as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThresholdSpecPair {
    pub warning: Option<ThresholdSpec>,
    pub critical: Option<ThresholdSpec>,
}

impl ThresholdSpecPair {
    pub fn bounds(&self) -> impl Iterator<Item = Bound> + '_ {
        self.warning
            .iter()
            .chain(self.critical.iter())
            .flat_map(|spec| spec.bounds())
    }

    pub fn resolve(&self, total: Option<u64>) -> Result<ThresholdPair, MeasurementError> {
        Ok(ThresholdPair {
            warning: self.warning.map(|t| t.resolve(total)).transpose()?,
            critical: self.critical.map(|t| t.resolve(total)).transpose()?,
        })
    }
}

/// A resolved threshold in bytes. A value crosses it when it is at or below
/// `low`, or at or above `high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Threshold {
    pub low: Option<u64>,
    pub high: Option<u64>,
}

impl Threshold {
    /// Threshold for a single bound, placed on the bad side of `direction`.
    pub fn single(bound: u64, direction: Direction) -> Self {
        match direction {
            Direction::LowIsBad => Self { low: Some(bound), high: None },
            Direction::HighIsBad => Self { low: None, high: Some(bound) },
        }
    }

    pub fn crossing(&self, value: u64) -> Option<Crossing> {
        if let Some(low) = self.low {
            if value <= low {
                return Some(Crossing::AtOrBelow(low));
            }
        }
        if let Some(high) = self.high {
            if value >= high {
                return Some(Crossing::AtOrAbove(high));
            }
        }
        None
    }

    /// Nagios range notation used in performance data.
    ///
    /// Nagios ranges exclude their endpoints while crossing here is
    /// inclusive, so each bound moves one unit into the safe region.
    pub fn perf_range(&self) -> String {
        let low = self.low.map(|low| low.saturating_add(1));
        let high = self.high.map(|high| high.saturating_sub(1));
        match (low, high) {
            (Some(low), Some(high)) => format!("{}:{}", low, high),
            (Some(low), None) => format!("{}:", low),
            (None, Some(high)) => high.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Which bound of a threshold a value crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    AtOrBelow(u64),
    AtOrAbove(u64),
}

impl Crossing {
    pub fn bound(&self) -> u64 {
        match *self {
            Crossing::AtOrBelow(b) | Crossing::AtOrAbove(b) => b,
        }
    }

    fn relation(&self) -> &'static str {
        match self {
            Crossing::AtOrBelow(_) => "at or below",
            Crossing::AtOrAbove(_) => "at or above",
        }
    }
}

impl fmt::Display for Crossing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.relation())
    }
}

/// Resolved warning and critical thresholds, both optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThresholdPair {
    pub warning: Option<Threshold>,
    pub critical: Option<Threshold>,
}

impl ThresholdPair {
    pub fn new(warning: Option<u64>, critical: Option<u64>, direction: Direction) -> Self {
        Self {
            warning: warning.map(|b| Threshold::single(b, direction)),
            critical: critical.map(|b| Threshold::single(b, direction)),
        }
    }
}

/// One measured quantity, in bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Performance data label.
    pub label: &'static str,
    pub value: u64,
    /// Upper bound of the quantity, when one exists (total memory).
    pub total: Option<u64>,
    /// Human-readable summary of the value.
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub status: Status,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub meminfo_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct MemoryCheckConfig {
    pub meminfo_path: PathBuf,
    pub thresholds: ThresholdSpecPair,
    pub kernel_estimate: bool,
}

#[derive(Debug, Clone)]
pub struct DirSizeCheckConfig {
    pub dir: PathBuf,
    pub thresholds: ThresholdSpecPair,
    pub same_filesystem: bool,
    pub follow_links: bool,
}
