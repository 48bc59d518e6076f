use tracing::{info, warn};

use crate::error::MeasurementError;
use crate::evaluator::evaluate;
use crate::metrics;
use crate::parsing::{format_bytes, percent_of};
use crate::report::CheckReport;
use crate::types::*;

/// A single monitoring check: one measurement and the thresholds to judge it by.
pub trait Check {
    /// Stable identifier, used in JSON output.
    fn name(&self) -> &'static str;

    fn measure(&self) -> Result<Measurement, MeasurementError>;

    /// Thresholds in the measurement's unit. Percentages are resolved against
    /// the measurement's total here.
    fn thresholds(&self, measurement: &Measurement) -> Result<ThresholdPair, MeasurementError>;
}

/// Measure, evaluate and build the report.
pub fn run_check<C: Check + ?Sized>(check: &C) -> CheckReport {
    let measured = check.measure().and_then(|m| {
        let thresholds = check.thresholds(&m)?;
        Ok((m, thresholds))
    });

    let (outcome, thresholds) = match measured {
        Ok((m, thresholds)) => (Ok(m), thresholds),
        Err(err) => {
            warn!("{} measurement failed: {}", check.name(), err);
            (Err(err), ThresholdPair::default())
        }
    };

    let evaluation = evaluate(&outcome, &thresholds);
    info!("{}: {}", check.name(), evaluation.status);
    CheckReport::new(check.name(), evaluation, outcome.as_ref().ok(), &thresholds)
}

/// Available memory, where low is bad.
pub struct MemoryCheck<'a> {
    config: &'a MemoryCheckConfig,
}

impl<'a> MemoryCheck<'a> {
    pub fn new(config: &'a MemoryCheckConfig) -> Self {
        Self { config }
    }
}

impl Check for MemoryCheck<'_> {
    fn name(&self) -> &'static str {
        "available_memory"
    }

    fn measure(&self) -> Result<Measurement, MeasurementError> {
        let info = metrics::read_meminfo(&self.config.meminfo_path)?;
        let available = info.available_with(self.config.kernel_estimate);
        let percent = percent_of(available, info.total).unwrap_or(0.0);

        Ok(Measurement {
            label: "available",
            value: available,
            total: Some(info.total),
            summary: format!(
                "Mem: {} total, {} available ({:.2}%)",
                format_bytes(info.total),
                format_bytes(available),
                percent
            ),
        })
    }

    fn thresholds(&self, measurement: &Measurement) -> Result<ThresholdPair, MeasurementError> {
        self.config.thresholds.resolve(measurement.total)
    }
}

/// Size of a directory tree, where high is bad.
pub struct DirSizeCheck<'a> {
    config: &'a DirSizeCheckConfig,
}

impl<'a> DirSizeCheck<'a> {
    pub fn new(config: &'a DirSizeCheckConfig) -> Self {
        Self { config }
    }
}

impl Check for DirSizeCheck<'_> {
    fn name(&self) -> &'static str {
        "directory_size"
    }

    fn measure(&self) -> Result<Measurement, MeasurementError> {
        let options = metrics::WalkOptions {
            same_filesystem: self.config.same_filesystem,
            follow_links: self.config.follow_links,
        };
        let usage = metrics::measure_dir_size(&self.config.dir, options)?;

        let mut summary = format!(
            "{} size is {}",
            self.config.dir.display(),
            format_bytes(usage.bytes)
        );
        if let Some(suffix) = unreadable_suffix(usage.unreadable) {
            summary.push_str(&suffix);
        }

        Ok(Measurement {
            label: "size",
            value: usage.bytes,
            total: None,
            summary,
        })
    }

    fn thresholds(&self, _measurement: &Measurement) -> Result<ThresholdPair, MeasurementError> {
        self.config.thresholds.resolve(None)
    }
}

/// Appended to the size summary when part of the tree was skipped.
fn unreadable_suffix(count: u64) -> Option<String> {
    match count {
        0 => None,
        1 => Some(", 1 entry unreadable".to_string()),
        n => Some(format!(", {} entries unreadable", n)),
    }
}
