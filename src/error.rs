use std::path::PathBuf;
use thiserror::Error;

/// Invalid threshold arguments. These are usage errors and are reported
/// before any measurement is attempted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("Invalid value ({value}) for {flag}")]
    InvalidValue { flag: &'static str, value: String },

    #[error("Invalid range ({value}) for {flag}: minimum must be lower than maximum")]
    EmptyRange { flag: &'static str, value: String },

    #[error("Warning maximum ({warning}) must not be greater than critical maximum ({critical})")]
    WarningAboveCritical { warning: String, critical: String },

    #[error("Warning minimum ({warning}) must not be lower than critical minimum ({critical})")]
    WarningBelowCritical { warning: String, critical: String },

    #[error("Percentage and size thresholds cannot be mixed")]
    MixedUnits,

    #[error("Percentage thresholds are not supported by the {check} check")]
    PercentUnsupported { check: &'static str },
}

/// Failure to obtain a measurement. Always maps to the UNKNOWN status.
#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error("unable to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is missing the {counter} counter", .path.display())]
    MissingCounter { path: PathBuf, counter: &'static str },

    #[error("{} reports {counter} in unsupported unit '{unit}'", .path.display())]
    UnsupportedUnit {
        path: PathBuf,
        counter: String,
        unit: String,
    },

    #[error("{} reports a MemTotal of zero", .path.display())]
    ZeroTotal { path: PathBuf },

    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("percentage threshold {percent}% needs a total to resolve against")]
    NoTotal { percent: f64 },
}
