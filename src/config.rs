use std::collections::HashMap;
use std::path::PathBuf;

use crate::cli::{DirSizeArgs, MemoryArgs, ThresholdArgs};
use crate::error::ThresholdError;
use crate::parsing::parse_threshold;
use crate::types::{
    Direction, DirSizeCheckConfig, MemoryCheckConfig, RuntimeConfig, ThresholdSpecPair,
};

pub const DEFAULT_MEMINFO_PATH: &str = "/proc/meminfo";

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_runtime_config_with_env<E: EnvironmentProvider>(env: &E) -> RuntimeConfig {
    let meminfo_path = env
        .get_var("MEMINFO_PATH")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MEMINFO_PATH));

    RuntimeConfig { meminfo_path }
}

/// Parse `--warning`/`--critical` and check that critical is the more severe.
pub fn parse_threshold_args(
    args: &ThresholdArgs,
    direction: Direction,
) -> Result<ThresholdSpecPair, ThresholdError> {
    let pair = parse_threshold_pair(args, direction)?;
    validate_threshold_pair(&pair)?;
    Ok(pair)
}

fn parse_threshold_pair(
    args: &ThresholdArgs,
    direction: Direction,
) -> Result<ThresholdSpecPair, ThresholdError> {
    Ok(ThresholdSpecPair {
        warning: args
            .warning
            .as_deref()
            .map(|raw| parse_threshold("--warning", raw, direction))
            .transpose()?,
        critical: args
            .critical
            .as_deref()
            .map(|raw| parse_threshold("--critical", raw, direction))
            .transpose()?,
    })
}

pub fn validate_threshold_pair(pair: &ThresholdSpecPair) -> Result<(), ThresholdError> {
    let has_percent = pair.bounds().any(|b| b.is_percent());
    let has_size = pair.bounds().any(|b| !b.is_percent());
    if has_percent && has_size {
        return Err(ThresholdError::MixedUnits);
    }

    let (warning, critical) = match (&pair.warning, &pair.critical) {
        (Some(w), Some(c)) => (w, c),
        _ => return Ok(()),
    };

    if let (Some(w), Some(c)) = (warning.high, critical.high) {
        if w > c {
            return Err(ThresholdError::WarningAboveCritical {
                warning: w.to_string(),
                critical: c.to_string(),
            });
        }
    }
    if let (Some(w), Some(c)) = (warning.low, critical.low) {
        if w < c {
            return Err(ThresholdError::WarningBelowCritical {
                warning: w.to_string(),
                critical: c.to_string(),
            });
        }
    }
    Ok(())
}

pub fn load_memory_config_with_env<E: EnvironmentProvider>(
    args: &MemoryArgs,
    env: &E,
) -> Result<MemoryCheckConfig, ThresholdError> {
    let thresholds = parse_threshold_args(&args.thresholds, Direction::LowIsBad)?;
    let runtime = load_runtime_config_with_env(env);

    Ok(MemoryCheckConfig {
        meminfo_path: runtime.meminfo_path,
        thresholds,
        kernel_estimate: args.kernel_estimate,
    })
}

pub fn load_dir_size_config(args: &DirSizeArgs) -> Result<DirSizeCheckConfig, ThresholdError> {
    // Percentages are rejected outright, before any unit mixing is reported.
    let thresholds = parse_threshold_pair(&args.thresholds, Direction::HighIsBad)?;
    if thresholds.bounds().any(|b| b.is_percent()) {
        return Err(ThresholdError::PercentUnsupported {
            check: "directory size",
        });
    }
    validate_threshold_pair(&thresholds)?;

    Ok(DirSizeCheckConfig {
        dir: args.dir.clone(),
        thresholds,
        same_filesystem: args.xdev,
        follow_links: args.follow_links,
    })
}
