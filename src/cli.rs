//! Command-line front end shared by the check binaries.
//!
//! Everything here returns a [`CheckOutput`] instead of printing, so the
//! binaries stay one-liners and the whole path is testable.

use clap::error::ErrorKind;
use clap::{Args, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use crate::check::{run_check, DirSizeCheck, MemoryCheck};
use crate::config::{load_dir_size_config, load_memory_config_with_env, EnvironmentProvider};
use crate::error::ThresholdError;
use crate::report::CheckReport;

/// Exit code for invalid invocations. Monitoring daemons only understand
/// 0-3, so this shares its value with UNKNOWN but is reported differently.
pub const USAGE_EXIT_CODE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct ThresholdArgs {
    /// Warning threshold: a value or a LOW:HIGH range
    #[arg(short = 'w', long = "warning", visible_alias = "warn", value_name = "THRESHOLD")]
    pub warning: Option<String>,

    /// Critical threshold: a value or a LOW:HIGH range
    #[arg(short = 'c', long = "critical", visible_alias = "crit", value_name = "THRESHOLD")]
    pub critical: Option<String>,
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "check-available-mem",
    version,
    about = "A monitoring check that passes or fails based on the amount of available memory \
             on the host.",
    after_help = "Available memory is MemFree + Cached + Buffers from /proc/meminfo \
        (override the file with MEMINFO_PATH).\n\
        Thresholds are sizes (512M, 4G) or percentages of total memory (20%). \
        A single value alerts when available memory is at or below it."
)]
pub struct MemoryArgs {
    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Use the kernel's MemAvailable estimate when it is reported
    #[arg(long)]
    pub kernel_estimate: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "CHECK_OUTPUT_FORMAT")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "check-dir-size",
    version,
    about = "A monitoring check that passes or fails based on the size of the contents of a \
             directory.",
    after_help = "Warning and critical can be a single value (trigger at or above it) or a range \
        LOW:HIGH that triggers at or outside its bounds. Either side of a range may be left \
        empty. Values can have a k, m, g or t suffix (powers of 1024) or no suffix (bytes).\n\
        Bounds are inclusive; perfdata reports them as the adjacent values so that Nagios \
        range semantics alert at the same sizes."
)]
pub struct DirSizeArgs {
    /// The directory to check
    #[arg(short = 'd', long = "dir", value_name = "PATH")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Do not cross filesystem boundaries
    #[arg(long)]
    pub xdev: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    pub follow_links: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "CHECK_OUTPUT_FORMAT")]
    pub format: OutputFormat,
}

/// What a check invocation prints and how it exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutput {
    pub stdout: String,
    pub stderr: Option<String>,
    pub exit_code: u8,
}

impl CheckOutput {
    fn from_report(report: &CheckReport, format: OutputFormat) -> Self {
        let rendered = match format {
            OutputFormat::Text => Ok(report.render_text()),
            OutputFormat::Json => report.render_json(),
        };
        match rendered {
            Ok(stdout) => Self { stdout, stderr: None, exit_code: report.exit_code },
            Err(err) => {
                error!("falling back to text output: {:#}", err);
                Self { stdout: report.render_text(), stderr: None, exit_code: report.exit_code }
            }
        }
    }

    fn usage(reason: &str, detail: Option<String>) -> Self {
        Self {
            stdout: format!("USAGE ERROR - {}", reason),
            stderr: detail,
            exit_code: USAGE_EXIT_CODE,
        }
    }

    fn from_threshold_error(err: &ThresholdError) -> Self {
        Self::usage(&err.to_string(), None)
    }

    fn from_clap_error(err: clap::Error) -> Self {
        let rendered = err.to_string();
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Self {
                stdout: rendered.trim_end().to_string(),
                stderr: None,
                exit_code: 0,
            },
            _ => {
                let reason = clap_reason(&rendered);
                Self::usage(&reason, Some(rendered.trim_end().to_string()))
            }
        }
    }

    /// Print and hand back the process exit code.
    pub fn emit(self) -> ExitCode {
        if let Some(detail) = &self.stderr {
            eprintln!("{}", detail);
        }
        println!("{}", self.stdout);
        ExitCode::from(self.exit_code)
    }
}

/// First line of a clap error. A line ending in ':' introduces a list (for
/// example the missing arguments), so the next item is kept with it.
fn clap_reason(rendered: &str) -> String {
    let mut lines = rendered.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next().unwrap_or("invalid arguments").trim_start_matches("error: ");
    match lines.next() {
        Some(next) if first.ends_with(':') => format!("{} {}", first, next),
        _ => first.to_string(),
    }
}

pub fn run_memory_check<I, T, E>(argv: I, env: &E) -> CheckOutput
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    E: EnvironmentProvider,
{
    let args = match MemoryArgs::try_parse_from(argv) {
        Ok(args) => args,
        Err(err) => return CheckOutput::from_clap_error(err),
    };
    let config = match load_memory_config_with_env(&args, env) {
        Ok(config) => config,
        Err(err) => return CheckOutput::from_threshold_error(&err),
    };

    let report = run_check(&MemoryCheck::new(&config));
    CheckOutput::from_report(&report, args.format)
}

pub fn run_dir_size_check<I, T>(argv: I) -> CheckOutput
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match DirSizeArgs::try_parse_from(argv) {
        Ok(args) => args,
        Err(err) => return CheckOutput::from_clap_error(err),
    };
    let config = match load_dir_size_config(&args) {
        Ok(config) => config,
        Err(err) => return CheckOutput::from_threshold_error(&err),
    };

    let report = run_check(&DirSizeCheck::new(&config));
    CheckOutput::from_report(&report, args.format)
}

/// Logs go to stderr; stdout carries only the status line.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
