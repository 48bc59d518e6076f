// Public modules
pub mod types;
pub mod error;
pub mod config;
pub mod parsing;
pub mod evaluator;
pub mod metrics;
pub mod check;
pub mod report;
pub mod cli;

// Re-export commonly used items
pub use types::*;
pub use error::{MeasurementError, ThresholdError};
pub use config::{
    load_runtime_config_with_env, EnvironmentProvider, MockEnvironment, SystemEnvironment,
};
pub use parsing::{parse_size_to_bytes, parse_percent, parse_threshold, format_bytes, percent_of};
pub use evaluator::{classify, evaluate};
pub use metrics::*;
pub use check::{run_check, Check, DirSizeCheck, MemoryCheck};
pub use report::{CheckReport, Perfdata};
pub use cli::{run_dir_size_check, run_memory_check, CheckOutput, OutputFormat};
