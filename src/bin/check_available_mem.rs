use std::process::ExitCode;

use resource_checks::cli::{init_tracing, run_memory_check};
use resource_checks::config::SystemEnvironment;

fn main() -> ExitCode {
    init_tracing();
    run_memory_check(std::env::args_os(), &SystemEnvironment).emit()
}
