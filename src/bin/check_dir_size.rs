use std::process::ExitCode;

use resource_checks::cli::{init_tracing, run_dir_size_check};

fn main() -> ExitCode {
    init_tracing();
    run_dir_size_check(std::env::args_os()).emit()
}
