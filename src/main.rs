use std::process::ExitCode;

fn main() -> ExitCode {
    duplicity_backup::cli::run()
}
