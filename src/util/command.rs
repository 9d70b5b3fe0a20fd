use std::path::{Path, PathBuf};

use crate::error::{BackupError, Result};
use crate::types::RunMode;

pub const DUPLICITY_BINARY: &str = "duplicity";

/// One-line rendering of a command for debug output.
pub fn describe_command(program: &Path, args: &[String]) -> String {
    let mut out = program.to_string_lossy().to_string();
    for arg in args {
        out.push(' ');
        out.push_str(arg);
    }
    out
}

/// Locates the duplicity binary in `$PATH`.
pub fn find_duplicity() -> Result<PathBuf> {
    which::which(DUPLICITY_BINARY).map_err(|_| {
        BackupError::message("did not find duplicity binary in $PATH, please install it")
    })
}

/// Adds the flags the wrapper always layers over a generated command.
pub fn wrapper_args(args: Vec<String>, run_mode: RunMode) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len() + 2);
    if run_mode.dry_run {
        out.push("--dry-run".to_string());
    }
    // keep duplicity talking to us
    out.push("-v3".to_string());
    out.extend(args);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_joins_program_and_args() {
        let args = vec!["-v3".to_string(), "full".to_string()];
        assert_eq!(
            describe_command(Path::new("/usr/bin/duplicity"), &args),
            "/usr/bin/duplicity -v3 full"
        );
    }

    #[test]
    fn wrapper_args_prefix() {
        let args = vec!["full".to_string()];
        assert_eq!(wrapper_args(args.clone(), RunMode::default()), vec!["-v3", "full"]);
        let dry = RunMode {
            dry_run: true,
            debug: false,
        };
        assert_eq!(wrapper_args(args, dry), vec!["--dry-run", "-v3", "full"]);
    }
}
