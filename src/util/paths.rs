use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{BackupError, Result};

const LOG_FILE_FORMAT: &str = "duplicity-backup_%Y-%m-%d_%H-%M-%S.txt";

/// Expands a leading `~` to the home directory of the current user.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(PathBuf::from(path)),
    };
    let home = dirs::home_dir()
        .ok_or_else(|| BackupError::message(format!("unable to expand {}: no home directory", path)))?;
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

pub fn log_file_path(log_dir: &Path, started: DateTime<Local>) -> PathBuf {
    log_dir.join(started.format(LOG_FILE_FORMAT).to_string())
}

/// Creates the log directory if needed and opens a fresh run log in it.
pub fn create_log_file(log_dir: &Path, started: DateTime<Local>) -> Result<(PathBuf, File)> {
    fs::create_dir_all(log_dir)
        .map_err(|e| BackupError::message(format!("create {}: {}", log_dir.display(), e)))?;
    let path = log_file_path(log_dir, started);
    let file = File::create(&path).map_err(|e| {
        BackupError::message(format!("unable to open logfile {}: {}", path.display(), e))
    })?;
    Ok((path, file))
}
