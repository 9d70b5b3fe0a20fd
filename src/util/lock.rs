use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::error::{BackupError, Result};

/// Removes the lockfile when the run ends.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = unlock_file(&self.path);
    }
}

/// Takes the pid lockfile at `path`, replacing it when its owner is gone.
pub fn acquire_lock(path: &Path) -> Result<LockGuard> {
    match lock_file(path) {
        Ok(true) => Ok(LockGuard {
            path: path.to_path_buf(),
        }),
        Ok(false) => Err(BackupError::Lock(format!(
            "{}: another run is in progress",
            path.display()
        ))),
        Err(e) => Err(BackupError::Lock(format!("{}: {}", path.display(), e))),
    }
}

/// What an existing lockfile says about its owner.
#[derive(Debug, PartialEq, Eq)]
enum Holder {
    Alive,
    Stale,
}

fn lock_file(path: &Path) -> io::Result<bool> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let pid = std::process::id();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staged = dir.join(format!(".{}.{}.tmp", name, pid));
    fs::write(&staged, format!("{}\n", pid))?;
    let locked = link_staged(&staged, path);
    let _ = fs::remove_file(&staged);
    locked
}

/// Publishes the fully written `staged` file at `path`; the link either
/// appears with the pid in it or not at all.
fn link_staged(staged: &Path, path: &Path) -> io::Result<bool> {
    for _ in 0..3 {
        match fs::hard_link(staged, path) {
            Ok(()) => return Ok(true),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                match inspect(path) {
                    Ok(Holder::Alive) => return Ok(false),
                    Ok(Holder::Stale) => {}
                    Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                    Err(err) => return Err(err),
                }
                match fs::remove_file(path) {
                    Ok(()) => continue,
                    Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                    Err(err) => return Err(err),
                }
            }
            Err(err) => return Err(err),
        }
    }
    Ok(false)
}

fn inspect(path: &Path) -> io::Result<Holder> {
    let text = fs::read_to_string(path)?;
    let text = text.trim();
    // an empty file belongs to a writer that has not finished yet
    if text.is_empty() {
        return Ok(Holder::Alive);
    }
    match text.parse::<u32>() {
        Ok(pid) if process_alive(pid) => Ok(Holder::Alive),
        _ => Ok(Holder::Stale),
    }
}

fn unlock_file(path: &Path) -> io::Result<()> {
    let pid = fs::read_to_string(path).ok();
    if let Some(pid) = pid {
        let pid = pid.trim();
        if !pid.is_empty() && pid == std::process::id().to_string() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}

fn process_alive(pid: u32) -> bool {
    let pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system.process(pid).is_some()
}
