//! End-to-end runs of the `duplicity-backup` binary against a fake
//! `duplicity` placed first in `$PATH`.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_duplicity-backup");

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let bin = dir.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let fake = bin.join("duplicity");
        let script = format!(
            "#!/bin/sh\necho \"$*\" >> {}\necho 'A data/new.txt'\necho 'Comparing data'\n",
            dir.path().join("calls").display()
        );
        fs::write(&fake, script).unwrap();
        fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();

        let config = format!(
            "root: /data\ndest: file:///backup\nlogdir: {}\ncleanup:\n  type: none\n",
            dir.path().join("logs").display()
        );
        fs::write(dir.path().join("config.yaml"), config).unwrap();
        Fixture { dir }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).display().to_string()
    }

    fn run(&self, args: &[&str]) -> (i32, String) {
        let search_path = format!(
            "{}:{}",
            self.path("bin"),
            std::env::var("PATH").unwrap_or_default()
        );
        let out = Command::new(BIN)
            .arg("-f")
            .arg(self.path("config.yaml"))
            .arg("-l")
            .arg(self.path("run.lock"))
            .args(args)
            .env("PATH", search_path)
            .env_remove("RUST_LOG")
            .output()
            .unwrap_or_else(|e| panic!("failed to spawn {}: {}", BIN, e));
        (
            out.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&out.stdout).into_owned(),
        )
    }

    fn calls(&self) -> String {
        fs::read_to_string(self.dir.path().join("calls")).unwrap_or_default()
    }
}

#[test]
fn no_command_prints_help() {
    let (code, stdout) = Fixture::new().run(&[]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Usage:"));
}

#[test]
fn backup_runs_duplicity_and_writes_run_log() {
    let fixture = Fixture::new();
    let (code, stdout) = fixture.run(&["backup"]);
    assert_eq!(code, 0, "{}", stdout);
    assert_eq!(fixture.calls(), "-v3 --no-encryption /data file:///backup\n");
    assert!(stdout.contains("A data/new.txt"));

    let logs: Vec<_> = fs::read_dir(fixture.path("logs")).unwrap().collect();
    assert_eq!(logs.len(), 1);
    let log = fs::read_to_string(logs[0].as_ref().unwrap().path()).unwrap();
    assert!(log.contains("started with command 'backup'"));
    assert!(log.contains("A data/new.txt"));
    assert!(!Path::new(&fixture.path("run.lock")).exists());
}

#[test]
fn debug_flag_echoes_the_command_line() {
    let fixture = Fixture::new();
    let (code, stdout) = fixture.run(&["status", "-d"]);
    assert_eq!(code, 0, "{}", stdout);
    let echoed = stdout
        .lines()
        .find(|l| l.contains("command: "))
        .unwrap_or_else(|| panic!("no command line in {}", stdout));
    assert!(echoed.contains("duplicity -v3 collection-status --no-encryption file:///backup"));

    let (_, quiet) = fixture.run(&["status"]);
    assert!(!quiet.contains("command: "), "{}", quiet);
}

#[test]
fn list_changed_files_filters_output() {
    let fixture = Fixture::new();
    let (code, stdout) = fixture.run(&["list-changed-files"]);
    assert_eq!(code, 0, "{}", stdout);
    assert!(stdout.contains("A data/new.txt"));
    assert!(!stdout.contains("Comparing data"));
}

#[test]
fn unknown_command_fails_without_running_duplicity() {
    let fixture = Fixture::new();
    let (code, stdout) = fixture.run(&["frobnicate"]);
    assert_eq!(code, 1);
    assert!(stdout.contains("did not understand command 'frobnicate'"));
    assert_eq!(fixture.calls(), "");
}

#[test]
fn held_lock_aborts_the_run() {
    let fixture = Fixture::new();
    // pid 1 is always alive
    fs::write(fixture.path("run.lock"), "1\n").unwrap();
    let (code, _) = fixture.run(&["backup"]);
    assert_eq!(code, 3);
    assert_eq!(fixture.calls(), "");
}

#[test]
fn invalid_config_exits_with_config_code() {
    let fixture = Fixture::new();
    fs::write(fixture.path("config.yaml"), "dest: file:///backup\nlogdir: /tmp\n").unwrap();
    let (code, stdout) = fixture.run(&["backup"]);
    assert_eq!(code, 2);
    assert!(stdout.contains("root is required"));
}
