use std::fs::File;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Run log file shared with the tracing subscriber.
///
/// Events are dropped until a file is attached.
#[derive(Clone, Default)]
pub struct RunLog {
    file: Arc<Mutex<Option<File>>>,
}

impl RunLog {
    pub fn attach(&self, file: File) {
        *self.lock() = Some(file);
    }

    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct RunLogWriter<'a> {
    file: MutexGuard<'a, Option<File>>,
}

impl Write for RunLogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RunLog {
    type Writer = RunLogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RunLogWriter { file: self.lock() }
    }
}

/// Installs stdout and run-log output. `RUST_LOG` overrides the level.
pub fn init_tracing(debug: bool) -> RunLog {
    let run_log = RunLog::default();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(run_log.clone()))
        .try_init();
    run_log
}

/// Debug output stays limited to this crate; HTTP client internals keep
/// logging at `info`.
fn default_directives(debug: bool) -> &'static str {
    if debug {
        "info,duplicity_backup=debug"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn writes_are_dropped_until_attached() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("run.txt");
        let log = RunLog::default();
        log.make_writer().write_all(b"before\n").unwrap();

        log.attach(File::create(&path).unwrap());
        let mut writer = log.make_writer();
        writer.write_all(b"after\n").unwrap();
        writer.flush().unwrap();
        drop(writer);

        assert_eq!(fs::read_to_string(&path).unwrap(), "after\n");
    }

    #[test]
    fn debug_is_scoped_to_this_crate() {
        assert_eq!(default_directives(false), "info");
        let directives = default_directives(true);
        assert!(directives.starts_with("info,"));
        assert!(directives.contains("duplicity_backup=debug"));
        EnvFilter::try_new(directives).expect("valid directives");
    }
}
