//! Runs duplicity and streams its combined output line by line.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use std::thread;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{BackupError, Result};
use crate::util::command::describe_command;

pub mod lines;

pub use lines::LineBuffer;

const LINE_CHANNEL_CAPACITY: usize = 256;
const READ_CHUNK: usize = 4096;

/// Everything needed to start one duplicity process.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    pub binary: &'a Path,
    pub args: &'a [String],
    /// `NAME=value` entries layered over the inherited environment.
    pub env: &'a [String],
    pub line_filter: Option<&'a Regex>,
}

pub struct ProcessRunner {
    binary: PathBuf,
    /// Log every command line at `info` instead of `debug`.
    echo_command: bool,
}

impl ProcessRunner {
    pub fn new(binary: PathBuf, echo_command: bool) -> Self {
        Self {
            binary,
            echo_command,
        }
    }

    /// Runs the command, logging every (filtered) output line.
    pub fn run(
        &self,
        args: &[String],
        env: &[String],
        line_filter: Option<&Regex>,
    ) -> Result<ExitStatus> {
        let line = describe_command(&self.binary, args);
        if self.echo_command {
            info!("command: {}", line);
        } else {
            debug!("command: {}", line);
        }
        let invocation = Invocation {
            binary: &self.binary,
            args,
            env,
            line_filter,
        };
        run_with_sink(&invocation, |line| info!(target: "duplicity", "{}", line))
    }
}

/// Runs `invocation` to completion, handing each output line that passes the
/// filter to `sink` on a dedicated consumer thread.
pub fn run_with_sink<F>(invocation: &Invocation<'_>, sink: F) -> Result<ExitStatus>
where
    F: FnMut(&str) + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded::<String>(LINE_CHANNEL_CAPACITY);
    let filter = invocation.line_filter.cloned();
    let mut sink = sink;
    let consumer = thread::spawn(move || {
        for line in rx {
            if filter.as_ref().map_or(true, |f| f.is_match(&line)) {
                sink(&line);
            }
        }
    });

    let (mut reader, writer) = io::pipe()?;
    let spawned = {
        // The command holds our copies of the write end; dropping it at the end
        // of this block lets the reader see EOF once the child exits.
        let mut cmd = Command::new(invocation.binary);
        cmd.args(invocation.args);
        for entry in invocation.env {
            if let Some((key, value)) = entry.split_once('=') {
                cmd.env(key, value);
            }
        }
        cmd.stdout(writer.try_clone()?).stderr(writer);
        cmd.spawn()
    };
    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            drop(tx);
            let _ = consumer.join();
            return Err(BackupError::message(format!(
                "{}: {}",
                invocation.binary.display(),
                e
            )));
        }
    };

    let pumped = pump(&mut reader, |line| {
        // A send only fails once the consumer is gone; nothing left to do then.
        let _ = tx.send(line);
    });
    drop(tx);
    drop(reader);

    let status = settle(&mut child, &pumped);
    consumer
        .join()
        .map_err(|_| BackupError::message("output consumer panicked"))?;
    pumped?;
    Ok(status?)
}

/// Waits for the child. When its output could not be read to the end the
/// child is killed first, since a writer blocked on a full pipe never exits.
fn settle(child: &mut Child, pumped: &io::Result<()>) -> io::Result<ExitStatus> {
    if pumped.is_err() {
        let _ = child.kill();
    }
    child.wait()
}

/// Reads `reader` to EOF and forwards every framed line.
fn pump<R, F>(reader: &mut R, mut forward: F) -> io::Result<()>
where
    R: Read,
    F: FnMut(String),
{
    let mut framer = LineBuffer::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        for line in framer.push(&chunk[..n]) {
            forward(line);
        }
    }
    if let Some(rest) = framer.finish() {
        forward(rest);
    }
    Ok(())
}
