use std::io;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("{0}")]
    Message(String),
    #[error("{0}")]
    Config(ConfigError),
    #[error("{0}")]
    Command(CommandError),
    #[error("could not acquire lock {0}")]
    Lock(String),
    #[error("execution of duplicity command was unsuccessful ({0})")]
    Subprocess(ExitStatus),
    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file content: {0}")]
    Read(io::Error),
    #[error("rendering config file template: {0}")]
    Template(String),
    #[error("unmarshalling config: {0}")]
    Parse(String),
    #[error("validating config: {0} is required")]
    Required(&'static str),
    #[error("validating config: {key} {path} does not exist")]
    MissingFile { key: &'static str, path: String },
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("did not understand command '{0}', please see 'help' for details what to do")]
    UnknownCommand(String),
    #[error("restore needs one or two parameters ([file-to-restore] <target-path>), got {0}: see help message")]
    RestoreArguments(usize),
    #[error("compiling output filter: {0}")]
    LineFilter(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("encoding request payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("executing request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    Status(u16),
    #[error("{} notifiers failed:{}", .0.len(), format_failures(.0))]
    Aggregate(Vec<NotifyError>),
}

fn format_failures(errs: &[NotifyError]) -> String {
    errs.iter().map(|e| format!("\n- {}", e)).collect()
}

pub type Result<T> = std::result::Result<T, BackupError>;

impl BackupError {
    pub fn message(msg: impl Into<String>) -> Self {
        BackupError::Message(msg.into())
    }

    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            BackupError::Command(_) | BackupError::Subprocess(_) => 1,
            BackupError::Lock(_) => 3,
            BackupError::Config(_) | BackupError::Message(_) | BackupError::Io(_) => 2,
        }
    }
}

impl From<ConfigError> for BackupError {
    fn from(err: ConfigError) -> Self {
        BackupError::Config(err)
    }
}

impl From<CommandError> for BackupError {
    fn from(err: CommandError) -> Self {
        BackupError::Command(err)
    }
}
