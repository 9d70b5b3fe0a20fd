//! Wrapper around the duplicity backup tool driven by a declarative YAML
//! configuration.

pub mod cli;
pub mod config;
pub mod duplicity;
pub mod error;
pub mod logging;
pub mod notify;
pub mod runner;
pub mod types;
pub mod util;

pub use config::Config;
pub use duplicity::{generate_command, DuplicityCommand};
pub use error::{BackupError, Result};
pub use types::{RunMode, Subcommand};
