use clap::Parser;

use crate::types::RunMode;

pub const DEFAULT_CONFIG_FILE: &str = "~/.config/duplicity-backup.yaml";
pub const DEFAULT_LOCK_FILE: &str = "~/.config/duplicity-backup.lock";

#[derive(Parser, Debug)]
#[command(
    name = "duplicity-backup",
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Configuration for this duplicity wrapper
    #[arg(long = "config-file", short = 'f', default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,
    /// File to hold the lock for this wrapper execution
    #[arg(long = "lock-file", short = 'l', default_value = DEFAULT_LOCK_FILE)]
    pub lock_file: String,
    /// The time from which to restore or list files
    #[arg(long, short = 't', default_value = "")]
    pub time: String,
    /// Do a test-run without changes
    #[arg(long, short = 'n')]
    pub dry_run: bool,
    /// Print duplicity commands to output
    #[arg(long, short = 'd')]
    pub debug: bool,
    /// Print version and exit
    #[arg(long)]
    pub version: bool,

    /// Command followed by its arguments
    pub command: Vec<String>,
}

impl Cli {
    pub fn run_mode(&self) -> RunMode {
        RunMode {
            dry_run: self.dry_run,
            debug: self.debug,
        }
    }

    /// True when nothing but the help text was asked for.
    pub fn wants_help(&self) -> bool {
        self.command.first().map_or(true, |c| c == "help")
    }
}
