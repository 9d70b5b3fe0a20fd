use std::path::Path;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use tracing::{error, info};

use crate::cli::args::Cli;
use crate::config::load_config;
use crate::error::{BackupError, Result};
use crate::logging::{init_tracing, RunLog};
use crate::util::command::find_duplicity;
use crate::util::lock::acquire_lock;
use crate::util::paths::{create_log_file, expand_home};

pub mod args;
pub mod session;

pub use session::Session;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("duplicity-backup {}", VERSION);
        return ExitCode::SUCCESS;
    }
    if cli.wants_help() {
        print_help();
        return ExitCode::SUCCESS;
    }

    let run_log = init_tracing(cli.debug);
    match run_cli(&cli, &run_log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run_cli(cli: &Cli, run_log: &RunLog) -> Result<()> {
    let config_path = expand_home(&cli.config_file)?;
    let lock_path = expand_home(&cli.lock_file)?;
    let binary = find_duplicity()?;

    let config = load_config(&config_path).map_err(|e| {
        BackupError::message(format!(
            "unable to read configuration file {}: {}",
            config_path.display(),
            e
        ))
    })?;

    let (log_path, log_file) = create_log_file(Path::new(&config.log_directory), Local::now())?;
    run_log.attach(log_file);

    let command = &cli.command[0];
    info!(
        "++++ duplicity-backup {} started with command '{}' (log {})",
        VERSION,
        command,
        log_path.display()
    );

    let _lock = acquire_lock(&lock_path)?;

    Session::new(&config, binary, cli.run_mode(), cli.time.clone()).run(&cli.command)
}

fn print_help() {
    println!("duplicity-backup {}", VERSION);
    println!();
    println!("Usage:");
    println!("  duplicity-backup [options] <command> [arguments]");
    println!();
    println!("Commands:");
    println!("  backup                          Incremental backup (full when duplicity decides so)");
    println!("  full                            Force a full backup");
    println!("  incr                            Force an incremental backup");
    println!("  cleanup                         Remove broken or unneeded backup files");
    println!("  list-current-files              List files in the latest (or --time) backup");
    println!("  list-changed-files              Show files added, deleted or modified since the last backup");
    println!("  restore [file] <target>         Restore everything or a single file to <target>");
    println!("  status                          Show the collection status");
    println!("  verify                          Compare the backup against the local files");
    println!("  help                            Show this message");
    println!();
    println!("Options:");
    println!("  -f, --config-file <path>        Configuration file (default {})", args::DEFAULT_CONFIG_FILE);
    println!("  -l, --lock-file <path>          Lock file (default {})", args::DEFAULT_LOCK_FILE);
    println!("  -t, --time <time>               Time to restore from");
    println!("  -n, --dry-run                   Do a test-run without changes");
    println!("  -d, --debug                     Print duplicity commands to output");
    println!("      --version                   Print version and exit");
}
