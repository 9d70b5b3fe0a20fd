use std::path::PathBuf;

use tracing::{error, info};

use crate::config::Config;
use crate::duplicity::generate_command;
use crate::error::{BackupError, Result};
use crate::notify::{notify, Outcome};
use crate::runner::ProcessRunner;
use crate::types::{RunMode, Subcommand};
use crate::util::command::wrapper_args;

/// One wrapper run against a loaded configuration.
pub struct Session<'a> {
    config: &'a Config,
    runner: ProcessRunner,
    run_mode: RunMode,
    time: String,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a Config, binary: PathBuf, run_mode: RunMode, time: String) -> Self {
        Self {
            config,
            runner: ProcessRunner::new(binary, run_mode.debug),
            run_mode,
            time,
        }
    }

    /// Primary command, optional removal of old backups, then the success
    /// notification.
    pub fn run(&self, argv: &[String]) -> Result<()> {
        let command = argv.first().map(String::as_str).unwrap_or_default();
        self.execute(argv)?;

        if self.wants_cleanup(command) {
            info!("++++ Starting removal of old backups");
            self.execute(&[Subcommand::RemoveOld.as_str().to_string()])?;
        }

        self.report(command, &Outcome::Success);
        info!("++++ Backup finished successfully");
        Ok(())
    }

    fn wants_cleanup(&self, command: &str) -> bool {
        self.config.cleanup.is_enabled()
            && command
                .parse::<Subcommand>()
                .is_ok_and(|cmd| cmd.triggers_cleanup())
    }

    /// Generates and runs one duplicity command; failures are reported to the
    /// notification targets before being returned.
    pub fn execute(&self, argv: &[String]) -> Result<()> {
        let command = argv.first().map(String::as_str).unwrap_or_default();
        let result = self.execute_inner(argv);
        match &result {
            Ok(()) => info!("Execution of duplicity command was successful."),
            Err(err) => {
                let outcome = Outcome::Failure(format!("Could not create backup: {}", err));
                self.report(command, &outcome);
            }
        }
        result
    }

    fn execute_inner(&self, argv: &[String]) -> Result<()> {
        let generated = generate_command(self.config, argv, &self.time)?;
        let args = wrapper_args(generated.args, self.run_mode);
        let status = self
            .runner
            .run(&args, &generated.env, generated.line_filter.as_ref())?;
        if status.success() {
            Ok(())
        } else {
            Err(BackupError::Subprocess(status))
        }
    }

    fn report(&self, command: &str, outcome: &Outcome) {
        match notify(self.config, command, outcome) {
            Ok(()) => {
                if command.parse::<Subcommand>().is_ok_and(|cmd| cmd.notifies()) {
                    info!("Notifications sent");
                }
            }
            Err(err) => error!("Error sending notifications: {}", err),
        }
    }
}
