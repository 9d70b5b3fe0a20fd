use std::fmt;
use std::str::FromStr;

use crate::error::CommandError;

/// First positional argument of the wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
    Backup,
    Full,
    Incr,
    Cleanup,
    ListCurrentFiles,
    Restore,
    Status,
    Verify,
    ListChangedFiles,
    /// Issued by the wrapper itself after a successful backup or cleanup.
    RemoveOld,
}

impl Subcommand {
    pub const ALL: [Subcommand; 10] = [
        Subcommand::Backup,
        Subcommand::Full,
        Subcommand::Incr,
        Subcommand::Cleanup,
        Subcommand::ListCurrentFiles,
        Subcommand::Restore,
        Subcommand::Status,
        Subcommand::Verify,
        Subcommand::ListChangedFiles,
        Subcommand::RemoveOld,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subcommand::Backup => "backup",
            Subcommand::Full => "full",
            Subcommand::Incr => "incr",
            Subcommand::Cleanup => "cleanup",
            Subcommand::ListCurrentFiles => "list-current-files",
            Subcommand::Restore => "restore",
            Subcommand::Status => "status",
            Subcommand::Verify => "verify",
            Subcommand::ListChangedFiles => "list-changed-files",
            Subcommand::RemoveOld => "__remove_old",
        }
    }

    /// Commands whose outcome is reported to the notification targets.
    pub fn notifies(&self) -> bool {
        matches!(
            self,
            Subcommand::Backup | Subcommand::RemoveOld | Subcommand::Full | Subcommand::Incr
        )
    }

    /// Commands followed by the removal of old backups.
    pub fn triggers_cleanup(&self) -> bool {
        matches!(self, Subcommand::Backup | Subcommand::Cleanup)
    }
}

impl FromStr for Subcommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subcommand::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| CommandError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunMode {
    pub dry_run: bool,
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_name() {
        for cmd in Subcommand::ALL {
            assert_eq!(cmd.as_str().parse::<Subcommand>().unwrap(), cmd);
        }
    }

    #[test]
    fn unknown_name_is_reported() {
        let err = "frobnicate".parse::<Subcommand>().unwrap_err();
        assert!(err.to_string().contains("'frobnicate'"));
    }

    #[test]
    fn notify_and_cleanup_sets() {
        assert!(Subcommand::Backup.notifies());
        assert!(Subcommand::RemoveOld.notifies());
        assert!(!Subcommand::Restore.notifies());
        assert!(Subcommand::Cleanup.triggers_cleanup());
        assert!(!Subcommand::Full.triggers_cleanup());
    }
}
