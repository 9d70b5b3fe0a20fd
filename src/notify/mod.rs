//! Success/failure reporting to the configured webhooks.

use std::str::FromStr;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::Config;
use crate::error::NotifyError;
use crate::types::Subcommand;

pub mod mondash;
pub mod slack;

pub use mondash::MonDash;
pub use slack::Slack;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn text(&self) -> String {
        match self {
            Outcome::Success => "Backup succeeded".to_string(),
            Outcome::Failure(err) => format!("Backup failed: {}", err),
        }
    }
}

pub trait Notifier {
    /// Delivers `outcome`; an unconfigured target returns `Ok` without sending.
    fn send(&self, client: &Client, outcome: &Outcome) -> Result<(), NotifyError>;
}

/// Notifies every target for commands worth reporting, collecting failures
/// instead of stopping at the first one.
pub fn notify(cfg: &Config, command: &str, outcome: &Outcome) -> Result<(), NotifyError> {
    let notifies = Subcommand::from_str(command).is_ok_and(|cmd| cmd.notifies());
    if !notifies {
        return Ok(());
    }

    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let mondash = MonDash::new(&cfg.notifications.mondash, &cfg.hostname);
    let slack = Slack::new(&cfg.notifications.slack);
    let targets: [&dyn Notifier; 2] = [&mondash, &slack];
    send_all(&client, &targets, outcome)
}

pub fn send_all(
    client: &Client,
    targets: &[&dyn Notifier],
    outcome: &Outcome,
) -> Result<(), NotifyError> {
    let errs: Vec<NotifyError> = targets
        .iter()
        .filter_map(|target| target.send(client, outcome).err())
        .collect();
    if errs.is_empty() {
        Ok(())
    } else {
        Err(NotifyError::Aggregate(errs))
    }
}

pub(crate) fn check_status(status: reqwest::StatusCode) -> Result<(), NotifyError> {
    if status == reqwest::StatusCode::OK {
        Ok(())
    } else {
        Err(NotifyError::Status(status.as_u16()))
    }
}
