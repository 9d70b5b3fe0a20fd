use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use crate::config::model::SlackConfig;
use crate::error::NotifyError;
use crate::notify::{check_status, Notifier, Outcome};

#[derive(Debug, Serialize)]
pub struct SlackMessage<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    pub username: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub channel: &'a str,
    #[serde(rename = "icon_emoji", skip_serializing_if = "str::is_empty")]
    pub icon: &'a str,
    pub text: String,
}

/// Incoming-webhook chat target.
pub struct Slack<'a> {
    cfg: &'a SlackConfig,
}

impl<'a> Slack<'a> {
    pub fn new(cfg: &'a SlackConfig) -> Self {
        Self { cfg }
    }

    pub fn message(&self, outcome: &Outcome) -> SlackMessage<'a> {
        SlackMessage {
            username: &self.cfg.username,
            channel: &self.cfg.channel,
            icon: &self.cfg.emoji,
            text: outcome.text(),
        }
    }
}

impl Notifier for Slack<'_> {
    fn send(&self, client: &Client, outcome: &Outcome) -> Result<(), NotifyError> {
        if self.cfg.hook_url.is_empty() {
            return Ok(());
        }
        let body = serde_json::to_vec(&self.message(outcome))?;
        let res = client
            .post(&self.cfg.hook_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;
        check_status(res.status())
    }
}
