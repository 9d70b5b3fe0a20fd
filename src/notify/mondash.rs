use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

use crate::config::model::MonDashConfig;
use crate::error::NotifyError;
use crate::notify::{check_status, Notifier, Outcome};

/// Dashboard check result, PUT to `<board>/duplicity-<hostname>`.
#[derive(Debug, Serialize)]
pub struct MonDashResult {
    pub title: String,
    pub description: String,
    pub status: &'static str,
    pub freshness: i64,
    pub ignore_mad: bool,
    pub hide_mad: bool,
    pub hide_value: bool,
}

pub struct MonDash<'a> {
    cfg: &'a MonDashConfig,
    hostname: &'a str,
}

impl<'a> MonDash<'a> {
    pub fn new(cfg: &'a MonDashConfig, hostname: &'a str) -> Self {
        Self { cfg, hostname }
    }

    pub fn url(&self) -> String {
        format!("{}/duplicity-{}", self.cfg.board_url, self.hostname)
    }

    pub fn payload(&self, outcome: &Outcome) -> MonDashResult {
        MonDashResult {
            title: format!("duplicity-backup on {}", self.hostname),
            description: outcome.text(),
            status: if outcome.is_success() { "OK" } else { "Critical" },
            freshness: self.cfg.freshness,
            ignore_mad: true,
            hide_mad: true,
            hide_value: true,
        }
    }
}

impl Notifier for MonDash<'_> {
    fn send(&self, client: &Client, outcome: &Outcome) -> Result<(), NotifyError> {
        if self.cfg.board_url.is_empty() {
            return Ok(());
        }
        let body = serde_json::to_vec(&self.payload(outcome))?;
        let res = client
            .put(self.url())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.cfg.token.as_str())
            .body(body)
            .send()?;
        check_status(res.status())
    }
}
