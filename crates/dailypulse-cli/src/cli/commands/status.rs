//! `dailypulse status` – show what is cached without touching the network.

use anyhow::Result;
use chrono::{DateTime, Utc};
use dailypulse_core::checksum::{self, CachedPayload};
use dailypulse_core::config::{PulseConfig, PulsePaths};
use dailypulse_core::schedule;
use dailypulse_core::storage;
use dailypulse_core::{StatusSnapshot, UpdateStatus};

pub async fn run_status(cfg: &PulseConfig, json: bool) -> Result<()> {
    let paths = PulsePaths::resolve(cfg)?;
    let report = StatusReport::collect(&paths, Utc::now())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        for line in report.lines() {
            println!("{line}");
        }
    }
    Ok(())
}

/// Cached state as seen from disk. The server's `Last-Modified` is not
/// persisted, so the countdown assumes midnight here.
pub(crate) struct StatusReport {
    snapshot: StatusSnapshot,
    countdown: String,
    payload: Option<CachedPayload>,
}

impl StatusReport {
    pub(crate) fn collect(paths: &PulsePaths, now: DateTime<Utc>) -> Result<Self> {
        let stamp = storage::read_stamp(&paths.meta_file())?;
        Ok(Self {
            snapshot: StatusSnapshot::new(UpdateStatus::None, &stamp, None),
            countdown: schedule::countdown(&stamp, None, now),
            payload: checksum::inspect(&paths.payload_file())?,
        })
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.snapshot.version.is_empty() {
            lines.push("No news downloaded yet.".to_string());
        } else {
            lines.push(format!("Current version: {}", self.snapshot.version));
        }
        if !self.countdown.is_empty() {
            lines.push(self.countdown.clone());
        }
        match &self.payload {
            Some(p) => {
                lines.push(format!("Audio: {} ({} bytes)", p.path.display(), p.size));
                lines.push(format!("SHA-256: {}", p.sha256));
            }
            None => lines.push("Audio: none".to_string()),
        }
        lines
    }

    pub(crate) fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "snapshot": self.snapshot,
            "countdown": self.countdown,
            "payload": self.payload,
        })
    }
}
