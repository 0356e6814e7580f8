//! Update status and the observable values a playback shell watches.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tokio::sync::watch;

use crate::date_format::format_meta_date;
use crate::schedule::next_update_timestamp;

/// Phase of the update cycle, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    Checking,
    Downloading,
    Downloaded,
    NoUpdate,
    Error,
    /// Nothing to show; initial state and the state after the settle delay.
    #[default]
    None,
}

impl UpdateStatus {
    /// Status line shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            UpdateStatus::Checking => "Checking for News...",
            UpdateStatus::Downloading => "New update found, downloading...",
            UpdateStatus::Downloaded => "Today's News downloaded successfully!",
            UpdateStatus::NoUpdate => "You have the latest News version",
            UpdateStatus::Error => "Error updating. Please try again.",
            UpdateStatus::None => "",
        }
    }

    /// Outcome of a cycle, as opposed to a phase in progress or idle.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            UpdateStatus::Downloaded | UpdateStatus::NoUpdate | UpdateStatus::Error
        )
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Single-writer, multi-reader holder for the status, the current stamp and
/// the server's `Last-Modified`.
#[derive(Debug)]
pub struct StatusBoard {
    status: watch::Sender<UpdateStatus>,
    meta_stamp: watch::Sender<String>,
    last_modified: watch::Sender<Option<DateTime<Utc>>>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        Self {
            status: watch::Sender::new(UpdateStatus::None),
            meta_stamp: watch::Sender::new(String::new()),
            last_modified: watch::Sender::new(None),
        }
    }

    pub fn set_status(&self, status: UpdateStatus) {
        let prev = self.status.send_replace(status);
        if prev != status {
            tracing::info!(?status, "update status");
        }
    }

    pub fn set_meta_stamp(&self, stamp: &str) {
        self.meta_stamp.send_replace(stamp.to_string());
    }

    pub fn set_last_modified(&self, last_modified: Option<DateTime<Utc>>) {
        self.last_modified.send_replace(last_modified);
    }

    pub fn status(&self) -> UpdateStatus {
        *self.status.borrow()
    }

    pub fn meta_stamp(&self) -> String {
        self.meta_stamp.borrow().clone()
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        *self.last_modified.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<UpdateStatus> {
        self.status.subscribe()
    }

    pub fn subscribe_meta_stamp(&self) -> watch::Receiver<String> {
        self.meta_stamp.subscribe()
    }

    pub fn subscribe_last_modified(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_modified.subscribe()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::new(self.status(), &self.meta_stamp(), self.last_modified())
    }
}

/// Point-in-time view of the board, with the derived display values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub status: UpdateStatus,
    pub meta_stamp: String,
    /// Stamp rendered for humans ("3rd March 2023"); the raw stamp if malformed.
    pub version: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub next_update: Option<DateTime<Utc>>,
}

impl StatusSnapshot {
    pub fn new(
        status: UpdateStatus,
        meta_stamp: &str,
        last_modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            status,
            meta_stamp: meta_stamp.to_string(),
            version: format_meta_date(meta_stamp),
            last_modified,
            next_update: next_update_timestamp(meta_stamp, last_modified)
                .map(|t| t.with_timezone(&Utc)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_phases() {
        assert_eq!(UpdateStatus::Checking.message(), "Checking for News...");
        assert_eq!(UpdateStatus::None.message(), "");
        assert_eq!(
            UpdateStatus::Error.to_string(),
            "Error updating. Please try again."
        );
    }

    #[test]
    fn terminal_statuses() {
        assert!(UpdateStatus::Downloaded.is_terminal());
        assert!(UpdateStatus::NoUpdate.is_terminal());
        assert!(UpdateStatus::Error.is_terminal());
        assert!(!UpdateStatus::Checking.is_terminal());
        assert!(!UpdateStatus::Downloading.is_terminal());
        assert!(!UpdateStatus::None.is_terminal());
    }

    #[test]
    fn board_starts_idle_and_publishes() {
        let board = StatusBoard::new();
        let mut rx = board.subscribe_status();
        assert_eq!(*rx.borrow(), UpdateStatus::None);

        board.set_status(UpdateStatus::Checking);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), UpdateStatus::Checking);
        assert_eq!(board.status(), UpdateStatus::Checking);
    }

    #[test]
    fn board_publishes_without_subscribers() {
        let board = StatusBoard::new();
        board.set_meta_stamp("03032023");
        board.set_status(UpdateStatus::NoUpdate);
        assert_eq!(board.meta_stamp(), "03032023");
        assert_eq!(board.status(), UpdateStatus::NoUpdate);
        assert!(board.last_modified().is_none());
    }

    #[test]
    fn snapshot_derives_display_values() {
        let snap = StatusSnapshot::new(UpdateStatus::None, "03032023", None);
        assert_eq!(snap.version, "3rd March 2023");
        assert!(snap.next_update.is_some());

        let snap = StatusSnapshot::new(UpdateStatus::Error, "", None);
        assert_eq!(snap.version, "");
        assert!(snap.next_update.is_none());
    }

    #[test]
    fn snapshot_serializes_status_snake_case() {
        let snap = StatusSnapshot::new(UpdateStatus::NoUpdate, "", None);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["status"], "no_update");
        assert_eq!(json["meta_stamp"], "");
    }
}
