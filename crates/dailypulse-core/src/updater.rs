//! The update cycle: fetch the stamp, compare with the cached one, fetch the
//! audio when it changed, and fall back to the cached audio on any failure.
//!
//! Statuses are published on the [`StatusBoard`] as the cycle advances. The
//! terminal status stays visible for the settle delay, then the board reverts
//! to [`UpdateStatus::None`].

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{PulseConfig, PulsePaths};
use crate::fetch::{Fetch, FetchOutcome};
use crate::status::{StatusBoard, UpdateStatus};
use crate::storage;

/// Receives the audio file once it is ready to be loaded into a player.
pub trait PlaybackShell: Send + Sync + 'static {
    fn prepare(&self, path: &Path);
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    /// Another cycle is still running; nothing was done.
    #[error("an update check is already in progress")]
    InProgress,
}

/// Clears the in-progress flag once the cycle and every fetch it started are
/// done. Fetch threads hold a clone, so dropping the cycle future early keeps
/// the flag set until the running fetch returns.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Updater<F: Fetch> {
    fetcher: Arc<F>,
    shell: Arc<dyn PlaybackShell>,
    board: Arc<StatusBoard>,
    paths: PulsePaths,
    meta_url: String,
    payload_url: String,
    checking_delay: Duration,
    settle_delay: Duration,
    running: Arc<AtomicBool>,
}

impl<F: Fetch> Updater<F> {
    pub fn new(cfg: &PulseConfig, paths: PulsePaths, fetcher: F, shell: Arc<dyn PlaybackShell>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            shell,
            board: Arc::new(StatusBoard::new()),
            paths,
            meta_url: cfg.meta_url.clone(),
            payload_url: cfg.payload_url.clone(),
            checking_delay: cfg.checking_delay(),
            settle_delay: cfg.settle_delay(),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn board(&self) -> &Arc<StatusBoard> {
        &self.board
    }

    pub fn paths(&self) -> &PulsePaths {
        &self.paths
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Publish the stamp already on disk, before any check has run.
    pub fn load_cached_stamp(&self) -> io::Result<String> {
        let stamp = storage::read_stamp(&self.paths.meta_file())?;
        self.board.set_meta_stamp(&stamp);
        Ok(stamp)
    }

    /// Run one update cycle and return its terminal status
    /// (`Downloaded`, `NoUpdate` or `Error`).
    ///
    /// Returns only after the settle delay, with the board back at `None`.
    pub async fn check_for_update(&self) -> Result<UpdateStatus, UpdateError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("update check requested while another is running; ignored");
            return Err(UpdateError::InProgress);
        }
        let running = Arc::new(RunningGuard(Arc::clone(&self.running)));

        self.board.set_status(UpdateStatus::Checking);
        tokio::time::sleep(self.checking_delay).await;

        let outcome = match self.run_cycle(&running).await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("update check failed: {:#}", e);
                self.fall_back_to_cached()
            }
        };

        tokio::time::sleep(self.settle_delay).await;
        self.board.set_status(UpdateStatus::None);
        Ok(outcome)
    }

    async fn run_cycle(&self, running: &Arc<RunningGuard>) -> Result<UpdateStatus> {
        let meta_file = self.paths.meta_file();
        let prior = storage::read_stamp(&meta_file).context("read cached stamp")?;

        let meta = self
            .fetch_blocking(&self.meta_url, meta_file.clone(), running)
            .await?;
        if !meta.success {
            tracing::warn!("stamp download failed");
            return Ok(self.fall_back_to_cached());
        }

        let stamp = storage::read_stamp(&meta_file).context("read downloaded stamp")?;
        self.board.set_meta_stamp(&stamp);
        self.board.set_last_modified(meta.last_modified);

        if !prior.is_empty() && prior == stamp {
            tracing::info!(%stamp, "stamp unchanged");
            return Ok(self.finish_with_cached(UpdateStatus::NoUpdate));
        }

        tracing::info!(%prior, %stamp, "new revision, downloading audio");
        self.board.set_status(UpdateStatus::Downloading);
        let payload = self
            .fetch_blocking(&self.payload_url, self.paths.payload_file(), running)
            .await?;
        if payload.success {
            Ok(self.finish_with_cached(UpdateStatus::Downloaded))
        } else {
            self.board.set_status(UpdateStatus::Error);
            Ok(UpdateStatus::Error)
        }
    }

    /// Keep playing what we have if there is anything; otherwise report `Error`.
    fn fall_back_to_cached(&self) -> UpdateStatus {
        if self.paths.payload_file().exists() {
            self.finish_with_cached(UpdateStatus::NoUpdate)
        } else {
            self.board.set_status(UpdateStatus::Error);
            UpdateStatus::Error
        }
    }

    fn finish_with_cached(&self, status: UpdateStatus) -> UpdateStatus {
        self.board.set_status(status);
        let payload = self.paths.payload_file();
        if payload.exists() {
            self.shell.prepare(&payload);
        }
        status
    }

    async fn fetch_blocking(
        &self,
        url: &str,
        destination: PathBuf,
        running: &Arc<RunningGuard>,
    ) -> Result<FetchOutcome> {
        let fetcher = Arc::clone(&self.fetcher);
        let running = Arc::clone(running);
        let url = url.to_string();
        tokio::task::spawn_blocking(move || {
            let outcome = fetcher.fetch(&url, &destination);
            drop(running);
            outcome
        })
        .await
            .context("fetch task did not complete")
    }
}
