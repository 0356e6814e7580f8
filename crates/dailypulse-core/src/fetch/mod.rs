//! Remote fetcher: one GET per call, body staged in a scratch file, then
//! copy-and-replace into the destination.
//!
//! Uses the curl crate (libcurl). Failures never escape [`Fetch::fetch`]: they
//! are logged and turned into an unsuccessful [`FetchOutcome`], and the
//! destination keeps whatever it held before.

mod parse;

pub use parse::parse_http_date;

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::str;
use std::time::Duration;
use thiserror::Error;

use crate::config::{PulseConfig, PulsePaths};
use crate::storage::{self, ScratchWriter};

/// Result of one fetch as seen by the updater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchOutcome {
    pub success: bool,
    /// Server `Last-Modified`, when present and parseable.
    pub last_modified: Option<DateTime<Utc>>,
}

impl FetchOutcome {
    pub fn fetched(last_modified: Option<DateTime<Utc>>) -> Self {
        Self {
            success: true,
            last_modified,
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }
}

/// Download `url` into `destination`. Blocking; the updater runs it on a
/// blocking thread.
pub trait Fetch: Send + Sync + 'static {
    fn fetch(&self, url: &str, destination: &Path) -> FetchOutcome;
}

/// Why a fetch failed. Only logged; callers see [`FetchOutcome::failed`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    #[error("server returned HTTP {0}")]
    Http(u32),
    #[error("scratch write failed: {0}")]
    Scratch(#[source] io::Error),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// libcurl-backed fetcher with fixed connect and read timeouts.
#[derive(Debug, Clone)]
pub struct RemoteFetcher {
    connect_timeout: Duration,
    read_timeout: Duration,
    scratch_dir: PathBuf,
}

impl RemoteFetcher {
    pub fn new(connect_timeout: Duration, read_timeout: Duration, scratch_dir: &Path) -> Self {
        Self {
            connect_timeout,
            read_timeout,
            scratch_dir: scratch_dir.to_path_buf(),
        }
    }

    pub fn from_config(cfg: &PulseConfig, paths: &PulsePaths) -> Self {
        Self::new(cfg.connect_timeout(), cfg.read_timeout(), paths.cache_dir())
    }

    fn scratch_path(&self, destination: &Path) -> PathBuf {
        let name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download".to_string());
        self.scratch_dir.join(format!("temp_{name}"))
    }

    /// GET `url`, returning the parsed `Last-Modified` on a 200 response.
    pub fn try_fetch(
        &self,
        url: &str,
        destination: &Path,
    ) -> Result<Option<DateTime<Utc>>, FetchError> {
        let mut scratch = ScratchWriter::create(&self.scratch_path(destination))?;
        let headers = match self.stream_to(url, &mut scratch) {
            Ok(headers) => headers,
            Err(e) => {
                scratch.discard();
                return Err(e);
            }
        };
        tracing::debug!(url, bytes = scratch.written(), "response body staged");

        let staged = scratch.finish()?;
        storage::replace_destination(&staged, destination)?;
        Ok(parse::last_modified(&headers))
    }

    /// Performs the GET, streaming the body into `scratch`. Returns the header
    /// lines of the final response; anything but HTTP 200 is an error.
    fn stream_to(&self, url: &str, scratch: &mut ScratchWriter) -> Result<Vec<String>, FetchError> {
        let mut headers: Vec<String> = Vec::new();
        let mut write_error: Option<io::Error> = None;

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(concat!("dailypulse/", env!("CARGO_PKG_VERSION")))?;
        easy.connect_timeout(self.connect_timeout)?;
        // libcurl has no per-read timeout; abort when the transfer stalls instead.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.read_timeout)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    // A new status line starts the headers of the next redirect hop.
                    if line.starts_with("HTTP/") {
                        headers.clear();
                    }
                    headers.push(line.to_string());
                }
                true
            })?;
            transfer.write_function(|data| match scratch.append(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_error {
            return Err(FetchError::Scratch(e));
        }
        performed?;

        let code = easy.response_code()?;
        if code != 200 {
            return Err(FetchError::Http(code));
        }
        Ok(headers)
    }
}

impl Fetch for RemoteFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> FetchOutcome {
        match self.try_fetch(url, destination) {
            Ok(last_modified) => {
                tracing::info!(url, dest = %destination.display(), "fetched");
                FetchOutcome::fetched(last_modified)
            }
            Err(FetchError::Http(code)) => {
                tracing::error!(url, "server returned HTTP {}", code);
                FetchOutcome::failed()
            }
            Err(e) => {
                tracing::error!(url, "error downloading: {:#}", e);
                FetchOutcome::failed()
            }
        }
    }
}
