pub mod config;
pub mod logging;

pub mod checksum;
pub mod date_format;
pub mod fetch;
pub mod schedule;
pub mod status;
pub mod storage;
pub mod updater;

pub use fetch::{Fetch, FetchOutcome, RemoteFetcher};
pub use status::{StatusBoard, StatusSnapshot, UpdateStatus};
pub use updater::{PlaybackShell, UpdateError, Updater};
