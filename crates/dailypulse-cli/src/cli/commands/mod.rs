//! CLI command handlers. Each command is in its own file.

mod check;
mod status;
mod watch;

pub use check::run_check;
pub use status::run_status;
pub use watch::run_watch;

use anyhow::Result;
use chrono::Utc;
use dailypulse_core::config::{PulseConfig, PulsePaths};
use dailypulse_core::date_format::format_meta_date;
use dailypulse_core::schedule;
use dailypulse_core::{PlaybackShell, RemoteFetcher, StatusBoard, UpdateError, UpdateStatus, Updater};
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::shell::CliShell;

/// Updater wired to the real fetcher and the CLI shell.
pub(crate) fn build_updater(
    cfg: &PulseConfig,
    play: bool,
) -> Result<(Arc<Updater<RemoteFetcher>>, Arc<CliShell>)> {
    let paths = PulsePaths::resolve(cfg)?;
    let fetcher = RemoteFetcher::from_config(cfg, &paths);
    let shell = Arc::new(CliShell::new(cfg.player_command.clone(), play));
    let shell_dyn: Arc<dyn PlaybackShell> = shell.clone();
    let updater = Arc::new(Updater::new(cfg, paths, fetcher, shell_dyn));
    Ok((updater, shell))
}

/// Run one cycle, printing each phase as the board publishes it. The outcome
/// is printed when it appears, not after the settle delay.
pub(crate) async fn run_cycle_printing(
    updater: &Updater<RemoteFetcher>,
) -> Result<UpdateStatus, UpdateError> {
    let printer = spawn_phase_printer(Arc::clone(updater.board()));
    let result = updater.check_for_update().await;
    match result {
        Ok(status) => {
            // The board is back at `None`, so the printer has finished or is about to.
            if !printer.await.unwrap_or(false) {
                print_outcome(status, updater.board());
            }
        }
        Err(_) => printer.abort(),
    }
    result
}

/// Prints phases until the cycle's outcome (returns true) or a return to
/// `None` whose outcome was replaced before it could be read (returns false).
fn spawn_phase_printer(board: Arc<StatusBoard>) -> JoinHandle<bool> {
    let mut rx = board.subscribe_status();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let status = *rx.borrow_and_update();
            match status {
                UpdateStatus::None => return false,
                s if s.is_terminal() => {
                    print_outcome(s, &board);
                    return true;
                }
                s => println!("{}", s.message()),
            }
        }
        false
    })
}

fn print_outcome(status: UpdateStatus, board: &StatusBoard) {
    println!("{}", status.message());
    for line in version_lines(board) {
        println!("{line}");
    }
}

/// "Current version" and countdown lines for the stamp on the board.
pub(crate) fn version_lines(board: &StatusBoard) -> Vec<String> {
    let stamp = board.meta_stamp();
    let mut lines = Vec::new();
    let pretty = format_meta_date(&stamp);
    if !pretty.is_empty() {
        lines.push(format!("Current version: {pretty}"));
    }
    let countdown = schedule::countdown(&stamp, board.last_modified(), Utc::now());
    if !countdown.is_empty() {
        lines.push(countdown);
    }
    lines
}
