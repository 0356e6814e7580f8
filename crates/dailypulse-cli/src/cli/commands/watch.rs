//! `dailypulse watch` – check once, then keep the countdown fresh until Ctrl-C.
//!
//! Pressing Enter triggers another check, like the "Check for News" button.
//! A press while a check is still running is reported and ignored.

use anyhow::Result;
use chrono::Utc;
use dailypulse_core::config::PulseConfig;
use dailypulse_core::schedule::{self, COUNTDOWN_REFRESH};
use dailypulse_core::{RemoteFetcher, Updater};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{build_updater, run_cycle_printing};

pub async fn run_watch(cfg: &PulseConfig, play: bool) -> Result<()> {
    let (updater, _shell) = build_updater(cfg, play)?;
    updater.load_cached_stamp()?;

    spawn_check(&updater);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut ticker = tokio::time::interval(COUNTDOWN_REFRESH);
    let mut last_countdown = String::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let board = updater.board();
                let line = schedule::countdown(&board.meta_stamp(), board.last_modified(), Utc::now());
                if !line.is_empty() && line != last_countdown {
                    println!("{line}");
                    last_countdown = line;
                }
            }
            line = stdin.next_line(), if stdin_open => match line {
                Ok(Some(_)) => spawn_check(&updater),
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!("stdin closed: {}", e);
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("watch interrupted");
                break;
            }
        }
    }
    Ok(())
}

fn spawn_check(updater: &Arc<Updater<RemoteFetcher>>) {
    let updater = Arc::clone(updater);
    tokio::spawn(async move {
        if let Err(e) = run_cycle_printing(&updater).await {
            println!("Already checking for news ({e}).");
        }
    });
}
