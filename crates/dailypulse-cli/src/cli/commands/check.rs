//! `dailypulse check` – run one update cycle.

use anyhow::Result;
use dailypulse_core::config::PulseConfig;

use super::{build_updater, run_cycle_printing};

pub async fn run_check(cfg: &PulseConfig, play: bool) -> Result<()> {
    let (updater, shell) = build_updater(cfg, play)?;
    updater.load_cached_stamp()?;

    run_cycle_printing(&updater).await?;

    if shell.prepared().is_none() {
        tracing::info!("no audio available yet");
    }
    Ok(())
}
