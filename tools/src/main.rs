//! sync-runner: entry point for the debtor report synchronization job.
//!
//! Usage:
//!   sync-runner --once sync      # run the report sync immediately
//!   sync-runner --once notify    # file the reminder ticket immediately
//!   sync-runner                  # resident mode: poll the weekly slots

use anyhow::Result;
use chrono::Utc;
use debtsync_core::{
    config::JobConfig,
    job,
    schedule::{iso_week_in_report_tz, WeeklySlot, NOTIFY_SLOT, SYNC_SLOT},
};
use std::env;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let once = args
        .windows(2)
        .find(|w| w[0] == "--once")
        .map(|w| w[1].clone());

    let cfg = JobConfig::from_env();

    match once.as_deref() {
        Some("sync") => return Ok(job::run_sync(&cfg)?),
        Some("notify") => return Ok(job::run_notify(&cfg)?),
        Some(other) => anyhow::bail!("unknown --once mode '{other}' (expected sync or notify)"),
        None => {}
    }

    println!("debtsync — resident scheduler");
    println!("  sync slot:   Sun 21:01 UTC, even ISO weeks (UTC+3)");
    println!("  notify slot: Mon 06:30 UTC, even ISO weeks (UTC+3)");
    println!();

    loop {
        let now = Utc::now();
        run_slot(&SYNC_SLOT, "sync", now, || job::run_sync(&cfg));
        run_slot(&NOTIFY_SLOT, "notify", now, || job::run_notify(&cfg));
        thread::sleep(Duration::from_secs(60));
    }
}

/// Fire `run` when the slot's minute is reached in an even ISO week. A slot
/// minute in an odd week logs the parity and skips, mirroring the gate.
fn run_slot<F>(slot: &WeeklySlot, name: &str, now: chrono::DateTime<Utc>, run: F)
where
    F: FnOnce() -> debtsync_core::error::SyncResult<()>,
{
    if !slot.matches(now) {
        return;
    }
    let week = iso_week_in_report_tz(now);
    if !slot.should_run(now) {
        log::info!("ISO week {week} is odd, {name} slot skipped");
        return;
    }
    log::info!("ISO week {week} is even, {name} slot due");
    if let Err(err) = run() {
        log::error!("{name} run failed: {err}");
    }
}
