//! Job orchestration — the two externally triggered entry points.
//!
//! Both run strictly sequentially: every remote call completes before the
//! next is issued. There is no locking, so overlapping invocations can race
//! on the shared target sheet — an accepted limitation of the job, not a
//! guaranteed-safe design.

use crate::{
    config::JobConfig,
    digest,
    enrichment,
    error::{SyncError, SyncResult},
    pipeline,
    report::{ReportWriter, TARGET_SHEET_NAME},
    sheets::SheetsClient,
    tracker::TrackerClient,
};
use chrono::Utc;

/// Worksheet holding the billing source rows.
pub const SOURCE_SHEET_NAME: &str = "Paying";

/// Analytics question serving the contact enrichment columns.
const ENRICHMENT_QUESTION_ID: u64 = 648;

/// Entry point one: pull, transform, rewrite the debtor report.
pub fn run_sync(cfg: &JobConfig) -> SyncResult<()> {
    let sheets = SheetsClient::new(&cfg.google_api_token)?;

    let grid = sheets.values_get(
        &cfg.source_spreadsheet_id,
        &format!("{SOURCE_SHEET_NAME}!A1:W"),
    )?;
    if grid.len() < 2 {
        log::warn!("source sheet has no data rows, skipping run");
        return Ok(());
    }
    let data_rows = &grid[1..];

    let accounts = pipeline::parse_source_rows(data_rows);
    let analytics = enrichment::fetch_enrichment(cfg, ENRICHMENT_QUESTION_ID);
    let contacts = pipeline::enrichment_by_account(&analytics);
    let debtors = pipeline::build_debtors(accounts, &contacts);
    log::info!("{} debtor accounts over threshold", debtors.len());

    let writer = ReportWriter::new(&sheets, &cfg.target_spreadsheet_id);
    writer.write(debtors, Utc::now().date_naive())
}

/// Entry point two: read the written report back and file the reminder
/// ticket.
pub fn run_notify(cfg: &JobConfig) -> SyncResult<()> {
    let sheets = SheetsClient::new(&cfg.google_api_token)?;

    let sheet_id = sheets
        .sheet_id_by_title(&cfg.target_spreadsheet_id, TARGET_SHEET_NAME)?
        .ok_or_else(|| SyncError::WorksheetNotFound {
            title: TARGET_SHEET_NAME.to_string(),
        })?;

    let grid = sheets.values_get(
        &cfg.target_spreadsheet_id,
        &format!("{TARGET_SHEET_NAME}!A1:L"),
    )?;
    let data_rows = if grid.is_empty() { &[][..] } else { &grid[1..] };

    let body = digest::digest_body(&cfg.target_spreadsheet_id, sheet_id, data_rows);

    let tracker = TrackerClient::new(&cfg.tracker_api_token, &cfg.tracker_team_id)?;
    let state_id = tracker.workflow_state_id(&cfg.tracker_status_name)?;
    tracker.create_issue(digest::REMINDER_TITLE, &body, &state_id)?;
    Ok(())
}
