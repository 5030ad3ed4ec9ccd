//! Report writer — persists the ranked debtor list to the target sheet.
//!
//! The sheet itself is the only durable state between runs: the "weeks
//! unpaid" counter survives by re-reading column L of the previous report
//! strictly before the region is cleared. Write order is fixed:
//!   1. resolve the worksheet id by title (miss → log and bail out)
//!   2. snapshot the previous data rows (counter source)
//!   3. clear values and formatting in rows 2+, columns A–L
//!   4. write header + data rows at A1
//!   5. center-align column B and columns E–L
//!   6. highlight rows whose payment date sits inside the 30-day horizon
//! Steps 3–6 are one batched request each. A failure aborts the run and
//! nothing is rolled back: values can land without their formatting.

use crate::{
    error::SyncResult,
    pipeline::DebtorRecord,
    sheets::SheetsClient,
    types::{AccountId, CellGrid},
};
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Title of the worksheet the report is written to.
pub const TARGET_SHEET_NAME: &str = "Debtors";

pub const REPORT_HEADER: [&str; 12] = [
    "Responsible",
    "company id",
    "Name",
    "email",
    "Phone",
    "Paid licenses",
    "Active employees",
    "Overage",
    "Payment method",
    "Payment date",
    "License price",
    "Weeks unpaid",
];

// Report column indices (0-based) used when reading the sheet back.
const COL_ACCOUNT_ID: usize = 1;
const COL_WEEKS_UNPAID: usize = 11;

/// Payment dates closer than this many days out get the row highlighted.
const HIGHLIGHT_HORIZON_DAYS: i64 = 30;

// ── Counter carry-forward ────────────────────────────────────────────────────

/// Account id → counter value from the pre-overwrite snapshot (A2:L).
/// Blank or unparseable counters count as zero.
pub fn previous_counters(snapshot: &CellGrid) -> HashMap<AccountId, i64> {
    let mut map = HashMap::new();
    for row in snapshot {
        let Some(id) = row.get(COL_ACCOUNT_ID) else { continue };
        if id.is_empty() {
            continue;
        }
        let weeks = row
            .get(COL_WEEKS_UNPAID)
            .and_then(|c| c.trim().parse().ok())
            .unwrap_or(0);
        map.insert(id.clone(), weeks);
    }
    map
}

/// Accounts present in the previous report advance by two weeks; accounts
/// appearing for the first time stay blank.
pub fn carry_forward(debtors: &mut [DebtorRecord], previous: &HashMap<AccountId, i64>) {
    for d in debtors.iter_mut() {
        d.weeks_unpaid = previous.get(&d.account_id).map(|p| p + 2);
    }
}

// ── Rendering and highlighting (pure) ────────────────────────────────────────

/// Header plus one 12-column row per record, in rank order.
pub fn render_rows(debtors: &[DebtorRecord]) -> CellGrid {
    let mut rows: CellGrid = Vec::with_capacity(debtors.len() + 1);
    rows.push(REPORT_HEADER.iter().map(|h| h.to_string()).collect());
    for d in debtors {
        rows.push(vec![
            d.responsible.clone(),
            d.account_id.clone(),
            d.name.clone(),
            d.email.clone(),
            d.phone.clone(),
            d.paid_licenses.clone(),
            d.active_employees.clone(),
            d.overage.to_string(),
            d.payment_method.clone(),
            d.payment_date.clone(),
            d.license_price.clone(),
            d.weeks_unpaid.map(|w| w.to_string()).unwrap_or_default(),
        ]);
    }
    rows
}

/// `dd.mm.yy` or `dd.mm.yyyy`. Anything else — including calendar-invalid
/// dates — is None, and the row is simply not highlighted.
pub fn parse_payment_date(cell: &str) -> Option<NaiveDate> {
    let mut parts = cell.trim().split('.');
    let day: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let year_raw = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let year: i32 = year_raw.parse().ok()?;
    let year = if year_raw.len() == 2 { 2000 + year } else { year };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Indices (into `debtors`) of rows due a highlight: the payment date
/// parses and falls strictly before `today` + 30 days.
pub fn rows_to_highlight(debtors: &[DebtorRecord], today: NaiveDate) -> Vec<usize> {
    let horizon = today + Duration::days(HIGHLIGHT_HORIZON_DAYS);
    debtors
        .iter()
        .enumerate()
        .filter(|(_, d)| parse_payment_date(&d.payment_date).is_some_and(|date| date < horizon))
        .map(|(i, _)| i)
        .collect()
}

fn pale_yellow() -> Value {
    json!({ "red": 1.0, "green": 0.9764706, "blue": 0.76862746 })
}

// ── Writer ───────────────────────────────────────────────────────────────────

pub struct ReportWriter<'a> {
    sheets: &'a SheetsClient,
    spreadsheet_id: &'a str,
}

impl<'a> ReportWriter<'a> {
    pub fn new(sheets: &'a SheetsClient, spreadsheet_id: &'a str) -> Self {
        Self { sheets, spreadsheet_id }
    }

    pub fn write(&self, mut debtors: Vec<DebtorRecord>, today: NaiveDate) -> SyncResult<()> {
        let Some(sheet_id) = self
            .sheets
            .sheet_id_by_title(self.spreadsheet_id, TARGET_SHEET_NAME)?
        else {
            log::error!("worksheet '{TARGET_SHEET_NAME}' not found, nothing written");
            return Ok(());
        };

        // Counter source. Must be read before the clear below destroys it.
        let snapshot = self
            .sheets
            .values_get(self.spreadsheet_id, &format!("{TARGET_SHEET_NAME}!A2:L"))?;
        let previous = previous_counters(&snapshot);
        carry_forward(&mut debtors, &previous);

        self.clear_data_region(sheet_id)?;
        log::info!("cleared values and formatting in A2:L");

        self.sheets.values_update(
            self.spreadsheet_id,
            &format!("{TARGET_SHEET_NAME}!A1"),
            &render_rows(&debtors),
        )?;
        log::info!("wrote {} report rows to '{TARGET_SHEET_NAME}'", debtors.len());

        self.apply_alignment(sheet_id)?;
        log::info!("center-aligned column B and columns E-L");

        let highlighted = self.apply_highlights(sheet_id, &debtors, today)?;
        if highlighted > 0 {
            log::info!("highlighted {highlighted} rows inside the payment horizon");
        }
        Ok(())
    }

    fn clear_data_region(&self, sheet_id: i64) -> SyncResult<()> {
        self.sheets.batch_update(
            self.spreadsheet_id,
            vec![json!({
                "updateCells": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": 1,
                        "startColumnIndex": 0,
                        "endColumnIndex": 12
                    },
                    "fields": "userEnteredValue,userEnteredFormat"
                }
            })],
        )
    }

    fn apply_alignment(&self, sheet_id: i64) -> SyncResult<()> {
        let center = |start: u32, end: u32| {
            json!({
                "repeatCell": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": 1,
                        "startColumnIndex": start,
                        "endColumnIndex": end
                    },
                    "cell": { "userEnteredFormat": { "horizontalAlignment": "CENTER" } },
                    "fields": "userEnteredFormat.horizontalAlignment"
                }
            })
        };
        // Column B, then E through L.
        self.sheets
            .batch_update(self.spreadsheet_id, vec![center(1, 2), center(4, 12)])
    }

    fn apply_highlights(
        &self,
        sheet_id: i64,
        debtors: &[DebtorRecord],
        today: NaiveDate,
    ) -> SyncResult<usize> {
        let requests: Vec<Value> = rows_to_highlight(debtors, today)
            .into_iter()
            .map(|i| {
                // Data row i sits on sheet row i + 1 (row 0 is the header).
                json!({
                    "repeatCell": {
                        "range": {
                            "sheetId": sheet_id,
                            "startRowIndex": i + 1,
                            "endRowIndex": i + 2,
                            "startColumnIndex": 0,
                            "endColumnIndex": 12
                        },
                        "cell": { "userEnteredFormat": { "backgroundColor": pale_yellow() } },
                        "fields": "userEnteredFormat.backgroundColor"
                    }
                })
            })
            .collect();
        let count = requests.len();
        if count > 0 {
            self.sheets.batch_update(self.spreadsheet_id, requests)?;
        }
        Ok(count)
    }
}
