//! Reminder digest — turns the written report back into ticket text.
//!
//! Rows are grouped by whether the responsible owner already has a `@`
//! handle (those sort first), then case-insensitively by owner. Each line
//! carries the handle, the account, the overage, and an urgency marker
//! driven by the weeks-unpaid counter.

use crate::types::CellGrid;

/// Fixed title of the reminder ticket.
pub const REMINDER_TITLE: &str = "Contact overdue accounts";

// Report column indices (0-based) as read back from the target sheet.
const COL_RESPONSIBLE: usize = 0;
const COL_ACCOUNT_ID: usize = 1;
const COL_NAME: usize = 2;
const COL_OVERAGE: usize = 7;
const COL_WEEKS_UNPAID: usize = 11;

/// `@`-handled owners ahead of the rest; ties case-insensitive by owner.
pub fn sort_for_digest(rows: &mut [Vec<String>]) {
    rows.sort_by(|a, b| {
        let key = |row: &[String]| {
            let owner = row.first().map(String::as_str).unwrap_or("");
            (!owner.starts_with('@'), owner.to_lowercase())
        };
        key(a).cmp(&key(b))
    });
}

/// One digest line: `@owner id name | +N licenses <marker>`.
/// The marker is 🟨 at exactly two unpaid weeks, 🟥 beyond, none below.
pub fn digest_line(row: &[String]) -> String {
    let owner = match cell(row, COL_RESPONSIBLE) {
        o if o.is_empty() => String::new(),
        o if o.starts_with('@') => o,
        o => format!("@{o}"),
    };
    let id = cell(row, COL_ACCOUNT_ID);
    let name = cell(row, COL_NAME);
    let overage = match cell(row, COL_OVERAGE) {
        o if o.is_empty() => String::new(),
        o => format!("+{o} licenses"),
    };
    let weeks: i64 = cell(row, COL_WEEKS_UNPAID).trim().parse().unwrap_or(0);
    let marker = match weeks {
        2 => "🟨",
        w if w > 2 => "🟥",
        _ => "",
    };
    format!("{owner} {id} {name} | {overage} {marker}")
        .trim()
        .to_string()
}

/// Full ticket body: markdown link to the report, blank line, one line per
/// debtor row. `data_rows` excludes the header.
pub fn digest_body(spreadsheet_id: &str, sheet_id: i64, data_rows: &[Vec<String>]) -> String {
    let mut rows = data_rows.to_vec();
    sort_for_digest(&mut rows);
    let lines: Vec<String> = rows.iter().map(|row| digest_line(row)).collect();
    format!(
        "[Report](https://docs.google.com/spreadsheets/d/{spreadsheet_id}/edit?gid={sheet_id}#gid={sheet_id})\n\n{}",
        lines.join("\n")
    )
    .trim_end()
    .to_string()
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}
