//! The transform pipeline — raw source rows to a ranked debtor list.
//!
//! Every step is a pure function of its input:
//!   1. Keep source rows carrying the account category tag.
//!   2. Project them into SourceAccountRecord.
//!   3. Index enrichment rows by account id.
//!   4. Join by account id and compute the seat overage.
//!   5. Keep records over the reporting thresholds.
//!   6. Rank by overage, largest first.

use crate::enrichment::AnalyticsRow;
use crate::types::AccountId;
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Category tag marking a billing account row in the source sheet.
pub const ACCOUNT_CATEGORY_TAG: &str = "Company";

/// Minimum seat overage before an account is reported.
pub const OVERAGE_THRESHOLD: i64 = 10;

// Source sheet column indices (0-based).
const COL_ACCOUNT_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_PAID_LICENSES: usize = 3;
const COL_ACTIVE_EMPLOYEES: usize = 9;
const COL_CATEGORY: usize = 12;
const COL_LICENSE_PRICE: usize = 13;
const COL_PAYMENT_DATE: usize = 19;
const COL_PAYMENT_METHOD: usize = 20;
const COL_RESPONSIBLE: usize = 22;

/// One billing account row, projected out of the source sheet. Count and
/// price fields stay as sheet text — they are written back verbatim, and
/// only the overage math coerces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAccountRecord {
    pub responsible:      String,
    pub account_id:       AccountId,
    pub name:             String,
    pub paid_licenses:    String,
    pub active_employees: String,
    pub payment_method:   String,
    pub payment_date:     String,
    pub license_price:    String,
}

/// Contact data for one account from the analytics source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentRecord {
    pub email: String,
    pub phone: String,
}

/// A reportable account: source row joined with contact data, plus the
/// computed overage and the carried-forward counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtorRecord {
    pub responsible:      String,
    pub account_id:       AccountId,
    pub name:             String,
    pub email:            String,
    pub phone:            String,
    pub paid_licenses:    String,
    pub active_employees: String,
    pub overage:          i64,
    pub payment_method:   String,
    pub payment_date:     String,
    pub license_price:    String,
    /// None until the carry-forward step runs, and for accounts appearing
    /// for the first time (written as a blank cell).
    pub weeks_unpaid:     Option<i64>,
}

/// Numeric coercion used across the pipeline: blank or non-numeric cells
/// count as zero.
pub fn numeric(cell: &str) -> i64 {
    cell.trim().parse().unwrap_or(0)
}

/// Steps 1–2: filter to account-tagged rows and project them. `data_rows`
/// excludes the header.
pub fn parse_source_rows(data_rows: &[Vec<String>]) -> Vec<SourceAccountRecord> {
    data_rows
        .iter()
        .filter(|row| row.get(COL_CATEGORY).map(String::as_str) == Some(ACCOUNT_CATEGORY_TAG))
        .map(|row| SourceAccountRecord {
            responsible:      cell(row, COL_RESPONSIBLE),
            account_id:       cell(row, COL_ACCOUNT_ID),
            name:             cell(row, COL_NAME),
            paid_licenses:    cell(row, COL_PAID_LICENSES),
            active_employees: cell(row, COL_ACTIVE_EMPLOYEES),
            payment_method:   cell(row, COL_PAYMENT_METHOD),
            payment_date:     cell(row, COL_PAYMENT_DATE),
            license_price:    cell(row, COL_LICENSE_PRICE),
        })
        .collect()
}

/// Step 3: index enrichment rows by account id. Ids arrive formatted with
/// thousands separators on the analytics side; commas are stripped so they
/// match the source sheet's plain ids.
pub fn enrichment_by_account(rows: &[AnalyticsRow]) -> HashMap<AccountId, EnrichmentRecord> {
    rows.iter()
        .filter_map(|row| {
            let id = row.get("id").map(text_value)?.replace(',', "");
            let record = EnrichmentRecord {
                email: row.get("email").map(text_value).unwrap_or_default(),
                phone: row.get("phone_number").map(text_value).unwrap_or_default(),
            };
            Some((id, record))
        })
        .collect()
}

/// Steps 4–6: join, compute overage, filter, rank. Accounts without an
/// enrichment match get blank contact fields — that is a valid outcome, not
/// an error. The sort is stable, so equal overages keep pipeline order.
pub fn build_debtors(
    accounts: Vec<SourceAccountRecord>,
    enrichment: &HashMap<AccountId, EnrichmentRecord>,
) -> Vec<DebtorRecord> {
    let mut debtors: Vec<DebtorRecord> = accounts
        .into_iter()
        .map(|acc| {
            let contact = enrichment.get(&acc.account_id).cloned().unwrap_or_default();
            let overage = numeric(&acc.active_employees) - numeric(&acc.paid_licenses);
            DebtorRecord {
                responsible:      acc.responsible,
                account_id:       acc.account_id,
                name:             acc.name,
                email:            contact.email,
                phone:            contact.phone,
                paid_licenses:    acc.paid_licenses,
                active_employees: acc.active_employees,
                overage,
                payment_method:   acc.payment_method,
                payment_date:     acc.payment_date,
                license_price:    acc.license_price,
                weeks_unpaid:     None,
            }
        })
        .filter(|d| d.overage >= OVERAGE_THRESHOLD && numeric(&d.paid_licenses) > 0)
        .collect();
    debtors.sort_by_key(|d| Reverse(d.overage));
    debtors
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
