//! Thin client for the Google Sheets v4 REST API.
//!
//! RULE: only this module talks to the spreadsheet service. Components call
//! these methods — they never assemble sheet HTTP requests themselves.
//!
//! No explicit timeout and no retries: a transport failure aborts the run,
//! and the next scheduled trigger is the recovery mechanism.

use crate::{error::SyncResult, types::CellGrid};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Deserialize)]
struct ValuesResponse {
    /// Absent entirely when the range holds no data.
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct SheetsClient {
    http: Client,
    token: String,
}

impl SheetsClient {
    pub fn new(token: &str) -> SyncResult<Self> {
        Ok(Self {
            http: Client::builder().build()?,
            token: token.to_string(),
        })
    }

    /// Read a range of values. A range with no data comes back without a
    /// `values` key — that is an empty grid, not an error.
    pub fn values_get(&self, spreadsheet_id: &str, range: &str) -> SyncResult<CellGrid> {
        let url = format!("{API_BASE}/{spreadsheet_id}/values/{range}");
        let body: ValuesResponse = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    /// Overwrite a range verbatim (RAW input — no formula evaluation).
    pub fn values_update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &CellGrid,
    ) -> SyncResult<()> {
        let url = format!("{API_BASE}/{spreadsheet_id}/values/{range}");
        self.http
            .put(&url)
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": rows }))
            .send()?
            .error_for_status()?;
        Ok(())
    }

    /// Resolve a worksheet's internal numeric id by its title.
    pub fn sheet_id_by_title(
        &self,
        spreadsheet_id: &str,
        title: &str,
    ) -> SyncResult<Option<i64>> {
        let url = format!("{API_BASE}/{spreadsheet_id}");
        let body: Value = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("fields", "sheets.properties")])
            .send()?
            .error_for_status()?
            .json()?;
        let id = body["sheets"]
            .as_array()
            .into_iter()
            .flatten()
            .find(|sheet| sheet["properties"]["title"].as_str() == Some(title))
            .and_then(|sheet| sheet["properties"]["sheetId"].as_i64());
        Ok(id)
    }

    /// Submit one batched set of `updateCells`/`repeatCell` requests.
    pub fn batch_update(&self, spreadsheet_id: &str, requests: Vec<Value>) -> SyncResult<()> {
        let url = format!("{API_BASE}/{spreadsheet_id}:batchUpdate");
        self.http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "requests": requests }))
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
