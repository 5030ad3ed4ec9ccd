//! Contact enrichment fetcher — Metabase card query API.
//!
//! Exchanges the application login for a session token (the endpoint itself
//! sits behind HTTP basic auth), then pulls the question's row data in one
//! request. Bounded to the first 1000 rows, offset 0 — there is no
//! pagination, a known limitation preserved as-is.
//!
//! Fetches fail soft: any transport, auth, or shape problem is logged and
//! degrades to an empty result set, and the sync run continues with blank
//! contact fields.

use crate::config::JobConfig;
use reqwest::blocking::Client;
use reqwest::Proxy;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// One analytics row, keyed by column display name (falling back to the
/// column name when no display name is set).
pub type AnalyticsRow = HashMap<String, Value>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const ROW_LIMIT: u32 = 1000;

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
}

pub fn fetch_enrichment(cfg: &JobConfig, question_id: u64) -> Vec<AnalyticsRow> {
    match try_fetch(cfg, question_id) {
        Ok(rows) => {
            log::info!("fetched {} analytics rows", rows.len());
            rows
        }
        Err(err) => {
            log::error!("analytics fetch failed, continuing without enrichment: {err}");
            Vec::new()
        }
    }
}

fn try_fetch(cfg: &JobConfig, question_id: u64) -> anyhow::Result<Vec<AnalyticsRow>> {
    let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);
    if !cfg.proxy_url.is_empty() {
        builder = builder.proxy(Proxy::all(&cfg.proxy_url)?);
    }
    let http = builder.build()?;

    log::debug!("requesting analytics session token");
    let session: SessionResponse = http
        .post(format!("{}/api/session", cfg.analytics_url))
        .basic_auth(&cfg.analytics_basic_user, Some(&cfg.analytics_basic_pass))
        .json(&serde_json::json!({
            "username": cfg.analytics_username,
            "password": cfg.analytics_password,
        }))
        .send()?
        .error_for_status()?
        .json()?;

    log::debug!("querying question {question_id} ({ROW_LIMIT} row bound)");
    let body: Value = http
        .post(format!("{}/api/card/{question_id}/query", cfg.analytics_url))
        .basic_auth(&cfg.analytics_basic_user, Some(&cfg.analytics_basic_pass))
        .header("X-Metabase-Session", &session.id)
        .query(&[("limit", ROW_LIMIT.to_string()), ("offset", "0".into())])
        .json(&serde_json::json!({}))
        .send()?
        .error_for_status()?
        .json()?;

    Ok(map_rows(&body["data"]))
}

/// Zip raw row arrays with the column metadata into name → value maps.
pub fn map_rows(data: &Value) -> Vec<AnalyticsRow> {
    let columns: Vec<String> = data["results_metadata"]["columns"]
        .as_array()
        .into_iter()
        .flatten()
        .map(|col| {
            col["display_name"]
                .as_str()
                .or_else(|| col["name"].as_str())
                .unwrap_or_default()
                .to_string()
        })
        .collect();

    data["rows"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .map(|cells| {
            cells
                .iter()
                .enumerate()
                .filter_map(|(i, value)| columns.get(i).map(|name| (name.clone(), value.clone())))
                .collect()
        })
        .collect()
}
