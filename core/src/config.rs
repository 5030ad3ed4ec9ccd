//! Job configuration, built once at process start and passed into each
//! component.
//!
//! Missing variables deliberately become empty strings instead of startup
//! errors: the job performs no upfront validation, and an absent credential
//! surfaces later as a downstream auth or lookup failure.

use std::env;

#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Spreadsheet holding the billing source rows.
    pub source_spreadsheet_id: String,
    /// Spreadsheet holding the debtor report.
    pub target_spreadsheet_id: String,
    /// OAuth bearer token for the spreadsheet API. Obtaining it (service
    /// account, token broker) is outside this job's scope.
    pub google_api_token: String,

    /// Base URL of the Metabase instance.
    pub analytics_url: String,
    /// HTTP basic auth protecting the Metabase endpoints.
    pub analytics_basic_user: String,
    pub analytics_basic_pass: String,
    /// Metabase application login.
    pub analytics_username: String,
    pub analytics_password: String,

    /// Linear API token, passed verbatim in the Authorization header.
    pub tracker_api_token: String,
    pub tracker_team_id: String,
    /// Human-readable workflow status the reminder ticket is created in.
    pub tracker_status_name: String,

    /// SOCKS proxy routing the analytics transport. Empty disables proxying.
    pub proxy_url: String,
}

impl JobConfig {
    pub fn from_env() -> Self {
        Self {
            source_spreadsheet_id: var("SOURCE_SHEET_ID"),
            target_spreadsheet_id: var("TARGET_SHEET_ID"),
            google_api_token:      var("GOOGLE_API_TOKEN"),
            analytics_url:         var("METABASE_URL"),
            analytics_basic_user:  var("BASIC_AUTH_USER"),
            analytics_basic_pass:  var("BASIC_AUTH_PASS"),
            analytics_username:    var("METABASE_USERNAME"),
            analytics_password:    var("METABASE_PASSWORD"),
            tracker_api_token:     var("LINEAR_API_TOKEN"),
            tracker_team_id:       var("LINEAR_TEAM_ID"),
            tracker_status_name:   var("LINEAR_STATUS_NAME"),
            proxy_url:             var("PROXY_URL"),
        }
    }
}

fn var(name: &str) -> String {
    env::var(name).unwrap_or_default()
}
