//! Issue tracker client — Linear GraphQL API.
//!
//! Both operations fail hard: a sync week without its reminder ticket is an
//! operator-visible error, not something to degrade quietly. No retries;
//! the next scheduled trigger is the only recovery.

use crate::error::{SyncError, SyncResult};
use reqwest::blocking::Client;
use serde_json::{json, Value};

const GRAPHQL_ENDPOINT: &str = "https://api.linear.app/graphql";

pub struct TrackerClient {
    http: Client,
    api_token: String,
    team_id: String,
}

impl TrackerClient {
    pub fn new(api_token: &str, team_id: &str) -> SyncResult<Self> {
        Ok(Self {
            http: Client::builder().build()?,
            api_token: api_token.to_string(),
            team_id: team_id.to_string(),
        })
    }

    /// Resolve a workflow state id by its human-readable status name.
    /// Exact match only.
    pub fn workflow_state_id(&self, status_name: &str) -> SyncResult<String> {
        const QUERY: &str = r#"
            query GetWorkflowStates($teamId: String!) {
              team(id: $teamId) {
                states {
                  nodes { id name }
                }
              }
            }"#;
        let body = self.post(QUERY, json!({ "teamId": self.team_id }))?;
        body["data"]["team"]["states"]["nodes"]
            .as_array()
            .into_iter()
            .flatten()
            .find(|state| state["name"].as_str() == Some(status_name))
            .and_then(|state| state["id"].as_str())
            .map(str::to_string)
            .ok_or_else(|| SyncError::StateNotFound {
                name: status_name.to_string(),
                team: self.team_id.clone(),
            })
    }

    /// Create the reminder issue; errors unless the mutation reports
    /// success.
    pub fn create_issue(
        &self,
        title: &str,
        description: &str,
        state_id: &str,
    ) -> SyncResult<String> {
        const MUTATION: &str = r#"
            mutation CreateIssue($input: IssueCreateInput!) {
              issueCreate(input: $input) {
                success
                issue { id title }
              }
            }"#;
        let body = self.post(
            MUTATION,
            json!({
                "input": {
                    "teamId": self.team_id,
                    "title": title,
                    "description": description,
                    "stateId": state_id,
                }
            }),
        )?;
        let create = &body["data"]["issueCreate"];
        if create["success"].as_bool() != Some(true) {
            return Err(SyncError::IssueCreateFailed {
                detail: body["errors"].to_string(),
            });
        }
        let issue_id = create["issue"]["id"].as_str().unwrap_or_default().to_string();
        log::info!("reminder issue created: {issue_id}");
        Ok(issue_id)
    }

    fn post(&self, query: &str, variables: Value) -> SyncResult<Value> {
        let body: Value = self
            .http
            .post(GRAPHQL_ENDPOINT)
            .header("Authorization", &self.api_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()?
            .error_for_status()?
            .json()?;
        Ok(body)
    }
}
