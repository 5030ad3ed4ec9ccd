use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Worksheet '{title}' not found in target spreadsheet")]
    WorksheetNotFound { title: String },

    #[error("Workflow state '{name}' not found in team '{team}'")]
    StateNotFound { name: String, team: String },

    #[error("Issue creation rejected by tracker: {detail}")]
    IssueCreateFailed { detail: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
