use thiserror::Error;

/// Why a single issue could not be fetched from the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Missing JIRA issue key")]
    InvalidKey,
    #[error("Authentication failed. Check your JIRA credentials.")]
    Authentication,
    #[error("JIRA issue {0} not found.")]
    NotFound(String),
    #[error("JIRA API error: {status} {body}")]
    Upstream { status: u16, body: String },
    #[error("Error connecting to JIRA: {0}")]
    Connectivity(String),
    #[error("Unexpected JIRA response for {key}: {reason}")]
    MalformedResponse { key: String, reason: String },
}
