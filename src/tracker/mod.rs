pub mod error;
pub mod jira;

use async_trait::async_trait;

use crate::model::issue::IssueRecord;

pub use error::FetchError;

/// Where the traversal reads issues from.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetch one issue by its human key (e.g. `PROJ-123`). One remote call, no retries.
    async fn fetch_issue(&self, key: &str) -> Result<IssueRecord, FetchError>;
}
