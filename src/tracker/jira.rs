use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{FetchError, IssueSource};
use crate::model::credentials::Credentials;
use crate::model::issue::IssueRecord;

/// Jira REST v2 client bound to one set of credentials.
pub struct JiraClient {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl JiraClient {
    pub fn new(credentials: &Credentials, client: reqwest::Client) -> Self {
        let creds = format!("{}:{}", credentials.username, credentials.api_token);
        let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
        Self {
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {encoded}"),
            client,
        }
    }

    /// The account the credentials belong to, as returned by `/rest/api/2/myself`.
    pub async fn myself(&self) -> Result<Value, FetchError> {
        self.get_json("myself", None).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        issue_key: Option<&str>,
    ) -> Result<T, FetchError> {
        let url = format!("{}/rest/api/2/{path}", self.base_url);
        debug!(%url, "jira request");

        let resp = self
            .client
            .get(&url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Connectivity(e.to_string()))?;

        let status = resp.status();
        match status {
            StatusCode::UNAUTHORIZED => return Err(FetchError::Authentication),
            StatusCode::NOT_FOUND => {
                if let Some(key) = issue_key {
                    return Err(FetchError::NotFound(key.to_string()));
                }
            }
            _ => {}
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Connectivity(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::MalformedResponse {
            key: issue_key.unwrap_or(path).to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn fetch_issue(&self, key: &str) -> Result<IssueRecord, FetchError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(FetchError::InvalidKey);
        }
        let path = format!("issue/{}", urlencoding::encode(key));
        self.get_json(&path, Some(key)).await
    }
}
