use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracker credentials supplied with every request. Never persisted.
///
/// `username`, `api_token` and `base_url` must be present in a request body.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub api_token: String,
    pub base_url: String,
    #[serde(default)]
    pub project_id: String,
    /// Key of the issue the traversal starts from.
    #[serde(rename = "central_jira_id", alias = "start_issue_key", default)]
    pub start_issue_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_token", &"[MASKED]")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("start_issue_key", &self.start_issue_key)
            .finish()
    }
}

/// Body of the issue-details request: credentials plus the issue to describe.
#[derive(Clone, Default, Deserialize)]
pub struct IssueDetailsRequest {
    pub username: String,
    pub api_token: String,
    pub base_url: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub issue_key: String,
}

impl IssueDetailsRequest {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            api_token: self.api_token.clone(),
            base_url: self.base_url.clone(),
            project_id: self.project_id.clone(),
            start_issue_key: self.issue_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_masks_token() {
        let creds = Credentials {
            username: "ada".into(),
            api_token: "s3cret".into(),
            ..Default::default()
        };
        let printed = format!("{creds:?}");
        assert!(printed.contains("ada"));
        assert!(!printed.contains("s3cret"));
    }

    #[test]
    fn start_key_uses_wire_name() {
        let creds: Credentials = serde_json::from_str(
            r#"{"username":"u","api_token":"t","base_url":"https://x","central_jira_id":"PROJ-1"}"#,
        )
        .unwrap();
        assert_eq!(creds.start_issue_key, "PROJ-1");
        assert_eq!(creds.project_id, "");

        let json = serde_json::to_string(&creds).unwrap();
        assert!(json.contains("\"central_jira_id\":\"PROJ-1\""));
    }

    #[test]
    fn connection_fields_are_required() {
        for missing in ["username", "api_token", "base_url"] {
            let mut body = serde_json::json!({
                "username": "u",
                "api_token": "t",
                "base_url": "https://x",
                "central_jira_id": "PROJ-1"
            });
            body.as_object_mut().unwrap().remove(missing);
            let result = serde_json::from_value::<Credentials>(body);
            assert!(result.is_err(), "{missing} was optional");
        }
    }
}
