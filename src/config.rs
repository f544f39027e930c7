use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::model::credentials::Credentials;

#[derive(Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Defaults offered to the client before the user enters credentials.
#[derive(Deserialize, Default, Clone)]
#[serde(default)]
pub struct JiraConfig {
    pub username: String,
    pub api_token: String,
    pub base_url: String,
    pub project_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    /// Timeout for each outbound tracker request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn default_credentials(&self) -> Credentials {
        Credentials {
            username: self.jira.username.clone(),
            api_token: self.jira.api_token.clone(),
            base_url: self.jira.base_url.clone(),
            project_id: self.jira.project_id.clone(),
            start_issue_key: String::new(),
        }
    }

    /// Override credential defaults from `JIRA_*` variables.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let jira = &mut self.jira;
        for (var, slot) in [
            ("JIRA_USERNAME", &mut jira.username),
            ("JIRA_API_TOKEN", &mut jira.api_token),
            ("JIRA_BASE_URL", &mut jira.base_url),
            ("JIRA_PROJECT_ID", &mut jira.project_id),
        ] {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                *slot = value;
            }
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".issue-graph")
        .join("config.toml")
}

/// Load the config file (a missing file means defaults), then apply the environment.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let mut config = read_config_file(path)?;
    config.apply_env(|var| std::env::var(var).ok());
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = read_config_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.jira.base_url, "");
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn reads_jira_and_http_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[jira]
username = "ada@example.com"
base_url = "https://example.atlassian.net"

[http]
timeout_secs = 5
"#,
        )
        .unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.jira.username, "ada@example.com");
        assert_eq!(config.jira.base_url, "https://example.atlassian.net");
        assert_eq!(config.jira.api_token, "");
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[jira\nusername = ").unwrap();
        let err = read_config_file(&path).err().unwrap();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = AppConfig::default();
        config.jira.username = "from-file".into();
        config.jira.project_id = "PROJ".into();

        let env: HashMap<&str, &str> = [
            ("JIRA_USERNAME", "from-env"),
            ("JIRA_API_TOKEN", "tok"),
            ("JIRA_PROJECT_ID", ""),
        ]
        .into_iter()
        .collect();
        config.apply_env(|var| env.get(var).map(|v| v.to_string()));

        let creds = config.default_credentials();
        assert_eq!(creds.username, "from-env");
        assert_eq!(creds.api_token, "tok");
        assert_eq!(creds.project_id, "PROJ");
        assert_eq!(creds.start_issue_key, "");
    }
}
