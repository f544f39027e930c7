use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A single issue as returned by `GET /rest/api/2/issue/{key}`.
///
/// Only `id` and `key` are required, and `id` must not be blank since it is the
/// node identity in the graph. Everything under `fields` is optional and
/// a nested value with an unexpected shape is read as absent instead of
/// failing the whole record.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRecord {
    #[serde(deserialize_with = "non_blank")]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFields {
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<Named>,
    #[serde(default, deserialize_with = "lenient")]
    pub issuetype: Option<Named>,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<Named>,
    #[serde(default, deserialize_with = "lenient")]
    pub assignee: Option<Person>,
    #[serde(default, deserialize_with = "lenient")]
    pub reporter: Option<Person>,
    #[serde(default, deserialize_with = "lenient")]
    pub creator: Option<Person>,
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub components: Vec<Named>,
    #[serde(default, deserialize_with = "lenient")]
    pub comment: Option<CommentPage>,
    #[serde(default, deserialize_with = "lenient")]
    pub parent: Option<KeyRef>,
    /// Epic Link, the custom field older Jira instances use for epic parents.
    #[serde(rename = "customfield_10014", default, deserialize_with = "lenient")]
    pub epic_link: Option<KeyRef>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub issuelinks: Vec<IssueLink>,
    /// Remaining fields, keyed by field id.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl IssueFields {
    pub fn issue_type_name(&self) -> Option<&str> {
        self.issuetype.as_ref().and_then(|t| t.name.as_deref())
    }
}

/// Any nested object identified by a display `name` (status, type, priority, component).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Person {
    #[serde(rename = "displayName", default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueRef {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
}

/// A reference to another issue, either as an object or as a bare key.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeyRef {
    Reference(IssueRef),
    Key(String),
}

impl KeyRef {
    pub fn key(&self) -> Option<&str> {
        let key = match self {
            KeyRef::Reference(r) => r.key.as_deref()?,
            KeyRef::Key(k) => k.as_str(),
        };
        let key = key.trim();
        (!key.is_empty()).then_some(key)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueLink {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub link_type: Option<LinkType>,
    #[serde(rename = "inwardIssue", default, deserialize_with = "lenient")]
    pub inward_issue: Option<IssueRef>,
    #[serde(rename = "outwardIssue", default, deserialize_with = "lenient")]
    pub outward_issue: Option<IssueRef>,
}

/// Link type metadata, e.g. `{"name": "Blocks", "inward": "is blocked by", "outward": "blocks"}`.
/// Only the direction-specific names are used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkType {
    #[serde(default, deserialize_with = "lenient")]
    pub inward: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub outward: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPage {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Person>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<String>,
}

fn non_blank<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.trim().is_empty() {
        return Err(serde::de::Error::custom("empty issue id"));
    }
    Ok(value)
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
