use futures::stream::{self, StreamExt};
use tracing::warn;

use super::project::UNKNOWN;
use crate::model::issue::{IssueFields, IssueLink, IssueRecord, KeyRef};
use crate::tracker::IssueSource;

pub const DEFAULT_RELATIONSHIP: &str = "relates to";
pub const CHILD_OF: &str = "is child of";

/// Upper bound on linked-issue fetches in flight for one issue.
pub const MAX_CONCURRENT_FETCHES: usize = 8;

/// Which side of a link the *other* issue sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inward,
    Outward,
}

/// A resolved relationship to a fetched neighbour issue.
#[derive(Debug, Clone)]
pub struct LinkDescriptor {
    pub target_key: String,
    pub direction: Direction,
    pub relationship: String,
    pub target_issue_type: String,
    pub target: IssueRecord,
}

impl LinkDescriptor {
    fn new(
        target_key: String,
        direction: Direction,
        relationship: String,
        target: IssueRecord,
    ) -> Self {
        let target_issue_type = target
            .fields
            .issue_type_name()
            .unwrap_or(UNKNOWN)
            .to_string();
        Self {
            target_key,
            direction,
            relationship,
            target_issue_type,
            target,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct PendingLink {
    key: String,
    direction: Direction,
    relationship: String,
}

/// Resolve and fetch every issue linked from `issue`.
///
/// Targets are fetched at most [`MAX_CONCURRENT_FETCHES`] at a time and
/// returned in link order. A target that cannot be fetched is logged and left out.
pub async fn extract_links<S>(source: &S, issue: &IssueRecord) -> Vec<LinkDescriptor>
where
    S: IssueSource + ?Sized,
{
    let pending: Vec<PendingLink> = issue
        .fields
        .issuelinks
        .iter()
        .filter_map(resolve_link)
        .collect();

    let fetches: Vec<_> = pending
        .iter()
        .map(|link| source.fetch_issue(&link.key))
        .collect();
    let fetched: Vec<_> = stream::iter(fetches)
        .buffered(MAX_CONCURRENT_FETCHES)
        .collect()
        .await;

    pending
        .into_iter()
        .zip(fetched)
        .filter_map(|(link, result)| match result {
            Ok(target) => Some(LinkDescriptor::new(
                link.key,
                link.direction,
                link.relationship,
                target,
            )),
            Err(e) => {
                warn!(issue = %issue.key, linked = %link.key, error = %e, "skipping linked issue");
                None
            }
        })
        .collect()
}

/// Resolve and fetch the parent of `issue`, if it has one that can be fetched.
pub async fn extract_parent<S>(source: &S, issue: &IssueRecord) -> Option<LinkDescriptor>
where
    S: IssueSource + ?Sized,
{
    let key = parent_key(&issue.fields)?;
    match source.fetch_issue(&key).await {
        Ok(parent) => Some(LinkDescriptor::new(
            key,
            Direction::Inward,
            CHILD_OF.to_string(),
            parent,
        )),
        Err(e) => {
            warn!(issue = %issue.key, parent = %key, error = %e, "skipping parent issue");
            None
        }
    }
}

fn resolve_link(link: &IssueLink) -> Option<PendingLink> {
    let link_type = link.link_type.as_ref();
    let (target, direction, label) = if let Some(target) = &link.inward_issue {
        (target, Direction::Inward, link_type.and_then(|t| t.inward.as_deref()))
    } else if let Some(target) = &link.outward_issue {
        (target, Direction::Outward, link_type.and_then(|t| t.outward.as_deref()))
    } else {
        return None;
    };

    let key = target.key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
    Some(PendingLink {
        key: key.to_string(),
        direction,
        relationship: label.unwrap_or(DEFAULT_RELATIONSHIP).to_string(),
    })
}

/// Parent key lookup: explicit `parent` reference, then Epic Link, then any
/// field whose name mentions "parent".
fn parent_key(fields: &IssueFields) -> Option<String> {
    let (explicit, bare) = match &fields.parent {
        Some(parent @ KeyRef::Reference(_)) => (parent.key(), None),
        Some(parent @ KeyRef::Key(_)) => (None, parent.key()),
        None => (None, None),
    };
    let epic = fields.epic_link.as_ref().and_then(KeyRef::key);
    if let Some(key) = explicit.or(epic).or(bare) {
        return Some(key.to_string());
    }

    fields
        .other
        .iter()
        .filter(|(name, _)| name.to_lowercase().contains("parent"))
        .find_map(|(_, value)| match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Object(obj) => obj
                .get("key")
                .and_then(|k| k.as_str())
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from),
            _ => None,
        })
}
