use std::sync::atomic::{AtomicU64, Ordering};

use super::{GraphEdge, GraphNode, NodeCategory, NodeData};
use crate::model::issue::{IssueRecord, Named, Person};
use crate::util::rich_text::plain_text;

pub const UNKNOWN: &str = "Unknown";
pub const NO_SUMMARY: &str = "No summary";
pub const NO_PRIORITY: &str = "None";
pub const UNASSIGNED: &str = "Unassigned";
const MISSING_ISSUE: &str = "Missing issue data";

static PLACEHOLDER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Project an issue into a graph node. A missing record becomes a placeholder node.
pub fn project_node(issue: Option<&IssueRecord>, category: NodeCategory) -> GraphNode {
    let Some(issue) = issue else {
        return GraphNode {
            id: placeholder_id(),
            category,
            data: NodeData {
                key: UNKNOWN.into(),
                summary: MISSING_ISSUE.into(),
                status: UNKNOWN.into(),
                issue_type: UNKNOWN.into(),
                priority: NO_PRIORITY.into(),
                description: String::new(),
                updated: String::new(),
                created: String::new(),
                assignee: UNASSIGNED.into(),
                reporter: UNKNOWN.into(),
            },
        };
    };

    let fields = &issue.fields;
    GraphNode {
        id: issue.id.clone(),
        category,
        data: NodeData {
            key: non_empty_or(&issue.key, UNKNOWN),
            summary: fields.summary.clone().unwrap_or_else(|| NO_SUMMARY.into()),
            status: name_or(fields.status.as_ref(), UNKNOWN),
            issue_type: name_or(fields.issuetype.as_ref(), UNKNOWN),
            priority: name_or(fields.priority.as_ref(), NO_PRIORITY),
            description: fields
                .description
                .as_ref()
                .and_then(plain_text)
                .unwrap_or_default(),
            updated: fields.updated.clone().unwrap_or_default(),
            created: fields.created.clone().unwrap_or_default(),
            assignee: person_or(fields.assignee.as_ref(), UNASSIGNED),
            reporter: person_or(fields.reporter.as_ref(), UNKNOWN),
        },
    }
}

/// Build an edge between two node ids. Returns `None` if either id is empty.
pub fn project_edge(source: &str, target: &str, label: &str) -> Option<GraphEdge> {
    if source.is_empty() || target.is_empty() {
        return None;
    }
    Some(GraphEdge {
        id: format!("e{source}-{target}"),
        source: source.to_string(),
        target: target.to_string(),
        label: label.to_string(),
    })
}

pub fn name_or(named: Option<&Named>, fallback: &str) -> String {
    named
        .and_then(|n| n.name.clone())
        .unwrap_or_else(|| fallback.to_string())
}

pub fn person_or(person: Option<&Person>, fallback: &str) -> String {
    person
        .and_then(|p| p.display_name.clone())
        .unwrap_or_else(|| fallback.to_string())
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn placeholder_id() -> String {
    format!("unknown-{}", PLACEHOLDER_SEQ.fetch_add(1, Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> IssueRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn flattens_nested_fields() {
        let issue = record(json!({
            "id": "10001",
            "key": "PROJ-1",
            "fields": {
                "summary": "Checkout flow",
                "status": {"name": "Done"},
                "issuetype": {"name": "Story"},
                "priority": {"name": "High"},
                "assignee": {"displayName": "Ada"},
                "reporter": {"displayName": "Grace"},
                "description": "As a buyer...",
                "created": "2024-01-02T10:00:00.000+0000",
                "updated": "2024-01-03T10:00:00.000+0000"
            }
        }));

        let node = project_node(Some(&issue), NodeCategory::Central);
        assert_eq!(node.id, "10001");
        assert_eq!(node.category, NodeCategory::Central);
        assert_eq!(node.data.key, "PROJ-1");
        assert_eq!(node.data.summary, "Checkout flow");
        assert_eq!(node.data.status, "Done");
        assert_eq!(node.data.issue_type, "Story");
        assert_eq!(node.data.priority, "High");
        assert_eq!(node.data.assignee, "Ada");
        assert_eq!(node.data.reporter, "Grace");
        assert_eq!(node.data.description, "As a buyer...");
    }

    #[test]
    fn absent_fields_fall_back() {
        let issue = record(json!({"id": "7", "key": "PROJ-7", "fields": {"assignee": null}}));
        let node = project_node(Some(&issue), NodeCategory::Related);
        assert_eq!(node.data.summary, NO_SUMMARY);
        assert_eq!(node.data.status, UNKNOWN);
        assert_eq!(node.data.issue_type, UNKNOWN);
        assert_eq!(node.data.priority, NO_PRIORITY);
        assert_eq!(node.data.assignee, UNASSIGNED);
        assert_eq!(node.data.reporter, UNKNOWN);
        assert_eq!(node.data.description, "");
    }

    #[test]
    fn missing_record_yields_placeholder() {
        let a = project_node(None, NodeCategory::Test);
        let b = project_node(None, NodeCategory::Test);
        assert!(a.id.starts_with("unknown-"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.data.summary, "Missing issue data");
        assert_eq!(a.data.assignee, UNASSIGNED);
    }

    #[test]
    fn edge_id_and_validation() {
        let edge = project_edge("1", "2", "blocks").unwrap();
        assert_eq!(edge.id, "e1-2");
        assert_eq!(edge.source, "1");
        assert_eq!(edge.target, "2");
        assert_eq!(edge.label, "blocks");
        assert!(project_edge("", "2", "blocks").is_none());
        assert!(project_edge("1", "", "blocks").is_none());
    }
}
