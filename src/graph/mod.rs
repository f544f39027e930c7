//! Issue relationship graph: node/edge types and the bounded traversal that builds them.

pub mod assemble;
pub mod links;
pub mod project;

use serde::{Deserialize, Serialize};

pub use assemble::build_graph;

/// Rendering category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Central,
    Parent,
    Requirement,
    Test,
    Defect,
    Related,
}

impl NodeCategory {
    /// Classify a linked issue by its type name.
    ///
    /// Case-insensitive substring match, checked in this order: "requirement",
    /// "test", "bug"/"defect". The first hit wins, so "Test Bug" is a test.
    pub fn classify(issue_type: &str) -> NodeCategory {
        let issue_type = issue_type.to_lowercase();
        if issue_type.contains("requirement") {
            NodeCategory::Requirement
        } else if issue_type.contains("test") {
            NodeCategory::Test
        } else if issue_type.contains("bug") || issue_type.contains("defect") {
            NodeCategory::Defect
        } else {
            NodeCategory::Related
        }
    }
}

/// Flattened issue attributes carried by a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub issue_type: String,
    pub priority: String,
    pub description: String,
    pub updated: String,
    pub created: String,
    pub assignee: String,
    pub reporter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub category: NodeCategory,
    pub data: NodeData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
