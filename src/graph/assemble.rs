use std::collections::HashSet;

use tracing::{debug, info};

use super::links::{extract_links, extract_parent, Direction, LinkDescriptor};
use super::project::{project_edge, project_node};
use super::{Graph, GraphNode, NodeCategory};
use crate::model::issue::IssueRecord;
use crate::tracker::{FetchError, IssueSource};

/// Levels walked up the parent chain: the parent and the grandparent.
const PARENT_DEPTH: usize = 2;

/// Tracker ids already placed in the graph. One per traversal.
#[derive(Debug, Default)]
pub struct VisitedSet {
    ids: HashSet<String>,
}

impl VisitedSet {
    /// Returns `true` if the id was not yet visited.
    pub fn insert(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// A node admitted during link expansion, kept for the next hop.
struct Admitted {
    id: String,
    category: NodeCategory,
    record: IssueRecord,
}

/// Build the relationship graph around `start_key`.
///
/// Only the start issue fetch is fatal. Every other fetch is best-effort and a
/// failure just leaves that branch out of the graph.
///
/// Expansion is fixed: parent and grandparent, then direct links of the start
/// issue, then tests linked to direct requirements, then defects linked to
/// those tests.
pub async fn build_graph<S>(source: &S, start_key: &str) -> Result<Graph, FetchError>
where
    S: IssueSource + ?Sized,
{
    let central = source.fetch_issue(start_key).await?;

    let mut assembler = Assembler::default();
    let central_id = assembler.admit_central(&central);

    assembler.expand_parents(source, &central, &central_id).await;

    let direct = assembler
        .expand_links(source, &central, &central_id, |_| true)
        .await;

    let mut tests = Vec::new();
    for requirement in direct
        .iter()
        .filter(|a| a.category == NodeCategory::Requirement)
    {
        let found = assembler
            .expand_links(source, &requirement.record, &requirement.id, |c| {
                c == NodeCategory::Test
            })
            .await;
        tests.extend(found);
    }

    for test in &tests {
        assembler
            .expand_links(source, &test.record, &test.id, |c| c == NodeCategory::Defect)
            .await;
    }

    let graph = assembler.finish();
    info!(
        start = %start_key,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "assembled issue graph"
    );
    Ok(graph)
}

#[derive(Default)]
struct Assembler {
    visited: VisitedSet,
    graph: Graph,
}

impl Assembler {
    fn admit_central(&mut self, record: &IssueRecord) -> String {
        let node = project_node(Some(record), NodeCategory::Central);
        let id = node.id.clone();
        self.visited.insert(&id);
        self.graph.nodes.push(node);
        id
    }

    /// Add a node unless its id was already visited. Returns the new node id.
    fn admit(&mut self, record: &IssueRecord, category: NodeCategory) -> Option<String> {
        let node: GraphNode = project_node(Some(record), category);
        if !self.visited.insert(&node.id) {
            debug!(key = %record.key, id = %node.id, "already visited");
            return None;
        }
        let id = node.id.clone();
        self.graph.nodes.push(node);
        Some(id)
    }

    fn connect(&mut self, source: &str, target: &str, label: &str) {
        if let Some(edge) = project_edge(source, target, label) {
            self.graph.edges.push(edge);
        }
    }

    /// Orient an edge between `anchor` and a linked node by the link direction.
    fn connect_link(&mut self, anchor_id: &str, linked_id: &str, link: &LinkDescriptor) {
        match link.direction {
            Direction::Inward => self.connect(linked_id, anchor_id, &link.relationship),
            Direction::Outward => self.connect(anchor_id, linked_id, &link.relationship),
        }
    }

    async fn expand_parents<S>(&mut self, source: &S, child: &IssueRecord, child_id: &str)
    where
        S: IssueSource + ?Sized,
    {
        let mut child = child.clone();
        let mut child_id = child_id.to_string();

        for _ in 0..PARENT_DEPTH {
            let Some(parent) = extract_parent(source, &child).await else {
                break;
            };
            let Some(parent_id) = self.admit(&parent.target, NodeCategory::Parent) else {
                break;
            };
            self.connect(&child_id, &parent_id, &parent.relationship);
            child_id = parent_id;
            child = parent.target;
        }
    }

    /// Admit the links of `anchor` whose classified category passes `accept`.
    async fn expand_links<S>(
        &mut self,
        source: &S,
        anchor: &IssueRecord,
        anchor_id: &str,
        accept: fn(NodeCategory) -> bool,
    ) -> Vec<Admitted>
    where
        S: IssueSource + ?Sized,
    {
        let mut admitted = Vec::new();
        for link in extract_links(source, anchor).await {
            let category = NodeCategory::classify(&link.target_issue_type);
            if !accept(category) {
                debug!(key = %link.target_key, ?category, "not expanded at this hop");
                continue;
            }
            let Some(id) = self.admit(&link.target, category) else {
                continue;
            };
            self.connect_link(anchor_id, &id, &link);
            admitted.push(Admitted {
                id,
                category,
                record: link.target,
            });
        }
        admitted
    }

    fn finish(self) -> Graph {
        debug!(visited = self.visited.len(), "traversal finished");
        self.graph
    }
}
