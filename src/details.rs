//! Flat detail view of a single issue, used by the client's side panel.

use serde::{Deserialize, Serialize};

use crate::graph::project::{name_or, person_or, NO_PRIORITY, NO_SUMMARY, UNASSIGNED, UNKNOWN};
use crate::model::issue::IssueRecord;
use crate::util::rich_text::plain_text;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDetails {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub description: String,
    pub status: String,
    pub issue_type: String,
    pub priority: String,
    pub created: String,
    pub updated: String,
    pub creator: String,
    pub reporter: String,
    pub assignee: String,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    pub comments: Vec<CommentDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDetails {
    pub author: String,
    pub body: String,
    pub created: String,
}

pub fn project_details(issue: &IssueRecord) -> IssueDetails {
    let fields = &issue.fields;
    let comments = fields
        .comment
        .as_ref()
        .map(|page| {
            page.comments
                .iter()
                .map(|c| CommentDetails {
                    author: person_or(c.author.as_ref(), UNKNOWN),
                    body: c.body.as_ref().and_then(plain_text).unwrap_or_default(),
                    created: c.created.clone().unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    IssueDetails {
        id: issue.id.clone(),
        key: issue.key.clone(),
        summary: fields.summary.clone().unwrap_or_else(|| NO_SUMMARY.into()),
        description: fields
            .description
            .as_ref()
            .and_then(plain_text)
            .unwrap_or_default(),
        status: name_or(fields.status.as_ref(), UNKNOWN),
        issue_type: name_or(fields.issuetype.as_ref(), UNKNOWN),
        priority: name_or(fields.priority.as_ref(), NO_PRIORITY),
        created: fields.created.clone().unwrap_or_default(),
        updated: fields.updated.clone().unwrap_or_default(),
        creator: person_or(fields.creator.as_ref(), UNKNOWN),
        reporter: person_or(fields.reporter.as_ref(), UNKNOWN),
        assignee: person_or(fields.assignee.as_ref(), UNASSIGNED),
        labels: fields.labels.clone(),
        components: fields
            .components
            .iter()
            .map(|c| c.name.clone().unwrap_or_default())
            .collect(),
        comments,
    }
}
