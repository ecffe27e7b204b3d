//! Redmine API type definitions
//!
//! These types mirror the Redmine REST API JSON and are used for
//! serialization/deserialization. Only the fields the tools render are kept.

use serde::{Deserialize, Serialize};

/// Reference to a named Redmine object (project, status, user, ...)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NamedRef {
    pub id: u32,

    #[serde(default)]
    pub name: String,
}

/// Reference to an issue by id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueRef {
    pub id: u32,
}

/// Child issue as returned with `include=children`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChildIssue {
    pub id: u32,

    #[serde(default)]
    pub subject: String,
}

/// Journal entry as returned with `include=journals`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Journal {
    pub id: u32,

    #[serde(default)]
    pub user: Option<NamedRef>,

    /// Note text; empty for pure attribute changes
    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub created_on: Option<String>,
}

/// A Redmine issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: u32,

    #[serde(default)]
    pub subject: String,

    #[serde(default)]
    pub project: Option<NamedRef>,

    #[serde(default)]
    pub tracker: Option<NamedRef>,

    #[serde(default)]
    pub status: Option<NamedRef>,

    #[serde(default)]
    pub priority: Option<NamedRef>,

    #[serde(default)]
    pub assigned_to: Option<NamedRef>,

    #[serde(default)]
    pub parent: Option<IssueRef>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub due_date: Option<String>,

    /// Completion percentage
    #[serde(default)]
    pub done_ratio: Option<u32>,

    #[serde(default)]
    pub estimated_hours: Option<f64>,

    #[serde(default)]
    pub spent_hours: Option<f64>,

    #[serde(default)]
    pub children: Vec<ChildIssue>,

    #[serde(default)]
    pub journals: Vec<Journal>,
}

/// A logged time entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeEntry {
    pub id: u32,

    #[serde(default)]
    pub issue: Option<IssueRef>,

    #[serde(default)]
    pub activity: Option<NamedRef>,

    pub hours: f64,

    #[serde(default)]
    pub comments: Option<String>,

    /// Date the time was spent on (YYYY-MM-DD)
    pub spent_on: String,
}

/// An issue status definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueStatus {
    pub id: u32,
    pub name: String,

    #[serde(default)]
    pub is_closed: bool,
}

/// A Redmine user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u32,

    #[serde(default)]
    pub login: Option<String>,

    #[serde(default)]
    pub firstname: String,

    #[serde(default)]
    pub lastname: String,

    #[serde(default)]
    pub mail: Option<String>,
}

// ==================== Response envelopes ====================

#[derive(Debug, Deserialize)]
pub(crate) struct IssueList {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueEnvelope {
    pub issue: Option<Issue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimeEntryList {
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueStatusList {
    #[serde(default)]
    pub issue_statuses: Vec<IssueStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserList {
    #[serde(default)]
    pub users: Vec<User>,
}

// ==================== Request payloads ====================

/// Value for one custom field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomFieldValue {
    pub id: u32,
    pub value: String,
}

/// Payload for `POST /time_entries.json`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTimeEntry {
    pub issue_id: u32,
    pub hours: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    pub activity_id: u32,

    /// Date (YYYY-MM-DD)
    pub spent_on: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldValue>,
}

/// Payload for `POST /issues.json`
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct NewIssue {
    pub project_id: u32,
    pub subject: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker_id: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_issue_id: Option<u32>,
}

/// Partial update for `PUT /issues/{id}.json`
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_ratio: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Time to log against an issue; tracker-specific fields are filled in by the client
#[derive(Debug, Clone, PartialEq)]
pub struct TimeLog {
    pub issue_id: u32,
    pub hours: f64,
    pub comment: Option<String>,
    pub activity_id: u32,

    /// Value for the "process" custom field
    pub process: String,

    /// Defaults to the current UTC date
    pub spent_on: Option<String>,
}

// ==================== Query filters ====================

/// Status filter for issue listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl StatusFilter {
    /// Value of the `status_id` query parameter
    pub fn as_query_value(self) -> &'static str {
        match self {
            StatusFilter::Open => "open",
            StatusFilter::Closed => "closed",
            StatusFilter::All => "*",
        }
    }
}

/// Whose issues to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Assignee {
    /// The user owning the API key
    #[default]
    Me,
    User(u32),
}

impl std::fmt::Display for Assignee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Assignee::Me => f.write_str("me"),
            Assignee::User(id) => write!(f, "{}", id),
        }
    }
}

/// Filter for `GET /issues.json`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    pub status: StatusFilter,
    pub project_id: Option<u32>,
    pub assignee: Assignee,
}
