//! MCP Tool definitions and handlers
//!
//! Defines all available tools and their implementations. Input contracts are
//! typed argument structs: `schemars` derives the advertised JSON schema and
//! `validator` enforces the same bounds before any request reaches Redmine.

use std::sync::Arc;

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::config::ToolSettings;
use crate::error::{McpError, Result, ValidationError};
use crate::mcp::format;
use crate::mcp::types::{CallToolResult, Tool};
use crate::redmine::client::{today_utc, RedmineClient};
use crate::redmine::types::{Assignee, IssueFilter, NewIssue, StatusFilter, TimeLog};

/// Tool names
pub mod names {
    pub const LIST_MY_TASKS: &str = "list_my_tasks";
    pub const GET_ISSUE_DETAILS: &str = "get_issue_details";
    pub const LOG_TIME: &str = "log_time";
    pub const UPDATE_ISSUE_STATUS: &str = "update_issue_status";
    pub const UPDATE_PROGRESS: &str = "update_progress";
    pub const ADD_NOTE: &str = "add_note";
    pub const GET_TODAY_LOGS: &str = "get_today_logs";
    pub const GET_TIME_LOGS_RANGE: &str = "get_time_logs_range";
    pub const LIST_STATUSES: &str = "list_statuses";
    pub const CREATE_ISSUE: &str = "create_issue";
    pub const GET_USER_INFO: &str = "get_user_info";
}

// ==================== Enumerations ====================

/// Time entry activity codes known to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Activity {
    #[serde(rename = "19")]
    Study,
    #[serde(rename = "14")]
    Create,
    #[serde(rename = "15")]
    Review,
    #[serde(rename = "16")]
    Correct,
    #[serde(rename = "18")]
    Test,
}

impl Activity {
    /// Redmine activity id
    pub fn id(self) -> u32 {
        match self {
            Activity::Study => 19,
            Activity::Create => 14,
            Activity::Review => 15,
            Activity::Correct => 16,
            Activity::Test => 18,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Activity::Study => "Study",
            Activity::Create => "Create",
            Activity::Review => "Review",
            Activity::Correct => "Correct",
            Activity::Test => "Test",
        }
    }
}

/// Values of the "process" custom field on time entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Process {
    Preparation,
    Management,
    Requirement,
    Design,
    Coding,
    #[serde(rename = "Unit Test")]
    UnitTest,
    #[serde(rename = "Integration Test")]
    IntegrationTest,
    #[serde(rename = "System Test")]
    SystemTest,
    #[serde(rename = "UAT Support")]
    UatSupport,
}

impl Process {
    pub fn label(self) -> &'static str {
        match self {
            Process::Preparation => "Preparation",
            Process::Management => "Management",
            Process::Requirement => "Requirement",
            Process::Design => "Design",
            Process::Coding => "Coding",
            Process::UnitTest => "Unit Test",
            Process::IntegrationTest => "Integration Test",
            Process::SystemTest => "System Test",
            Process::UatSupport => "UAT Support",
        }
    }
}

/// Status filter accepted by `list_my_tasks`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilterArg {
    #[default]
    Open,
    Closed,
    All,
}

impl From<StatusFilterArg> for StatusFilter {
    fn from(arg: StatusFilterArg) -> Self {
        match arg {
            StatusFilterArg::Open => StatusFilter::Open,
            StatusFilterArg::Closed => StatusFilter::Closed,
            StatusFilterArg::All => StatusFilter::All,
        }
    }
}

/// The literal `"me"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Me {
    #[default]
    #[serde(rename = "me")]
    Me,
}

/// A user id or `"me"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AssigneeArg {
    User(u32),
    Me(Me),
}

impl Default for AssigneeArg {
    fn default() -> Self {
        AssigneeArg::Me(Me::Me)
    }
}

impl From<AssigneeArg> for Assignee {
    fn from(arg: AssigneeArg) -> Self {
        match arg {
            AssigneeArg::User(id) => Assignee::User(id),
            AssigneeArg::Me(_) => Assignee::Me,
        }
    }
}

// ==================== Custom validators ====================

fn iso_date(value: &str) -> std::result::Result<(), validator::ValidationError> {
    let well_formed = value.len() == 10
        && chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    if well_formed {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("iso_date");
        err.message = Some("expected a date in YYYY-MM-DD format".into());
        Err(err)
    }
}

fn positive_user_id(value: &AssigneeArg) -> std::result::Result<(), validator::ValidationError> {
    match value {
        AssigneeArg::User(0) => Err(validator::ValidationError::new("range")),
        _ => Ok(()),
    }
}

fn ordered_range(args: &TimeLogsRangeArgs) -> std::result::Result<(), validator::ValidationError> {
    // ISO dates compare chronologically as strings
    if args.from_date <= args.to_date {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("date_range");
        err.message = Some("from_date must not be after to_date".into());
        Err(err)
    }
}

// ==================== Tool arguments ====================

/// Arguments of tools that take none
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct ListMyTasksArgs {
    /// Status filter: open, closed, or all
    #[serde(default)]
    pub status_filter: StatusFilterArg,

    /// Only list issues of this project
    #[validate(range(min = 1))]
    pub project_id: Option<u32>,

    /// User ID or "me" for the current user
    #[serde(default)]
    #[validate(custom = "positive_user_id")]
    pub assigned_to_id: AssigneeArg,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct IssueIdArgs {
    /// Issue ID
    #[validate(range(min = 1))]
    pub issue_id: u32,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct LogTimeArgs {
    /// Issue ID
    #[validate(range(min = 1))]
    pub issue_id: u32,

    /// Hours spent (e.g., 1.5)
    #[validate(range(min = 0.01))]
    pub hours: f64,

    /// Work description
    pub comment: Option<String>,

    /// Activity: 19=Study, 14=Create, 15=Review, 16=Correct, 18=Test
    pub activity_id: Activity,

    /// Process type
    pub process: Process,

    /// Date in YYYY-MM-DD format (defaults to today)
    #[validate(custom = "iso_date")]
    #[schemars(regex(pattern = r"^\d{4}-\d{2}-\d{2}$"))]
    pub spent_on: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct UpdateIssueStatusArgs {
    /// Issue ID
    #[validate(range(min = 1))]
    pub issue_id: u32,

    /// Status ID (see list_statuses, e.g. 1=New, 2=In Progress, 3=Resolved)
    #[validate(range(min = 1))]
    pub status_id: u32,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct UpdateProgressArgs {
    /// Issue ID
    #[validate(range(min = 1))]
    pub issue_id: u32,

    /// Completion percentage (0-100)
    #[validate(range(min = 0, max = 100))]
    pub percent: u8,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct AddNoteArgs {
    /// Issue ID
    #[validate(range(min = 1))]
    pub issue_id: u32,

    /// Comment text
    #[validate(length(min = 1))]
    pub note: String,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[validate(schema(function = "ordered_range", skip_on_field_errors = true))]
pub struct TimeLogsRangeArgs {
    /// Start date (YYYY-MM-DD)
    #[validate(custom = "iso_date")]
    #[schemars(regex(pattern = r"^\d{4}-\d{2}-\d{2}$"))]
    pub from_date: String,

    /// End date (YYYY-MM-DD)
    #[validate(custom = "iso_date")]
    #[schemars(regex(pattern = r"^\d{4}-\d{2}-\d{2}$"))]
    pub to_date: String,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CreateIssueArgs {
    /// Project ID
    #[validate(range(min = 1))]
    pub project_id: u32,

    /// Issue title
    #[validate(length(min = 1))]
    pub subject: String,

    /// Description
    pub description: Option<String>,

    /// Tracker: 1=Bug, 2=Feature, 3=Task, 4=Support
    #[validate(range(min = 1))]
    pub tracker_id: Option<u32>,

    /// Priority 1-5 (2=Normal)
    #[validate(range(min = 1, max = 5))]
    pub priority_id: Option<u32>,

    /// Assign to user ID
    #[validate(range(min = 1))]
    pub assigned_to_id: Option<u32>,

    /// Estimated hours
    #[validate(range(min = 0.01))]
    pub estimated_hours: Option<f64>,

    /// Start date (YYYY-MM-DD)
    #[validate(custom = "iso_date")]
    #[schemars(regex(pattern = r"^\d{4}-\d{2}-\d{2}$"))]
    pub start_date: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[validate(custom = "iso_date")]
    #[schemars(regex(pattern = r"^\d{4}-\d{2}-\d{2}$"))]
    pub due_date: Option<String>,

    /// Parent issue ID (for a subtask)
    #[validate(range(min = 1))]
    pub parent_issue_id: Option<u32>,
}

impl From<CreateIssueArgs> for NewIssue {
    fn from(args: CreateIssueArgs) -> Self {
        NewIssue {
            project_id: args.project_id,
            subject: args.subject,
            description: args.description.filter(|d| !d.is_empty()),
            tracker_id: args.tracker_id,
            priority_id: args.priority_id,
            assigned_to_id: args.assigned_to_id,
            estimated_hours: args.estimated_hours,
            start_date: args.start_date,
            due_date: args.due_date,
            parent_issue_id: args.parent_issue_id,
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct GetUserInfoArgs {
    /// Username to search for (defaults to the current user)
    pub username: Option<String>,
}

/// Deserialize and validate tool arguments
pub fn parse_args<T: DeserializeOwned + Validate>(args: Value) -> Result<T> {
    let args = if args.is_null() { json!({}) } else { args };

    let parsed: T = serde_json::from_value(args).map_err(|e| ValidationError::InvalidArguments {
        message: e.to_string(),
    })?;
    parsed.validate()?;

    Ok(parsed)
}

/// Input schema advertised for an argument type
pub fn input_schema<T: JsonSchema>() -> Value {
    let settings = SchemaSettings::draft07().with(|s| {
        s.inline_subschemas = true;
        s.meta_schema = None;
    });
    let schema = settings.into_generator().into_root_schema_for::<T>();

    let mut value = serde_json::to_value(schema).unwrap_or_else(|_| json!({"type": "object"}));
    if let Some(object) = value.as_object_mut() {
        object.remove("title");
        object
            .entry("properties")
            .or_insert_with(|| json!({}));
    }
    value
}

fn tool_def<T: JsonSchema>(name: &str, title: &str, description: &str) -> Tool {
    Tool {
        name: name.to_string(),
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        input_schema: input_schema::<T>(),
    }
}

/// Tool handler bound to one Redmine client
pub struct ToolHandler {
    client: Arc<RedmineClient>,
    settings: ToolSettings,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(client: Arc<RedmineClient>, settings: ToolSettings) -> Self {
        Self { client, settings }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![
            tool_def::<ListMyTasksArgs>(names::LIST_MY_TASKS, "List My Tasks", "List tasks assigned to you or other users with status and project filtering"),
            tool_def::<IssueIdArgs>(names::GET_ISSUE_DETAILS, "Get Issue Details", "Get detailed information about a specific issue"),
            tool_def::<LogTimeArgs>(names::LOG_TIME, "Log Time Entry", "Log time entry on a task with activity and process selection"),
            tool_def::<UpdateIssueStatusArgs>(names::UPDATE_ISSUE_STATUS, "Update Issue Status", "Change issue status"),
            tool_def::<UpdateProgressArgs>(names::UPDATE_PROGRESS, "Update Progress", "Update task completion percentage (0-100)"),
            tool_def::<AddNoteArgs>(names::ADD_NOTE, "Add Note", "Add a comment/note to an issue"),
            tool_def::<NoArgs>(names::GET_TODAY_LOGS, "Get Today's Logs", "View today's time entries and total hours"),
            tool_def::<TimeLogsRangeArgs>(names::GET_TIME_LOGS_RANGE, "Get Time Logs Range", "View time logs within a date range"),
            tool_def::<NoArgs>(names::LIST_STATUSES, "List Statuses", "Get all available issue statuses"),
            tool_def::<CreateIssueArgs>(names::CREATE_ISSUE, "Create Issue", "Create a new issue (bug, feature, task, subtask, etc.)"),
            tool_def::<GetUserInfoArgs>(names::GET_USER_INFO, "Get User Info", "Get user information by username (or current user if not specified)"),
        ]
    }

    /// Call a tool by name. Failures come back as error text, never as `Err`.
    pub async fn call_tool(&self, name: &str, args: Value) -> CallToolResult {
        tracing::debug!(tool = name, "Calling tool");

        let result = match name {
            names::LIST_MY_TASKS => self.handle_list_my_tasks(args).await,
            names::GET_ISSUE_DETAILS => self.handle_get_issue_details(args).await,
            names::LOG_TIME => self.handle_log_time(args).await,
            names::UPDATE_ISSUE_STATUS => self.handle_update_issue_status(args).await,
            names::UPDATE_PROGRESS => self.handle_update_progress(args).await,
            names::ADD_NOTE => self.handle_add_note(args).await,
            names::GET_TODAY_LOGS => self.handle_get_today_logs().await,
            names::GET_TIME_LOGS_RANGE => self.handle_get_time_logs_range(args).await,
            names::LIST_STATUSES => self.handle_list_statuses().await,
            names::CREATE_ISSUE => self.handle_create_issue(args).await,
            names::GET_USER_INFO => self.handle_get_user_info(args).await,
            _ => Err(McpError::UnknownTool {
                name: name.to_string(),
            }
            .into()),
        };

        into_tool_result(name, result)
    }

    // ==================== Tool Handlers ====================

    async fn handle_list_my_tasks(&self, args: Value) -> Result<String> {
        let args: ListMyTasksArgs = parse_args(args)?;
        let filter = IssueFilter {
            status: args.status_filter.into(),
            project_id: args.project_id,
            assignee: args.assigned_to_id.into(),
        };

        let issues = self.client.list_issues(&filter).await?;
        Ok(format::issue_list(&issues))
    }

    async fn handle_get_issue_details(&self, args: Value) -> Result<String> {
        let args: IssueIdArgs = parse_args(args)?;
        let issue = self.client.get_issue(args.issue_id).await?;
        Ok(format::issue_details(&issue))
    }

    async fn handle_log_time(&self, args: Value) -> Result<String> {
        let args: LogTimeArgs = parse_args(args)?;
        let log = TimeLog {
            issue_id: args.issue_id,
            hours: args.hours,
            comment: args.comment,
            activity_id: args.activity_id.id(),
            process: args.process.label().to_string(),
            spent_on: args.spent_on,
        };

        let entry = self.client.log_time(log).await?;
        Ok(format::time_logged(
            &entry,
            args.activity_id.label(),
            args.process.label(),
        ))
    }

    async fn handle_update_issue_status(&self, args: Value) -> Result<String> {
        let args: UpdateIssueStatusArgs = parse_args(args)?;
        self.client
            .update_issue_status(args.issue_id, args.status_id)
            .await?;
        Ok(format::status_updated(args.issue_id, args.status_id))
    }

    async fn handle_update_progress(&self, args: Value) -> Result<String> {
        let args: UpdateProgressArgs = parse_args(args)?;
        self.client
            .update_progress(args.issue_id, args.percent)
            .await?;
        Ok(format::progress_updated(args.issue_id, args.percent))
    }

    async fn handle_add_note(&self, args: Value) -> Result<String> {
        let args: AddNoteArgs = parse_args(args)?;
        self.client.add_note(args.issue_id, &args.note).await?;
        Ok(format::note_added(args.issue_id))
    }

    async fn handle_get_today_logs(&self) -> Result<String> {
        let today = today_utc();
        let entries = self.client.time_entries_between(&today, &today).await?;
        Ok(format::today_logs(
            &today,
            &entries,
            self.settings.daily_target_hours,
        ))
    }

    async fn handle_get_time_logs_range(&self, args: Value) -> Result<String> {
        let args: TimeLogsRangeArgs = parse_args(args)?;
        let entries = self
            .client
            .time_entries_between(&args.from_date, &args.to_date)
            .await?;
        Ok(format::time_logs_range(
            &args.from_date,
            &args.to_date,
            &entries,
        ))
    }

    async fn handle_list_statuses(&self) -> Result<String> {
        let statuses = self.client.list_statuses().await?;
        Ok(format::statuses(&statuses))
    }

    async fn handle_create_issue(&self, args: Value) -> Result<String> {
        let args: CreateIssueArgs = parse_args(args)?;
        let request = NewIssue::from(args);
        let issue = self.client.create_issue(&request).await?;
        Ok(format::created_issue(&issue, &request))
    }

    async fn handle_get_user_info(&self, args: Value) -> Result<String> {
        let args: GetUserInfoArgs = parse_args(args)?;
        let username = args.username.as_deref().filter(|u| !u.is_empty());
        let user = self.client.find_user(username).await?;
        Ok(format::user_info(&user))
    }
}

/// Turn a handler outcome into tool output
fn into_tool_result(name: &str, result: Result<String>) -> CallToolResult {
    match result {
        Ok(text) => CallToolResult::text(text),
        Err(e) => {
            tracing::warn!(tool = name, error = %e, "Tool call failed");
            CallToolResult::error(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RedmineMcpError;
    use crate::redmine::Credentials;

    fn handler() -> ToolHandler {
        // Port 9 (discard) is never reached by these tests
        let creds = Credentials::new("http://127.0.0.1:9", "key").unwrap();
        ToolHandler::new(Arc::new(RedmineClient::new(creds)), ToolSettings::default())
    }

    fn schema_of(name: &str) -> Value {
        handler()
            .list_tools()
            .into_iter()
            .find(|t| t.name == name)
            .map(|t| t.input_schema)
            .unwrap()
    }

    #[test]
    fn test_all_tools_listed() {
        let tools = handler().list_tools();
        assert_eq!(tools.len(), 11);
        for tool in &tools {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(tool.input_schema["properties"].is_object(), "{}", tool.name);
            assert!(tool.title.is_some());
        }
    }

    #[test]
    fn test_progress_schema_bounds() {
        let schema = schema_of(names::UPDATE_PROGRESS);
        assert_eq!(schema["properties"]["percent"]["minimum"], 0.0);
        assert_eq!(schema["properties"]["percent"]["maximum"], 100.0);
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("issue_id")));
        assert!(required.contains(&json!("percent")));
    }

    #[test]
    fn test_log_time_enumerations() {
        let schema = schema_of(names::LOG_TIME);
        let activities = schema["properties"]["activity_id"]["enum"].as_array().unwrap();
        assert_eq!(activities.len(), 5);
        assert!(activities.contains(&json!("19")));

        let processes = schema["properties"]["process"]["enum"].as_array().unwrap();
        assert_eq!(processes.len(), 9);
        assert!(processes.contains(&json!("UAT Support")));
    }

    #[test]
    fn test_create_issue_optional_fields_not_required() {
        let schema = schema_of(names::CREATE_ISSUE);
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert!(required.contains(&json!("project_id")));
        assert!(required.contains(&json!("subject")));
    }

    #[test]
    fn test_parse_args_accepts_valid_input() {
        let args: LogTimeArgs = parse_args(json!({
            "issue_id": 42,
            "hours": 1.5,
            "activity_id": "15",
            "process": "Unit Test",
            "spent_on": "2024-06-03"
        }))
        .unwrap();
        assert_eq!(args.activity_id, Activity::Review);
        assert_eq!(args.activity_id.id(), 15);
        assert_eq!(args.process, Process::UnitTest);
        assert!(args.comment.is_none());
    }

    #[test]
    fn test_parse_args_rejects_out_of_range_percent() {
        let err = parse_args::<UpdateProgressArgs>(json!({"issue_id": 1, "percent": 101})).unwrap_err();
        assert!(matches!(err, RedmineMcpError::Validation(_)));
        assert!(parse_args::<UpdateProgressArgs>(json!({"issue_id": 1, "percent": 100})).is_ok());
        assert!(parse_args::<UpdateProgressArgs>(json!({"issue_id": 1, "percent": 0})).is_ok());
        assert!(parse_args::<UpdateProgressArgs>(json!({"issue_id": 1, "percent": 12.5})).is_err());
    }

    #[test]
    fn test_parse_args_rejects_unknown_codes() {
        let base = json!({"issue_id": 1, "hours": 1.0, "process": "Coding"});

        let mut bad_activity = base.clone();
        bad_activity["activity_id"] = json!("20");
        assert!(parse_args::<LogTimeArgs>(bad_activity).is_err());

        let mut bad_process = base;
        bad_process["activity_id"] = json!("19");
        bad_process["process"] = json!("Deployment");
        assert!(parse_args::<LogTimeArgs>(bad_process).is_err());
    }

    #[test]
    fn test_parse_args_rejects_bad_dates() {
        assert!(parse_args::<TimeLogsRangeArgs>(json!({"from_date": "2024-06-01", "to_date": "2024-06-07"})).is_ok());
        assert!(parse_args::<TimeLogsRangeArgs>(json!({"from_date": "06/01/2024", "to_date": "2024-06-07"})).is_err());
        assert!(parse_args::<TimeLogsRangeArgs>(json!({"from_date": "2024-02-30", "to_date": "2024-06-07"})).is_err());
        assert!(parse_args::<TimeLogsRangeArgs>(json!({"from_date": "2024-06-08", "to_date": "2024-06-07"})).is_err());
    }

    #[test]
    fn test_parse_args_defaults() {
        let args: ListMyTasksArgs = parse_args(Value::Null).unwrap();
        assert_eq!(args.status_filter, StatusFilterArg::Open);
        assert_eq!(args.assigned_to_id, AssigneeArg::Me(Me::Me));
        assert!(args.project_id.is_none());

        let args: ListMyTasksArgs = parse_args(json!({"assigned_to_id": 7, "status_filter": "all"})).unwrap();
        assert_eq!(Assignee::from(args.assigned_to_id), Assignee::User(7));
        assert_eq!(StatusFilter::from(args.status_filter), StatusFilter::All);

        assert!(parse_args::<ListMyTasksArgs>(json!({"assigned_to_id": "someone"})).is_err());
        assert!(parse_args::<ListMyTasksArgs>(json!({"assigned_to_id": 0})).is_err());
    }

    #[test]
    fn test_create_issue_args_into_payload() {
        let args: CreateIssueArgs = parse_args(json!({"project_id": 3, "subject": "Bug"})).unwrap();
        let payload = serde_json::to_value(NewIssue::from(args)).unwrap();
        assert_eq!(payload, json!({"project_id": 3, "subject": "Bug"}));

        assert!(parse_args::<CreateIssueArgs>(json!({"project_id": 3, "subject": "Bug", "priority_id": 6})).is_err());
    }

    #[tokio::test]
    async fn test_invalid_arguments_become_error_text() {
        let result = handler()
            .call_tool(names::UPDATE_PROGRESS, json!({"issue_id": 1, "percent": 150}))
            .await;
        assert!(result.is_error);
        assert!(result.text_content().starts_with("❌ Error: "));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let result = handler().call_tool("delete_everything", json!({})).await;
        assert!(result.is_error);
        assert!(result.text_content().contains("Unknown tool: delete_everything"));
    }
}
