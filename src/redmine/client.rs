//! Redmine API client
//!
//! Thin REST client over the Redmine JSON API. Each operation issues exactly
//! one request and either returns parsed data or the request's error.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::redmine::{
    API_KEY_HEADER, ISSUE_LIST_LIMIT, PROCESS_CUSTOM_FIELD_ID, TIME_ENTRY_LIMIT,
};
use crate::error::{RedmineApiError, Result};
use crate::redmine::credentials::Credentials;
use crate::redmine::types::*;

/// Current calendar date in UTC, formatted YYYY-MM-DD
pub fn today_utc() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Redmine API client bound to one set of credentials
pub struct RedmineClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// Endpoint and API key
    credentials: Credentials,

    /// Custom field receiving the process tag of time entries
    process_field_id: u32,
}

impl RedmineClient {
    /// Create a new Redmine client
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            credentials,
            process_field_id: PROCESS_CUSTOM_FIELD_ID,
        }
    }

    /// Use a different custom field for the process tag
    pub fn with_process_field_id(mut self, process_field_id: u32) -> Self {
        self.process_field_id = process_field_id;
        self
    }

    /// Send one authenticated request and return the parsed JSON body.
    ///
    /// `path` is appended to the base URL and may carry a query string.
    /// Non-success statuses become [`RedmineApiError::RequestFailed`] with the
    /// raw response text; `204 No Content` yields an empty object.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.credentials.base_url(), path);
        tracing::debug!(%method, path, "Redmine request");

        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .header(API_KEY_HEADER, self.credentials.api_key())
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(&body)?);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            tracing::warn!(%method, path, status = status.as_u16(), "Redmine request failed");
            return Err(RedmineApiError::RequestFailed {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Object(Map::new()));
        }

        // Some deployments answer updates with 200 and an empty body
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.request(Method::GET, path, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn send_json<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<Value> {
        let body = serde_json::to_value(body)?;
        self.request(method, path, Some(body)).await
    }

    // ==================== Issues ====================

    /// List issues matching the filter (first 25)
    pub async fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let mut path = format!(
            "/issues.json?assigned_to_id={}&limit={}&status_id={}",
            filter.assignee,
            ISSUE_LIST_LIMIT,
            urlencoding::encode(filter.status.as_query_value())
        );
        if let Some(project_id) = filter.project_id {
            path.push_str(&format!("&project_id={}", project_id));
        }

        let list: IssueList = self.get(&path).await?;
        Ok(list.issues)
    }

    /// Get one issue with its journals and child issues
    pub async fn get_issue(&self, issue_id: u32) -> Result<Issue> {
        let path = format!("/issues/{}.json?include=journals,children", issue_id);
        let envelope: IssueEnvelope = self.get(&path).await?;
        envelope.issue.ok_or_else(|| missing_field(&path, "issue"))
    }

    /// Create an issue and return it as stored by Redmine
    pub async fn create_issue(&self, issue: &NewIssue) -> Result<Issue> {
        let path = "/issues.json";
        let value = self
            .send_json(Method::POST, path, &serde_json::json!({ "issue": issue }))
            .await?;
        let envelope: IssueEnvelope = serde_json::from_value(value)?;
        envelope.issue.ok_or_else(|| missing_field(path, "issue"))
    }

    /// Apply a partial update to an issue
    pub async fn update_issue(&self, issue_id: u32, update: &IssueUpdate) -> Result<()> {
        let path = format!("/issues/{}.json", issue_id);
        self.send_json(Method::PUT, &path, &serde_json::json!({ "issue": update }))
            .await?;
        Ok(())
    }

    /// Set an issue's status
    pub async fn update_issue_status(&self, issue_id: u32, status_id: u32) -> Result<()> {
        let update = IssueUpdate {
            status_id: Some(status_id),
            ..Default::default()
        };
        self.update_issue(issue_id, &update).await
    }

    /// Set an issue's completion percentage
    pub async fn update_progress(&self, issue_id: u32, percent: u8) -> Result<()> {
        let update = IssueUpdate {
            done_ratio: Some(percent),
            ..Default::default()
        };
        self.update_issue(issue_id, &update).await
    }

    /// Append a note to an issue's journal
    pub async fn add_note(&self, issue_id: u32, note: &str) -> Result<()> {
        let update = IssueUpdate {
            notes: Some(note.to_string()),
            ..Default::default()
        };
        self.update_issue(issue_id, &update).await
    }

    /// List all issue statuses
    pub async fn list_statuses(&self) -> Result<Vec<IssueStatus>> {
        let list: IssueStatusList = self.get("/issue_statuses.json").await?;
        Ok(list.issue_statuses)
    }

    // ==================== Time entries ====================

    /// Log time on an issue, returning the entry that was sent
    pub async fn log_time(&self, log: TimeLog) -> Result<NewTimeEntry> {
        let entry = NewTimeEntry {
            issue_id: log.issue_id,
            hours: log.hours,
            comments: log.comment,
            activity_id: log.activity_id,
            spent_on: log.spent_on.unwrap_or_else(today_utc),
            custom_fields: vec![CustomFieldValue {
                id: self.process_field_id,
                value: log.process,
            }],
        };

        self.send_json(
            Method::POST,
            "/time_entries.json",
            &serde_json::json!({ "time_entry": &entry }),
        )
        .await?;

        Ok(entry)
    }

    /// Time entries of the current user within an inclusive date range
    pub async fn time_entries_between(&self, from: &str, to: &str) -> Result<Vec<TimeEntry>> {
        let path = format!(
            "/time_entries.json?user_id=me&from={}&to={}&limit={}",
            urlencoding::encode(from),
            urlencoding::encode(to),
            TIME_ENTRY_LIMIT
        );
        let list: TimeEntryList = self.get(&path).await?;
        Ok(list.time_entries)
    }

    // ==================== Users ====================

    /// Current user when `username` is `None`, otherwise the first name match
    pub async fn find_user(&self, username: Option<&str>) -> Result<User> {
        match username {
            None => {
                let path = "/users/current.json";
                let envelope: UserEnvelope = self.get(path).await?;
                envelope.user.ok_or_else(|| missing_field(path, "user"))
            }
            Some(username) => {
                let path = format!("/users.json?name={}", urlencoding::encode(username));
                let list: UserList = self.get(&path).await?;
                list.users.into_iter().next().ok_or_else(|| {
                    RedmineApiError::UserNotFound {
                        username: username.to_string(),
                    }
                    .into()
                })
            }
        }
    }
}

fn missing_field(path: &str, field: &str) -> crate::error::RedmineMcpError {
    RedmineApiError::UnexpectedResponse {
        path: path.to_string(),
        field: field.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_format() {
        let today = today_utc();
        assert_eq!(today.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&today, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_default_process_field() {
        let creds = Credentials::new("https://redmine.example.com", "key").unwrap();
        let client = RedmineClient::new(creds);
        assert_eq!(client.process_field_id, 64);
        assert_eq!(client.with_process_field_id(12).process_field_id, 12);
    }
}
