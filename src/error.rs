//! Error types for the Redmine MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the Redmine MCP Server
#[derive(Error, Debug)]
pub enum RedmineMcpError {
    /// Credential resolution errors
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// Redmine API errors
    #[error(transparent)]
    Redmine(#[from] RedmineApiError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Credential resolution errors
#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("Missing credentials. Provide ?redmine_url=...&api_key=...")]
    MissingQueryCredentials,

    #[error("Missing {var} environment variable")]
    MissingEnvVar { var: String },
}

/// Redmine API errors
#[derive(Error, Debug)]
pub enum RedmineApiError {
    #[error("Redmine API Error {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("User '{username}' not found")]
    UserNotFound { username: String },

    #[error("Unexpected response from {path}: missing '{field}'")]
    UnexpectedResponse { path: String, field: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Invalid arguments: {0}")]
    Constraints(#[from] validator::ValidationErrors),
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },
}

/// Result type alias for Redmine MCP operations
pub type Result<T> = std::result::Result<T, RedmineMcpError>;

impl From<validator::ValidationErrors> for RedmineMcpError {
    fn from(err: validator::ValidationErrors) -> Self {
        RedmineMcpError::Validation(ValidationError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err: RedmineMcpError = RedmineApiError::RequestFailed {
            status: 422,
            body: r#"{"errors":["Subject cannot be blank"]}"#.to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            r#"Redmine API Error 422: {"errors":["Subject cannot be blank"]}"#
        );
    }

    #[test]
    fn test_user_not_found_names_user() {
        let err = RedmineApiError::UserNotFound {
            username: "jdoe".to_string(),
        };
        assert_eq!(err.to_string(), "User 'jdoe' not found");
    }

    #[test]
    fn test_error_conversion() {
        let err: RedmineMcpError = CredentialsError::MissingQueryCredentials.into();
        assert!(matches!(err, RedmineMcpError::Credentials(_)));
        assert!(err.to_string().starts_with("Missing credentials"));
    }
}
