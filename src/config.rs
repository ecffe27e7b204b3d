//! Configuration management for the Redmine MCP Server
//!
//! Handles environment variables and configuration loading.

use std::net::SocketAddr;

use crate::error::{ConfigError, Result};

/// Environment variable names
pub mod env {
    pub const BIND: &str = "REDMINE_MCP_BIND";
    pub const PATH: &str = "REDMINE_MCP_PATH";
    pub const PROCESS_FIELD_ID: &str = "REDMINE_PROCESS_FIELD_ID";
    pub const DAILY_HOURS: &str = "REDMINE_DAILY_HOURS";
    pub const REDMINE_URL: &str = "REDMINE_URL";
    pub const REDMINE_API_KEY: &str = "REDMINE_API_KEY";
}

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PATH: &str = "/api/mcp";

/// Configuration for the Redmine MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP transport listens on
    pub bind_addr: SocketAddr,

    /// Route serving the MCP endpoint
    pub mcp_path: String,

    /// Tool behavior shared by every request
    pub tools: ToolSettings,
}

/// Tracker-specific values the tools depend on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSettings {
    /// Custom field carrying the "process" tag on time entries
    pub process_field_id: u32,

    /// Hours a day is expected to be logged
    pub daily_target_hours: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            process_field_id: redmine::PROCESS_CUSTOM_FIELD_ID,
            daily_target_hours: redmine::DAILY_TARGET_HOURS,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn new() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_var(&lookup, env::BIND)?
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)));

        let mcp_path = lookup(env::PATH).unwrap_or_else(|| DEFAULT_PATH.to_string());

        let defaults = ToolSettings::default();
        let process_field_id =
            parse_var(&lookup, env::PROCESS_FIELD_ID)?.unwrap_or(defaults.process_field_id);
        let daily_target_hours =
            parse_var(&lookup, env::DAILY_HOURS)?.unwrap_or(defaults.daily_target_hours);

        let config = Self {
            bind_addr,
            mcp_path,
            tools: ToolSettings {
                process_field_id,
                daily_target_hours,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the listen address
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Override the MCP route
    pub fn with_mcp_path(mut self, path: impl Into<String>) -> Result<Self> {
        self.mcp_path = path.into();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if !self.mcp_path.starts_with('/') {
            return Err(ConfigError::InvalidConfig {
                message: format!("MCP path must start with '/': {}", self.mcp_path),
            }
            .into());
        }
        if !(self.tools.daily_target_hours > 0.0) {
            return Err(ConfigError::InvalidValue {
                var: env::DAILY_HOURS.to_string(),
                value: self.tools.daily_target_hours.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            mcp_path: DEFAULT_PATH.to_string(),
            tools: ToolSettings::default(),
        }
    }
}

fn parse_var<F, T>(lookup: &F, var: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ConfigError::InvalidValue {
                var: var.to_string(),
                value: raw,
            }
            .into()
        }),
    }
}

/// Redmine API constants
pub mod redmine {
    /// Header carrying the user's API key
    pub const API_KEY_HEADER: &str = "X-Redmine-API-Key";

    /// Page size for issue listings
    pub const ISSUE_LIST_LIMIT: u32 = 25;

    /// Page size for time entry listings
    pub const TIME_ENTRY_LIMIT: u32 = 100;

    /// Custom field id of the "process" tag on time entries.
    /// Instance-specific; override with `REDMINE_PROCESS_FIELD_ID`.
    pub const PROCESS_CUSTOM_FIELD_ID: u32 = 64;

    /// Expected logged hours per day
    pub const DAILY_TARGET_HOURS: f64 = 8.0;
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::RedmineMcpError;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.mcp_path, "/api/mcp");
        assert_eq!(config.tools.process_field_id, 64);
        assert_eq!(config.tools.daily_target_hours, 8.0);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (env::BIND, "127.0.0.1:8080"),
            (env::PATH, "/mcp"),
            (env::PROCESS_FIELD_ID, "12"),
            (env::DAILY_HOURS, "7.5"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.mcp_path, "/mcp");
        assert_eq!(config.tools.process_field_id, 12);
        assert_eq!(config.tools.daily_target_hours, 7.5);
    }

    #[test]
    fn test_invalid_field_id_rejected() {
        let err = Config::from_lookup(lookup_from(&[(env::PROCESS_FIELD_ID, "abc")])).unwrap_err();
        assert!(matches!(err, RedmineMcpError::Config(ConfigError::InvalidValue { .. })));
        assert!(err.to_string().contains(env::PROCESS_FIELD_ID));
    }

    #[test]
    fn test_path_must_be_absolute() {
        assert!(Config::default().with_mcp_path("mcp").is_err());
        assert!(Config::default().with_mcp_path("/rpc").is_ok());
    }

    #[test]
    fn test_non_positive_target_rejected() {
        assert!(Config::from_lookup(lookup_from(&[(env::DAILY_HOURS, "0")])).is_err());
    }
}
