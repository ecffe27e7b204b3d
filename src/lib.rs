//! Redmine MCP Server Library
//!
//! A Model Context Protocol (MCP) server for Redmine integration.
//! Provides tools for listing tasks, logging time, and updating issues via
//! the Redmine REST API.

pub mod config;
pub mod error;
pub mod mcp;
pub mod redmine;

pub use config::Config;
pub use error::{RedmineMcpError, Result};
