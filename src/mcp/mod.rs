//! MCP (Model Context Protocol) module
//!
//! Implements the MCP server protocol for tool invocation over streamable
//! HTTP and stdio.

pub mod format;
pub mod http;
pub mod server;
pub mod tools;
pub mod types;
