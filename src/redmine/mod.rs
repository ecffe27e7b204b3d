//! Redmine API module
//!
//! Contains credentials, types, and the REST client for the Redmine API.

pub mod client;
pub mod credentials;
pub mod types;

pub use client::RedmineClient;
pub use credentials::Credentials;
