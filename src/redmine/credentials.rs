//! Per-request Redmine credentials
//!
//! Credentials are never stored: the HTTP transport reads them from the query
//! string of every request, the stdio transport from the environment.

use std::collections::HashMap;
use std::fmt;

use crate::config::env;
use crate::error::{CredentialsError, Result};

/// Query parameter carrying the Redmine base URL
pub const URL_PARAM: &str = "redmine_url";

/// Query parameter carrying the user's API key
pub const API_KEY_PARAM: &str = "api_key";

/// Redmine endpoint and API key for one caller
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    base_url: String,
    api_key: String,
}

impl Credentials {
    /// Build credentials, stripping one trailing slash from the URL
    pub fn new(base_url: &str, api_key: &str) -> Option<Self> {
        if base_url.is_empty() || api_key.is_empty() {
            return None;
        }

        // "/" strips to nothing, which is no URL at all
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
        if base_url.is_empty() {
            return None;
        }

        Some(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Resolve credentials from request query parameters
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self> {
        let url = params.get(URL_PARAM).map(String::as_str).unwrap_or_default();
        let key = params.get(API_KEY_PARAM).map(String::as_str).unwrap_or_default();

        Self::new(url, key).ok_or_else(|| CredentialsError::MissingQueryCredentials.into())
    }

    /// Resolve credentials from `REDMINE_URL` and `REDMINE_API_KEY`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve credentials from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &str| {
            lookup(var)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| CredentialsError::MissingEnvVar {
                    var: var.to_string(),
                })
        };

        let url = require(env::REDMINE_URL)?;
        let key = require(env::REDMINE_API_KEY)?;

        Self::new(&url, &key).ok_or_else(|| {
            CredentialsError::MissingEnvVar {
                var: env::REDMINE_URL.to_string(),
            }
            .into()
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API key sent with every request
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

// Keeps the key out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RedmineMcpError;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let creds = Credentials::from_query(&params(&[
            ("redmine_url", "https://redmine.example.com/"),
            ("api_key", "secret"),
        ]))
        .unwrap();
        assert_eq!(creds.base_url(), "https://redmine.example.com");
        assert_eq!(creds.api_key(), "secret");
    }

    #[test]
    fn test_url_without_slash_unchanged() {
        let creds = Credentials::from_query(&params(&[
            ("redmine_url", "https://redmine.example.com/tracker"),
            ("api_key", "secret"),
        ]))
        .unwrap();
        assert_eq!(creds.base_url(), "https://redmine.example.com/tracker");
    }

    #[test]
    fn test_only_one_slash_stripped() {
        let creds = Credentials::new("https://redmine.example.com//", "k").unwrap();
        assert_eq!(creds.base_url(), "https://redmine.example.com/");
    }

    #[test]
    fn test_bare_slash_rejected() {
        let err = Credentials::from_query(&params(&[("redmine_url", "/"), ("api_key", "secret")])).unwrap_err();
        assert!(matches!(
            err,
            RedmineMcpError::Credentials(CredentialsError::MissingQueryCredentials)
        ));
    }

    #[test]
    fn test_missing_params_rejected() {
        for pairs in [
            vec![],
            vec![("redmine_url", "https://redmine.example.com")],
            vec![("api_key", "secret")],
            vec![("redmine_url", ""), ("api_key", "secret")],
            vec![("redmine_url", "https://redmine.example.com"), ("api_key", "")],
        ] {
            let err = Credentials::from_query(&params(&pairs)).unwrap_err();
            assert!(matches!(
                err,
                RedmineMcpError::Credentials(CredentialsError::MissingQueryCredentials)
            ));
        }
    }

    #[test]
    fn test_from_lookup_names_missing_var() {
        let err = Credentials::from_lookup(|var| {
            (var == env::REDMINE_URL).then(|| "https://redmine.example.com".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("REDMINE_API_KEY"));
    }

    #[test]
    fn test_debug_hides_key() {
        let creds = Credentials::new("https://redmine.example.com", "secret").unwrap();
        assert!(!format!("{:?}", creds).contains("secret"));
    }
}
