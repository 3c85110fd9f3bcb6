//! Service configuration
//!
//! Defaults point at the public GitHub and Bitbucket APIs. Base URLs are
//! overridable (also what lets tests aim the service at a local mock
//! server), and the GitHub token is read from the GITHUB_TOKEN environment
//! variable.

use serde::{Deserialize, Serialize};

/// Configuration for the profile aggregation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// GitHub REST API base URL
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Bitbucket REST API base URL
    #[serde(default = "default_bitbucket_api_url")]
    pub bitbucket_api_url: String,

    /// Bearer token sent with GitHub requests when present
    #[serde(default)]
    pub github_token: Option<String>,

    /// Upper bound on pages fetched per source before the walk is aborted
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Per-request timeout in seconds on the shared HTTP client
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_bitbucket_api_url() -> String {
    "https://api.bitbucket.org/2.0".to_string()
}

fn default_max_pages() -> u32 {
    100
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            github_api_url: default_github_api_url(),
            bitbucket_api_url: default_bitbucket_api_url(),
            github_token: None,
            max_pages: default_max_pages(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    /// Default configuration with the GitHub token picked up from the
    /// GITHUB_TOKEN environment variable, if set.
    pub fn from_env() -> Self {
        Self {
            github_token: std::env::var("GITHUB_TOKEN").ok(),
            ..Self::default()
        }
    }
}
