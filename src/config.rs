use crate::error::{ClientError, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Service endpoint used when nothing else is configured.
/// Production deployments point this at their own service.
pub const DEFAULT_API_BASE: &str = "https://fullstack-project2-snippet-api-2.onrender.com";
pub const API_BASE_ENV: &str = "SNIPPET_API_BASE";
pub const DEFAULT_LIMIT: u32 = 10;
pub const LOG_FILENAME: &str = "snippet-client.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: sanitize_base_url(base_url),
        }
    }

    /// Resolve the base URL from an explicit value, then the environment.
    pub fn resolve(base_url: Option<String>) -> Self {
        Self::new(base_url.or_else(|| env::var(API_BASE_ENV).ok()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn snippets_endpoint(&self) -> String {
        format!("{}/api/snippets", self.base_url)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.starts_with("http://") || self.base_url.starts_with("https://") {
            Ok(())
        } else {
            Err(ClientError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                self.base_url
            )))
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

fn sanitize_base_url(base_url: Option<String>) -> String {
    base_url
        .and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.trim_end_matches('/').to_string())
            }
        })
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Get the client configuration directory
pub fn get_config_dir() -> PathBuf {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".snippet-client"))
        .unwrap_or_else(|_| PathBuf::from(".snippet-client"))
}

/// Ensure a directory exists
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
