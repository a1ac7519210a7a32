//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const API_URL_ENV: &str = "SHORTLINK_API_URL";
pub const SESSION_FILE_ENV: &str = "SHORTLINK_SESSION_FILE";
pub const DEFAULT_SESSION_FILE: &str = ".shortlink/session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API origin without a trailing slash. Empty means same-origin.
    pub base_url: String,
    /// File backing the persisted session between runs.
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `SHORTLINK_API_URL`: API origin, default empty
    /// - `SHORTLINK_SESSION_FILE`: default `.shortlink/session.json`
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV).unwrap_or_default();
        let session_file = std::env::var(SESSION_FILE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Self::new(base_url, session_file)
    }

    #[must_use]
    pub fn new(base_url: impl Into<String>, session_file: impl Into<PathBuf>) -> Self {
        Self { base_url: normalize_base_url(&base_url.into()), session_file: session_file.into() }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("", DEFAULT_SESSION_FILE)
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
