// src/github/config.rs
// =============================================================================
// Settings shared by every request we make to the GitHub API.
//
// The base URL, timestamp format and credentials all live here and are handed
// to the Fetcher when it is built, so nothing in the client reads globals.
// =============================================================================

use std::fmt;

use url::Url;

/// Public GitHub REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Format GitHub uses for `commit.author.date`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Number of items requested per page on listing endpoints (GitHub's maximum).
pub const PER_PAGE: u32 = 100;

#[derive(Clone)]
pub struct GitHubConfig {
    /// Root of the API, e.g. `https://api.github.com` or an Enterprise `/api/v3`
    pub base_url: Url,
    /// Bearer token; `None` means unauthenticated requests
    pub token: Option<String>,
    /// chrono format string for commit timestamps
    pub timestamp_format: String,
    /// GitHub rejects requests that don't send a User-Agent
    pub user_agent: String,
}

impl GitHubConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the API token. Blank tokens mean "no token", matching the
    /// interactive prompt where pressing Enter skips authentication.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

// Hand-written so the token never ends up in logs.
impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timestamp_format", &self.timestamp_format)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse(DEFAULT_BASE_URL).unwrap()
    }

    #[test]
    fn test_blank_token_is_unauthenticated() {
        let config = GitHubConfig::new(base()).with_token(Some("   ".to_string()));
        assert!(!config.is_authenticated());

        let config = GitHubConfig::new(base()).with_token(None);
        assert!(!config.is_authenticated());
    }

    #[test]
    fn test_token_is_trimmed() {
        let config = GitHubConfig::new(base()).with_token(Some(" ghp_abc\n".to_string()));
        assert_eq!(config.token.as_deref(), Some("ghp_abc"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = GitHubConfig::new(base()).with_token(Some("secret-token".to_string()));
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_defaults() {
        let config = GitHubConfig::new(base());
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert!(config.user_agent.starts_with("gh-extract/"));
    }
}
