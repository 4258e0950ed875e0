// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to the GitHub REST API.
//
// Submodules:
// - config: base URL, token and timestamp format for a run
// - fetch: HTTP requests and Link-header pagination
// - extract: repository and commit listings built on top of fetch
// - error: the error type shared by all of the above
// =============================================================================

mod config;
mod error;
mod extract;
mod fetch;

pub use config::{GitHubConfig, DEFAULT_BASE_URL};
pub use error::GitHubError;
pub use extract::{Extractor, RepoType};
pub use fetch::Fetcher;
