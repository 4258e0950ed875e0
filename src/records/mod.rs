// src/records/mod.rs
// =============================================================================
// The two kinds of records we collect: repositories and commits.
//
// GitHub sends far more fields than we keep. Each record has a small private
// payload struct mirroring just the JSON fields it needs; serde does the
// lookups and reports the name of any field that's missing.
//
// Rust concepts:
// - #[derive(Deserialize)]: generate JSON parsing from a struct definition
// - Nested structs: mirror nested JSON objects (commit.author.name)
// =============================================================================

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed {record} payload: {source}")]
    Payload {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid commit timestamp {value:?} (expected format {format:?})")]
    Timestamp { value: String, format: String },
}

/// A repository returned by `/users/{user}/repos`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub default_branch: String,
    /// `owner.login`; listings with `type=all` include repos owned by others
    pub owner: Option<String>,
}

/// A commit with its line statistics, from `/repos/{owner}/{repo}/commits/{sha}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Name of the repository the commit was fetched from
    pub repository: String,
    pub sha: String,
    pub author_name: String,
    pub author_email: String,
    pub message: String,
    pub date: DateTime<Utc>,
    pub additions: u64,
    pub deletions: u64,
    pub url: String,
}

#[derive(Deserialize)]
struct RepositoryPayload {
    id: u64,
    name: String,
    html_url: String,
    default_branch: String,
    #[serde(default)]
    owner: Option<OwnerPayload>,
}

#[derive(Deserialize)]
struct OwnerPayload {
    login: String,
}

#[derive(Deserialize)]
struct CommitPayload {
    sha: String,
    commit: GitCommitPayload,
    stats: StatsPayload,
    html_url: String,
}

#[derive(Deserialize)]
struct GitCommitPayload {
    author: GitAuthorPayload,
    message: String,
}

#[derive(Deserialize)]
struct GitAuthorPayload {
    name: String,
    email: String,
    date: String,
}

#[derive(Deserialize)]
struct StatsPayload {
    additions: u64,
    deletions: u64,
}

// Only the SHA of a commit summary is needed to fetch its details
#[derive(Deserialize)]
struct CommitSummaryPayload {
    sha: String,
}

impl Repository {
    pub fn from_json(value: Value) -> Result<Self, RecordError> {
        let payload: RepositoryPayload =
            serde_json::from_value(value).map_err(|source| RecordError::Payload {
                record: "repository",
                source,
            })?;

        Ok(Self {
            id: payload.id,
            name: payload.name,
            url: payload.html_url,
            default_branch: payload.default_branch,
            owner: payload.owner.map(|o| o.login),
        })
    }
}

impl Commit {
    /// Builds a commit from a commit detail payload
    ///
    /// `timestamp_format` is a chrono format string; the parsed time is UTC.
    pub fn from_json(
        repository: &str,
        value: Value,
        timestamp_format: &str,
    ) -> Result<Self, RecordError> {
        let payload: CommitPayload =
            serde_json::from_value(value).map_err(|source| RecordError::Payload {
                record: "commit",
                source,
            })?;

        let date = parse_timestamp(&payload.commit.author.date, timestamp_format)?;

        Ok(Self {
            repository: repository.to_string(),
            sha: payload.sha,
            author_name: payload.commit.author.name,
            author_email: payload.commit.author.email,
            message: payload.commit.message,
            date,
            additions: payload.stats.additions,
            deletions: payload.stats.deletions,
            url: payload.html_url,
        })
    }
}

/// Pulls the SHA out of one entry of a commit listing
pub fn commit_sha(value: Value) -> Result<String, RecordError> {
    let summary: CommitSummaryPayload =
        serde_json::from_value(value).map_err(|source| RecordError::Payload {
            record: "commit summary",
            source,
        })?;
    Ok(summary.sha)
}

fn parse_timestamp(value: &str, format: &str) -> Result<DateTime<Utc>, RecordError> {
    NaiveDateTime::parse_from_str(value, format)
        .map(|naive| naive.and_utc())
        .map_err(|_| RecordError::Timestamp {
            value: value.to_string(),
            format: format.to_string(),
        })
}
