// src/github/fetch.rs
// =============================================================================
// This module talks HTTP to the GitHub REST API and walks its pagination.
//
// Strategy:
// - GET the starting URL (with a bearer token if we have one)
// - If the body is a JSON array, keep it and follow the `rel="next"` entry of
//   the Link header until there isn't one
// - If the body is a JSON object, it's either a single resource (one commit)
//   or an error envelope with a `message`; errors stop the whole run
//
// Requests are awaited one after another. There is no page cap: a server
// that keeps sending `next` links keeps us looping.
//
// Rust concepts:
// - async functions: For network I/O
// - enums with data: ApiResponse is either a list or a single object
// - HeaderMap: typed access to HTTP headers
// =============================================================================

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use super::config::GitHubConfig;
use super::error::GitHubError;

// What a fetch produced
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Every element of every page, in page order
    List(Vec<Value>),
    /// A single JSON object that wasn't an error envelope
    Object(Value),
}

impl ApiResponse {
    pub fn into_list(self, url: &Url) -> Result<Vec<Value>, GitHubError> {
        match self {
            ApiResponse::List(items) => Ok(items),
            ApiResponse::Object(_) => Err(GitHubError::UnexpectedShape {
                url: url.to_string(),
                expected: "a JSON array",
            }),
        }
    }

    pub fn into_object(self, url: &Url) -> Result<Value, GitHubError> {
        match self {
            ApiResponse::Object(value) => Ok(value),
            ApiResponse::List(_) => Err(GitHubError::UnexpectedShape {
                url: url.to_string(),
                expected: "a JSON object",
            }),
        }
    }
}

// The paginated fetcher
//
// The reqwest client is built once with the auth header baked into its
// default headers, so every page (including `next` links) is authenticated
// the same way.
pub struct Fetcher {
    client: Client,
    config: GitHubConfig,
}

impl Fetcher {
    pub fn new(config: GitHubConfig) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        // Only authenticated runs send Authorization at all
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| GitHubError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        debug!(?config, "built GitHub client");

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    // Builds `{base_url}/{segments...}`
    //
    // Each segment is percent-encoded, so a user or repository name can't
    // change the shape of the path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, GitHubError> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitHubError::BaseUrl(self.config.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // Fetches `start` and every page after it
    //
    // Returns:
    //   ApiResponse::List when the API answers with arrays (all pages joined)
    //   ApiResponse::Object when it answers with a single object
    //   GitHubError::Api when that object has a non-empty `message`
    pub async fn fetch(&self, start: Url) -> Result<ApiResponse, GitHubError> {
        let mut url = start;
        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            debug!(%url, page, "GET");
            let response = self.client.get(url.clone()).send().await?;
            let next = next_link(response.headers());
            let body: Value = response.json().await?;

            match body {
                Value::Array(elements) => {
                    debug!(%url, page, count = elements.len(), "received page");
                    items.extend(elements);

                    match next {
                        Some(link) => {
                            debug!(next = %link, "following next link");
                            url = Url::parse(&link)?;
                            page += 1;
                        }
                        None => return Ok(ApiResponse::List(items)),
                    }
                }
                Value::Object(map) => {
                    if let Some(message) = error_message(&map) {
                        return Err(GitHubError::Api { message });
                    }
                    return Ok(ApiResponse::Object(Value::Object(map)));
                }
                _ => {
                    return Err(GitHubError::UnexpectedShape {
                        url: url.to_string(),
                        expected: "a JSON array or object",
                    })
                }
            }
        }
    }
}

// Returns the error text of an API error envelope
//
// `message` missing or "" means the object is real data.
fn error_message(body: &Map<String, Value>) -> Option<String> {
    match body.get("message")? {
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

// Finds the `rel="next"` URL in the Link header(s)
//
// GitHub Link headers look like:
// `<https://api.github.com/user/1/repos?page=2>; rel="next", <...&page=5>; rel="last"`
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(|entry| {
            let mut target = None;
            let mut is_next = false;

            for segment in entry.split(';') {
                let segment = segment.trim();
                if segment.starts_with('<') && segment.ends_with('>') {
                    target = Some(&segment[1..segment.len() - 1]);
                } else if let Some(rel) = segment.strip_prefix("rel=") {
                    // rel may hold several space-separated relation types
                    is_next = rel.trim_matches('"').split_whitespace().any(|r| r == "next");
                }
            }

            if is_next {
                target.map(String::from)
            } else {
                None
            }
        })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does fetch() return an enum instead of always a Vec?
//    - The same endpoint helper serves list endpoints (repos, commits) and
//      single-object endpoints (one commit's details)
//    - The caller knows which one it asked for and uses into_list() or
//      into_object() to say so; a mismatch becomes an error, not a panic
//
// 2. What is `match body.get("message")?`
//    - get() returns Option<&Value>
//    - The ? on an Option returns None early from the function
//
// 3. What does find_map do?
//    - Runs a closure on each item until it returns Some(...)
//    - Perfect for "find the first entry that is the next link"
//
// 4. Why set_sensitive(true) on the Authorization value?
//    - It tells the http library not to print the token in Debug output
// -----------------------------------------------------------------------------
