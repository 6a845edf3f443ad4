use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use reminder_common::config::TrackerConfig;
use reminder_common::error::AppError;

use crate::issue::{RawIssue, SearchResponse};
use crate::query::SEARCH_FIELDS;

/// Timeout for a whole search request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Substrings of a 403 body that mean the server refuses basic auth outright.
///
/// Only these exact server messages are recognised; other 403s are fatal.
const BASIC_AUTH_DISABLED_MARKERS: [&str; 2] = [
    "Basic Authentication has been disabled",
    "Basic authentication",
];

/// Longest error body kept in an [`AppError::Tracker`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Basic,
    Bearer,
}

/// Result of a search that didn't fail outright.
#[derive(Debug)]
pub enum SearchOutcome {
    Issues(Vec<RawIssue>),
    /// The server rejected basic auth because it is disabled; retry with a bearer token.
    BasicAuthRejected,
}

/// Thin HTTP client for the tracker's `/rest/api/2/search` endpoint.
pub struct TrackerClient {
    http: reqwest::Client,
    search_url: String,
    user: String,
    token: String,
}

impl TrackerClient {
    pub fn new(config: &TrackerConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            search_url: format!("{}/rest/api/2/search", config.base_url),
            user: config.user.clone(),
            token: config.token.clone(),
        })
    }

    /// Search with basic auth.
    ///
    /// A 403 saying basic auth is disabled comes back as
    /// [`SearchOutcome::BasicAuthRejected`]; any other non-success status is an error.
    pub async fn search_basic(&self, jql: &str) -> Result<SearchOutcome, AppError> {
        let (status, body) = self.send(jql, AuthMode::Basic).await?;

        if status == StatusCode::FORBIDDEN && is_basic_auth_disabled(&body) {
            return Ok(SearchOutcome::BasicAuthRejected);
        }
        parse_issues(status, body).map(SearchOutcome::Issues)
    }

    /// Search with the token as a bearer credential. Every non-success status is an error.
    pub async fn search_bearer(&self, jql: &str) -> Result<Vec<RawIssue>, AppError> {
        let (status, body) = self.send(jql, AuthMode::Bearer).await?;
        parse_issues(status, body)
    }

    async fn send(&self, jql: &str, auth: AuthMode) -> Result<(StatusCode, String), AppError> {
        tracing::debug!(url = %self.search_url, ?auth, jql, "Searching tracker");

        let request = self
            .http
            .get(&self.search_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .query(&[("jql", jql), ("fields", SEARCH_FIELDS)]);

        let request = match auth {
            AuthMode::Basic => request.basic_auth(&self.user, Some(&self.token)),
            AuthMode::Bearer => request.bearer_auth(&self.token),
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

fn parse_issues(status: StatusCode, body: String) -> Result<Vec<RawIssue>, AppError> {
    if !status.is_success() {
        return Err(AppError::Tracker {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        });
    }

    let parsed: SearchResponse = serde_json::from_str(&body)
        .map_err(|e| AppError::Decode(format!("search response: {e}")))?;
    Ok(parsed.issues)
}

/// Whether a 403 body says basic authentication is disabled.
///
/// Checks the JSON `message` field when present, otherwise the raw body.
pub fn is_basic_auth_disabled(body: &str) -> bool {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    BASIC_AUTH_DISABLED_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}
