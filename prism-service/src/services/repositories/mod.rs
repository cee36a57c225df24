//! Repository host abstraction.
//!
//! Handlers talk to a `RepositoryHost`; production wires in `GithubClient`,
//! tests and offline runs use `MockRepositoryHost`.

pub mod github;
pub mod mock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

pub use github::GithubClient;
pub use mock::MockRepositoryHost;

/// Error type for repository host operations.
///
/// Display output is what callers see in the 500 body, so variants carry
/// the upstream text unchanged.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("{0}")]
    Network(String),

    #[error("GitHub API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse GitHub response: {0}")]
    Decode(String),

    #[error("Invalid repository host URL: {0}")]
    InvalidUrl(String),
}

/// Owner block of a repository object.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RepositoryOwner {
    pub login: String,
}

/// Repository object as returned by the host's search and lookup endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Repository {
    pub name: String,
    pub owner: RepositoryOwner,
    pub html_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
}

/// A repository search, always ranked by star count, highest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    pub limit: u32,
}

impl SearchQuery {
    pub fn by_stars(q: impl Into<String>, limit: u32) -> Self {
        Self { q: q.into(), limit }
    }
}

#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Run one search and return at most `query.limit` repositories in rank order.
    async fn search_repositories(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Repository>, RepositoryError>;

    /// Look up a single repository. `Ok(None)` means the host has no such repository.
    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<Repository>, RepositoryError>;
}
