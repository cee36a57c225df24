use super::null_as_default;
use crate::services::repositories::Repository;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Language reported when the host has none for a repository.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

#[derive(Debug, Deserialize, Validate)]
pub struct RepositoriesRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "No skills provided"))]
    pub skills: Vec<String>,
}

/// Owner and name are passed to the host as given; the host rejects bad input.
#[derive(Debug, Deserialize, Validate)]
pub struct GetInfoRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repo_name: String,
}

/// One entry of a multi-skill search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositorySummary {
    #[serde(rename = "repo")]
    pub name: String,
    #[serde(rename = "stars")]
    pub star_count: u64,
    #[serde(rename = "lang")]
    pub primary_language: String,
    pub url: String,
    #[serde(rename = "owner")]
    pub owner_login: String,
    pub description: Option<String>,
    pub topics: Vec<String>,
    pub last_updated: String,
    pub is_fork: bool,
    #[serde(rename = "issues")]
    pub open_issue_count: u64,
}

impl From<Repository> for RepositorySummary {
    fn from(repo: Repository) -> Self {
        Self {
            name: repo.name,
            star_count: repo.stargazers_count,
            primary_language: language_or_unknown(repo.language),
            url: repo.html_url,
            owner_login: repo.owner.login,
            description: repo.description,
            topics: repo.topics,
            last_updated: repo.updated_at.to_rfc3339(),
            is_fork: repo.fork,
            open_issue_count: repo.open_issues_count,
        }
    }
}

/// Full field set for a single repository lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryDetail {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "stars")]
    pub star_count: u64,
    #[serde(rename = "forks")]
    pub fork_count: u64,
    pub language: String,
    pub url: String,
    #[serde(rename = "issues")]
    pub open_issue_count: u64,
    pub is_private: bool,
    pub is_archived: bool,
    pub is_disabled: bool,
}

impl From<Repository> for RepositoryDetail {
    fn from(repo: Repository) -> Self {
        Self {
            name: repo.name,
            description: repo.description,
            star_count: repo.stargazers_count,
            fork_count: repo.forks_count,
            language: language_or_unknown(repo.language),
            url: repo.html_url,
            open_issue_count: repo.open_issues_count,
            is_private: repo.private,
            is_archived: repo.archived,
            is_disabled: repo.disabled,
        }
    }
}

fn language_or_unknown(language: Option<String>) -> String {
    language
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
}
