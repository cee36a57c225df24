//! In-process repository host for tests and offline runs.

use super::{Repository, RepositoryError, RepositoryHost, RepositoryOwner, SearchQuery};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Serves a fixed catalogue and counts calls.
///
/// A search matches repositories whose language or topics equal the first
/// word of the query (case-insensitive), ranked by stars.
#[derive(Default)]
pub struct MockRepositoryHost {
    catalogue: Vec<Repository>,
    failing_query: Option<String>,
    search_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
    queries: Mutex<Vec<SearchQuery>>,
}

impl MockRepositoryHost {
    pub fn new(catalogue: Vec<Repository>) -> Self {
        Self {
            catalogue,
            ..Default::default()
        }
    }

    /// Small catalogue used when the service runs with mock providers.
    pub fn with_sample_data() -> Self {
        Self::new(vec![
            sample("tokio", "tokio-rs", "Rust", 27_000, &["async", "rust"]),
            sample("axum", "tokio-rs", "Rust", 19_000, &["http", "rust"]),
            sample("django", "django", "Python", 80_000, &["python", "web"]),
            sample("flask", "pallets", "Python", 68_000, &["python", "wsgi"]),
            sample("react", "facebook", "JavaScript", 225_000, &["javascript", "ui"]),
        ])
    }

    /// Make every search whose query text equals `q` fail.
    pub fn failing_on(mut self, q: impl Into<String>) -> Self {
        self.failing_query = Some(q.into());
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

fn sample(name: &str, owner: &str, language: &str, stars: u64, topics: &[&str]) -> Repository {
    Repository {
        name: name.to_string(),
        owner: RepositoryOwner {
            login: owner.to_string(),
        },
        html_url: format!("https://github.com/{}/{}", owner, name),
        description: Some(format!("{} sample repository", name)),
        stargazers_count: stars,
        forks_count: stars / 10,
        language: Some(language.to_string()),
        topics: topics.iter().map(|t| t.to_string()).collect(),
        updated_at: DateTime::<Utc>::from_timestamp(1_717_200_000, 0).unwrap_or_default(),
        fork: false,
        open_issues_count: stars / 100,
        private: false,
        archived: false,
        disabled: false,
    }
}

#[async_trait]
impl RepositoryHost for MockRepositoryHost {
    async fn search_repositories(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Repository>, RepositoryError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }

        if self.failing_query.as_deref() == Some(query.q.as_str()) {
            return Err(RepositoryError::Api {
                status: 403,
                message: "API rate limit exceeded".to_string(),
            });
        }

        let term = query
            .q
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();

        let mut matches: Vec<Repository> = self
            .catalogue
            .iter()
            .filter(|r| {
                r.language.as_deref().map(str::to_lowercase).as_deref() == Some(term.as_str())
                    || r.topics.iter().any(|t| t.to_lowercase() == term)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
        matches.truncate(query.limit as usize);

        Ok(matches)
    }

    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<Repository>, RepositoryError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);

        Ok(self
            .catalogue
            .iter()
            .find(|r| r.owner.login == owner && r.name == name)
            .cloned())
    }
}
