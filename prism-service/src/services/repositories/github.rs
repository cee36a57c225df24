//! GitHub REST client.
//!
//! Covers the two calls the gateway needs: repository search and
//! owner/name lookup. Authenticates with a bearer token.

use super::{Repository, RepositoryError, RepositoryHost, SearchQuery};
use crate::services::metrics::record_upstream_call;
use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::{Duration, Instant};

const USER_AGENT: &str = "prism-service";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// GitHub client configuration.
#[derive(Debug, Clone)]
pub struct GithubClientConfig {
    pub api_base: String,
    pub token: Secret<String>,
    pub timeout: Duration,
}

pub struct GithubClient {
    base: Url,
    token: Secret<String>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Repository>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GithubClient {
    pub fn new(config: GithubClientConfig) -> Result<Self, RepositoryError> {
        let base = Url::parse(&config.api_base)
            .map_err(|e| RepositoryError::InvalidUrl(format!("{}: {}", config.api_base, e)))?;
        if base.cannot_be_a_base() {
            return Err(RepositoryError::InvalidUrl(config.api_base));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RepositoryError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base,
            token: config.token,
            client,
        })
    }

    /// Append path segments to the base URL, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: Url, query: &[(&str, String)]) -> Result<Response, RepositoryError> {
        self.client
            .get(url)
            .query(query)
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| RepositoryError::Network(e.to_string()))
    }

    async fn api_error(response: Response) -> RepositoryError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        RepositoryError::Api { status, message }
    }
}

#[async_trait]
impl RepositoryHost for GithubClient {
    async fn search_repositories(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Repository>, RepositoryError> {
        let url = self.endpoint(&["search", "repositories"]);
        let params = [
            ("q", query.q.clone()),
            ("sort", "stars".to_string()),
            ("order", "desc".to_string()),
            ("per_page", query.limit.to_string()),
        ];

        tracing::debug!(q = %query.q, limit = query.limit, "Searching GitHub repositories");

        let started = Instant::now();
        let result: Result<SearchResponse, RepositoryError> = async {
            let response = self.get(url, &params).await?;
            if !response.status().is_success() {
                return Err(Self::api_error(response).await);
            }
            response
                .json::<SearchResponse>()
                .await
                .map_err(|e| RepositoryError::Decode(e.to_string()))
        }
        .await;
        record_upstream_call("github", "search", started.elapsed(), result.is_ok());

        let mut items = result?.items;
        items.truncate(query.limit as usize);
        Ok(items)
    }

    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<Repository>, RepositoryError> {
        let url = self.endpoint(&["repos", owner, name]);

        tracing::debug!(%owner, repo = %name, "Fetching GitHub repository");

        let started = Instant::now();
        let result: Result<Option<Repository>, RepositoryError> = async {
            let response = self.get(url, &[]).await?;
            match response.status() {
                StatusCode::NOT_FOUND => Ok(None),
                status if status.is_success() => response
                    .json::<Repository>()
                    .await
                    .map(Some)
                    .map_err(|e| RepositoryError::Decode(e.to_string())),
                _ => Err(Self::api_error(response).await),
            }
        }
        .await;
        record_upstream_call("github", "lookup", started.elapsed(), result.is_ok());

        result
    }
}
