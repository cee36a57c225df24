#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use prism_service::config::{ChatConfig, GeminiSettings, GithubConfig, PrismConfig, ProviderSettings};
use prism_service::services::repositories::RepositoryOwner;
use prism_service::services::{MockRepositoryHost, MockTextProvider, Repository};
use prism_service::startup::{build_router, AppState};
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::util::ServiceExt;

pub fn test_config() -> PrismConfig {
    PrismConfig {
        common: CoreConfig {
            port: 0,
            log_level: "debug".to_string(),
        },
        github: GithubConfig {
            token: Secret::new("test-token".to_string()),
            api_base: "http://127.0.0.1:1".to_string(),
        },
        gemini: GeminiSettings {
            api_key: Secret::new("test-key".to_string()),
            api_base: "http://127.0.0.1:1".to_string(),
            model: "gemini-1.5-pro-latest".to_string(),
        },
        providers: ProviderSettings {
            use_mock: true,
            timeout_secs: 5,
        },
        chat: ChatConfig { history_window: 20 },
        otlp_endpoint: None,
    }
}

pub fn repo(owner: &str, name: &str, language: Option<&str>, stars: u64) -> Repository {
    Repository {
        name: name.to_string(),
        owner: RepositoryOwner {
            login: owner.to_string(),
        },
        html_url: format!("https://github.com/{}/{}", owner, name),
        description: Some(format!("{} description", name)),
        stargazers_count: stars,
        forks_count: stars / 10,
        language: language.map(str::to_string),
        topics: vec![],
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        fork: false,
        open_issues_count: 3,
        private: false,
        archived: false,
        disabled: false,
    }
}

/// Router wired to mocks, with handles kept for call-count assertions.
pub struct TestApp {
    pub router: Router,
    pub repos: Arc<MockRepositoryHost>,
    pub model: Arc<MockTextProvider>,
}

impl TestApp {
    pub fn new(repos: MockRepositoryHost, model: MockTextProvider) -> Self {
        Self::with_config(test_config(), repos, model)
    }

    pub fn with_config(
        config: PrismConfig,
        repos: MockRepositoryHost,
        model: MockTextProvider,
    ) -> Self {
        let repos = Arc::new(repos);
        let model = Arc::new(model);
        let state = AppState {
            config,
            repository_host: repos.clone(),
            text_provider: model.clone(),
        };

        Self {
            router: build_router(state),
            repos,
            model,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, body)
    }
}
