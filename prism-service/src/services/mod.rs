pub mod metrics;
pub mod prompts;
pub mod providers;
pub mod repositories;

pub use metrics::{get_metrics, init_metrics, record_upstream_call};
pub use providers::{
    GeminiConfig, GeminiTextProvider, GenerationParams, MockTextProvider, ProviderError,
    TextProvider,
};
pub use repositories::{
    GithubClient, MockRepositoryHost, Repository, RepositoryError, RepositoryHost, SearchQuery,
};

use service_core::error::AppError;

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::ProviderError(err.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::ProviderError(err.to_string())
    }
}
