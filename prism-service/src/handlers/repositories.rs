use crate::dtos::{GetInfoRequest, RepositoriesRequest, RepositoryDetail, RepositorySummary};
use crate::services::SearchQuery;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Results taken per skill. Fixed, not caller-configurable.
pub const RESULTS_PER_SKILL: u32 = 9;

/// Search query sent for one skill.
pub fn skill_query(skill: &str) -> SearchQuery {
    SearchQuery::by_stars(format!("{} stars:>100", skill), RESULTS_PER_SKILL)
}

/// `POST /repositories`: top starred repositories for each skill, concatenated in skill order.
///
/// One search per skill, issued in order. Any failed search fails the whole request.
#[tracing::instrument(skip(state, request), fields(skill_count = request.skills.len()))]
pub async fn search_repositories(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RepositoriesRequest>,
) -> Result<Json<Vec<RepositorySummary>>, AppError> {
    let mut results = Vec::with_capacity(request.skills.len() * RESULTS_PER_SKILL as usize);

    for skill in &request.skills {
        let repos = state
            .repository_host
            .search_repositories(&skill_query(skill))
            .await
            .map_err(|e| {
                tracing::error!(%skill, error = %e, "Repository search failed");
                e
            })?;

        tracing::debug!(%skill, found = repos.len(), "Repository search complete");
        results.extend(repos.into_iter().map(RepositorySummary::from));
    }

    tracing::info!(total = results.len(), "Repositories returned");
    Ok(Json(results))
}

/// `POST /get_info`: details for one repository.
#[tracing::instrument(skip(state, request), fields(owner = %request.owner, repo = %request.repo_name))]
pub async fn get_info(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GetInfoRequest>,
) -> Result<Json<RepositoryDetail>, AppError> {
    let repo = state
        .repository_host
        .get_repository(&request.owner, &request.repo_name)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Repository not found")))?;

    Ok(Json(RepositoryDetail::from(repo)))
}
