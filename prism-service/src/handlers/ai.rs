use crate::dtos::{
    AiRecsRequest, AiRecsResponse, ChatRequest, ChatResponse, ConversationTurn, HistoryEntry,
};
use crate::services::prompts::{
    chat_prompt, recommendation_prompt, CHAT_INSTRUCTION, RECOMMENDATION_INSTRUCTION,
};
use crate::services::{GenerationParams, ProviderError, TextProvider};
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Returned when the model produces no text.
pub const NO_INSIGHTS: &str = "No insights available.";

/// One non-streaming generation; empty output collapses to [`NO_INSIGHTS`].
async fn generate_text(
    provider: &dyn TextProvider,
    prompt: &str,
    instruction: &str,
) -> Result<String, ProviderError> {
    let params = GenerationParams::with_system_instruction(instruction);
    let response = provider.generate(prompt, &params).await?;

    Ok(response
        .text
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| NO_INSIGHTS.to_string()))
}

/// `POST /get_ai_recs`: contribution guidance for one repository.
#[tracing::instrument(skip(state, request), fields(repo = %request.repo_name, skill_count = request.skills.len()))]
pub async fn get_ai_recs(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AiRecsRequest>,
) -> Result<Json<AiRecsResponse>, AppError> {
    let prompt = recommendation_prompt(&request);

    let ai_suggestions = generate_text(
        state.text_provider.as_ref(),
        &prompt,
        RECOMMENDATION_INSTRUCTION,
    )
    .await?;

    Ok(Json(AiRecsResponse { ai_suggestions }))
}

/// `POST /ai_chat`: one chat turn. History is owned by the caller and echoed back
/// with the new turn appended.
#[tracing::instrument(skip(state, request), fields(history_len = request.history.len()))]
pub async fn ai_chat(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let prompt = chat_prompt(&request, state.config.chat.history_window);

    let response = generate_text(state.text_provider.as_ref(), &prompt, CHAT_INSTRUCTION).await?;

    let ChatRequest {
        prompt: user_message,
        mut history,
        ..
    } = request;
    history.push(HistoryEntry::from(ConversationTurn {
        user_message,
        ai_response: response.clone(),
    }));

    Ok(Json(ChatResponse { response, history }))
}
