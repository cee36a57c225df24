use super::null_as_default;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct AiRecsRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "Skills and repository name required"))]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "Skills and repository name required"))]
    pub repo_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repo_desc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_experience: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_interests: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_time: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AiRecsResponse {
    pub ai_suggestions: String,
}

/// One completed exchange in a chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConversationTurn {
    #[serde(rename = "user")]
    pub user_message: String,
    #[serde(rename = "ai")]
    pub ai_response: String,
}

/// A history element as sent by the caller.
///
/// Entries that are not exactly `{user, ai}` are kept as raw JSON so they
/// round-trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum HistoryEntry {
    Turn(ConversationTurn),
    Raw(serde_json::Value),
}

impl From<ConversationTurn> for HistoryEntry {
    fn from(turn: ConversationTurn) -> Self {
        HistoryEntry::Turn(turn)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "Prompt is required"))]
    pub prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<HistoryEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repo_name: String,
    /// Forwarded into the prompt as-is.
    #[serde(default)]
    pub repo_info: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub history: Vec<HistoryEntry>,
}
