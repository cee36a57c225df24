//! Prompt composition for the two language-model handlers.
//!
//! Caller text is interpolated verbatim; nothing is escaped.

use crate::dtos::{AiRecsRequest, ChatRequest, HistoryEntry};

pub const RECOMMENDATION_INSTRUCTION: &str = "You are an AI assistant helping users find open-source repositories to contribute to. \
Generate insightful recommendations based on their skills and repository details. \
Keep the generated content concise and relevant. Keep the response under 600 tokens.";

pub const CHAT_INSTRUCTION: &str = "You are an AI assistant helping users know about open-source repositories to contribute to. \
You are designed to chat with the user about the repo.";

/// Build the contribution-recommendation prompt.
pub fn recommendation_prompt(req: &AiRecsRequest) -> String {
    format!(
        "Based on the user's skills: {skills}, suggest the best way to contribute to the repository \"{repo}\".
Repository Description: {desc}

===CONTEXT===
User Experience: {experience}
User Interests: {interests}
Time the User can spend: {time}
===END CONTEXT===

===RESPONSE INSTRUCTIONS===
1. Provide a list of key technologies needed for the repository.
2. Suggest good first issues to start with.
3. Provide a step-by-step guide on how to contribute to the repository.
4. Keep the response concise and relevant.
5. Use proper formatting for the response.
===END RESPONSE INSTRUCTIONS===
",
        skills = req.skills.join(", "),
        repo = req.repo_name,
        desc = req.repo_desc,
        experience = req.user_experience,
        interests = req.user_interests,
        time = req.user_time,
    )
}

/// Build the chat prompt, rendering only the last `history_window` entries.
pub fn chat_prompt(req: &ChatRequest, history_window: usize) -> String {
    let repo_info = req
        .repo_info
        .as_ref()
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "{}".to_string());

    let skip = req.history.len().saturating_sub(history_window);
    let history = req
        .history
        .iter()
        .skip(skip)
        .map(render_history_entry)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "User Message: {message}
===CONTEXT===
Repository Name: {repo}
Repository Info: {repo_info}
User Skills: {skills}
===END CONTEXT===
===RESPONSE INSTRUCTIONS===
1. Provide a detailed response to the user's message.
2. Use the repository information and user skills to tailor your response.
===END RESPONSE INSTRUCTIONS===
===CONVERSATION HISTORY===
{history}
===END CONVERSATION HISTORY===
",
        message = req.prompt,
        repo = req.repo_name,
        repo_info = repo_info,
        skills = req.skills.join(", "),
        history = history,
    )
}

fn render_history_entry(entry: &HistoryEntry) -> String {
    match entry {
        HistoryEntry::Turn(turn) => format!("User: {}\nAI: {}", turn.user_message, turn.ai_response),
        HistoryEntry::Raw(value) => {
            // Chat clients commonly send `{type, text}` message objects.
            let speaker = value.get("type").and_then(|v| v.as_str());
            let text = value.get("text").and_then(|v| v.as_str());
            match (speaker, text) {
                (Some("ai"), Some(text)) => format!("AI: {}", text),
                (Some("user"), Some(text)) => format!("User: {}", text),
                (Some(other), Some(text)) => format!("{}: {}", other, text),
                _ => value.to_string(),
            }
        }
    }
}
