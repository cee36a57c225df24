//! Request and response bodies for the HTTP surface.

pub mod ai;
pub mod repositories;

pub use ai::{
    AiRecsRequest, AiRecsResponse, ChatRequest, ChatResponse, ConversationTurn, HistoryEntry,
};
pub use repositories::{GetInfoRequest, RepositoriesRequest, RepositoryDetail, RepositorySummary};

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
