//! HTTP handlers for prism-service.

pub mod ai;
pub mod health;
pub mod repositories;

pub use ai::{ai_chat, get_ai_recs};
pub use health::{health_check, home, metrics_endpoint, readiness_check};
pub use repositories::{get_info, search_repositories};
