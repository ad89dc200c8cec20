use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds nothing mutable; handlers are independent of each other.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Reported by the health route; handlers otherwise read nothing from it.
    pub config: Config,
}
