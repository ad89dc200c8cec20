pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::proxy::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::liveness_handler))
        .route("/health", get(health::health_handler))
        // Proxy API
        .route("/api/chat", post(handlers::handle_chat))
        .route("/api/questions", post(handlers::handle_questions))
        .route("/api/feedback", post(handlers::handle_feedback))
        .with_state(state)
}
