use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::llm_client::MODEL;
use crate::state::AppState;

/// GET /
/// Plain-text liveness probe.
pub async fn liveness_handler() -> &'static str {
    "Server is up and running!"
}

/// GET /health
/// Returns a simple status object with service version and upstream model.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "interview-api",
        "model": MODEL,
        "upstream": state.config.openai_base_url,
    }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::LlmClient;
    use crate::routes::build_router;
    use crate::state::AppState;

    fn state() -> AppState {
        let config = Config {
            openai_api_key: "sk-test".to_string(),
            openai_base_url: "http://127.0.0.1:9".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        };
        AppState {
            llm: LlmClient::new(config.openai_api_key.clone(), config.openai_base_url.clone())
                .unwrap(),
            config,
        }
    }

    #[tokio::test]
    async fn test_root_returns_plain_text() {
        let response = build_router(state())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Server is up and running!");
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let response = build_router(state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "gpt-4o-mini");
    }
}
