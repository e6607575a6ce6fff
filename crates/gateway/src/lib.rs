//! HTTP gateway for RS-Dados.
//!
//! Two routes:
//! - `POST /chat` with `{"question": "..."}` answers `{"answer": "..."}`
//! - `GET /health` for liveness probes
//!
//! Tool and LLM failures are already folded into the answer text by the
//! orchestrator, so `/chat` replies 200 for every well-formed request.

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info, info_span};

use rsdados_agent::Orchestrator;
use rsdados_config::AppConfig;

/// Request bodies larger than this are rejected with 413.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

type SharedOrchestrator = Arc<Orchestrator>;

/// Build the Axum router around a ready orchestrator.
pub fn build_router(orchestrator: SharedOrchestrator) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(orchestrator)
}

/// Start the HTTP server.
///
/// Tools and the LLM provider are built once here and shared by every
/// request.
pub async fn start(config: AppConfig) -> rsdados_core::Result<()> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let orchestrator = Arc::new(Orchestrator::from_config(&config));
    if !orchestrator.gateway().is_configured() {
        tracing::warn!("LLM provider not configured, /chat will answer with a configuration error");
    }

    let app = build_router(orchestrator);

    info!(addr = %addr, model = %config.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

async fn chat_handler(
    State(orchestrator): State<SharedOrchestrator>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("chat", %request_id);

    async move {
        info!(question_len = payload.question.len(), "Chat question received");
        let answer = orchestrator.answer(&payload.question).await;
        Json(ChatResponse { answer })
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        // Default config carries no credential, so the LLM step answers
        // with the configuration error and nothing leaves the process.
        let orchestrator = Orchestrator::from_config(&AppConfig::default());
        build_router(Arc::new(orchestrator))
    }

    fn chat_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn chat_without_credential_answers_with_config_error() {
        let body = serde_json::json!({ "question": "Me conte curiosidades históricas do RS" });
        let response = app().oneshot(chat_request(body.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let chat: ChatResponse = serde_json::from_slice(&body).unwrap();
        assert!(chat.answer.starts_with("[erro de configuração]"));
    }

    #[tokio::test]
    async fn chat_rejects_missing_question() {
        let response = app()
            .oneshot(chat_request(r#"{"pergunta": "oi"}"#.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn chat_rejects_oversized_body() {
        let question = "a".repeat(MAX_BODY_BYTES + 1);
        let body = serde_json::json!({ "question": question });
        let response = app().oneshot(chat_request(body.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn chat_is_post_only() {
        let req = Request::builder().uri("/chat").body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
