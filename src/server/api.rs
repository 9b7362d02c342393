use crate::agent::TravelAgent;
use crate::error::AgentError;
use crate::llm::LlamaClient;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ State, Query, Request },
    middleware::{ self, Next },
    response::{ IntoResponse, Response },
    http::{ HeaderMap, StatusCode },
};
use serde::{ Deserialize, Serialize };
use tower_http::cors::{ Any, CorsLayer };

use chrono::Utc;
use hmac::{ Hmac, Mac };
use sha2::Sha256;
use uuid::Uuid;
use log::{ info, warn, error };

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed clock skew for signed requests, in seconds.
const SIGNATURE_MAX_SKEW: i64 = 300;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub text: String,
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
    conversation_id: String,
}

#[derive(Deserialize)]
pub struct ResetParams {
    pub conversation_id: String,
}

#[derive(Serialize)]
struct ResetResponse {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: &'static str,
}

#[derive(Clone)]
pub struct AppState {
    /// One agent per conversation id. The outer lock is held only for
    /// lookup/insert; the per-agent lock serializes turns within a
    /// conversation.
    sessions: Arc<Mutex<HashMap<String, Arc<Mutex<TravelAgent>>>>>,
    client: Arc<LlamaClient>,
    system_prompt: String,
    api_key: Option<String>,
}

impl AppState {
    pub fn new(
        client: Arc<LlamaClient>,
        system_prompt: String,
        api_key: Option<String>
    ) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            client,
            system_prompt,
            api_key,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/api/v1/chat", post(chat_handler))
        .route("/api/v1/chat/reset", post(reset_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_signature));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(api)
        .layer(cors)
        .with_state(state)
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>
) -> Response {
    let conversation_id = req.conversation_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let agent = {
        let mut sessions = state.sessions.lock().await;
        sessions
            .entry(conversation_id.clone())
            .or_insert_with(|| {
                info!("Creating agent for conversation {}", conversation_id);
                Arc::new(
                    Mutex::new(
                        TravelAgent::new(state.client.clone(), state.system_prompt.clone())
                    )
                )
            })
            .clone()
    };

    let mut agent = agent.lock().await;
    match agent.process_message(&req.text).await {
        Ok(response) =>
            (
                StatusCode::OK,
                Json(ChatResponse {
                    response,
                    conversation_id,
                }),
            ).into_response(),
        Err(err) => error_response(&conversation_id, err),
    }
}

/// The core's error kinds stay distinguishable in the envelope, but the
/// messages are generic; details land in the log only.
fn error_response(conversation_id: &str, err: AgentError) -> Response {
    let (status, kind, message) = match &err {
        AgentError::EmptyInput =>
            (StatusCode::BAD_REQUEST, "empty_input", "Message text is required"),
        AgentError::Provider { .. } =>
            (
                StatusCode::BAD_GATEWAY,
                "provider_error",
                "The assistant is temporarily unavailable. Please try again later.",
            ),
        AgentError::MalformedResponse { .. } =>
            (
                StatusCode::BAD_GATEWAY,
                "malformed_response",
                "The assistant returned an unusable reply. Please try again later.",
            ),
        AgentError::Transport(_) =>
            (
                StatusCode::GATEWAY_TIMEOUT,
                "upstream_unreachable",
                "The assistant could not be reached. Please try again later.",
            ),
        AgentError::Internal(_) =>
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An error occurred while processing your message. Please try again later.",
            ),
    };

    error!("Chat error for conversation {}: {}", conversation_id, err);
    (status, Json(ErrorEnvelope { error: ErrorBody { kind, message } })).into_response()
}

async fn reset_handler(
    State(state): State<AppState>,
    Query(params): Query<ResetParams>
) -> Response {
    let sessions = state.sessions.lock().await;
    match sessions.get(&params.conversation_id) {
        Some(agent) => {
            agent.lock().await.clear_history();
            info!("Cleared history for conversation {}", params.conversation_id);
            (
                StatusCode::OK,
                Json(ResetResponse {
                    success: true,
                    message: "History cleared".into(),
                }),
            ).into_response()
        }
        None =>
            (
                StatusCode::NOT_FOUND,
                Json(ResetResponse {
                    success: false,
                    message: "Unknown conversation id".into(),
                }),
            ).into_response(),
    }
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(
        serde_json::json!({
        "message": "Welcome to the TravelPal API",
        "version": env!("CARGO_PKG_VERSION"),
    })
    )
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(
        serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })
    )
}

async fn require_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next
) -> Response {
    let secret = match state.api_key.as_deref() {
        Some(k) if !k.is_empty() => k,
        _ => {
            return next.run(request).await;
        }
    };

    if let Err(reason) = verify_signature(secret, request.headers()) {
        warn!("Rejected unauthenticated request: {}", reason);
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorEnvelope {
                error: ErrorBody {
                    kind: "unauthorized",
                    message: reason,
                },
            }),
        ).into_response();
    }

    next.run(request).await
}

/// Signed-request check: `X-Api-Sign` must be the hex HMAC-SHA256 of the
/// `X-Api-Ts` unix timestamp under the shared secret, and the timestamp
/// must be within the allowed skew.
fn verify_signature(secret: &str, headers: &HeaderMap) -> Result<(), &'static str> {
    let ts = headers
        .get("x-api-ts")
        .and_then(|v| v.to_str().ok())
        .ok_or("missing ts/sig")?;
    let sig = headers
        .get("x-api-sign")
        .and_then(|v| v.to_str().ok())
        .ok_or("missing ts/sig")?;

    let now = Utc::now().timestamp();
    let ts_i: i64 = ts.parse().unwrap_or(0);
    if (now - ts_i).abs() > SIGNATURE_MAX_SKEW {
        return Err("timestamp out of range");
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(ts.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if expected == sig {
        Ok(())
    } else {
        Err("bad signature")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, ts: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(ts.to_string().as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn signed_headers(secret: &str, ts: i64) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-ts", ts.to_string().parse().unwrap());
        headers.insert("x-api-sign", sign(secret, ts).parse().unwrap());
        headers
    }

    #[test]
    fn accepts_a_fresh_correctly_signed_request() {
        let headers = signed_headers("secret", Utc::now().timestamp());
        assert!(verify_signature("secret", &headers).is_ok());
    }

    #[test]
    fn rejects_a_stale_timestamp() {
        let stale = Utc::now().timestamp() - SIGNATURE_MAX_SKEW - 1;
        let headers = signed_headers("secret", stale);
        assert_eq!(verify_signature("secret", &headers), Err("timestamp out of range"));
    }

    #[test]
    fn rejects_a_signature_under_the_wrong_secret() {
        let headers = signed_headers("other-secret", Utc::now().timestamp());
        assert_eq!(verify_signature("secret", &headers), Err("bad signature"));
    }

    #[test]
    fn rejects_missing_headers() {
        assert_eq!(verify_signature("secret", &HeaderMap::new()), Err("missing ts/sig"));
    }
}
