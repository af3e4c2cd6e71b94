//! HTTP/SSE Handlers

use std::convert::Infallible;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use agent_core::{Message, Role};

use crate::config::ChatMode;
use crate::state::AppState;

/// Reply used when the provider answers without any content
pub const FALLBACK_REPLY: &str = "Sorry, couldn't process that.";

const PROCESSING_FAILED: &str = "Failed to process message";
const MESSAGE_REQUIRED: &str = "Message is required";

/// Events buffered between the provider stream and the client
const STREAM_BUFFER: usize = 32;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub llm_reachable: bool,
    pub launchpad_configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Prior turn as sent by the web client
#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl HistoryEntry {
    /// Only user and assistant turns are replayed
    fn into_message(self) -> Option<Message> {
        let role = match self.role.as_deref() {
            Some("user") => Role::User,
            Some("assistant") => Role::Assistant,
            _ => return None,
        };
        Some(Message::new(role, self.content.unwrap_or_default()))
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &str, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn completion_error() -> ApiError {
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        PROCESSING_FAILED,
        "COMPLETION_ERROR",
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let llm_reachable = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        llm_reachable,
        launchpad_configured: state.scout.fetcher().launchpad_configured(),
    })
}

/// Chat endpoint answering as JSON or SSE depending on `CHAT_MODE`
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let messages = prepare(&state, payload).await?;
    match state.chat_mode {
        ChatMode::Json => reply_json(&state, &messages).await,
        ChatMode::Stream => reply_stream(&state, &messages).await,
    }
}

/// Chat endpoint that always streams
pub async fn chat_stream_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let messages = prepare(&state, payload).await?;
    reply_stream(&state, &messages).await
}

/// Any method other than POST on a chat route
pub async fn method_not_allowed() -> ApiError {
    api_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed",
        "METHOD_NOT_ALLOWED",
    )
}

/// Validate the body and build the full message list, token context included
async fn prepare(
    state: &AppState,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Vec<Message>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!("Rejected chat body: {}", e.body_text());
        api_error(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED, "INVALID_BODY")
    })?;

    let message = request
        .message
        .filter(|m| !m.is_empty())
        .ok_or_else(|| {
            api_error(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED, "MISSING_MESSAGE")
        })?;

    let history: Vec<Message> = request
        .history
        .into_iter()
        .filter_map(HistoryEntry::into_message)
        .collect();

    Ok(state.scout.prepare(&message, history).await)
}

async fn reply_json(state: &AppState, messages: &[Message]) -> Result<Response, ApiError> {
    let completion = state
        .provider
        .complete(messages, &state.generation)
        .await
        .map_err(|e| {
            tracing::error!("Completion failed: {}", e);
            completion_error()
        })?;
    tracing::debug!(
        "Completion from {} finished: {:?}",
        completion.model,
        completion.finish_reason
    );

    let content = completion
        .content
        .unwrap_or_else(|| FALLBACK_REPLY.to_string());
    Ok(Json(ChatResponse { content }).into_response())
}

/// Relay provider deltas as SSE frames.
///
/// A provider that fails before streaming gets a 500; once frames have been
/// sent, failures become a final `error` frame.
async fn reply_stream(state: &AppState, messages: &[Message]) -> Result<Response, ApiError> {
    let mut stream = state
        .provider
        .complete_stream(messages, &state.generation)
        .await
        .map_err(|e| {
            tracing::error!("Failed to open completion stream: {}", e);
            completion_error()
        })?;

    let (tx, rx) = mpsc::channel::<Event>(STREAM_BUFFER);

    tokio::spawn(async move {
        while let Some(item) = stream.next().await {
            match item {
                Ok(chunk) => {
                    let sent = chunk.delta.is_empty()
                        || tx.send(content_event(&chunk.delta)).await.is_ok();
                    if !sent {
                        tracing::debug!("Client disconnected mid-stream");
                        return;
                    }
                    if chunk.done {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Completion stream failed: {}", e);
                    let _ = tx.send(error_event()).await;
                    return;
                }
            }
        }
        let _ = tx.send(done_event()).await;
    });

    let events = ReceiverStream::new(rx).map(Ok::<_, Infallible>);
    Ok(Sse::new(events).into_response())
}

fn content_event(delta: &str) -> Event {
    Event::default().data(serde_json::json!({ "content": delta }).to_string())
}

fn done_event() -> Event {
    Event::default().data(serde_json::json!({ "done": true }).to_string())
}

fn error_event() -> Event {
    Event::default().data(serde_json::json!({ "error": PROCESSING_FAILED }).to_string())
}
