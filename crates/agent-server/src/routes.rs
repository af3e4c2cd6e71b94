//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{chat_handler, chat_stream_handler, health_check, method_not_allowed};
use crate::state::AppState;

/// API routes plus the web client served from `static_dir`
pub fn router(state: AppState, static_dir: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Health
        .route("/health", get(health_check))
        // Chat API
        .route("/api/chat", post(chat_handler).fallback(method_not_allowed))
        .route(
            "/api/chat/stream",
            post(chat_stream_handler).fallback(method_not_allowed),
        );

    let app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    };

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use futures::stream;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use agent_core::{
        AgentError, Completion, CompletionStream, GenerationOptions, LlmProvider, Message, Role,
        StreamChunk,
    };
    use token_scout::{
        TokenFetcher, TokenScout,
        source::{MockLaunchpad, MockMarketData},
    };

    use super::*;
    use crate::config::ChatMode;
    use crate::handlers::FALLBACK_REPLY;

    const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

    /// What the scripted provider does on each call
    #[derive(Clone, Default)]
    struct Script {
        reply: Option<String>,
        deltas: Vec<String>,
        fail_on_open: bool,
        fail_mid_stream: bool,
    }

    struct ScriptedProvider {
        script: Script,
        seen: Mutex<Vec<Message>>,
    }

    impl ScriptedProvider {
        fn new(script: Script) -> Self {
            Self {
                script,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, messages: &[Message]) {
            *self.seen.lock().unwrap() = messages.to_vec();
        }

        fn seen(&self) -> Vec<Message> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn health_check(&self) -> agent_core::Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            messages: &[Message],
            options: &GenerationOptions,
        ) -> agent_core::Result<Completion> {
            self.record(messages);
            if self.script.fail_on_open {
                return Err(AgentError::ProviderUnavailable("scripted outage".into()));
            }
            Ok(Completion {
                content: self.script.reply.clone(),
                model: options.model.clone(),
                finish_reason: None,
            })
        }

        async fn complete_stream(
            &self,
            messages: &[Message],
            _options: &GenerationOptions,
        ) -> agent_core::Result<CompletionStream> {
            self.record(messages);
            if self.script.fail_on_open {
                return Err(AgentError::ProviderUnavailable("scripted outage".into()));
            }

            let mut items: Vec<agent_core::Result<StreamChunk>> = vec![Ok(StreamChunk::text(""))];
            items.extend(self.script.deltas.iter().map(|d| Ok(StreamChunk::text(d.clone()))));
            if self.script.fail_mid_stream {
                items.push(Err(AgentError::Provider("connection reset".into())));
            } else {
                items.push(Ok(StreamChunk::finished()));
            }
            Ok(Box::pin(stream::iter(items)))
        }
    }

    fn app(provider: Arc<ScriptedProvider>, chat_mode: ChatMode) -> Router {
        let market = MockMarketData::new()
            .with_pairs(BONK, vec![MockMarketData::pair("Bonk", "BONK", 0.5, 80_000.0)]);
        let fetcher = TokenFetcher::new(Arc::new(market), Arc::new(MockLaunchpad::unconfigured()));
        let state = AppState {
            provider,
            scout: Arc::new(TokenScout::new(fetcher)),
            generation: Arc::new(GenerationOptions::default()),
            chat_mode,
        };
        router(state, None)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `data:` payloads of every SSE frame, in order
    async fn sse_frames(response: Response) -> Vec<Value> {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        text.split("\n\n")
            .filter(|frame| !frame.trim().is_empty())
            .map(|frame| {
                let data = frame.trim().strip_prefix("data:").unwrap().trim();
                serde_json::from_str(data).unwrap()
            })
            .collect()
    }

    fn content_type(response: &Response) -> String {
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    fn replying(reply: &str) -> Arc<ScriptedProvider> {
        Arc::new(ScriptedProvider::new(Script {
            reply: Some(reply.into()),
            ..Script::default()
        }))
    }

    fn streaming(deltas: &[&str]) -> Script {
        Script {
            deltas: deltas.iter().map(|d| d.to_string()).collect(),
            ..Script::default()
        }
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(replying("ok"), ChatMode::Json)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["llm_reachable"], true);
        assert_eq!(body["launchpad_configured"], false);
    }

    #[tokio::test]
    async fn test_missing_message() {
        for body in [r#"{}"#, r#"{"message":""}"#, r#"{"message":null,"history":[]}"#] {
            let response = app(replying("ok"), ChatMode::Json)
                .oneshot(post_json("/api/chat", body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
            assert_eq!(
                body_json(response).await,
                json!({"error": "Message is required", "code": "MISSING_MESSAGE"})
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_body() {
        let response = app(replying("ok"), ChatMode::Json)
            .oneshot(post_json("/api/chat", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        for uri in ["/api/chat", "/api/chat/stream"] {
            let response = app(replying("ok"), ChatMode::Json)
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(
                body_json(response).await,
                json!({"error": "Method not allowed", "code": "METHOD_NOT_ALLOWED"})
            );
        }
    }

    #[tokio::test]
    async fn test_json_reply_with_token_context() {
        let provider = replying("looks degen ser");
        let body = json!({
            "message": format!("ape {BONK}?"),
            "history": [
                {"role": "user", "content": "gm"},
                {"role": "assistant", "content": "gm fren"},
                {"role": "tool", "content": "dropped"},
                {"role": "system", "content": "dropped too"}
            ]
        });

        let response = app(provider.clone(), ChatMode::Json)
            .oneshot(post_json("/api/chat", &body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(content_type(&response).starts_with("application/json"));
        assert_eq!(body_json(response).await, json!({"content": "looks degen ser"}));

        let seen = provider.seen();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0].role, Role::System);
        assert_eq!(seen[1], Message::user("gm"));
        assert_eq!(seen[2], Message::assistant("gm fren"));
        assert!(seen[3].content.starts_with(&format!("ape {BONK}?\n\n[REAL-TIME TOKEN DATA]")));
        assert!(seen[3].content.contains("**Bonk** (BONK)"));
    }

    #[tokio::test]
    async fn test_history_without_role_is_dropped() {
        let provider = replying("gm");
        let body = json!({
            "message": "gm",
            "history": [
                {"role": null, "content": "x"},
                {"content": "y"},
                {"role": "user", "content": null},
                {"role": "assistant"}
            ]
        });

        let response = app(provider.clone(), ChatMode::Json)
            .oneshot(post_json("/api/chat", &body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let seen = provider.seen();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[1], Message::user(""));
        assert_eq!(seen[2], Message::assistant(""));
        assert_eq!(seen[3], Message::user("gm"));
    }

    #[tokio::test]
    async fn test_empty_completion_uses_fallback() {
        let provider = Arc::new(ScriptedProvider::new(Script::default()));
        let response = app(provider, ChatMode::Json)
            .oneshot(post_json("/api/chat", r#"{"message":"gm"}"#))
            .await
            .unwrap();

        assert_eq!(body_json(response).await, json!({"content": FALLBACK_REPLY}));
    }

    #[tokio::test]
    async fn test_completion_failure() {
        let provider = Arc::new(ScriptedProvider::new(Script {
            fail_on_open: true,
            ..Script::default()
        }));
        let app = app(provider, ChatMode::Json);

        for uri in ["/api/chat", "/api/chat/stream"] {
            let response = app
                .clone()
                .oneshot(post_json(uri, r#"{"message":"gm"}"#))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                body_json(response).await,
                json!({"error": "Failed to process message", "code": "COMPLETION_ERROR"})
            );
        }
    }

    #[tokio::test]
    async fn test_stream_relays_deltas_in_order() {
        let provider = Arc::new(ScriptedProvider::new(streaming(&["A", "B"])));
        let response = app(provider, ChatMode::Json)
            .oneshot(post_json("/api/chat/stream", r#"{"message":"gm"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(content_type(&response).starts_with("text/event-stream"));
        assert_eq!(
            sse_frames(response).await,
            vec![
                json!({"content": "A"}),
                json!({"content": "B"}),
                json!({"done": true}),
            ]
        );
    }

    #[tokio::test]
    async fn test_stream_error_after_open() {
        let provider = Arc::new(ScriptedProvider::new(Script {
            fail_mid_stream: true,
            ..streaming(&["A"])
        }));
        let response = app(provider, ChatMode::Json)
            .oneshot(post_json("/api/chat/stream", r#"{"message":"gm"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            sse_frames(response).await,
            vec![
                json!({"content": "A"}),
                json!({"error": "Failed to process message"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_stream_mode_on_chat_route() {
        let provider = Arc::new(ScriptedProvider::new(streaming(&["wen", " moon"])));
        let response = app(provider, ChatMode::Stream)
            .oneshot(post_json("/api/chat", r#"{"message":"gm"}"#))
            .await
            .unwrap();

        assert!(content_type(&response).starts_with("text/event-stream"));
        let frames = sse_frames(response).await;
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1], json!({"content": " moon"}));
    }
}
