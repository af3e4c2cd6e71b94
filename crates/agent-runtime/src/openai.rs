//! OpenAI-compatible LLM Provider
//!
//! Implementation of `LlmProvider` for any endpoint speaking the OpenAI
//! chat-completions wire format (Groq, OpenAI, hosted proxies).

use std::collections::VecDeque;

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{
        Completion, CompletionStream, FinishReason, GenerationOptions, LlmProvider, StreamChunk,
    },
};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::sse::SseDecoder;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// Bearer token; requests are still attempted without one
    pub api_key: Option<String>,

    /// API root, without the trailing `/chat/completions`
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        let api_key = ["LLM_API_KEY", "GROQ_API_KEY", "OPENAI_API_KEY"]
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|key| !key.trim().is_empty()));
        let base_url = std::env::var("LLM_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// OpenAI-compatible LLM provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(OpenAiConfig::from_env())
    }

    pub const fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Send a chat-completions request and fail on non-success status
    async fn send(&self, body: &ChatCompletionRequest<'_>) -> Result<reqwest::Response> {
        let response = self
            .authorized(self.client.post(self.endpoint("chat/completions")))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("LLM API error ({}): {}", status, text);
            return Err(AgentError::from_status(status.as_u16(), text));
        }
        Ok(response)
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn health_check(&self) -> Result<bool> {
        if self.config.api_key.is_none() {
            return Ok(false);
        }
        match self
            .authorized(self.client.get(self.endpoint("models")))
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("LLM health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let body = ChatCompletionRequest::new(messages, options, false);
        let response: ChatCompletionResponse = self
            .send(&body)
            .await?
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        Ok(response.into_completion(&options.model))
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CompletionStream> {
        let body = ChatCompletionRequest::new(messages, options, true);
        let response = self.send(&body).await?;

        Ok(decode_completion_stream(Box::pin(response.bytes_stream())))
    }
}

fn transport_error(e: reqwest::Error) -> AgentError {
    if e.is_connect() || e.is_timeout() {
        AgentError::ProviderUnavailable(e.to_string())
    } else {
        AgentError::Provider(e.to_string())
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(messages: &'a [Message], options: &'a GenerationOptions, stream: bool) -> Self {
        Self {
            model: &options.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            stream,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ResponseChoice>,
}

#[derive(Debug, Deserialize)]
struct ResponseChoice {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_completion(self, requested_model: &str) -> Completion {
        let first = self.choices.into_iter().next();
        let finish_reason = first
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            .map(FinishReason::parse);
        let content = first
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|text| !text.is_empty());

        Completion {
            content,
            model: self.model.unwrap_or_else(|| requested_model.to_string()),
            finish_reason,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamPayload {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Parse one `data:` payload of a streamed completion
fn parse_stream_payload(data: &str) -> Result<StreamChunk> {
    if data.trim() == "[DONE]" {
        return Ok(StreamChunk::finished());
    }

    let payload: StreamPayload = serde_json::from_str(data)?;
    if let Some(error) = payload.error {
        return Err(AgentError::Provider(error.to_string()));
    }

    let delta = payload
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta)
        .and_then(|d| d.content)
        .unwrap_or_default();
    Ok(StreamChunk::text(delta))
}

struct DecodeState<S> {
    body: S,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    body_done: bool,
    finished: bool,
}

/// Turn a raw SSE byte stream into completion chunks.
///
/// The stream ends after `[DONE]`, after the first error, or when the body
/// closes.
pub fn decode_completion_stream<S, B, E>(body: S) -> CompletionStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + Unpin + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = DecodeState {
        body,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        body_done: false,
        finished: false,
    };

    let stream = futures::stream::unfold(state, |mut st| async move {
        loop {
            if st.finished {
                return None;
            }

            if let Some(data) = st.pending.pop_front() {
                match parse_stream_payload(&data) {
                    Ok(chunk) => {
                        st.finished = chunk.done;
                        return Some((Ok(chunk), st));
                    }
                    Err(e) => {
                        st.finished = true;
                        return Some((Err(e), st));
                    }
                }
            }

            if st.body_done {
                return None;
            }

            match st.body.next().await {
                Some(Ok(bytes)) => {
                    let events = st.decoder.push(bytes.as_ref());
                    st.pending.extend(events);
                }
                Some(Err(e)) => {
                    st.finished = true;
                    return Some((Err(AgentError::ProviderUnavailable(e.to_string())), st));
                }
                None => {
                    st.body_done = true;
                    st.pending.extend(st.decoder.finish());
                }
            }
        }
    });

    Box::pin(stream)
}
