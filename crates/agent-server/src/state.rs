//! Application State

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider};
use token_scout::TokenScout;

use crate::config::ChatMode;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (Groq or any OpenAI-compatible endpoint)
    pub provider: Arc<dyn LlmProvider>,

    /// Token lookup and prompt context
    pub scout: Arc<TokenScout>,

    /// Model, temperature and token limit for every completion
    pub generation: Arc<GenerationOptions>,

    pub chat_mode: ChatMode,
}
