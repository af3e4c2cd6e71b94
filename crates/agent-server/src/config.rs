//! Server Configuration

use agent_core::GenerationOptions;
use anyhow::Context;

/// Response style of `POST /api/chat`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChatMode {
    /// One JSON body with the full reply
    #[default]
    Json,
    /// Server-sent events, one per content delta
    Stream,
}

impl ChatMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "stream" | "sse" => Some(Self::Stream),
            _ => None,
        }
    }
}

/// Settings read once at startup
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Directory served for every path without an API route
    pub static_dir: String,
    pub chat_mode: ChatMode,
    pub generation: GenerationOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            static_dir: "static".into(),
            chat_mode: ChatMode::Json,
            generation: GenerationOptions::default(),
        }
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let chat_mode = match var("CHAT_MODE") {
            Some(mode) => ChatMode::parse(&mode)
                .with_context(|| format!("CHAT_MODE must be 'json' or 'stream', got '{mode}'"))?,
            None => defaults.chat_mode,
        };

        let mut generation = defaults.generation;
        if let Some(model) = var("LLM_MODEL") {
            generation.model = model;
        }
        if let Some(max_tokens) = var("LLM_MAX_TOKENS") {
            generation.max_tokens = max_tokens
                .trim()
                .parse()
                .with_context(|| format!("LLM_MAX_TOKENS is not a number: '{max_tokens}'"))?;
        }
        if let Some(temperature) = var("LLM_TEMPERATURE") {
            generation.temperature = temperature
                .trim()
                .parse()
                .with_context(|| format!("LLM_TEMPERATURE is not a number: '{temperature}'"))?;
        }

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            static_dir: var("STATIC_DIR").unwrap_or(defaults.static_dir),
            chat_mode,
            generation,
        })
    }
}
