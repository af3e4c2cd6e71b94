//! # agent-core
//!
//! Provider-agnostic chat types and the LLM provider abstraction.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Chat request                            │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐   │
//! │  │ Conversation │──│  Generation  │──│   LlmProvider    │   │
//! │  │  (messages)  │  │   Options    │  │   (Strategy)     │   │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets the server swap between Groq, OpenAI or any
//! other OpenAI-compatible backend without touching request handling.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{
    Completion, CompletionStream, FinishReason, GenerationOptions, LlmProvider, StreamChunk,
};
