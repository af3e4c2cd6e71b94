//! # token-scout
//!
//! Live token lookup and heuristic risk scoring for the bagsense chat.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  user message                                                │
//! │    ├─ address::extract_addresses ──┐                          │
//! │    └─ intent::wants_trending ──────┤                          │
//! │                                    ▼                          │
//! │  fetch::TokenFetcher  (DexScreener ‖ bags.fm creators ‖ fees) │
//! │                                    ▼                          │
//! │  risk::calculate_risk_score → format::format_token_analysis   │
//! │                                    ▼                          │
//! │  context::TokenScout → prompt::assemble_messages → LLM        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every upstream failure degrades to "no data" so a lookup problem never
//! fails the chat request itself.

pub mod address;
pub mod context;
pub mod error;
pub mod fetch;
pub mod format;
pub mod intent;
pub mod model;
pub mod prompt;
pub mod risk;
pub mod source;

pub use context::TokenScout;
pub use error::{Result, ScoutError};
pub use fetch::TokenFetcher;
pub use model::{TokenCreator, TokenMetadata, TokenSnapshot, TrendingToken};
pub use prompt::{BAGSENSE_PROMPT, assemble_messages};
pub use risk::{RiskLabel, RiskScore, calculate_risk_score};
