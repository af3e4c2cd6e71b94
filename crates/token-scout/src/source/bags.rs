//! bags.fm launchpad data

use async_trait::async_trait;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use super::LaunchpadSource;
use crate::error::{Result, ScoutError};
use crate::model::TokenCreator;

pub const DEFAULT_BASE_URL: &str = "https://public-api-v2.bags.fm/api/v1";

const SOURCE_NAME: &str = "bags.fm";

#[derive(Clone, Debug)]
pub struct BagsConfig {
    /// Sent as `x-api-key`; without it no request is made
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for BagsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

impl BagsConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("BAGS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let base_url = std::env::var("BAGS_API_BASE")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// `{ success, response, error }` wrapper used by every bags.fm endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    response: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_response(self) -> Result<Option<T>> {
        if self.success {
            Ok(self.response)
        } else {
            Err(ScoutError::Rejected {
                source_name: SOURCE_NAME,
                message: self.error.unwrap_or_else(|| "unknown error".into()),
            })
        }
    }
}

/// Lamport totals arrive as a string, but older deployments sent a number
fn fees_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// bags.fm public API client
pub struct BagsClient {
    client: reqwest::Client,
    config: BagsConfig,
}

impl BagsClient {
    pub fn from_config(config: BagsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::from_config(BagsConfig::from_env())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, mint: &str) -> Result<Option<T>> {
        let Some(api_key) = &self.config.api_key else {
            tracing::debug!("BAGS_API_KEY not set, skipping {}", path);
            return Ok(None);
        };

        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let response = self
            .client
            .get(&url)
            .query(&[("tokenMint", mint)])
            .header("x-api-key", api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::Status {
                source_name: SOURCE_NAME,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        envelope.into_response()
    }
}

#[async_trait]
impl LaunchpadSource for BagsClient {
    async fn creators(&self, mint: &str) -> Result<Option<Vec<TokenCreator>>> {
        self.get("token-launch/creator/v3", mint).await
    }

    async fn lifetime_fees(&self, mint: &str) -> Result<Option<String>> {
        let fees: Option<Value> = self.get("token-launch/lifetime-fees", mint).await?;
        Ok(fees.and_then(fees_to_string))
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}
