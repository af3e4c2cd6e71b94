//! DexScreener market data

use async_trait::async_trait;
use serde::{Deserialize, de::DeserializeOwned};

use super::MarketDataSource;
use crate::error::{Result, ScoutError};
use crate::model::{TokenMetadata, TrendingToken, known, non_empty};

pub const DEFAULT_BASE_URL: &str = "https://api.dexscreener.com";

const SOURCE_NAME: &str = "DexScreener";
const SOLANA_DECIMALS: u8 = 9;

#[derive(Clone, Debug)]
pub struct DexScreenerConfig {
    pub base_url: String,
}

impl Default for DexScreenerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

impl DexScreenerConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("DEXSCREENER_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// One trading pair as returned by `/tokens/v1/{chain}/{address}`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPair {
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub pair_address: Option<String>,
    #[serde(default)]
    pub base_token: Option<DexBaseToken>,
    #[serde(default)]
    pub price_usd: Option<String>,
    #[serde(default)]
    pub price_change: Option<DexPriceChange>,
    #[serde(default)]
    pub volume: Option<DexVolume>,
    #[serde(default)]
    pub liquidity: Option<DexLiquidity>,
    #[serde(default)]
    pub fdv: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub info: Option<DexPairInfo>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DexBaseToken {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DexPriceChange {
    pub h24: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DexVolume {
    pub h24: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DexLiquidity {
    pub usd: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPairInfo {
    pub image_url: Option<String>,
}

/// Entry of `/token-profiles/latest/v1`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProfile {
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub token_address: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TokenProfile {
    pub fn is_solana(&self) -> bool {
        self.chain_id == "solana" && !self.token_address.is_empty()
    }
}

impl DexPair {
    fn liquidity_usd(&self) -> Option<f64> {
        self.liquidity.as_ref().and_then(|l| l.usd)
    }

    fn price(&self) -> Option<f64> {
        self.price_usd
            .as_deref()
            .and_then(|p| p.trim().parse::<f64>().ok())
    }

    fn base_name(&self) -> Option<&str> {
        non_empty(self.base_token.as_ref().and_then(|t| t.name.as_deref()))
    }

    fn base_symbol(&self) -> Option<&str> {
        non_empty(self.base_token.as_ref().and_then(|t| t.symbol.as_deref()))
    }

    fn market_cap_or_fdv(&self) -> Option<f64> {
        known(self.market_cap).or_else(|| known(self.fdv))
    }

    /// Market data for the token this pair trades
    pub fn to_metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.base_name().map(str::to_string),
            symbol: self.base_symbol().map(str::to_string),
            logo_uri: non_empty(self.info.as_ref().and_then(|i| i.image_url.as_deref()))
                .map(str::to_string),
            price: known(self.price()),
            decimals: SOLANA_DECIMALS,
            market_cap: self.market_cap_or_fdv(),
            volume_24h: known(self.volume.as_ref().and_then(|v| v.h24)),
            liquidity: known(self.liquidity_usd()),
        }
    }

    /// Trending entry for `profile`, using this pair's market data
    pub fn to_trending(&self, profile: &TokenProfile) -> TrendingToken {
        let name = self
            .base_name()
            .or_else(|| non_empty(profile.description.as_deref()))
            .unwrap_or("Unknown");

        TrendingToken {
            name: name.to_string(),
            symbol: self.base_symbol().unwrap_or("???").to_string(),
            address: profile.token_address.clone(),
            price: known(self.price()),
            price_change_24h: known(self.price_change.as_ref().and_then(|c| c.h24)),
            volume_24h: known(self.volume.as_ref().and_then(|v| v.h24)),
            liquidity: known(self.liquidity_usd()),
            market_cap: self.market_cap_or_fdv(),
        }
    }
}

/// Most liquid pair; ties keep upstream order and missing liquidity counts as zero
pub fn best_pair(pairs: &[DexPair]) -> Option<&DexPair> {
    pairs.iter().min_by(|a, b| {
        let a = a.liquidity_usd().unwrap_or(0.0);
        let b = b.liquidity_usd().unwrap_or(0.0);
        b.total_cmp(&a)
    })
}

/// DexScreener public API client
pub struct DexScreenerClient {
    client: reqwest::Client,
    config: DexScreenerConfig,
}

impl DexScreenerClient {
    pub fn from_config(config: DexScreenerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::from_config(DexScreenerConfig::from_env())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::Status {
                source_name: SOURCE_NAME,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl MarketDataSource for DexScreenerClient {
    async fn token_pairs(&self, mint: &str) -> Result<Vec<DexPair>> {
        // The endpoint answers `null` for unknown tokens
        let pairs: Option<Vec<DexPair>> =
            self.get_json(&format!("tokens/v1/solana/{mint}")).await?;
        Ok(pairs.unwrap_or_default())
    }

    async fn latest_profiles(&self) -> Result<Vec<TokenProfile>> {
        let profiles: Option<Vec<TokenProfile>> =
            self.get_json("token-profiles/latest/v1").await?;
        Ok(profiles.unwrap_or_default())
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}
