//! Domain Models
//!
//! Token data as seen by the risk scorer and formatter. Every optional
//! field means "unknown"; zero is never used as a stand-in.

use serde::{Deserialize, Serialize};

/// Market data for one token, taken from its most liquid pair
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
    /// USD price
    pub price: Option<f64>,
    pub decimals: u8,
    pub market_cap: Option<f64>,
    #[serde(rename = "volume24h")]
    pub volume_24h: Option<f64>,
    /// USD liquidity of the selected pair
    pub liquidity: Option<f64>,
}

/// A launch participant on bags.fm, either the creator or a fee-split recipient
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCreator {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub pfp: Option<String>,
    /// Share of trading fees in basis points (100 = 1%)
    #[serde(default)]
    pub royalty_bps: u32,
    #[serde(default)]
    pub is_creator: bool,
    #[serde(default)]
    pub wallet: String,
    /// Social platform the wallet is linked to (e.g. "twitter")
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub provider_username: Option<String>,
}

impl TokenCreator {
    /// Linked platform name, if any
    pub fn platform(&self) -> Option<&str> {
        non_empty(self.provider.as_deref())
    }

    pub fn handle(&self) -> Option<&str> {
        non_empty(self.provider_username.as_deref())
    }

    /// Both a platform and a handle are linked
    pub fn has_verified_social(&self) -> bool {
        self.platform().is_some() && self.handle().is_some()
    }

    /// Platform handle, then bags.fm username
    pub fn display_name(&self) -> Option<&str> {
        self.handle().or_else(|| non_empty(self.username.as_deref()))
    }

    pub fn royalty_percent(&self) -> f64 {
        f64::from(self.royalty_bps) / 100.0
    }
}

/// The participant flagged as creator, if the list has one
pub fn primary_creator(creators: &[TokenCreator]) -> Option<&TokenCreator> {
    creators.iter().find(|c| c.is_creator)
}

/// Everyone sharing fees who is not the creator
pub fn fee_recipients(creators: &[TokenCreator]) -> Vec<&TokenCreator> {
    creators.iter().filter(|c| !c.is_creator).collect()
}

/// Entry of the latest-tokens list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingToken {
    pub name: String,
    pub symbol: String,
    pub address: String,
    pub price: Option<f64>,
    #[serde(rename = "priceChange24h")]
    pub price_change_24h: Option<f64>,
    #[serde(rename = "volume24h")]
    pub volume_24h: Option<f64>,
    pub liquidity: Option<f64>,
    pub market_cap: Option<f64>,
}

/// Everything fetched for one mint in a single request
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenSnapshot {
    pub mint: String,
    pub creators: Option<Vec<TokenCreator>>,
    /// Raw lamport count as reported by bags.fm
    pub lifetime_fees: Option<String>,
    pub metadata: Option<TokenMetadata>,
}

impl TokenSnapshot {
    /// At least one source answered; an empty fee string counts as no answer
    pub fn has_data(&self) -> bool {
        self.creators.is_some()
            || non_empty(self.lifetime_fees.as_deref()).is_some()
            || self.metadata.is_some()
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Numeric field reported as zero or NaN by an upstream means "unknown"
pub(crate) fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}
