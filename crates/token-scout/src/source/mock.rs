//! Mock Data Sources
//!
//! In-memory sources for tests and offline demos. Each counts the requests it
//! receives and can be switched into a failing mode.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{
    DexBaseToken, DexLiquidity, DexPair, DexPriceChange, DexVolume, LaunchpadSource,
    MarketDataSource, TokenProfile,
};
use crate::error::{Result, ScoutError};
use crate::model::TokenCreator;

/// Market data served from fixed tables
#[derive(Debug, Default)]
pub struct MockMarketData {
    pairs: HashMap<String, Vec<DexPair>>,
    profiles: Vec<TokenProfile>,
    failing: bool,
    requests: AtomicUsize,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request answers with an upstream error
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_pairs(mut self, mint: &str, pairs: Vec<DexPair>) -> Self {
        self.pairs.insert(mint.to_string(), pairs);
        self
    }

    pub fn with_profile(mut self, chain_id: &str, token_address: &str) -> Self {
        self.profiles.push(TokenProfile {
            chain_id: chain_id.to_string(),
            token_address: token_address.to_string(),
            description: None,
        });
        self
    }

    /// Requests served so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// A pair with the given base token and USD figures
    pub fn pair(name: &str, symbol: &str, price: f64, liquidity: f64) -> DexPair {
        DexPair {
            chain_id: "solana".into(),
            base_token: Some(DexBaseToken {
                address: None,
                name: Some(name.to_string()),
                symbol: Some(symbol.to_string()),
            }),
            price_usd: Some(price.to_string()),
            price_change: Some(DexPriceChange { h24: Some(5.0) }),
            volume: Some(DexVolume {
                h24: Some(liquidity / 2.0),
            }),
            liquidity: Some(DexLiquidity {
                usd: Some(liquidity),
            }),
            market_cap: Some(liquidity * 10.0),
            ..DexPair::default()
        }
    }

    fn record(&self) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(ScoutError::Status {
                source_name: "MockMarketData",
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MarketDataSource for MockMarketData {
    async fn token_pairs(&self, mint: &str) -> Result<Vec<DexPair>> {
        self.record()?;
        Ok(self.pairs.get(mint).cloned().unwrap_or_default())
    }

    async fn latest_profiles(&self) -> Result<Vec<TokenProfile>> {
        self.record()?;
        Ok(self.profiles.clone())
    }

    fn name(&self) -> &str {
        "MockMarketData"
    }
}

/// Launchpad data served from fixed tables
#[derive(Debug)]
pub struct MockLaunchpad {
    creators: HashMap<String, Vec<TokenCreator>>,
    fees: HashMap<String, String>,
    failing: bool,
    configured: bool,
    requests: AtomicUsize,
}

impl Default for MockLaunchpad {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLaunchpad {
    pub fn new() -> Self {
        Self {
            creators: HashMap::new(),
            fees: HashMap::new(),
            failing: false,
            configured: true,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    /// Behaves like a launchpad without an API key
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn with_creators(mut self, mint: &str, creators: Vec<TokenCreator>) -> Self {
        self.creators.insert(mint.to_string(), creators);
        self
    }

    pub fn with_fees(mut self, mint: &str, lamports: &str) -> Self {
        self.fees.insert(mint.to_string(), lamports.to_string());
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<bool> {
        if !self.configured {
            return Ok(false);
        }
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(ScoutError::Rejected {
                source_name: "MockLaunchpad",
                message: "mock failure".into(),
            });
        }
        Ok(true)
    }
}

#[async_trait]
impl LaunchpadSource for MockLaunchpad {
    async fn creators(&self, mint: &str) -> Result<Option<Vec<TokenCreator>>> {
        if !self.record()? {
            return Ok(None);
        }
        Ok(self.creators.get(mint).cloned())
    }

    async fn lifetime_fees(&self, mint: &str) -> Result<Option<String>> {
        if !self.record()? {
            return Ok(None);
        }
        Ok(self.fees.get(mint).cloned())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn name(&self) -> &str {
        "MockLaunchpad"
    }
}
