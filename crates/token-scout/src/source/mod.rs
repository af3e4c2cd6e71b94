//! Upstream Data Sources
//!
//! Market data comes from DexScreener and launch data from bags.fm. Both sit
//! behind traits so the fetcher can be driven by mocks in tests.

mod bags;
mod dexscreener;
mod mock;

pub use bags::{BagsClient, BagsConfig};
pub use dexscreener::{
    DexBaseToken, DexLiquidity, DexPair, DexPairInfo, DexPriceChange, DexScreenerClient,
    DexScreenerConfig, DexVolume, TokenProfile, best_pair,
};
pub use mock::{MockLaunchpad, MockMarketData};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::TokenCreator;

/// Pair and listing data for tokens (Strategy pattern)
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Every trading pair of a Solana mint, in upstream order
    async fn token_pairs(&self, mint: &str) -> Result<Vec<DexPair>>;

    /// Most recently listed token profiles, across all chains
    async fn latest_profiles(&self) -> Result<Vec<TokenProfile>>;

    fn name(&self) -> &str;
}

/// Creator and fee data from a launchpad
#[async_trait]
pub trait LaunchpadSource: Send + Sync {
    /// `None` when the launchpad does not know the mint or is not configured
    async fn creators(&self, mint: &str) -> Result<Option<Vec<TokenCreator>>>;

    /// Lifetime fees in lamports, as the decimal string the launchpad reports
    async fn lifetime_fees(&self, mint: &str) -> Result<Option<String>>;

    /// Whether requests will actually be sent
    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}
