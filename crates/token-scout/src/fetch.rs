//! Fault-tolerant Token Fetching
//!
//! Wraps the data sources so that every failure becomes "no data" plus a
//! warning. Callers never see a `ScoutError`.

use std::sync::Arc;

use futures::{StreamExt, future, stream};

use crate::model::{TokenCreator, TokenMetadata, TokenSnapshot, TrendingToken};
use crate::source::{
    BagsClient, DexScreenerClient, LaunchpadSource, MarketDataSource, TokenProfile, best_pair,
};

/// Trending entries returned at most
pub const TRENDING_LIMIT: usize = 10;

/// Pair lookups in flight while resolving trending profiles
const TRENDING_CONCURRENCY: usize = 4;

/// Concurrent fetcher over one market source and one launchpad
#[derive(Clone)]
pub struct TokenFetcher {
    market: Arc<dyn MarketDataSource>,
    launchpad: Arc<dyn LaunchpadSource>,
}

impl TokenFetcher {
    pub fn new(market: Arc<dyn MarketDataSource>, launchpad: Arc<dyn LaunchpadSource>) -> Self {
        Self { market, launchpad }
    }

    /// DexScreener and bags.fm configured from the environment
    pub fn from_env() -> Self {
        Self::new(
            Arc::new(DexScreenerClient::from_env()),
            Arc::new(BagsClient::from_env()),
        )
    }

    pub fn launchpad_configured(&self) -> bool {
        self.launchpad.is_configured()
    }

    /// Market data from the most liquid pair, `None` when the token has no pairs
    pub async fn fetch_metadata(&self, mint: &str) -> Option<TokenMetadata> {
        match self.market.token_pairs(mint).await {
            Ok(pairs) => {
                let metadata = best_pair(&pairs).map(|pair| pair.to_metadata());
                if metadata.is_none() {
                    tracing::debug!("No pairs found on {} for {}", self.market.name(), mint);
                }
                metadata
            }
            Err(e) => {
                tracing::warn!("{} lookup failed for {}: {}", self.market.name(), mint, e);
                None
            }
        }
    }

    pub async fn fetch_creators(&self, mint: &str) -> Option<Vec<TokenCreator>> {
        self.launchpad
            .creators(mint)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("{} creators failed for {}: {}", self.launchpad.name(), mint, e);
                None
            })
    }

    /// Lamport total, `None` when the launchpad reports an empty string
    pub async fn fetch_lifetime_fees(&self, mint: &str) -> Option<String> {
        self.launchpad
            .lifetime_fees(mint)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("{} fees failed for {}: {}", self.launchpad.name(), mint, e);
                None
            })
            .filter(|fees| !fees.is_empty())
    }

    /// Run all three lookups concurrently and wait for every one of them
    pub async fn fetch_snapshot(&self, mint: &str) -> TokenSnapshot {
        let (creators, lifetime_fees, metadata) = tokio::join!(
            self.fetch_creators(mint),
            self.fetch_lifetime_fees(mint),
            self.fetch_metadata(mint),
        );

        let snapshot = TokenSnapshot {
            mint: mint.to_string(),
            creators,
            lifetime_fees,
            metadata,
        };
        tracing::info!(
            "Token {}: creators={} fees={} metadata={}",
            mint,
            snapshot.creators.is_some(),
            snapshot.lifetime_fees.is_some(),
            snapshot.metadata.is_some(),
        );
        snapshot
    }

    /// Freshly listed Solana tokens with market data, in listing order.
    ///
    /// Profiles whose pair lookup fails or returns nothing are skipped.
    pub async fn fetch_trending(&self) -> Vec<TrendingToken> {
        let profiles = match self.market.latest_profiles().await {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::warn!("{} profiles failed: {}", self.market.name(), e);
                return Vec::new();
            }
        };

        let solana = profiles.into_iter().filter(TokenProfile::is_solana);
        let tokens: Vec<TrendingToken> = stream::iter(solana)
            .map(|profile| async move {
                let pairs = self.market.token_pairs(&profile.token_address).await;
                (profile, pairs)
            })
            .buffered(TRENDING_CONCURRENCY)
            .filter_map(|(profile, pairs)| {
                let token = match pairs {
                    Ok(pairs) => pairs.first().map(|pair| pair.to_trending(&profile)),
                    Err(e) => {
                        tracing::debug!("Skipping {}: {}", profile.token_address, e);
                        None
                    }
                };
                future::ready(token)
            })
            .take(TRENDING_LIMIT)
            .collect()
            .await;

        tracing::info!("Resolved {} trending tokens", tokens.len());
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MockLaunchpad, MockMarketData};

    const MINT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

    fn creator() -> TokenCreator {
        TokenCreator {
            username: Some("dev".into()),
            royalty_bps: 100,
            is_creator: true,
            wallet: "Wa11et".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_snapshot_collects_all_sources() {
        let market = Arc::new(MockMarketData::new().with_pairs(
            MINT,
            vec![
                MockMarketData::pair("Thin", "THIN", 1.0, 100.0),
                MockMarketData::pair("Bonk", "BONK", 0.5, 90_000.0),
            ],
        ));
        let launchpad = Arc::new(
            MockLaunchpad::new()
                .with_creators(MINT, vec![creator()])
                .with_fees(MINT, "2000000000"),
        );
        let fetcher = TokenFetcher::new(market.clone(), launchpad.clone());

        let snapshot = fetcher.fetch_snapshot(MINT).await;

        assert!(snapshot.has_data());
        assert_eq!(snapshot.creators.map(|c| c.len()), Some(1));
        assert_eq!(snapshot.lifetime_fees.as_deref(), Some("2000000000"));
        let metadata = snapshot.metadata.unwrap();
        assert_eq!(metadata.symbol.as_deref(), Some("BONK"));
        assert_eq!(metadata.liquidity, Some(90_000.0));
        assert_eq!(market.requests(), 1);
        assert_eq!(launchpad.requests(), 2);
    }

    #[tokio::test]
    async fn test_failures_degrade_to_none() {
        let fetcher = TokenFetcher::new(
            Arc::new(MockMarketData::failing()),
            Arc::new(MockLaunchpad::failing()),
        );

        let snapshot = fetcher.fetch_snapshot(MINT).await;
        assert_eq!(snapshot.mint, MINT);
        assert!(!snapshot.has_data());
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_sources() {
        let fetcher = TokenFetcher::new(
            Arc::new(
                MockMarketData::new()
                    .with_pairs(MINT, vec![MockMarketData::pair("Bonk", "BONK", 0.5, 1.0)]),
            ),
            Arc::new(MockLaunchpad::failing()),
        );

        let snapshot = fetcher.fetch_snapshot(MINT).await;
        assert!(snapshot.creators.is_none());
        assert!(snapshot.lifetime_fees.is_none());
        assert!(snapshot.metadata.is_some());
    }

    #[tokio::test]
    async fn test_empty_fees_is_none() {
        let fetcher = TokenFetcher::new(
            Arc::new(MockMarketData::new()),
            Arc::new(MockLaunchpad::new().with_fees(MINT, "")),
        );

        let snapshot = fetcher.fetch_snapshot(MINT).await;
        assert!(snapshot.lifetime_fees.is_none());
        assert!(!snapshot.has_data());
    }

    #[tokio::test]
    async fn test_no_pairs_is_none() {
        let fetcher = TokenFetcher::new(
            Arc::new(MockMarketData::new()),
            Arc::new(MockLaunchpad::unconfigured()),
        );
        assert!(fetcher.fetch_metadata(MINT).await.is_none());
        assert!(!fetcher.launchpad_configured());
    }

    #[tokio::test]
    async fn test_trending_filters_and_keeps_order() {
        let mut market = MockMarketData::new().with_profile("ethereum", "0xabc");
        for i in 0..14 {
            let address = format!("Token{i:02}");
            market = market.with_profile("solana", &address);
            // Every third token has no pair and is skipped
            if i % 3 != 0 {
                market = market.with_pairs(
                    &address,
                    vec![MockMarketData::pair(&format!("T{i}"), "T", 0.01, 5_000.0)],
                );
            }
        }
        let fetcher = TokenFetcher::new(Arc::new(market), Arc::new(MockLaunchpad::new()));

        let trending = fetcher.fetch_trending().await;

        let addresses: Vec<&str> = trending.iter().map(|t| t.address.as_str()).collect();
        assert_eq!(
            addresses,
            vec![
                "Token01", "Token02", "Token04", "Token05", "Token07", "Token08", "Token10",
                "Token11", "Token13",
            ]
        );
    }

    #[tokio::test]
    async fn test_trending_caps_at_limit() {
        let mut market = MockMarketData::new();
        for i in 0..25 {
            let address = format!("Token{i:02}");
            market = market
                .with_profile("solana", &address)
                .with_pairs(&address, vec![MockMarketData::pair("T", "T", 1.0, 1.0)]);
        }
        let fetcher = TokenFetcher::new(Arc::new(market), Arc::new(MockLaunchpad::new()));

        let trending = fetcher.fetch_trending().await;
        assert_eq!(trending.len(), TRENDING_LIMIT);
        assert_eq!(trending[0].address, "Token00");
        assert_eq!(trending[9].address, "Token09");
    }

    #[tokio::test]
    async fn test_trending_profiles_failure_is_empty() {
        let fetcher = TokenFetcher::new(
            Arc::new(MockMarketData::failing()),
            Arc::new(MockLaunchpad::new()),
        );
        assert!(fetcher.fetch_trending().await.is_empty());
    }
}
