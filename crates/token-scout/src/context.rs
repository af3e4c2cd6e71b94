//! Prompt Context
//!
//! Turns a user message into the data block appended to it before the LLM
//! call. Address lookups take precedence over trending requests.

use agent_core::Message;
use futures::future::join_all;

use crate::address::extract_addresses;
use crate::fetch::TokenFetcher;
use crate::format::{format_token_analysis, format_trending_tokens};
use crate::intent::wants_trending;
use crate::model::TokenSnapshot;
use crate::prompt::assemble_messages;

/// Tokens analysed side by side at most
pub const MAX_COMPARISON: usize = 3;

/// Message-to-context pipeline over a [`TokenFetcher`]
#[derive(Clone)]
pub struct TokenScout {
    fetcher: TokenFetcher,
}

impl TokenScout {
    pub const fn new(fetcher: TokenFetcher) -> Self {
        Self { fetcher }
    }

    pub const fn fetcher(&self) -> &TokenFetcher {
        &self.fetcher
    }

    /// Context block for `message`, or an empty string when nothing triggers
    pub async fn build_context(&self, message: &str) -> String {
        let addresses = extract_addresses(message);

        match addresses.as_slice() {
            [] if wants_trending(message) => {
                tracing::info!("Trending request, fetching latest listings");
                self.trending_context().await
            }
            [] => String::new(),
            [mint] => {
                tracing::info!("Found token mint {}, fetching data", mint);
                single_token_context(&self.fetcher.fetch_snapshot(mint).await)
            }
            many => {
                tracing::info!("Found {} tokens for comparison", many.len());
                let snapshots = join_all(
                    many.iter()
                        .take(MAX_COMPARISON)
                        .map(|mint| self.fetcher.fetch_snapshot(mint)),
                )
                .await;
                comparison_context(&snapshots)
            }
        }
    }

    /// Full LLM message list for one chat turn
    pub async fn prepare<I>(&self, message: &str, history: I) -> Vec<Message>
    where
        I: IntoIterator<Item = Message>,
    {
        let context = self.build_context(message).await;
        assemble_messages(history, message, &context)
    }

    async fn trending_context(&self) -> String {
        let tokens = self.fetcher.fetch_trending().await;
        if tokens.is_empty() {
            return "\n\n[TRENDING REQUEST]\n\
                Couldn't fetch trending tokens right now. Ask the user to paste a specific \
                token address for analysis.\n\
                [END TRENDING REQUEST]"
                .into();
        }

        format!(
            "\n\n[NEW SOLANA TOKENS FROM DEXSCREENER]\n{}\n\n\
            Note: These are new Solana tokens from DexScreener. Not all are bags.fm tokens. \
            If user wants analysis on any, they can paste the address and you'll scan it.\n\
            [END TOKENS]",
            format_trending_tokens(&tokens)
        )
    }
}

fn analysis(snapshot: &TokenSnapshot) -> String {
    format_token_analysis(
        &snapshot.mint,
        snapshot.creators.as_deref(),
        snapshot.lifetime_fees.as_deref(),
        snapshot.metadata.as_ref(),
    )
}

fn short_mint(mint: &str) -> String {
    mint.chars().take(8).collect()
}

fn single_token_context(snapshot: &TokenSnapshot) -> String {
    if !snapshot.has_data() {
        return format!(
            "\n\n[TOKEN LOOKUP RESULT]\n\
            Couldn't find data for token {}... - it might be very new, not launched on \
            bags.fm, or the address might be wrong.\n\
            [END TOKEN DATA]",
            short_mint(&snapshot.mint)
        );
    }

    format!(
        "\n\n[REAL-TIME TOKEN DATA]\n{}\n[END TOKEN DATA]\n\n\
        Use this data to give your analysis. Be specific about what you found - mention the \
        token name, price if available, risk score, and your honest take on the creator/fee \
        structure.",
        analysis(snapshot)
    )
}

fn comparison_context(snapshots: &[TokenSnapshot]) -> String {
    let mut context = String::from("\n\n[TOKEN COMPARISON DATA]\n");
    for snapshot in snapshots {
        if snapshot.has_data() {
            context.push_str(&format!("---\n{}\n", analysis(snapshot)));
        } else {
            context.push_str(&format!(
                "---\n**Token {}...** - No data found\n",
                short_mint(&snapshot.mint)
            ));
        }
    }
    context.push_str(
        "[END COMPARISON DATA]\n\n\
        Compare these tokens. Point out which has better metrics, lower risk, and give your \
        honest assessment of each.",
    );
    context
}
