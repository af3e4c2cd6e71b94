//! Markdown rendering of token data for the prompt context.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::model::{
    TokenCreator, TokenMetadata, TrendingToken, fee_recipients, known, non_empty, primary_creator,
};
use crate::risk::calculate_risk_score;

const LAMPORTS_PER_SOL: Decimal = dec!(1_000_000_000);

/// Render everything known about a mint, ending with its risk score.
///
/// When no source answered the result is a single "couldn't find data" line,
/// which is how the model learns the lookup failed.
pub fn format_token_analysis(
    mint: &str,
    creators: Option<&[TokenCreator]>,
    lifetime_fees: Option<&str>,
    metadata: Option<&TokenMetadata>,
) -> String {
    let lifetime_fees = non_empty(lifetime_fees);
    if creators.is_none() && lifetime_fees.is_none() && metadata.is_none() {
        return not_found(mint);
    }

    let mut analysis = String::new();

    let name = metadata.and_then(|m| non_empty(m.name.as_deref()));
    let symbol = metadata.and_then(|m| non_empty(m.symbol.as_deref()));
    if name.is_some() || symbol.is_some() {
        analysis.push_str(&format!(
            "**{}** ({})\n",
            name.unwrap_or("Unknown Token"),
            symbol.unwrap_or("???")
        ));
        analysis.push_str(&format!("Mint: {}\n\n", short_address(mint, 8, 4)));
    } else {
        analysis.push_str(&format!("**Token Analysis: {}**\n\n", short_address(mint, 8, 4)));
    }

    if let Some(price) = metadata.and_then(|m| known(m.price)) {
        analysis.push_str(&format!("**Price:** ${}\n", format_price(price)));
    }
    if let Some(market_cap) = metadata.and_then(|m| known(m.market_cap)) {
        analysis.push_str(&format!("**Market Cap:** {}\n", compact_usd(market_cap)));
    }
    if let Some(liquidity) = metadata.and_then(|m| known(m.liquidity)) {
        analysis.push_str(&format!("**Liquidity:** {}\n", compact_usd(liquidity)));
    }
    if let Some(volume) = metadata.and_then(|m| known(m.volume_24h)) {
        analysis.push_str(&format!("**24h Volume:** {}\n", compact_usd(volume)));
    }

    if let Some(creators) = creators {
        if let Some(primary) = primary_creator(creators) {
            push_creator_block(&mut analysis, primary, creators);
        }
    }

    if let Some(sol) = lifetime_fees.and_then(lamports_to_sol) {
        analysis.push_str(&format!("\n**Lifetime Fees:** {} SOL\n", decimal_fixed(sol, 4)));
    }

    let risk = calculate_risk_score(creators, lifetime_fees, metadata);
    analysis.push_str(&format!("\n**Risk Score:** {}/10 ({})\n", risk.score, risk.label));
    analysis.push_str(&risk.summary);
    analysis.push('\n');

    analysis
}

fn push_creator_block(analysis: &mut String, primary: &TokenCreator, creators: &[TokenCreator]) {
    let display_name = primary.display_name().unwrap_or("Unknown");
    analysis.push_str(&format!("\n**Creator:** {display_name}"));
    if let Some(platform) = primary.platform().filter(|p| *p != "unknown") {
        let handle = primary.handle().unwrap_or(display_name);
        analysis.push_str(&format!(" (@{handle} on {platform})"));
    }
    analysis.push('\n');
    analysis.push_str(&format!("**Wallet:** {}\n", short_address(&primary.wallet, 6, 4)));

    let royalty = primary.royalty_percent();
    if primary.royalty_bps == 100 {
        analysis.push_str(&format!(
            "**Royalty:** {royalty}% (max - creator earns on every trade)\n"
        ));
    } else if primary.royalty_bps > 0 {
        analysis.push_str(&format!("**Royalty:** {royalty}% (creator earns on trades)\n"));
    } else {
        analysis.push_str("**Royalty:** 0% (creator gets nothing from trades)\n");
    }

    let recipients = fee_recipients(creators);
    if !recipients.is_empty() {
        let total_bps: u32 = recipients.iter().map(|r| r.royalty_bps).sum();
        analysis.push_str(&format!(
            "\n**Fee Split:** Sharing {}% with {} wallet(s)\n",
            f64::from(total_bps) / 100.0,
            recipients.len()
        ));
        for recipient in recipients {
            let name = recipient
                .display_name()
                .map_or_else(|| format!("{}...", head(&recipient.wallet, 6)), str::to_string);
            analysis.push_str(&format!("  - {}: {}%\n", name, recipient.royalty_percent()));
        }
    }
}

/// The fallback line used when no source returned anything for `mint`
pub fn not_found(mint: &str) -> String {
    format!("Couldn't find data for token {}...", head(mint, 8))
}

/// Numbered list of freshly listed tokens
pub fn format_trending_tokens(tokens: &[TrendingToken]) -> String {
    if tokens.is_empty() {
        return "No trending tokens found right now.".into();
    }

    let mut result = String::from("**Trending Solana Tokens:**\n\n");

    for (i, token) in tokens.iter().enumerate() {
        let price = known(token.price).map_or_else(
            || "N/A".to_string(),
            |p| {
                if p < 0.000_001 {
                    format!("${}", to_exponential(p, 2))
                } else {
                    format!("${}", to_fixed(p, 6))
                }
            },
        );
        let change = token.price_change_24h.map_or_else(String::new, |c| {
            format!(" {}{}%", if c >= 0.0 { "+" } else { "" }, to_fixed(c, 1))
        });
        let market_cap = known(token.market_cap).map_or_else(
            || "N/A".to_string(),
            |mc| {
                if mc >= 1_000_000.0 {
                    format!("${}M", to_fixed(mc / 1_000_000.0, 1))
                } else {
                    format!("${}K", to_fixed(mc / 1_000.0, 0))
                }
            },
        );
        let liquidity = known(token.liquidity).map_or_else(
            || "N/A".to_string(),
            |liq| {
                if liq >= 1_000.0 {
                    format!("${}K", to_fixed(liq / 1_000.0, 0))
                } else {
                    format!("${}", to_fixed(liq, 0))
                }
            },
        );

        result.push_str(&format!("{}. **{}** ({})\n", i + 1, token.name, token.symbol));
        result.push_str(&format!("   Price: {price}{change}\n"));
        result.push_str(&format!("   MC: {market_cap} | Liq: {liquidity}\n"));
        result.push_str(&format!("   `{}`\n\n", token.address));
    }

    result.push_str("_Paste any address above for full analysis_");
    result
}

/// USD price with precision scaled to its magnitude
pub fn format_price(price: f64) -> String {
    if price < 0.000_001 {
        to_exponential(price, 4)
    } else if price < 0.01 {
        to_fixed(price, 6)
    } else {
        to_fixed(price, 4)
    }
}

/// `$1.23M`, `$4.5K` or `$678`
pub fn compact_usd(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${}M", to_fixed(value / 1_000_000.0, 2))
    } else if value >= 1_000.0 {
        format!("${}K", to_fixed(value / 1_000.0, 1))
    } else {
        format!("${}", to_fixed(value, 0))
    }
}

/// `first…last` view of an address
pub fn short_address(address: &str, first: usize, last: usize) -> String {
    format!("{}...{}", head(address, first), tail(address, last))
}

fn head(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn tail(s: &str, n: usize) -> String {
    let len = s.chars().count();
    s.chars().skip(len.saturating_sub(n)).collect()
}

/// Convert a lamport count to SOL.
///
/// Only the leading integer part of the string is read, so `"1500abc"` is
/// 1500 lamports; a string without leading digits yields `None`.
pub fn lamports_to_sol(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let lamports: Decimal = digits[..end].parse().ok()?;
    let lamports = if negative { -lamports } else { lamports };
    lamports.checked_div(LAMPORTS_PER_SOL)
}

/// Fixed-point rendering with ties rounded away from zero on the exact
/// binary value, matching JavaScript's `toFixed`.
pub fn to_fixed(value: f64, digits: u32) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => decimal_fixed(exact, digits),
        None => format!("{:.*}", digits as usize, value),
    }
}

fn decimal_fixed(value: Decimal, digits: u32) -> String {
    let rounded = value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", digits as usize, rounded)
}

/// Scientific notation with an explicit exponent sign (`1.2345e-7`, `0.00e+0`)
pub fn to_exponential(value: f64, digits: usize) -> String {
    let formatted = format!("{value:.digits$e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}
