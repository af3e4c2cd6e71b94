//! Token address extraction
//!
//! Solana mints are base58 strings of 32 to 44 characters. The scan is a
//! heuristic: anything that looks like one is returned, and lookups for
//! false positives simply come back empty.

use once_cell::sync::Lazy;
use regex::Regex;

/// Base58 alphabet without `0`, `O`, `I` and `l`
static ADDRESS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[1-9A-HJ-NP-Za-km-z]{32,44}").expect("Invalid address pattern regex"));

/// Distinct address-like substrings of `text`, in first-seen order
pub fn extract_addresses(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in ADDRESS_PATTERN.find_iter(text) {
        let candidate = m.as_str();
        if !found.iter().any(|seen| seen == candidate) {
            found.push(candidate.to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    #[test]
    fn test_single_address() {
        let text = format!("what do you think about {BONK}?");
        assert_eq!(extract_addresses(&text), vec![BONK.to_string()]);
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let text = format!("{USDC} vs {BONK} and again {USDC}");
        assert_eq!(extract_addresses(&text), vec![USDC.to_string(), BONK.to_string()]);
    }

    #[test]
    fn test_short_runs_ignored() {
        assert!(extract_addresses("gm ser, wen moon? 4Nd1mBQtrMJVYVfKf2PJy9").is_empty());
    }

    #[test]
    fn test_excluded_characters_break_matches() {
        // 0, O, I and l are not base58, so each one splits the run
        let half = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdT";
        for separator in ['0', 'O', 'I', 'l'] {
            let text = format!("{half}{separator}{half}");
            assert!(extract_addresses(&text).is_empty(), "separator {separator}");
        }
    }

    #[test]
    fn test_matches_never_contain_excluded_characters() {
        let text = format!("{BONK}0{USDC} I l O");
        for address in extract_addresses(&text) {
            assert!(!address.contains(['0', 'O', 'I', 'l']));
            assert!((32..=44).contains(&address.len()));
        }
    }

    #[test]
    fn test_long_run_is_cut_at_44() {
        let run = "1".repeat(50);
        let found = extract_addresses(&run);
        assert_eq!(found, vec!["1".repeat(44)]);
    }

    #[test]
    fn test_bags_url() {
        let text = format!("https://bags.fm/token/{BONK}");
        assert_eq!(extract_addresses(&text), vec![BONK.to_string()]);
    }
}
