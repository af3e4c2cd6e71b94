//! Trending-intent classification
//!
//! Decides whether a message asks for the latest token list, independently
//! of any addresses it contains.

/// Any one of these substrings is enough
const TRENDING_PHRASES: &[&str] = &[
    "trending",
    "what to buy",
    "good to buy",
    "new tokens",
    "show me tokens",
    "find tokens",
    "suggest",
    "recommend",
    "good token",
    "show token",
    "list token",
    "what's hot",
    "whats hot",
    "top token",
    "best token",
];

/// True when the message asks for trending or new tokens.
///
/// "scan" only counts together with "token", and "bags" only together with
/// "token" or "buy".
pub fn wants_trending(message: &str) -> bool {
    let text = message.to_lowercase();

    TRENDING_PHRASES.iter().any(|phrase| text.contains(phrase))
        || (text.contains("scan") && text.contains("token"))
        || (text.contains("bags") && (text.contains("token") || text.contains("buy")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_phrases() {
        assert!(wants_trending("What's TRENDING right now?"));
        assert!(wants_trending("anything good to buy"));
        assert!(wants_trending("whats hot today"));
        assert!(wants_trending("Can you recommend something"));
    }

    #[test]
    fn test_scan_requires_token() {
        assert!(!wants_trending("scan memes"));
        assert!(wants_trending("scan this token now"));
        assert!(wants_trending("Scan tokens for me"));
    }

    #[test]
    fn test_bags_requires_token_or_buy() {
        assert!(!wants_trending("my bags are heavy"));
        assert!(wants_trending("what bags should I buy"));
        assert!(wants_trending("bags token launches"));
    }

    #[test]
    fn test_unrelated_message() {
        assert!(!wants_trending("gm, how does a bonding curve work?"));
    }
}
