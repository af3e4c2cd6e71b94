//! Heuristic Risk Scoring
//!
//! A linear point score over creator, liquidity, volume and fee signals.
//! It starts neutral at 5, every rule adds or subtracts independently, and
//! the total is clamped to 1..=10.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::lamports_to_sol;
use crate::model::{TokenCreator, TokenMetadata, fee_recipients, primary_creator};

const NEUTRAL_SCORE: i32 = 5;
const MIN_SCORE: i32 = 1;
const MAX_SCORE: i32 = 10;

/// Risk tier derived from the clamped score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "Safe Play")]
    SafePlay,
    Moderate,
    Risky,
    Degen,
}

impl RiskLabel {
    pub const fn from_score(score: u8) -> Self {
        match score {
            0..=3 => Self::SafePlay,
            4..=5 => Self::Moderate,
            6..=7 => Self::Risky,
            _ => Self::Degen,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SafePlay => "Safe Play",
            Self::Moderate => "Moderate",
            Self::Risky => "Risky",
            Self::Degen => "Degen",
        }
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Self::SafePlay => "Relatively lower risk based on available data",
            Self::Moderate => "Standard risk - DYOR recommended",
            Self::Risky => "Higher risk signals detected - be careful",
            Self::Degen => "High risk - only for true degens. NFA.",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`calculate_risk_score`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    /// 1 (safest) to 10 (degen)
    pub score: u8,
    pub label: RiskLabel,
    pub summary: String,
    /// Reasons in the order the rules fired
    pub factors: Vec<String>,
}

struct Tally {
    score: i32,
    factors: Vec<String>,
}

impl Tally {
    fn apply(&mut self, delta: i32, factor: &str) {
        self.score += delta;
        self.factors.push(factor.to_string());
    }
}

/// Score a token from whatever data could be fetched
pub fn calculate_risk_score(
    creators: Option<&[TokenCreator]>,
    lifetime_fees: Option<&str>,
    metadata: Option<&TokenMetadata>,
) -> RiskScore {
    let mut tally = Tally {
        score: NEUTRAL_SCORE,
        factors: Vec::new(),
    };

    match creators.filter(|c| !c.is_empty()) {
        Some(creators) => {
            if let Some(primary) = primary_creator(creators) {
                if primary.has_verified_social() {
                    tally.apply(-1, "Creator has verified social");
                } else {
                    tally.apply(1, "No verified social linked");
                }

                if primary.royalty_bps == 0 {
                    tally.apply(2, "0% royalty - no creator incentive");
                } else if primary.royalty_bps <= 100 {
                    tally.apply(-1, "Standard royalty structure");
                }
            }

            if fee_recipients(creators).len() > 2 {
                tally.apply(1, "Multiple fee recipients");
            }
        }
        None => tally.apply(2, "No creator info available"),
    }

    if let Some(liquidity) = metadata.and_then(|m| m.liquidity) {
        if liquidity < 1_000.0 {
            tally.apply(2, "Very low liquidity (<$1K)");
        } else if liquidity < 10_000.0 {
            tally.apply(1, "Low liquidity (<$10K)");
        } else if liquidity > 50_000.0 {
            tally.apply(-1, "Healthy liquidity (>$50K)");
        }
    }

    if let Some(volume) = metadata.and_then(|m| m.volume_24h) {
        if volume < 100.0 {
            tally.apply(1, "Very low trading volume");
        } else if volume > 10_000.0 {
            tally.apply(-1, "Active trading volume");
        }
    }

    let fees_in_sol = lifetime_fees
        .filter(|fees| !fees.is_empty())
        .and_then(lamports_to_sol);
    if fees_in_sol.is_some_and(|sol| sol > Decimal::ONE) {
        tally.apply(-1, "Significant fee generation");
    }

    let clamped = tally.score.clamp(MIN_SCORE, MAX_SCORE);
    let score = u8::try_from(clamped).unwrap_or(u8::MAX);
    let label = RiskLabel::from_score(score);

    RiskScore {
        score,
        label,
        summary: label.summary().to_string(),
        factors: tally.factors,
    }
}
