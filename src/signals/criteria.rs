// =============================================================================
// Signal criteria — the seven checklist conditions
// =============================================================================

use serde::{Deserialize, Serialize};

/// Which side of the checklist a criterion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CriterionGroup {
    Buy,
    Sell,
}

/// One boolean condition of the BUY/SELL rule set.
///
/// Declaration order is checklist order: the four BUY criteria first, then
/// the three SELL criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Criterion {
    RsiOversold,
    PriceBelowBb,
    TrendUp,
    SentimentFear,
    RsiOverbought,
    PriceAboveBb,
    SentimentGreed,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::RsiOversold,
        Criterion::PriceBelowBb,
        Criterion::TrendUp,
        Criterion::SentimentFear,
        Criterion::RsiOverbought,
        Criterion::PriceAboveBb,
        Criterion::SentimentGreed,
    ];

    pub fn group(self) -> CriterionGroup {
        match self {
            Self::RsiOversold | Self::PriceBelowBb | Self::TrendUp | Self::SentimentFear => {
                CriterionGroup::Buy
            }
            Self::RsiOverbought | Self::PriceAboveBb | Self::SentimentGreed => CriterionGroup::Sell,
        }
    }

    /// Checklist label.
    pub fn description(self) -> &'static str {
        match self {
            Self::RsiOversold => "RSI Oversold (< 30)",
            Self::PriceBelowBb => "Price Below Lower BB",
            Self::TrendUp => "Uptrend (Price > EMA 200)",
            Self::SentimentFear => "Sentiment Fear (F&G < 40)",
            Self::RsiOverbought => "RSI Overbought (> 70)",
            Self::PriceAboveBb => "Price Above Upper BB",
            Self::SentimentGreed => "Sentiment Greed (F&G > 75)",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RsiOversold => "RSI_OVERSOLD",
            Self::PriceBelowBb => "PRICE_BELOW_BB",
            Self::TrendUp => "TREND_UP",
            Self::SentimentFear => "SENTIMENT_FEAR",
            Self::RsiOverbought => "RSI_OVERBOUGHT",
            Self::PriceAboveBb => "PRICE_ABOVE_BB",
            Self::SentimentGreed => "SENTIMENT_GREED",
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
