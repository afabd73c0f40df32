use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment label assigned to a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// All labels, in the column order used by the summary tables.
    pub const ALL: [Sentiment; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }

    /// Lowercase form used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-label review counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

impl FromIterator<Sentiment> for SentimentCounts {
    fn from_iter<I: IntoIterator<Item = Sentiment>>(iter: I) -> Self {
        let mut counts = SentimentCounts::default();
        for sentiment in iter {
            counts.record(sentiment);
        }
        counts
    }
}

/// One review after normalization and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReview {
    /// Product identifier; `None` when the source cell was empty.
    pub product_id: Option<String>,
    pub raw_text: Option<String>,
    pub cleaned_text: String,
    pub sentiment: Sentiment,
}

/// Sentiment distribution for one product.
///
/// The three counts always sum to `total_reviews`, and both percentages lie in
/// `[0, 100]` with `pct_positive + pct_negative <= 100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_name: String,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub total_reviews: usize,
    pub pct_positive: f64,
    pub pct_negative: f64,
}

impl ProductSummary {
    pub fn from_counts(product_name: impl Into<String>, counts: SentimentCounts) -> Self {
        let total_reviews = counts.total();
        Self {
            product_name: product_name.into(),
            positive: counts.positive,
            neutral: counts.neutral,
            negative: counts.negative,
            total_reviews,
            pct_positive: percentage(counts.positive, total_reviews),
            pct_negative: percentage(counts.negative, total_reviews),
        }
    }

    pub fn counts(&self) -> SentimentCounts {
        SentimentCounts {
            positive: self.positive,
            neutral: self.neutral,
            negative: self.negative,
        }
    }
}

/// `part / total * 100`, or 0.0 for an empty total.
fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_from_iter() {
        let counts: SentimentCounts = [
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Positive,
            Sentiment::Neutral,
        ]
        .into_iter()
        .collect();

        assert_eq!(counts.positive, 2);
        assert_eq!(counts.get(Sentiment::Negative), 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_summary_percentages() {
        let summary = ProductSummary::from_counts(
            "A",
            SentimentCounts {
                positive: 5,
                neutral: 1,
                negative: 2,
            },
        );
        assert_eq!(summary.total_reviews, 8);
        assert_eq!(summary.pct_positive, 62.5);
        assert_eq!(summary.pct_negative, 25.0);
    }

    #[test]
    fn test_summary_empty_counts_guarded() {
        let summary = ProductSummary::from_counts("ghost", SentimentCounts::default());
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.pct_positive, 0.0);
        assert_eq!(summary.pct_negative, 0.0);
    }

    #[test]
    fn test_sentiment_labels() {
        assert_eq!(Sentiment::Positive.to_string(), "Positive");
        assert_eq!(Sentiment::Negative.slug(), "negative");
        assert_eq!(
            serde_json::to_string(&Sentiment::Neutral).unwrap(),
            "\"Neutral\""
        );
    }
}
