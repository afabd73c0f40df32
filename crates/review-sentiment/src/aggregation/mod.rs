//! Product-wise aggregation of scored reviews.
//!
//! Reviews are grouped by product identifier (ascending key order), each group
//! is reduced to a [`ProductSummary`], and the summaries are stably sorted by
//! `total_reviews` descending. A group always holds at least one review, so
//! percentages never divide by zero.

pub mod ranking;

pub use ranking::{RankingKind, RankingTable, rank, ranking_tables};

use crate::types::{ProductSummary, ScoredReview, Sentiment, SentimentCounts};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Build one summary per distinct product identifier.
///
/// Reviews without a product identifier are left out.
pub fn summarize_products(reviews: &[ScoredReview]) -> Vec<ProductSummary> {
    let mut groups: BTreeMap<&str, SentimentCounts> = BTreeMap::new();
    let mut skipped = 0usize;

    for review in reviews {
        match review.product_id.as_deref() {
            Some(product) => groups.entry(product).or_default().record(review.sentiment),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} reviews without a product identifier", skipped);
    }

    let mut summaries: Vec<ProductSummary> = groups
        .into_iter()
        .map(|(product, counts)| ProductSummary::from_counts(product, counts))
        .collect();

    // Vec::sort_by is stable: equal totals keep key order
    summaries.sort_by(|a, b| b.total_reviews.cmp(&a.total_reviews));

    debug!("Summarized {} products", summaries.len());
    summaries
}

/// Overall label distribution across all reviews.
pub fn sentiment_distribution(reviews: &[ScoredReview]) -> SentimentCounts {
    reviews.iter().map(|review| review.sentiment).collect()
}

/// Space-joined normalized text of one product's reviews with one label.
pub fn product_corpus(reviews: &[ScoredReview], product: &str, sentiment: Sentiment) -> String {
    reviews
        .iter()
        .filter(|review| {
            review.sentiment == sentiment && review.product_id.as_deref() == Some(product)
        })
        .map(|review| review.cleaned_text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn review(product: &str, sentiment: Sentiment, text: &str) -> ScoredReview {
        ScoredReview {
            product_id: Some(product.to_string()),
            raw_text: Some(text.to_string()),
            cleaned_text: text.to_string(),
            sentiment,
        }
    }

    fn repeat(product: &str, sentiment: Sentiment, n: usize) -> Vec<ScoredReview> {
        (0..n).map(|_| review(product, sentiment, "text")).collect()
    }

    /// A: 5 pos / 2 neg / 1 neu, B: 1 pos, C: 3 pos / 3 neg, interleaved.
    pub(crate) fn scenario_reviews() -> Vec<ScoredReview> {
        let mut reviews = Vec::new();
        reviews.extend(repeat("C", Sentiment::Negative, 3));
        reviews.extend(repeat("A", Sentiment::Positive, 5));
        reviews.extend(repeat("B", Sentiment::Positive, 1));
        reviews.extend(repeat("A", Sentiment::Negative, 2));
        reviews.extend(repeat("C", Sentiment::Positive, 3));
        reviews.extend(repeat("A", Sentiment::Neutral, 1));
        reviews
    }

    #[test]
    fn test_summarize_scenario() {
        let summaries = summarize_products(&scenario_reviews());

        let names: Vec<&str> = summaries.iter().map(|s| s.product_name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);

        let a = &summaries[0];
        assert_eq!((a.positive, a.neutral, a.negative), (5, 1, 2));
        assert_eq!(a.total_reviews, 8);
        assert_eq!(a.pct_positive, 62.5);
        assert_eq!(a.pct_negative, 25.0);

        let b = &summaries[2];
        assert_eq!((b.positive, b.neutral, b.negative), (1, 0, 0));
        assert_eq!(b.pct_positive, 100.0);
        assert_eq!(b.pct_negative, 0.0);
    }

    #[test]
    fn test_summary_invariants() {
        let mut reviews = scenario_reviews();
        for (i, sentiment) in Sentiment::ALL.iter().cycle().take(37).enumerate() {
            reviews.push(review(&format!("P{}", i % 7), *sentiment, "x"));
        }

        let summaries = summarize_products(&reviews);
        let total: usize = summaries.iter().map(|s| s.total_reviews).sum();
        assert_eq!(total, reviews.len());

        for s in &summaries {
            assert_eq!(s.positive + s.neutral + s.negative, s.total_reviews);
            assert!(s.total_reviews > 0);
            assert!((0.0..=100.0).contains(&s.pct_positive));
            assert!((0.0..=100.0).contains(&s.pct_negative));
            assert!(s.pct_positive + s.pct_negative <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn test_ties_keep_key_order() {
        let reviews = vec![
            review("zeta", Sentiment::Positive, "a"),
            review("alpha", Sentiment::Negative, "b"),
            review("mid", Sentiment::Neutral, "c"),
        ];
        let names: Vec<String> = summarize_products(&reviews)
            .into_iter()
            .map(|s| s.product_name)
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_missing_product_skipped() {
        let mut reviews = vec![review("A", Sentiment::Positive, "good")];
        reviews.push(ScoredReview {
            product_id: None,
            raw_text: None,
            cleaned_text: String::new(),
            sentiment: Sentiment::Neutral,
        });

        let summaries = summarize_products(&reviews);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_reviews, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize_products(&[]).is_empty());
    }

    #[test]
    fn test_sentiment_distribution() {
        let counts = sentiment_distribution(&scenario_reviews());
        assert_eq!(counts.positive, 9);
        assert_eq!(counts.negative, 5);
        assert_eq!(counts.neutral, 1);
    }

    #[test]
    fn test_product_corpus() {
        let reviews = vec![
            review("A", Sentiment::Positive, "great taste"),
            review("B", Sentiment::Positive, "other product"),
            review("A", Sentiment::Negative, "too salty"),
            review("A", Sentiment::Positive, "love it"),
        ];

        assert_eq!(
            product_corpus(&reviews, "A", Sentiment::Positive),
            "great taste love it"
        );
        assert_eq!(product_corpus(&reviews, "A", Sentiment::Negative), "too salty");
        assert_eq!(product_corpus(&reviews, "B", Sentiment::Negative), "");
    }
}
