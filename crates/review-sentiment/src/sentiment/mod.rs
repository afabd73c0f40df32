//! Sentiment labelling for normalized review text.
//!
//! Polarity estimation is abstracted behind the [`PolarityScorer`] trait so the
//! pipeline can run with the built-in [`LexiconScorer`] or any other backend
//! (tests use deterministic stubs). The mapping from polarity to label is fixed:
//!
//! | polarity          | label    |
//! |-------------------|----------|
//! | `> 0.05`          | Positive |
//! | `< -0.05`         | Negative |
//! | otherwise         | Neutral  |
//!
//! Empty or whitespace-only text is always Neutral and never reaches the scorer.

mod lexicon;

pub use lexicon::LexiconScorer;

use crate::error::{ReviewError, Result};
use crate::types::Sentiment;

/// Polarity above which a review is Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Polarity below which a review is Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Trait for polarity estimators.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a pipeline holding one can be
/// moved across threads.
///
/// # Error Handling
///
/// Errors are returned via `anyhow::Result`; the pipeline treats any error
/// as fatal for the run.
pub trait PolarityScorer: Send + Sync {
    /// Estimate the polarity of `text` in `[-1, 1]`.
    fn polarity(&self, text: &str) -> anyhow::Result<f64>;

    /// Scorer name for logging.
    fn name(&self) -> &str;
}

/// Map a polarity score to a label using the fixed thresholds.
pub fn label_for_polarity(score: f64) -> Sentiment {
    if score > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if score < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Label one normalized text.
pub fn classify(scorer: &dyn PolarityScorer, text: &str) -> Result<Sentiment> {
    if text.trim().is_empty() {
        return Ok(Sentiment::Neutral);
    }

    let score = scorer
        .polarity(text)
        .map_err(|e| ReviewError::Scoring(format!("{}: {e}", scorer.name())))?;

    if !score.is_finite() {
        return Err(ReviewError::Scoring(format!(
            "{} returned a non-finite polarity ({score})",
            scorer.name()
        )));
    }

    Ok(label_for_polarity(score))
}

/// Label a column of normalized texts, stopping at the first failure.
pub fn classify_all(scorer: &dyn PolarityScorer, texts: &[String]) -> Result<Vec<Sentiment>> {
    texts
        .iter()
        .enumerate()
        .map(|(row, text)| {
            classify(scorer, text).map_err(|e| e.with_context(format!("Row {row}")))
        })
        .collect()
}
