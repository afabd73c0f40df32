//! Review Sentiment Report Library
//!
//! Batch sentiment analysis of marketplace product reviews, built with Rust
//! and Polars.
//!
//! # Overview
//!
//! For every configured marketplace export the pipeline:
//!
//! - **Loads** the CSV, draws a seeded random sample and resolves the review
//!   text and product columns from alias lists
//! - **Normalizes** review text (lowercase, no URLs, letters only)
//! - **Scores** each review as Positive, Neutral or Negative through a
//!   pluggable [`PolarityScorer`]
//! - **Aggregates** reviews per product and ranks products by share of
//!   positive reviews, share of negative reviews and review count
//! - **Reports** CSV tables, a stacked bar chart, word clouds and a JSON
//!   run report
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use review_sentiment::{MarketplaceConfig, ReportConfig, ReviewPipeline};
//!
//! let config = ReportConfig::builder()
//!     .marketplace(MarketplaceConfig::amazon().sample_size(2_000))
//!     .output_dir("output")
//!     .build()?;
//!
//! let report = ReviewPipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//!
//! for marketplace in &report.marketplaces {
//!     println!("{}: {} products", marketplace.name, marketplace.product_count);
//! }
//! ```
//!
//! # Custom scorers
//!
//! The built-in [`LexiconScorer`] can be replaced by any type implementing
//! [`PolarityScorer`]:
//!
//! ```rust,ignore
//! use review_sentiment::{PolarityScorer, ReviewPipeline};
//! use std::sync::Arc;
//!
//! struct Always(f64);
//!
//! impl PolarityScorer for Always {
//!     fn polarity(&self, _text: &str) -> anyhow::Result<f64> {
//!         Ok(self.0)
//!     }
//!
//!     fn name(&self) -> &str {
//!         "always"
//!     }
//! }
//!
//! let pipeline = ReviewPipeline::builder()
//!     .scorer(Arc::new(Always(0.5)))
//!     .build()?;
//! ```

pub mod aggregation;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod sentiment;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use aggregation::{RankingKind, RankingTable, rank, ranking_tables, summarize_products};
pub use cleaner::{normalize_column, normalize_text};
pub use config::{ConfigValidationError, MarketplaceConfig, ReportConfig, ReportConfigBuilder};
pub use error::{Result as ReviewResult, ResultExt, ReviewError};
pub use loader::{DatasetLoader, ResolvedColumns, resolve_column, resolve_columns};
pub use pipeline::{
    ClosureProgressReporter, ProgressReporter, ProgressUpdate, ReportStage, ReviewPipeline,
    ReviewPipelineBuilder,
};
pub use reporting::{MarketplaceReport, ReportGenerator, RunReport, WordCloudOptions};
pub use sentiment::{LexiconScorer, PolarityScorer, classify, label_for_polarity};
pub use types::{ProductSummary, ScoredReview, Sentiment, SentimentCounts};
