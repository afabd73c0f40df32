//! Report output: CSV tables, charts, word clouds and the JSON run report.
//!
//! # Outputs per marketplace
//!
//! - `{processed_dir}/{platform}_processed.csv` and
//!   `{processed_dir}/{platform}_product_summary.csv`
//! - `{output_dir}/{platform}_top{n}_{best|worst|most_reviewed}.csv`
//! - `{output_dir}/{platform}_sentiment_bar.png`
//! - `{output_dir}/{platform}_{product}_{positive|negative}_wc.png`
//!
//! A [`RunReport`] covering all marketplaces is written to
//! `{output_dir}/run_report.json`.
//!
//! # Example
//!
//! ```rust,ignore
//! use review_sentiment::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new("data/processed", "output");
//! generator.prepare_dirs()?;
//! generator.write_summary("amazon", &summaries)?;
//! ```

mod charts;
mod generator;
mod wordcloud;

pub use charts::render_sentiment_bar;
pub use generator::{
    CLEANED_COLUMN, MarketplaceReport, RUN_REPORT_FILE, ReportGenerator, RunReport,
    SENTIMENT_COLUMN, summaries_to_frame,
};
pub use wordcloud::{
    PlacedWord, WordCloudOptions, layout_words, render_word_cloud, word_frequencies,
};
