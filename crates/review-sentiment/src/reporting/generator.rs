use crate::aggregation::RankingTable;
use crate::error::{Result, ResultExt};
use crate::loader::ResolvedColumns;
use crate::types::{ProductSummary, Sentiment, SentimentCounts};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Column holding the normalized review text in the processed dataset.
pub const CLEANED_COLUMN: &str = "cleaned_review";

/// Column holding the sentiment label in the processed dataset.
pub const SENTIMENT_COLUMN: &str = "sentiment";

/// File name of the JSON run report inside the output directory.
pub const RUN_REPORT_FILE: &str = "run_report.json";

// ============================================================================
// Run Report Types
// ============================================================================

/// Machine-readable record of one pipeline run.
///
/// Written to `run_report.json` in the output directory, or printed to stdout
/// with the `--json` CLI flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Total execution time in milliseconds
    pub duration_ms: u64,
    /// One entry per processed marketplace, in processing order
    pub marketplaces: Vec<MarketplaceReport>,
}

impl RunReport {
    pub fn new(marketplaces: Vec<MarketplaceReport>, elapsed: Duration) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            duration_ms: elapsed.as_millis() as u64,
            marketplaces,
        }
    }

    /// Every file written during the run.
    pub fn files_written(&self) -> impl Iterator<Item = &str> {
        self.marketplaces
            .iter()
            .flat_map(|m| m.files_written.iter().map(String::as_str))
    }
}

/// Outcome of processing one marketplace dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceReport {
    pub name: String,
    pub input_file: String,
    /// Rows read from the CSV before sampling
    pub rows_loaded: usize,
    /// Rows left after sampling
    pub rows_sampled: usize,
    pub columns: ResolvedColumns,
    /// Reviews left out of the summary because the product cell was empty
    pub reviews_without_product: usize,
    pub sentiment_distribution: SentimentCounts,
    pub product_count: usize,
    pub files_written: Vec<String>,
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes the CSV tables and the JSON run report.
pub struct ReportGenerator {
    processed_dir: PathBuf,
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(processed_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            processed_dir: processed_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create both output directories.
    pub fn prepare_dirs(&self) -> Result<()> {
        for dir in [&self.processed_dir, &self.output_dir] {
            fs::create_dir_all(dir)
                .context(format!("Failed to create directory '{}'", dir.display()))?;
        }
        Ok(())
    }

    /// Append the normalized text and label columns and save the dataset as
    /// `{platform}_processed.csv`.
    pub fn write_processed(
        &self,
        platform: &str,
        df: &mut DataFrame,
        cleaned: &[String],
        sentiments: &[Sentiment],
    ) -> Result<PathBuf> {
        let labels: Vec<&str> = sentiments.iter().map(Sentiment::as_str).collect();
        df.with_column(Series::new(CLEANED_COLUMN.into(), cleaned))?;
        df.with_column(Series::new(SENTIMENT_COLUMN.into(), labels))?;

        let path = self
            .processed_dir
            .join(format!("{platform}_processed.csv"));
        write_csv(df, &path)?;

        info!("Processed dataset saved: {}", path.display());
        Ok(path)
    }

    /// Save the full product summary as `{platform}_product_summary.csv`.
    pub fn write_summary(&self, platform: &str, summaries: &[ProductSummary]) -> Result<PathBuf> {
        let path = self
            .processed_dir
            .join(format!("{platform}_product_summary.csv"));
        let mut df = summaries_to_frame(summaries)?;
        write_csv(&mut df, &path)?;

        info!(
            "Product summary saved: {} ({} products)",
            path.display(),
            summaries.len()
        );
        Ok(path)
    }

    /// Save one ranking table in the output directory.
    pub fn write_ranking(&self, platform: &str, table: &RankingTable) -> Result<PathBuf> {
        let path = self.output_dir.join(table.file_name(platform));
        let mut df = summaries_to_frame(&table.rows)?;
        write_csv(&mut df, &path)?;

        debug!("Ranking table saved: {}", path.display());
        Ok(path)
    }

    /// Write the run report as pretty JSON.
    pub fn write_run_report(&self, report: &RunReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(RUN_REPORT_FILE);
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}

/// Summary rows as a frame with the published column names.
pub fn summaries_to_frame(summaries: &[ProductSummary]) -> PolarsResult<DataFrame> {
    let count = |f: fn(&ProductSummary) -> usize| -> Vec<u64> {
        summaries.iter().map(|s| f(s) as u64).collect()
    };

    df!(
        "product_name" => summaries.iter().map(|s| s.product_name.as_str()).collect::<Vec<_>>(),
        "Positive" => count(|s| s.positive),
        "Neutral" => count(|s| s.neutral),
        "Negative" => count(|s| s.negative),
        "total_reviews" => count(|s| s.total_reviews),
        "pct_positive" => summaries.iter().map(|s| s.pct_positive).collect::<Vec<_>>(),
        "pct_negative" => summaries.iter().map(|s| s.pct_negative).collect::<Vec<_>>()
    )
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).context(format!("Failed to create '{}'", path.display()))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .context(format!("Failed to write '{}'", path.display()))
}
