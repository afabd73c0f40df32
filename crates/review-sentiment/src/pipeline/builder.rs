//! Main report pipeline.
//!
//! This module provides the [`ReviewPipeline`] struct and its builder, which
//! run every configured marketplace through load, normalize, score, aggregate
//! and report, one marketplace after another.

use crate::aggregation::{
    RankingKind, product_corpus, rank, ranking_tables, sentiment_distribution, summarize_products,
};
use crate::cleaner::normalize_column;
use crate::config::{MarketplaceConfig, ReportConfig};
use crate::error::{Result, ResultExt};
use crate::loader::DatasetLoader;
use crate::pipeline::progress::{
    ClosureProgressReporter, ProgressReporter, ProgressUpdate, ReportStage,
};
use crate::reporting::{
    MarketplaceReport, ReportGenerator, RunReport, WordCloudOptions, render_sentiment_bar,
    render_word_cloud,
};
use crate::sentiment::{LexiconScorer, PolarityScorer, classify_all};
use crate::types::{ProductSummary, ScoredReview, Sentiment};
use crate::utils::{column_as_strings, sanitize_file_stem, unique_file_stem};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// The review report pipeline.
///
/// Use [`ReviewPipeline::builder()`] to create a pipeline with a custom
/// configuration or scorer.
///
/// # Example
///
/// ```rust,ignore
/// use review_sentiment::{ReportConfig, ReviewPipeline};
///
/// let report = ReviewPipeline::builder()
///     .config(ReportConfig::builder().render_images(false).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run()?;
/// ```
pub struct ReviewPipeline {
    config: ReportConfig,
    scorer: Arc<dyn PolarityScorer>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    reporter: ReportGenerator,
}

// Ensure ReviewPipeline is Send (can be moved to another thread)
static_assertions::assert_impl_all!(ReviewPipeline: Send);

impl ReviewPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> ReviewPipelineBuilder {
        ReviewPipelineBuilder::default()
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Process every configured marketplace and write all outputs.
    ///
    /// Stops at the first error; files written by earlier stages stay on disk.
    pub fn run(&self) -> Result<RunReport> {
        match self.run_internal() {
            Ok(report) => {
                self.report_progress(ProgressUpdate::complete("All outputs created"));
                Ok(report)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self) -> Result<RunReport> {
        let start_time = Instant::now();
        info!(
            "Starting review report ({} marketplaces, scorer '{}')",
            self.config.marketplaces.len(),
            self.scorer.name()
        );

        let mut marketplaces = Vec::with_capacity(self.config.marketplaces.len());
        for (index, marketplace) in self.config.marketplaces.iter().enumerate() {
            let report = self
                .process_marketplace(marketplace, index)
                .context(format!("Marketplace '{}'", marketplace.name))?;
            marketplaces.push(report);
        }

        let report = RunReport::new(marketplaces, start_time.elapsed());
        if self.config.emit_run_report {
            self.reporter.write_run_report(&report)?;
        }

        info!(
            "Review report finished in {} ms ({} files)",
            report.duration_ms,
            report.files_written().count()
        );
        Ok(report)
    }

    /// Run one marketplace through every stage.
    ///
    /// `index` is the marketplace's position in the configuration and only
    /// affects progress reporting.
    pub fn process_marketplace(
        &self,
        marketplace: &MarketplaceConfig,
        index: usize,
    ) -> Result<MarketplaceReport> {
        let platform = marketplace.name.as_str();
        let count = self.config.marketplaces.len();
        let stage = |stage: ReportStage, message: String| {
            info!("[{}] {}", platform, message);
            self.report_progress(ProgressUpdate::stage(stage, platform, index, count, message));
        };
        let mut files_written: Vec<PathBuf> = Vec::new();
        self.reporter.prepare_dirs()?;

        // Step 1: Load, sample and resolve columns
        stage(
            ReportStage::Loading,
            format!("Loading {}", marketplace.input_path.display()),
        );
        let (mut df, columns, rows_loaded) = DatasetLoader::load_marketplace(
            marketplace,
            self.config.infer_schema_rows,
            self.config.sample_seed,
        )?;
        let rows_sampled = df.height();

        // Step 2: Normalize review text
        stage(
            ReportStage::Normalizing,
            format!("Normalizing {} reviews", rows_sampled),
        );
        let raw_texts = column_as_strings(&df, &columns.text)
            .context(format!("Reading text column '{}'", columns.text))?;
        let product_ids = column_as_strings(&df, &columns.product)
            .context(format!("Reading product column '{}'", columns.product))?;
        let cleaned = normalize_column(&raw_texts);

        // Step 3: Score
        stage(
            ReportStage::Scoring,
            format!("Scoring sentiment with '{}'", self.scorer.name()),
        );
        let sentiments = classify_all(self.scorer.as_ref(), &cleaned)?;
        let reviews = scored_reviews(product_ids, raw_texts, &cleaned, &sentiments);
        let distribution = sentiment_distribution(&reviews);
        debug!(
            "[{}] Positive: {}, Neutral: {}, Negative: {}",
            platform, distribution.positive, distribution.neutral, distribution.negative
        );

        // Step 4: Aggregate and persist the tables
        stage(ReportStage::Aggregating, "Summarizing products".to_string());
        files_written.push(
            self.reporter
                .write_processed(platform, &mut df, &cleaned, &sentiments)?,
        );
        let summaries = summarize_products(&reviews);
        files_written.push(self.reporter.write_summary(platform, &summaries)?);

        // Step 5: Rankings
        stage(ReportStage::Ranking, "Writing ranking tables".to_string());
        for table in ranking_tables(&summaries, self.config.ranking_size) {
            files_written.push(self.reporter.write_ranking(platform, &table)?);
        }

        // Step 6: Bar chart of the most reviewed products
        stage(ReportStage::Charting, "Drawing sentiment bar chart".to_string());
        let top_products = rank(
            &summaries,
            RankingKind::MostReviewed,
            self.config.top_n_products,
        );
        if !self.config.render_images {
            debug!("[{}] Image rendering disabled, skipping bar chart", platform);
        } else if top_products.is_empty() {
            warn!("[{}] No products to chart, skipping bar chart", platform);
        } else {
            let path = self
                .reporter
                .output_dir()
                .join(format!("{platform}_sentiment_bar.png"));
            let title = format!(
                "{} - Sentiment Distribution (Top {})",
                platform.to_uppercase(),
                self.config.top_n_products
            );
            render_sentiment_bar(&top_products, &title, &path, self.config.bar_chart_size)?;
            files_written.push(path);
        }

        // Step 7: Word clouds for the top-K products
        stage(ReportStage::WordClouds, "Drawing word clouds".to_string());
        if self.config.render_images {
            files_written.extend(self.render_word_clouds(platform, &summaries, &reviews)?);
        } else {
            debug!("[{}] Image rendering disabled, skipping word clouds", platform);
        }

        Ok(MarketplaceReport {
            name: marketplace.name.clone(),
            input_file: marketplace.input_path.display().to_string(),
            rows_loaded,
            rows_sampled,
            columns,
            reviews_without_product: reviews.iter().filter(|r| r.product_id.is_none()).count(),
            sentiment_distribution: distribution,
            product_count: summaries.len(),
            files_written: files_written
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        })
    }

    fn render_word_clouds(
        &self,
        platform: &str,
        summaries: &[ProductSummary],
        reviews: &[ScoredReview],
    ) -> Result<Vec<PathBuf>> {
        let (width, height) = self.config.wordcloud_size;
        let options = WordCloudOptions::new(width, height, self.config.max_cloud_words);
        let top = rank(
            summaries,
            RankingKind::MostReviewed,
            self.config.top_k_wordclouds,
        );
        let mut written = Vec::new();

        for (summary, stem) in top.iter().zip(word_cloud_stems(&top)) {
            for sentiment in [Sentiment::Positive, Sentiment::Negative] {
                let corpus = product_corpus(reviews, &summary.product_name, sentiment);
                let path = self
                    .reporter
                    .output_dir()
                    .join(word_cloud_file_name(platform, &stem, sentiment));
                let title = format!("{} - {} Reviews", summary.product_name, sentiment);

                match render_word_cloud(&corpus, &path, &title, &options)? {
                    Some(path) => written.push(path),
                    None => debug!(
                        "[{}] No {} words for '{}'",
                        platform,
                        sentiment.slug(),
                        summary.product_name
                    ),
                }
            }
        }

        info!("[{}] Wrote {} word clouds", platform, written.len());
        Ok(written)
    }
}

/// File stems for the word clouds of `products`, in order.
///
/// Names that sanitize to the same stem get `_2`, `_3`, ... suffixes.
fn word_cloud_stems(products: &[ProductSummary]) -> Vec<String> {
    let mut used = HashSet::new();
    products
        .iter()
        .map(|summary| unique_file_stem(&mut used, sanitize_file_stem(&summary.product_name)))
        .collect()
}

fn word_cloud_file_name(platform: &str, stem: &str, sentiment: Sentiment) -> String {
    format!("{platform}_{stem}_{}_wc.png", sentiment.slug())
}

/// Zip the per-row columns into review records.
///
/// Blank product cells count as missing.
fn scored_reviews(
    product_ids: Vec<Option<String>>,
    raw_texts: Vec<Option<String>>,
    cleaned: &[String],
    sentiments: &[Sentiment],
) -> Vec<ScoredReview> {
    product_ids
        .into_iter()
        .zip(raw_texts)
        .zip(cleaned.iter().zip(sentiments))
        .map(|((product_id, raw_text), (cleaned_text, &sentiment))| ScoredReview {
            product_id: product_id.filter(|id| !id.trim().is_empty()),
            raw_text,
            cleaned_text: cleaned_text.clone(),
            sentiment,
        })
        .collect()
}

/// Builder for creating a [`ReviewPipeline`] with custom configuration.
#[derive(Default)]
pub struct ReviewPipelineBuilder {
    config: Option<ReportConfig>,
    scorer: Option<Arc<dyn PolarityScorer>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure ReviewPipelineBuilder is Send (can be moved to another thread during construction)
static_assertions::assert_impl_all!(ReviewPipelineBuilder: Send);

impl ReviewPipelineBuilder {
    /// Set the report configuration.
    pub fn config(mut self, config: ReportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the polarity scorer.
    ///
    /// Without one, the pipeline uses [`LexiconScorer`], extended with the
    /// configured `lexicon_path` if set.
    pub fn scorer(mut self, scorer: Arc<dyn PolarityScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid or the custom lexicon
    /// cannot be read.
    pub fn build(self) -> Result<ReviewPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let scorer: Arc<dyn PolarityScorer> = match (self.scorer, &config.lexicon_path) {
            (Some(scorer), _) => scorer,
            (None, Some(path)) => Arc::new(
                LexiconScorer::from_json_file(path)
                    .context(format!("Loading lexicon '{}'", path.display()))?,
            ),
            (None, None) => Arc::new(LexiconScorer::default()),
        };

        let reporter = ReportGenerator::new(config.processed_dir.clone(), config.output_dir.clone());

        Ok(ReviewPipeline {
            config,
            scorer,
            progress_reporter: self.progress_reporter,
            reporter,
        })
    }
}
