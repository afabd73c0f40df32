//! Configuration types for the review report pipeline.
//!
//! All paths, sample sizes and report limits live in [`ReportConfig`], which is
//! passed to the pipeline explicitly. Use the builder for programmatic setup or
//! [`ReportConfig::from_json_file`] to load a config written by hand.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One marketplace dataset and how to find its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Short name used as the prefix of every output file (e.g. "amazon").
    pub name: String,

    /// Path to the raw CSV file.
    pub input_path: PathBuf,

    /// Maximum number of rows to keep after seeded sampling.
    /// `None` keeps the whole dataset.
    #[serde(default)]
    pub sample_size: Option<usize>,

    /// Candidate names for the review text column, in priority order.
    pub text_aliases: Vec<String>,

    /// Candidate names for the product identifier column, in priority order.
    pub product_aliases: Vec<String>,
}

impl MarketplaceConfig {
    pub fn new(name: impl Into<String>, input_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            input_path: input_path.into(),
            sample_size: None,
            text_aliases: Vec::new(),
            product_aliases: Vec::new(),
        }
    }

    pub fn sample_size(mut self, size: usize) -> Self {
        self.sample_size = Some(size);
        self
    }

    pub fn text_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn product_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// The Amazon fine-food reviews export.
    pub fn amazon() -> Self {
        Self::new("amazon", "data/raw/amazon/Reviews.csv")
            .sample_size(10_000)
            .text_aliases(["Text", "Review", "reviewText"])
            .product_aliases(["ProductId", "ASIN"])
    }

    /// The Flipkart product reviews export.
    pub fn flipkart() -> Self {
        Self::new("flipkart", "data/raw/flipkart/Dataset-SA.csv")
            .sample_size(5_000)
            .text_aliases(["Review", "review", "text"])
            .product_aliases(["product_name", "title", "Product"])
    }
}

/// Configuration for a report run.
///
/// Use [`ReportConfig::builder()`] to create a configuration with the fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use review_sentiment::config::{MarketplaceConfig, ReportConfig};
///
/// let config = ReportConfig::builder()
///     .marketplace(MarketplaceConfig::amazon().sample_size(2_000))
///     .output_dir("reports")
///     .render_images(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Datasets to process, in order.
    /// Default: amazon, flipkart
    pub marketplaces: Vec<MarketplaceConfig>,

    /// Directory for processed datasets and product summaries.
    /// Default: "data/processed"
    pub processed_dir: PathBuf,

    /// Directory for ranking tables, charts, word clouds and the run report.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// Number of products shown in the sentiment bar chart.
    /// Default: 10
    pub top_n_products: usize,

    /// Number of products that get word clouds.
    /// Default: 5
    pub top_k_wordclouds: usize,

    /// Number of rows kept in each ranking table.
    /// Default: 5
    pub ranking_size: usize,

    /// Seed for the sampling RNG.
    /// Default: 42
    pub sample_seed: u64,

    /// Rows used for CSV schema inference before falling back to all-text columns.
    /// Default: 1000
    pub infer_schema_rows: usize,

    /// Whether to render the bar charts and word clouds.
    /// Default: true
    pub render_images: bool,

    /// Whether to write `run_report.json` to the output directory.
    /// Default: true
    pub emit_run_report: bool,

    /// Optional JSON lexicon (`{"word": polarity}`) merged over the built-in one.
    /// Default: None
    pub lexicon_path: Option<PathBuf>,

    /// Bar chart size in pixels.
    /// Default: (1200, 600)
    pub bar_chart_size: (u32, u32),

    /// Word cloud size in pixels.
    /// Default: (1000, 500)
    pub wordcloud_size: (u32, u32),

    /// Maximum number of distinct words drawn in one word cloud.
    /// Default: 200
    pub max_cloud_words: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            marketplaces: vec![MarketplaceConfig::amazon(), MarketplaceConfig::flipkart()],
            processed_dir: PathBuf::from("data/processed"),
            output_dir: PathBuf::from("output"),
            top_n_products: 10,
            top_k_wordclouds: 5,
            ranking_size: 5,
            sample_seed: 42,
            infer_schema_rows: 1000,
            render_images: true,
            emit_run_report: true,
            lexicon_path: None,
            bar_chart_size: (1200, 600),
            wordcloud_size: (1000, 500),
            max_cloud_words: 200,
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing top-level fields fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ReportConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if self.marketplaces.is_empty() {
            return Err(ConfigValidationError::NoMarketplaces);
        }

        let mut seen = HashSet::new();
        for marketplace in &self.marketplaces {
            let name = marketplace.name.as_str();
            let valid_name = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid_name {
                return Err(ConfigValidationError::InvalidMarketplaceName(
                    name.to_string(),
                ));
            }
            if !seen.insert(name) {
                return Err(ConfigValidationError::DuplicateMarketplace(
                    name.to_string(),
                ));
            }
            if marketplace.text_aliases.is_empty() {
                return Err(ConfigValidationError::EmptyAliases {
                    marketplace: name.to_string(),
                    role: "text".to_string(),
                });
            }
            if marketplace.product_aliases.is_empty() {
                return Err(ConfigValidationError::EmptyAliases {
                    marketplace: name.to_string(),
                    role: "product".to_string(),
                });
            }
            if marketplace.sample_size == Some(0) {
                return Err(ConfigValidationError::InvalidSampleSize(name.to_string()));
            }
        }

        for (field, value) in [
            ("top_n_products", self.top_n_products),
            ("top_k_wordclouds", self.top_k_wordclouds),
            ("ranking_size", self.ranking_size),
            ("max_cloud_words", self.max_cloud_words),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::InvalidCount {
                    field: field.to_string(),
                });
            }
        }

        for (field, (width, height)) in [
            ("bar_chart_size", self.bar_chart_size),
            ("wordcloud_size", self.wordcloud_size),
        ] {
            if width == 0 || height == 0 {
                return Err(ConfigValidationError::InvalidImageSize {
                    field: field.to_string(),
                    width,
                    height,
                });
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("At least one marketplace must be configured")]
    NoMarketplaces,

    #[error("Invalid marketplace name '{0}' (use ASCII letters, digits, '-' or '_')")]
    InvalidMarketplaceName(String),

    #[error("Marketplace '{0}' is configured more than once")]
    DuplicateMarketplace(String),

    #[error("Marketplace '{marketplace}' has no {role} column aliases")]
    EmptyAliases { marketplace: String, role: String },

    #[error("Marketplace '{0}' has a sample size of 0")]
    InvalidSampleSize(String),

    #[error("Invalid value for '{field}': must be at least 1")]
    InvalidCount { field: String },

    #[error("Invalid size for '{field}': {width}x{height}")]
    InvalidImageSize {
        field: String,
        width: u32,
        height: u32,
    },
}

/// Builder for [`ReportConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    marketplaces: Vec<MarketplaceConfig>,
    processed_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    top_n_products: Option<usize>,
    top_k_wordclouds: Option<usize>,
    ranking_size: Option<usize>,
    sample_seed: Option<u64>,
    infer_schema_rows: Option<usize>,
    render_images: Option<bool>,
    emit_run_report: Option<bool>,
    lexicon_path: Option<PathBuf>,
    bar_chart_size: Option<(u32, u32)>,
    wordcloud_size: Option<(u32, u32)>,
    max_cloud_words: Option<usize>,
}

impl ReportConfigBuilder {
    /// Add a marketplace dataset.
    ///
    /// If no marketplace is added, the default amazon/flipkart pair is used.
    pub fn marketplace(mut self, marketplace: MarketplaceConfig) -> Self {
        self.marketplaces.push(marketplace);
        self
    }

    /// Set the directory for processed datasets and product summaries.
    pub fn processed_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.processed_dir = Some(path.into());
        self
    }

    /// Set the directory for rankings, charts and word clouds.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn top_n_products(mut self, n: usize) -> Self {
        self.top_n_products = Some(n);
        self
    }

    pub fn top_k_wordclouds(mut self, k: usize) -> Self {
        self.top_k_wordclouds = Some(k);
        self
    }

    pub fn ranking_size(mut self, size: usize) -> Self {
        self.ranking_size = Some(size);
        self
    }

    pub fn sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = Some(seed);
        self
    }

    pub fn infer_schema_rows(mut self, rows: usize) -> Self {
        self.infer_schema_rows = Some(rows);
        self
    }

    /// Enable or disable chart and word-cloud rendering.
    pub fn render_images(mut self, render: bool) -> Self {
        self.render_images = Some(render);
        self
    }

    /// Enable or disable writing `run_report.json`.
    pub fn emit_run_report(mut self, emit: bool) -> Self {
        self.emit_run_report = Some(emit);
        self
    }

    /// Merge a JSON lexicon over the built-in one.
    pub fn lexicon_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon_path = Some(path.into());
        self
    }

    pub fn bar_chart_size(mut self, width: u32, height: u32) -> Self {
        self.bar_chart_size = Some((width, height));
        self
    }

    pub fn wordcloud_size(mut self, width: u32, height: u32) -> Self {
        self.wordcloud_size = Some((width, height));
        self
    }

    pub fn max_cloud_words(mut self, words: usize) -> Self {
        self.max_cloud_words = Some(words);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ReportConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<ReportConfig, ConfigValidationError> {
        let defaults = ReportConfig::default();
        let config = ReportConfig {
            marketplaces: if self.marketplaces.is_empty() {
                defaults.marketplaces
            } else {
                self.marketplaces
            },
            processed_dir: self.processed_dir.unwrap_or(defaults.processed_dir),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            top_n_products: self.top_n_products.unwrap_or(defaults.top_n_products),
            top_k_wordclouds: self.top_k_wordclouds.unwrap_or(defaults.top_k_wordclouds),
            ranking_size: self.ranking_size.unwrap_or(defaults.ranking_size),
            sample_seed: self.sample_seed.unwrap_or(defaults.sample_seed),
            infer_schema_rows: self.infer_schema_rows.unwrap_or(defaults.infer_schema_rows),
            render_images: self.render_images.unwrap_or(defaults.render_images),
            emit_run_report: self.emit_run_report.unwrap_or(defaults.emit_run_report),
            lexicon_path: self.lexicon_path,
            bar_chart_size: self.bar_chart_size.unwrap_or(defaults.bar_chart_size),
            wordcloud_size: self.wordcloud_size.unwrap_or(defaults.wordcloud_size),
            max_cloud_words: self.max_cloud_words.unwrap_or(defaults.max_cloud_words),
        };

        config.validate()?;
        Ok(config)
    }
}
