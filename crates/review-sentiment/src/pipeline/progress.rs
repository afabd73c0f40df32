//! Progress reporting for report runs.
//!
//! The pipeline emits a [`ProgressUpdate`] at the start of every stage for
//! every marketplace, and once more when the run completes or fails.
//!
//! # Example
//!
//! ```rust,ignore
//! use review_sentiment::ReviewPipeline;
//!
//! let report = ReviewPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of processing one marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStage {
    /// Reading, sampling and resolving columns
    Loading,
    /// Cleaning review text
    Normalizing,
    /// Assigning sentiment labels
    Scoring,
    /// Building product summaries and writing the CSV outputs
    Aggregating,
    /// Writing ranking tables
    Ranking,
    /// Drawing the bar chart
    Charting,
    /// Drawing word clouds
    WordClouds,
    /// Run completed successfully
    Complete,
    /// Run failed with an error
    Failed,
}

impl ReportStage {
    /// Processing stages in execution order.
    pub const SEQUENCE: [ReportStage; 7] = [
        Self::Loading,
        Self::Normalizing,
        Self::Scoring,
        Self::Aggregating,
        Self::Ranking,
        Self::Charting,
        Self::WordClouds,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Dataset",
            Self::Normalizing => "Normalizing Text",
            Self::Scoring => "Scoring Sentiment",
            Self::Aggregating => "Aggregating Products",
            Self::Ranking => "Ranking Products",
            Self::Charting => "Drawing Bar Chart",
            Self::WordClouds => "Drawing Word Clouds",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of one marketplace's processing time spent in this stage.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.10,
            Self::Normalizing => 0.10,
            Self::Scoring => 0.30,
            Self::Aggregating => 0.10,
            Self::Ranking => 0.05,
            Self::Charting => 0.10,
            Self::WordClouds => 0.25,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Complete => 1.0,
            Self::Failed => 0.0,
            stage => Self::SEQUENCE
                .iter()
                .take_while(|s| *s != stage)
                .map(|s| s.weight())
                .sum(),
        }
    }
}

/// One progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: ReportStage,

    /// Marketplace being processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<String>,

    /// Overall progress (0.0 - 1.0) across all marketplaces
    pub progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    /// Update for the start of `stage` on marketplace `index` of `count`.
    pub fn stage(
        stage: ReportStage,
        marketplace: impl Into<String>,
        index: usize,
        count: usize,
        message: impl Into<String>,
    ) -> Self {
        let count = count.max(1) as f32;
        let progress = (index as f32 + stage.base_progress()) / count;
        Self {
            stage,
            marketplace: Some(marketplace.into()),
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: ReportStage::Complete,
            marketplace: None,
            progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: ReportStage::Failed,
            marketplace: None,
            progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receiver for progress updates.
///
/// Implementations must be `Send + Sync` so the pipeline holding them stays
/// `Send`.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
