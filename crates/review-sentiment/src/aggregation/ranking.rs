//! Ranking tables over product summaries.

use crate::types::ProductSummary;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Ordering criterion for a ranking table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKind {
    /// Highest share of positive reviews first.
    Best,
    /// Highest share of negative reviews first.
    Worst,
    /// Most reviews first.
    MostReviewed,
}

impl RankingKind {
    pub const ALL: [RankingKind; 3] = [Self::Best, Self::Worst, Self::MostReviewed];

    /// Suffix used in the table file name.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Worst => "worst",
            Self::MostReviewed => "most_reviewed",
        }
    }

    fn compare(&self, a: &ProductSummary, b: &ProductSummary) -> Ordering {
        match self {
            Self::Best => b.pct_positive.total_cmp(&a.pct_positive),
            Self::Worst => b.pct_negative.total_cmp(&a.pct_negative),
            Self::MostReviewed => b.total_reviews.cmp(&a.total_reviews),
        }
    }
}

impl fmt::Display for RankingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Top entries of the summary under one ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingTable {
    pub kind: RankingKind,
    pub limit: usize,
    pub rows: Vec<ProductSummary>,
}

impl RankingTable {
    /// `{platform}_top{limit}_{kind}.csv`
    pub fn file_name(&self, platform: &str) -> String {
        format!("{}_top{}_{}.csv", platform, self.limit, self.kind.slug())
    }
}

/// Stable re-sort of the whole summary, truncated to `limit` rows.
///
/// Equal keys keep their order in `summaries`.
pub fn rank(summaries: &[ProductSummary], kind: RankingKind, limit: usize) -> Vec<ProductSummary> {
    let mut sorted = summaries.to_vec();
    sorted.sort_by(|a, b| kind.compare(a, b));
    sorted.truncate(limit);
    sorted
}

/// Best, worst and most-reviewed tables, in that order.
pub fn ranking_tables(summaries: &[ProductSummary], limit: usize) -> Vec<RankingTable> {
    RankingKind::ALL
        .iter()
        .map(|&kind| RankingTable {
            kind,
            limit,
            rows: rank(summaries, kind, limit),
        })
        .collect()
}
