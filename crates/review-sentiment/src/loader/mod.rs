//! Dataset loading, seeded sampling and column resolution.
//!
//! The two marketplace exports name their columns differently, so after
//! loading, the review text and product identifier columns are picked from
//! ordered alias lists (first match wins).

use crate::config::MarketplaceConfig;
use crate::error::{ReviewError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

/// Names of the two columns the pipeline works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumns {
    pub text: String,
    pub product: String,
}

/// Loader for raw review exports.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Read a CSV file with a header row.
    ///
    /// Tries, in order: schema inference over `infer_rows` rows, an all-text
    /// schema, and a copy of the file with blank lines removed. Fails with
    /// [`ReviewError::DataLoad`] if the file is missing or no strategy parses it.
    pub fn load(path: &Path, infer_rows: usize) -> Result<DataFrame> {
        if !path.exists() {
            return Err(ReviewError::data_load(path, "file not found"));
        }

        info!("Loading dataset from: {}", path.display());

        // Strategy 1: inferred schema with standard quoting
        match CsvReadOptions::default()
            .with_infer_schema_length(Some(infer_rows))
            .with_has_header(true)
            .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
        {
            Ok(df) => return Ok(df),
            Err(e) => debug!("Inferred-schema loading failed: {}", e),
        }

        // Strategy 2: every column as text
        match CsvReadOptions::default()
            .with_infer_schema_length(Some(0))
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
        {
            Ok(df) => {
                warn!("Schema inference failed, loaded all columns as text");
                return Ok(df);
            }
            Err(e) => debug!("All-text loading failed: {}", e),
        }

        // Strategy 3: drop blank lines and retry from memory
        let content =
            std::fs::read_to_string(path).map_err(|e| ReviewError::data_load(path, e))?;
        let cleaned = drop_blank_lines(&content);

        CsvReadOptions::default()
            .with_infer_schema_length(Some(0))
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(cleaned))
            .finish()
            .map_err(|e| ReviewError::data_load(path, e))
    }

    /// Keep at most `sample_size` rows, chosen uniformly with a seeded RNG.
    ///
    /// Returns the frame unchanged when no size is set or the dataset is not
    /// larger than the requested sample.
    pub fn sample(df: DataFrame, sample_size: Option<usize>, seed: u64) -> Result<DataFrame> {
        let height = df.height();
        let Some(n) = sample_size.filter(|&n| n < height) else {
            debug!("Keeping all {} rows (sample size {:?})", height, sample_size);
            return Ok(df);
        };

        let mut rng = StdRng::seed_from_u64(seed);
        let picked: Vec<IdxSize> = index::sample(&mut rng, height, n)
            .into_iter()
            .map(|i| i as IdxSize)
            .collect();
        let indices = IdxCa::from_vec("sample".into(), picked);

        info!("Sampled {} of {} rows (seed {})", n, height, seed);
        Ok(df.take(&indices)?)
    }

    /// Load, sample and resolve columns for one marketplace.
    pub fn load_marketplace(
        marketplace: &MarketplaceConfig,
        infer_rows: usize,
        seed: u64,
    ) -> Result<(DataFrame, ResolvedColumns, usize)> {
        let df = Self::load(&marketplace.input_path, infer_rows)?;
        let rows_loaded = df.height();
        let df = Self::sample(df, marketplace.sample_size, seed)?;
        let columns = resolve_columns(&df, marketplace)?;
        Ok((df, columns, rows_loaded))
    }
}

/// Return the first candidate that names a column of `df`.
pub fn resolve_column<'a>(df: &DataFrame, candidates: &'a [String]) -> Option<&'a str> {
    let names = df.get_column_names();
    candidates
        .iter()
        .find(|candidate| names.iter().any(|name| name.as_str() == candidate.as_str()))
        .map(String::as_str)
}

/// Resolve the text and product columns, failing with [`ReviewError::Schema`].
pub fn resolve_columns(df: &DataFrame, marketplace: &MarketplaceConfig) -> Result<ResolvedColumns> {
    let pick = |candidates: &[String], role: &str| {
        resolve_column(df, candidates)
            .map(str::to_string)
            .ok_or_else(|| ReviewError::Schema {
                dataset: marketplace.name.clone(),
                role: role.to_string(),
                candidates: candidates.to_vec(),
            })
    };

    let columns = ResolvedColumns {
        text: pick(&marketplace.text_aliases, "review text")?,
        product: pick(&marketplace.product_aliases, "product identifier")?,
    };

    debug!(
        "Resolved columns for {}: text='{}', product='{}'",
        marketplace.name, columns.text, columns.product
    );
    Ok(columns)
}

fn drop_blank_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn numbered_frame(rows: usize) -> DataFrame {
        let ids: Vec<i64> = (0..rows as i64).collect();
        df!("id" => ids).unwrap()
    }

    fn ids_of(df: &DataFrame) -> Vec<i64> {
        df.column("id")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn test_load_missing_file() {
        let err = DatasetLoader::load(Path::new("does/not/exist.csv"), 100).unwrap_err();
        assert_eq!(err.error_code(), "DATA_LOAD_ERROR");
    }

    #[test]
    fn test_load_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ProductId,Text").unwrap();
        writeln!(file, "P1,\"Great, really great\"").unwrap();
        writeln!(file, "P2,meh").unwrap();

        let df = DatasetLoader::load(file.path(), 100).unwrap();
        assert_eq!(df.shape(), (2, 2));
    }

    #[test]
    fn test_sample_exact_size_and_reproducible() {
        let df = numbered_frame(100);

        let first = DatasetLoader::sample(df.clone(), Some(10), 42).unwrap();
        let second = DatasetLoader::sample(df, Some(10), 42).unwrap();

        assert_eq!(first.height(), 10);
        assert_eq!(ids_of(&first), ids_of(&second));

        let mut unique = ids_of(&first);
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn test_sample_different_seed_differs() {
        let df = numbered_frame(1000);
        let a = DatasetLoader::sample(df.clone(), Some(20), 1).unwrap();
        let b = DatasetLoader::sample(df, Some(20), 2).unwrap();
        assert_ne!(ids_of(&a), ids_of(&b));
    }

    #[test]
    fn test_sample_larger_than_dataset_keeps_all() {
        let df = numbered_frame(5);
        let sampled = DatasetLoader::sample(df, Some(50), 42).unwrap();
        assert_eq!(ids_of(&sampled), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_sample_none_keeps_all() {
        let df = numbered_frame(7);
        assert_eq!(DatasetLoader::sample(df, None, 42).unwrap().height(), 7);
    }

    #[test]
    fn test_resolve_column_priority() {
        let df = df!("review" => ["x"], "Review" => ["y"]).unwrap();
        let candidates = vec!["Review".to_string(), "review".to_string()];
        assert_eq!(resolve_column(&df, &candidates), Some("Review"));
    }

    #[test]
    fn test_resolve_columns_schema_error() {
        let df = df!("body" => ["x"], "sku" => ["1"]).unwrap();
        let marketplace = MarketplaceConfig::amazon();

        let err = resolve_columns(&df, &marketplace).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
        match err {
            ReviewError::Schema { role, candidates, .. } => {
                assert_eq!(role, "review text");
                assert_eq!(candidates, marketplace.text_aliases);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_columns_flipkart_aliases() {
        let df = df!(
            "product_name" => ["phone"],
            "Review" => ["good"],
            "title" => ["ignored"]
        )
        .unwrap();

        let columns = resolve_columns(&df, &MarketplaceConfig::flipkart()).unwrap();
        assert_eq!(columns.text, "Review");
        assert_eq!(columns.product, "product_name");
    }

    #[test]
    fn test_drop_blank_lines() {
        assert_eq!(drop_blank_lines("a,b\n\n1,2\n   \n"), "a,b\n1,2");
    }
}
