//! Dataset loader for CSV and Parquet catalogs

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

/// Load a catalog into memory (CSV or Parquet based on extension).
///
/// Empty CSV fields and Parquet nulls arrive as missing values, never as
/// zeros; every downstream stage relies on that distinction.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(if infer_schema_length == 0 {
                None
            } else {
                Some(infer_schema_length)
            })
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to collect dataset: {}", path.display()))
}

/// Row count, column count, and estimated in-memory size in MB.
pub fn dataset_stats(df: &DataFrame) -> (usize, usize, f64) {
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    (rows, cols, memory_mb)
}
