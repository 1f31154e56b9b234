//! Shared test utilities and fixture generators

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a catalog DataFrame with known correlation structure:
/// - `magnitude`: linear ramp over 100 events
/// - `depth`: perfectly anti-correlated with magnitude (r = -1)
/// - `gap`: deterministic pseudo-noise, uncorrelated with magnitude
pub fn create_catalog_dataframe() -> DataFrame {
    let n = 100;
    let magnitude: Vec<f64> = (0..n).map(|i| 3.0 + 0.04 * i as f64).collect();
    let depth: Vec<f64> = magnitude.iter().map(|m| 800.0 - 100.0 * m).collect();
    let gap: Vec<f64> = (0..n).map(|i| 30.0 + ((i * 53) % 160) as f64).collect();

    df! {
        "magnitude" => &magnitude,
        "depth" => &depth,
        "gap" => &gap,
    }
    .unwrap()
}

/// Catalog with a constant attribute and a sparse attribute alongside
/// well-behaved ones.
pub fn create_degenerate_dataframe() -> DataFrame {
    let n = 30;
    let magnitude: Vec<f64> = (0..n).map(|i| 4.0 + 0.05 * i as f64).collect();
    let rms: Vec<f64> = vec![0.25; n];
    let mmi: Vec<Option<f64>> = (0..n)
        .map(|i| if i == 0 { Some(3.5) } else { None })
        .collect();
    let felt: Vec<f64> = (0..n).map(|i| ((i * 31) % 23) as f64).collect();

    df! {
        "magnitude" => &magnitude,
        "rms" => &rms,
        "mmi" => &mmi,
        "felt" => &felt,
    }
    .unwrap()
}

/// Attribute name list helper.
pub fn attrs(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("catalog.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("catalog.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}
