//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

/// Quakelens - correlation, significance, and feature-importance analysis
/// for earthquake catalogs
#[derive(Parser, Debug)]
#[command(name = "quakelens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input catalog path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target attribute for significance and importance analysis
    #[arg(short, long, default_value = "magnitude")]
    pub target: String,

    /// Attributes to analyze (comma-separated).
    /// Defaults to every numeric column in the catalog.
    #[arg(long, value_delimiter = ',')]
    pub attributes: Vec<String>,

    /// Output path for the JSON report.
    /// Defaults to the input directory with an '_analysis.json' suffix.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Absolute correlation threshold for the strong-correlation list
    #[arg(long, default_value = "0.5")]
    pub correlation_threshold: f64,

    /// Number of trees in the importance forest
    #[arg(long, default_value = "100")]
    pub trees: usize,

    /// Random seed for the importance forest (fixed seed = reproducible report)
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// JSON file mapping feature-group names to attribute lists.
    /// Defaults to the built-in earthquake groups.
    #[arg(long)]
    pub groups: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for a full table scan (slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Output path, derived from the input stem when not provided.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let parent = self
                .input
                .parent()
                .unwrap_or_else(|| std::path::Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("catalog");
            parent.join(format!("{}_analysis.json", stem))
        })
    }
}
