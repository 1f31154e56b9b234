//! Fixed-boundary class binning for magnitude and depth
//!
//! Unlike data-driven binning, the class boundaries here are the standard
//! seismological conventions, so bin labels are stable across catalogs and
//! comparable between reports.

use polars::prelude::*;
use serde::Serialize;

use super::correlation::collect_float_columns;
use super::error::AnalysisError;

/// One class bin specification: half-open interval [lower, upper).
#[derive(Debug, Clone)]
pub struct BinSpec {
    pub label: &'static str,
    pub lower: f64,
    pub upper: f64,
}

/// Occupancy of one class bin.
#[derive(Debug, Clone, Serialize)]
pub struct BinSummary {
    pub label: String,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// Share of valid (non-missing) values, in [0, 1].
    pub share: f64,
}

/// Standard magnitude classes.
pub fn magnitude_bins() -> Vec<BinSpec> {
    vec![
        BinSpec { label: "micro", lower: f64::NEG_INFINITY, upper: 3.0 },
        BinSpec { label: "minor", lower: 3.0, upper: 4.0 },
        BinSpec { label: "light", lower: 4.0, upper: 5.0 },
        BinSpec { label: "moderate", lower: 5.0, upper: 6.0 },
        BinSpec { label: "strong", lower: 6.0, upper: 7.0 },
        BinSpec { label: "major", lower: 7.0, upper: 8.0 },
        BinSpec { label: "great", lower: 8.0, upper: f64::INFINITY },
    ]
}

/// Standard focal-depth classes (km).
pub fn depth_bins() -> Vec<BinSpec> {
    vec![
        BinSpec { label: "shallow", lower: 0.0, upper: 70.0 },
        BinSpec { label: "intermediate", lower: 70.0, upper: 300.0 },
        BinSpec { label: "deep", lower: 300.0, upper: f64::INFINITY },
    ]
}

/// Count valid values of `attribute` per class bin. Missing values are
/// excluded from counts and shares; values outside every bin (e.g. negative
/// depths) are likewise not counted.
pub fn bin_attribute(
    df: &DataFrame,
    attribute: &str,
    bins: &[BinSpec],
) -> Result<Vec<BinSummary>, AnalysisError> {
    let column = collect_float_columns(df, std::slice::from_ref(&attribute.to_string()))?
        .pop()
        .ok_or_else(|| AnalysisError::MissingAttribute {
            name: attribute.to_string(),
        })?;

    let values: Vec<f64> = column.iter().flatten().collect();
    let valid = values.len();

    Ok(bins
        .iter()
        .map(|spec| {
            let count = values
                .iter()
                .filter(|&&v| v >= spec.lower && v < spec.upper)
                .count();
            BinSummary {
                label: spec.label.to_string(),
                lower: spec.lower,
                upper: spec.upper,
                count,
                share: if valid > 0 {
                    count as f64 / valid as f64
                } else {
                    0.0
                },
            }
        })
        .collect())
}
