//! Descriptive statistics per attribute

use polars::prelude::*;
use serde::Serialize;

use super::correlation::collect_float_columns;
use super::error::AnalysisError;

/// Summary measures for one attribute over its valid values.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeSummary {
    pub attribute: String,
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Summarize every attribute. Attributes without a single valid value are
/// omitted (JSON has no NaN); callers can detect the omission by comparing
/// against the attribute set.
pub fn summarize_attributes(
    df: &DataFrame,
    attributes: &[String],
) -> Result<Vec<AttributeSummary>, AnalysisError> {
    let columns = collect_float_columns(df, attributes)?;
    let mut summaries = Vec::with_capacity(attributes.len());

    for (attribute, column) in attributes.iter().zip(columns.iter()) {
        let mut values: Vec<f64> = column.iter().flatten().collect();
        let missing = column.len() - values.len();
        if values.is_empty() {
            continue;
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        summaries.push(AttributeSummary {
            attribute: attribute.clone(),
            count,
            missing,
            mean,
            std_dev,
            min: values[0],
            q1: quantile_sorted(&values, 0.25),
            median: quantile_sorted(&values, 0.5),
            q3: quantile_sorted(&values, 0.75),
            max: values[count - 1],
        });
    }

    Ok(summaries)
}

/// Linear-interpolation quantile (R-7) over an ascending slice.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let position = q * (n - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = position - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
