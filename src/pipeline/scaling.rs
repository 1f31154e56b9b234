//! Scaling summaries: z-score and min-max
//!
//! Mirrors the catalog convention of the upstream pipeline: attributes with
//! distribution-shaped values are z-scored, bounded ones are min-max
//! scaled. Scaled vectors are transient; only the before/after statistics
//! survive into the report. Missing values are dropped per attribute before
//! scaling.

use polars::prelude::*;
use serde::Serialize;

use super::correlation::collect_float_columns;
use super::error::AnalysisError;

/// Which transform a plan assigns to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMethod {
    Standard,
    MinMax,
}

impl std::fmt::Display for ScalingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalingMethod::Standard => write!(f, "standard"),
            ScalingMethod::MinMax => write!(f, "min-max"),
        }
    }
}

/// Attribute-to-method assignment for one run.
#[derive(Debug, Clone)]
pub struct ScalingPlan {
    pub standard: Vec<String>,
    pub min_max: Vec<String>,
}

impl Default for ScalingPlan {
    /// The assignment used by the original catalog pipeline.
    fn default() -> Self {
        let s = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        Self {
            standard: s(&["magnitude", "depth", "sig", "mmi", "gap", "rms", "dmin"]),
            min_max: s(&["latitude", "longitude", "cdi", "felt", "distance_km"]),
        }
    }
}

/// Descriptive stats before or after scaling.
#[derive(Debug, Clone, Serialize)]
pub struct ScalingStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Before/after summary for one scaled attribute.
#[derive(Debug, Clone, Serialize)]
pub struct ScalingSummary {
    pub attribute: String,
    pub method: ScalingMethod,
    pub original: ScalingStats,
    pub scaled: ScalingStats,
}

/// Compute scaling summaries for every plan attribute present in the frame.
/// Plan attributes missing from the frame are skipped (the plan is
/// advisory); attributes with no valid values are skipped too.
pub fn scaling_summary(
    df: &DataFrame,
    plan: &ScalingPlan,
) -> Result<Vec<ScalingSummary>, AnalysisError> {
    let mut summaries = Vec::new();
    for (names, method) in [
        (&plan.standard, ScalingMethod::Standard),
        (&plan.min_max, ScalingMethod::MinMax),
    ] {
        for name in names {
            if df.column(name).is_err() {
                continue;
            }
            let column = collect_float_columns(df, std::slice::from_ref(name))?
                .pop()
                .ok_or_else(|| AnalysisError::MissingAttribute { name: name.clone() })?;
            let values: Vec<f64> = column.iter().flatten().collect();
            if values.is_empty() {
                continue;
            }
            summaries.push(summarize_scaling(name, method, &values));
        }
    }
    Ok(summaries)
}

fn summarize_scaling(attribute: &str, method: ScalingMethod, values: &[f64]) -> ScalingSummary {
    let original = describe(values);
    let scaled_values: Vec<f64> = match method {
        ScalingMethod::Standard => {
            // Zero-variance attributes scale to all zeros, matching the
            // reference scaler's behavior.
            if original.std_dev == 0.0 {
                vec![0.0; values.len()]
            } else {
                values
                    .iter()
                    .map(|v| (v - original.mean) / original.std_dev)
                    .collect()
            }
        }
        ScalingMethod::MinMax => {
            let range = original.max - original.min;
            if range == 0.0 {
                vec![0.0; values.len()]
            } else {
                values.iter().map(|v| (v - original.min) / range).collect()
            }
        }
    };

    ScalingSummary {
        attribute: attribute.to_string(),
        method,
        original,
        scaled: describe(&scaled_values),
    }
}

/// Population mean/std and range over a non-empty slice.
fn describe(values: &[f64]) -> ScalingStats {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    ScalingStats {
        mean,
        std_dev: var.sqrt(),
        min,
        max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scaling_centers_and_normalizes() {
        let df = df! {
            "magnitude" => [4.0f64, 5.0, 6.0, 7.0, 8.0],
        }
        .unwrap();
        let plan = ScalingPlan {
            standard: vec!["magnitude".to_string()],
            min_max: vec![],
        };
        let summaries = scaling_summary(&df, &plan).unwrap();

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.method, ScalingMethod::Standard);
        assert!(s.scaled.mean.abs() < 1e-12);
        assert!((s.scaled.std_dev - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_minmax_scaling_spans_unit_interval() {
        let df = df! {
            "latitude" => [-30.0f64, 0.0, 15.0, 60.0],
        }
        .unwrap();
        let plan = ScalingPlan {
            standard: vec![],
            min_max: vec!["latitude".to_string()],
        };
        let summaries = scaling_summary(&df, &plan).unwrap();

        let s = &summaries[0];
        assert_eq!(s.scaled.min, 0.0);
        assert_eq!(s.scaled.max, 1.0);
        assert_eq!(s.original.min, -30.0);
        assert_eq!(s.original.max, 60.0);
    }

    #[test]
    fn test_constant_attribute_scales_to_zeros() {
        let df = df! {
            "rms" => [0.5f64, 0.5, 0.5],
        }
        .unwrap();
        let plan = ScalingPlan {
            standard: vec!["rms".to_string()],
            min_max: vec![],
        };
        let summaries = scaling_summary(&df, &plan).unwrap();

        let s = &summaries[0];
        assert_eq!(s.scaled.min, 0.0);
        assert_eq!(s.scaled.max, 0.0);
        assert_eq!(s.scaled.std_dev, 0.0);
    }

    #[test]
    fn test_plan_attributes_absent_from_frame_are_skipped() {
        let df = df! {
            "magnitude" => [4.0f64, 5.0],
        }
        .unwrap();
        let summaries = scaling_summary(&df, &ScalingPlan::default()).unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].attribute, "magnitude");
    }

    #[test]
    fn test_missing_values_dropped_before_scaling() {
        let df = df! {
            "felt" => [Some(0.0f64), None, Some(50.0), Some(100.0)],
        }
        .unwrap();
        let plan = ScalingPlan {
            standard: vec![],
            min_max: vec!["felt".to_string()],
        };
        let summaries = scaling_summary(&df, &plan).unwrap();

        let s = &summaries[0];
        assert_eq!(s.scaled.min, 0.0);
        assert_eq!(s.scaled.max, 1.0);
        assert_eq!(s.original.max, 100.0);
    }
}
