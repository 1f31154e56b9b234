//! Correlation significance against the target attribute
//!
//! Reuses the pairwise Pearson estimator restricted to (attribute, target)
//! pairs and adds a two-tailed test of the null hypothesis "true correlation
//! is zero": `t = r * sqrt((n-2) / (1 - r^2))` referred to a Student's t
//! distribution with n-2 degrees of freedom. Tier thresholds are fixed at
//! p < 0.01 and p < 0.05 for compatibility with the reference pipeline.

use polars::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::correlation::{collect_float_columns, pairwise_pearson};
use super::error::{AnalysisError, SkipReason};

/// Tier boundary below which a correlation is highly significant.
pub const HIGHLY_SIGNIFICANT_P: f64 = 0.01;

/// Tier boundary below which a correlation is significant.
pub const SIGNIFICANT_P: f64 = 0.05;

/// Minimum co-observations for the t statistic (df = n - 2 must be >= 1).
pub const MIN_TEST_OBSERVATIONS: usize = 3;

/// Significance bucket derived from the p-value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignificanceTier {
    HighlySignificant,
    Significant,
    NotSignificant,
}

impl SignificanceTier {
    /// Pure threshold function: p < 0.01, 0.01 <= p < 0.05, p >= 0.05.
    pub fn from_p_value(p: f64) -> Self {
        if p < HIGHLY_SIGNIFICANT_P {
            SignificanceTier::HighlySignificant
        } else if p < SIGNIFICANT_P {
            SignificanceTier::Significant
        } else {
            SignificanceTier::NotSignificant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignificanceTier::HighlySignificant => "highly_significant",
            SignificanceTier::Significant => "significant",
            SignificanceTier::NotSignificant => "not_significant",
        }
    }
}

impl std::fmt::Display for SignificanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Test result for one (attribute, target) pair.
#[derive(Debug, Clone, Serialize)]
pub struct SignificanceEntry {
    pub attribute: String,
    pub coefficient: f64,
    pub p_value: f64,
    pub observations: usize,
    pub tier: SignificanceTier,
}

/// An attribute left out of the tiers, with the documented reason.
#[derive(Debug, Clone, Serialize)]
pub struct ExcludedAttribute {
    pub attribute: String,
    pub reason: String,
}

/// Tiered significance report. Every evaluable attribute lands in exactly
/// one tier; the rest appear under `excluded` with a reason.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignificanceReport {
    pub highly_significant: Vec<SignificanceEntry>,
    pub significant: Vec<SignificanceEntry>,
    pub not_significant: Vec<SignificanceEntry>,
    pub excluded: Vec<ExcludedAttribute>,
}

impl SignificanceReport {
    /// Total entries across the three tiers.
    pub fn evaluated(&self) -> usize {
        self.highly_significant.len() + self.significant.len() + self.not_significant.len()
    }

    /// Tier buckets with their names, in descending-severity order.
    pub fn tiers(&self) -> [(&'static str, &[SignificanceEntry]); 3] {
        [
            ("highly_significant", &self.highly_significant),
            ("significant", &self.significant),
            ("not_significant", &self.not_significant),
        ]
    }
}

/// Classify every non-target attribute against the target.
///
/// Entries are computed independently and bucketed afterwards; each bucket
/// is then stable-sorted descending by absolute coefficient, so the order
/// never depends on computation order.
pub fn classify_against_target(
    df: &DataFrame,
    attributes: &[String],
    target: &str,
) -> Result<SignificanceReport, AnalysisError> {
    let target_values = collect_float_columns(df, std::slice::from_ref(&target.to_string()))?
        .pop()
        .ok_or_else(|| AnalysisError::MissingAttribute {
            name: target.to_string(),
        })?;

    let mut report = SignificanceReport::default();

    for attribute in attributes.iter().filter(|a| a.as_str() != target) {
        let values = collect_float_columns(df, std::slice::from_ref(attribute))?
            .pop()
            .ok_or_else(|| AnalysisError::MissingAttribute {
                name: attribute.clone(),
            })?;

        match test_pair(&values, &target_values) {
            Ok((coefficient, p_value, observations)) => {
                let entry = SignificanceEntry {
                    attribute: attribute.clone(),
                    coefficient,
                    p_value,
                    observations,
                    tier: SignificanceTier::from_p_value(p_value),
                };
                match entry.tier {
                    SignificanceTier::HighlySignificant => report.highly_significant.push(entry),
                    SignificanceTier::Significant => report.significant.push(entry),
                    SignificanceTier::NotSignificant => report.not_significant.push(entry),
                }
            }
            Err(reason) => report.excluded.push(ExcludedAttribute {
                attribute: attribute.clone(),
                reason,
            }),
        }
    }

    let by_abs_coefficient = |a: &SignificanceEntry, b: &SignificanceEntry| {
        b.coefficient
            .abs()
            .partial_cmp(&a.coefficient.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    };
    report.highly_significant.sort_by(by_abs_coefficient);
    report.significant.sort_by(by_abs_coefficient);
    report.not_significant.sort_by(by_abs_coefficient);

    Ok(report)
}

/// Coefficient, two-tailed p-value, and sample size for one pair, or the
/// reason the pair is not testable.
fn test_pair(xs: &Float64Chunked, ys: &Float64Chunked) -> Result<(f64, f64, usize), String> {
    let est = pairwise_pearson(xs, ys).map_err(|reason| reason.to_string())?;

    if est.observations < MIN_TEST_OBSERVATIONS {
        return Err(SkipReason::TooFewObservations {
            observed: est.observations,
            required: MIN_TEST_OBSERVATIONS,
        }
        .to_string());
    }

    let p_value = two_tailed_p_value(est.coefficient, est.observations)
        .ok_or_else(|| "t distribution undefined for sample size".to_string())?;

    Ok((est.coefficient, p_value, est.observations))
}

/// Two-tailed p-value for a correlation coefficient at sample size `n`.
///
/// `|r| = 1` short-circuits to 0 instead of dividing by zero. Requires
/// n >= 3 so the degrees of freedom are positive.
pub fn two_tailed_p_value(r: f64, n: usize) -> Option<f64> {
    if n < MIN_TEST_OBSERVATIONS {
        return None;
    }
    let dof = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= f64::EPSILON {
        return Some(0.0);
    }
    let t = r * (dof / denom).sqrt();
    let dist = StudentsT::new(0.0, 1.0, dof).ok()?;
    Some((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds_exact() {
        assert_eq!(
            SignificanceTier::from_p_value(0.0099),
            SignificanceTier::HighlySignificant
        );
        assert_eq!(
            SignificanceTier::from_p_value(0.01),
            SignificanceTier::Significant
        );
        assert_eq!(
            SignificanceTier::from_p_value(0.0499),
            SignificanceTier::Significant
        );
        assert_eq!(
            SignificanceTier::from_p_value(0.05),
            SignificanceTier::NotSignificant
        );
        assert_eq!(
            SignificanceTier::from_p_value(1.0),
            SignificanceTier::NotSignificant
        );
    }

    #[test]
    fn test_p_value_known_moderate_correlation() {
        // r = 0.5, n = 20: t = 0.5 * sqrt(18 / 0.75) ~= 2.449, df = 18,
        // two-tailed p ~= 0.0249.
        let p = two_tailed_p_value(0.5, 20).unwrap();
        assert!((p - 0.0249).abs() < 1e-3, "p = {}", p);
    }

    #[test]
    fn test_p_value_strong_correlation_small_sample() {
        // r = 0.9, n = 10: t ~= 5.84, df = 8, p well below 0.001.
        let p = two_tailed_p_value(0.9, 10).unwrap();
        assert!(p < 0.001, "p = {}", p);
    }

    #[test]
    fn test_p_value_perfect_correlation_is_zero() {
        assert_eq!(two_tailed_p_value(1.0, 100), Some(0.0));
        assert_eq!(two_tailed_p_value(-1.0, 100), Some(0.0));
    }

    #[test]
    fn test_p_value_zero_correlation_is_one() {
        let p = two_tailed_p_value(0.0, 50).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_p_value_needs_three_observations() {
        assert_eq!(two_tailed_p_value(0.5, 2), None);
    }

    #[test]
    fn test_classify_buckets_and_order() {
        let n = 40;
        let magnitude: Vec<f64> = (0..n).map(|i| 4.0 + 0.05 * i as f64).collect();
        // Perfect anti-correlation, a noisy positive one, and pure noise.
        let depth: Vec<f64> = magnitude.iter().map(|m| 700.0 - 100.0 * m).collect();
        let sig: Vec<f64> = magnitude
            .iter()
            .enumerate()
            .map(|(i, m)| 100.0 * m + if i % 2 == 0 { 25.0 } else { -25.0 })
            .collect();
        let rms: Vec<f64> = (0..n)
            .map(|i| if (i * 7) % 3 == 0 { 0.4 } else { 0.9 })
            .collect();

        let df = df! {
            "magnitude" => &magnitude,
            "depth" => &depth,
            "sig" => &sig,
            "rms" => &rms,
        }
        .unwrap();
        let attrs: Vec<String> = ["magnitude", "depth", "sig", "rms"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let report = classify_against_target(&df, &attrs, "magnitude").unwrap();

        // The target itself is never an entry; every other attribute shows
        // up in exactly one bucket.
        assert_eq!(report.evaluated() + report.excluded.len(), 3);
        let highly: Vec<&str> = report
            .highly_significant
            .iter()
            .map(|e| e.attribute.as_str())
            .collect();
        assert!(highly.contains(&"depth"));
        assert_eq!(report.highly_significant[0].attribute, "depth");
        assert!((report.highly_significant[0].coefficient + 1.0).abs() < 1e-9);
        assert!(report.highly_significant[0].p_value < 1e-9);

        // Buckets are ordered descending by |r|.
        for bucket in [&report.highly_significant, &report.not_significant] {
            for pair in bucket.windows(2) {
                assert!(pair[0].coefficient.abs() >= pair[1].coefficient.abs());
            }
        }
    }

    #[test]
    fn test_constant_attribute_excluded_with_reason() {
        let df = df! {
            "magnitude" => [4.0f64, 5.0, 6.0, 7.0],
            "rms" => [0.3f64, 0.3, 0.3, 0.3],
        }
        .unwrap();
        let attrs: Vec<String> = ["magnitude", "rms"].iter().map(|s| s.to_string()).collect();

        let report = classify_against_target(&df, &attrs, "magnitude").unwrap();
        assert_eq!(report.evaluated(), 0);
        assert_eq!(report.excluded.len(), 1);
        assert_eq!(report.excluded[0].attribute, "rms");
        assert!(report.excluded[0].reason.contains("zero variance"));
    }

    #[test]
    fn test_tiny_sample_excluded_not_dropped() {
        // Two co-observations define a coefficient but not a p-value.
        let df = df! {
            "magnitude" => [Some(4.0f64), Some(5.0), None, None],
            "gap" => [Some(30.0f64), Some(60.0), Some(90.0), Some(120.0)],
        }
        .unwrap();
        let attrs: Vec<String> = ["magnitude", "gap"].iter().map(|s| s.to_string()).collect();

        let report = classify_against_target(&df, &attrs, "magnitude").unwrap();
        assert_eq!(report.evaluated(), 0);
        assert_eq!(report.excluded.len(), 1);
        assert!(report.excluded[0].reason.contains("co-observations"));
    }

    #[test]
    fn test_missing_target_aborts() {
        let df = df! { "depth" => [10.0f64, 20.0] }.unwrap();
        let attrs = vec!["depth".to_string()];
        let err = classify_against_target(&df, &attrs, "magnitude").unwrap_err();
        assert!(matches!(err, AnalysisError::MissingAttribute { .. }));
    }
}
