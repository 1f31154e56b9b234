//! Analysis report assembly and JSON export
//!
//! Merges every stage's output into one structure keyed by analysis type.
//! `build_report` is the contract callers depend on: it runs the stages in
//! order against one immutable frame snapshot and either returns a complete
//! report or fails with a typed error naming the component and attribute
//! responsible. Partial reports are never produced.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{
    bin_attribute, build_correlation_matrix, classify_against_target, depth_bins, magnitude_bins,
    rank_feature_importance, resolve_attributes, summarize_attributes, AnalysisError,
    AttributeImportance, AttributeSummary, BinSummary, FeatureGroups, ForestConfig,
    GroupImportance, ScalingPlan, ScalingSummary, SignificanceReport, StrongCorrelation,
    DEFAULT_STRONG_THRESHOLD,
};

/// Run configuration: threshold, seed, tier cutoffs and group membership are
/// explicit arguments, not process state, so runs are reproducible from the
/// report metadata alone.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Target attribute for significance and importance (magnitude).
    pub target: String,
    /// Explicit attribute set; `None` derives all numeric columns.
    pub attributes: Option<Vec<String>>,
    /// Absolute-coefficient threshold for the strong-correlation list.
    pub strong_threshold: f64,
    /// Forest shape and seed for the importance ranker.
    pub forest: ForestConfig,
    /// Feature-group membership for aggregate importance.
    pub groups: FeatureGroups,
    /// Attribute-to-scaler assignment for the scaling summary.
    pub scaling: ScalingPlan,
    /// Input path recorded in the report metadata.
    pub input_file: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target: "magnitude".to_string(),
            attributes: None,
            strong_threshold: DEFAULT_STRONG_THRESHOLD,
            forest: ForestConfig::default(),
            groups: FeatureGroups::earthquake_defaults(),
            scaling: ScalingPlan::default(),
            input_file: String::new(),
        }
    }
}

/// Metadata about the analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the analysis (ISO 8601 format).
    pub timestamp: String,
    /// Quakelens version.
    pub quakelens_version: String,
    /// Input file path.
    pub input_file: String,
    /// Target attribute.
    pub target: String,
    /// Strong-correlation threshold used.
    pub strong_threshold: f64,
    /// Forest seed, recorded for reproducibility.
    pub seed: u64,
    /// Number of trees in the importance forest.
    pub trees: usize,
}

/// Complete analysis report, keyed by analysis type.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub summary_statistics: Vec<AttributeSummary>,
    pub magnitude_bins: Vec<BinSummary>,
    pub depth_bins: Vec<BinSummary>,
    pub scaling: Vec<ScalingSummary>,
    pub correlation_matrix: BTreeMap<String, BTreeMap<String, f64>>,
    pub strong_correlations: Vec<StrongCorrelation>,
    pub significance_analysis: SignificanceReport,
    pub feature_importance: Vec<AttributeImportance>,
    pub group_importance: Vec<GroupImportance>,
}

/// Stage outputs awaiting assembly. Produced either by `run_stages` or by a
/// caller driving the stages itself (the CLI does, to interleave display).
pub struct ReportSections {
    pub summary_statistics: Vec<AttributeSummary>,
    pub magnitude_bins: Vec<BinSummary>,
    pub depth_bins: Vec<BinSummary>,
    pub scaling: Vec<ScalingSummary>,
    pub matrix: crate::pipeline::CorrelationMatrix,
    pub significance: SignificanceReport,
    pub importance: crate::pipeline::ImportanceReport,
}

/// Run every analysis stage over the frame, in order.
pub fn run_stages(df: &DataFrame, config: &AnalysisConfig) -> Result<ReportSections, AnalysisError> {
    crate::pipeline::require_attribute(df, &config.target)?;
    let attributes = resolve_attributes(df, config.attributes.as_deref())?;
    if !attributes.iter().any(|a| a == &config.target) {
        return Err(AnalysisError::MissingAttribute {
            name: config.target.clone(),
        });
    }

    let summary_statistics = summarize_attributes(df, &attributes)?;

    let magnitude_summary = if df.column("magnitude").is_ok() {
        bin_attribute(df, "magnitude", &magnitude_bins())?
    } else {
        Vec::new()
    };
    let depth_summary = if df.column("depth").is_ok() {
        bin_attribute(df, "depth", &depth_bins())?
    } else {
        Vec::new()
    };

    let scaling = crate::pipeline::scaling_summary(df, &config.scaling)?;

    let matrix = build_correlation_matrix(df, &attributes)?;

    let significance = classify_against_target(df, &attributes, &config.target)?;

    let importance = rank_feature_importance(
        df,
        &attributes,
        &config.target,
        &config.groups,
        &config.forest,
    )?;

    Ok(ReportSections {
        summary_statistics,
        magnitude_bins: magnitude_summary,
        depth_bins: depth_summary,
        scaling,
        matrix,
        significance,
        importance,
    })
}

/// Merge stage outputs and run metadata into the final report.
pub fn assemble(config: &AnalysisConfig, sections: ReportSections) -> AnalysisReport {
    AnalysisReport {
        metadata: ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            quakelens_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: config.input_file.clone(),
            target: config.target.clone(),
            strong_threshold: config.strong_threshold,
            seed: config.forest.seed,
            trees: config.forest.trees,
        },
        summary_statistics: sections.summary_statistics,
        magnitude_bins: sections.magnitude_bins,
        depth_bins: sections.depth_bins,
        scaling: sections.scaling,
        correlation_matrix: sections.matrix.to_nested_map(),
        strong_correlations: sections.matrix.strong_correlations(config.strong_threshold),
        significance_analysis: sections.significance,
        feature_importance: sections.importance.scores,
        group_importance: sections.importance.groups,
    }
}

/// Run every analysis stage over the frame and assemble the report.
pub fn build_report(df: &DataFrame, config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
    let sections = run_stages(df, config)?;
    Ok(assemble(config, sections))
}

/// Export the report to a pretty-printed JSON file.
pub fn export_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize analysis report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis report to {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_frame() -> DataFrame {
        let n = 40;
        let magnitude: Vec<f64> = (0..n).map(|i| 3.0 + 0.1 * i as f64).collect();
        let depth: Vec<f64> = magnitude.iter().map(|m| 700.0 - 90.0 * m).collect();
        let gap: Vec<f64> = (0..n).map(|i| 30.0 + ((i * 29) % 140) as f64).collect();
        df! {
            "magnitude" => &magnitude,
            "depth" => &depth,
            "gap" => &gap,
        }
        .unwrap()
    }

    #[test]
    fn test_build_report_populates_all_sections() {
        let df = catalog_frame();
        let config = AnalysisConfig {
            input_file: "catalog.csv".to_string(),
            ..Default::default()
        };
        let report = build_report(&df, &config).unwrap();

        assert_eq!(report.summary_statistics.len(), 3);
        assert!(!report.magnitude_bins.is_empty());
        assert!(!report.depth_bins.is_empty());
        assert!(!report.scaling.is_empty());
        assert_eq!(report.correlation_matrix.len(), 3);
        assert!(!report.strong_correlations.is_empty());
        assert!(report.significance_analysis.evaluated() > 0);
        assert_eq!(report.feature_importance.len(), 2);
        assert_eq!(report.metadata.target, "magnitude");
    }

    #[test]
    fn test_missing_target_fails_fast() {
        let df = df! { "depth" => [10.0f64, 20.0, 30.0] }.unwrap();
        let err = build_report(&df, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingAttribute { name } if name == "magnitude"
        ));
    }

    #[test]
    fn test_report_serializes_with_contract_keys() {
        let df = catalog_frame();
        let report = build_report(&df, &AnalysisConfig::default()).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        for key in [
            "metadata",
            "summary_statistics",
            "magnitude_bins",
            "depth_bins",
            "scaling",
            "correlation_matrix",
            "strong_correlations",
            "significance_analysis",
            "feature_importance",
            "group_importance",
        ] {
            assert!(value.get(key).is_some(), "missing report key: {}", key);
        }
        let tiers = value.get("significance_analysis").unwrap();
        assert!(tiers.get("highly_significant").is_some());
        assert!(tiers.get("excluded").is_some());
    }
}
