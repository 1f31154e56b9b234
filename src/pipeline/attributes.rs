//! Attribute set resolution and feature-group configuration
//!
//! The attribute set is the ordered list of numeric columns one analysis run
//! operates over. It is either derived from the frame (every primitive
//! numeric column, in frame order) or validated from an explicit request.
//! Identifiers, timestamps, and textual columns never qualify.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::AnalysisError;

/// Resolve the attribute set for an analysis run.
///
/// With `requested` given, every name must exist in the frame and be a
/// primitive numeric column; order is preserved as requested. Without it,
/// all primitive numeric columns are taken in frame order.
pub fn resolve_attributes(
    df: &DataFrame,
    requested: Option<&[String]>,
) -> Result<Vec<String>, AnalysisError> {
    match requested {
        Some(names) => {
            let mut attributes = Vec::with_capacity(names.len());
            for name in names {
                let col = df
                    .column(name)
                    .map_err(|_| AnalysisError::MissingAttribute { name: name.clone() })?;
                if !col.dtype().is_primitive_numeric() {
                    return Err(AnalysisError::UndefinedStatistic {
                        attribute: name.clone(),
                        reason: format!("column has non-numeric type {}", col.dtype()),
                    });
                }
                attributes.push(name.clone());
            }
            Ok(attributes)
        }
        None => Ok(df
            .get_columns()
            .iter()
            .filter(|col| col.dtype().is_primitive_numeric())
            .map(|col| col.name().to_string())
            .collect()),
    }
}

/// Require that a single attribute (typically the target) exists and is numeric.
pub fn require_attribute(df: &DataFrame, name: &str) -> Result<(), AnalysisError> {
    let col = df.column(name).map_err(|_| AnalysisError::MissingAttribute {
        name: name.to_string(),
    })?;
    if !col.dtype().is_primitive_numeric() {
        return Err(AnalysisError::UndefinedStatistic {
            attribute: name.to_string(),
            reason: format!("column has non-numeric type {}", col.dtype()),
        });
    }
    Ok(())
}

/// Named, possibly overlapping groups of attributes for aggregate reporting.
///
/// Membership is configuration, not code: callers pass a mapping so group
/// definitions can vary without touching the ranking algorithm. Groups are
/// kept in a sorted map for deterministic iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureGroups(pub BTreeMap<String, Vec<String>>);

impl FeatureGroups {
    /// Built-in groups for the standard earthquake-catalog schema.
    pub fn earthquake_defaults() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(
            "geographic".to_string(),
            vec![
                "latitude".to_string(),
                "longitude".to_string(),
                "distance_km".to_string(),
            ],
        );
        groups.insert(
            "intensity".to_string(),
            vec![
                "mmi".to_string(),
                "cdi".to_string(),
                "felt".to_string(),
                "sig".to_string(),
            ],
        );
        groups.insert(
            "station_quality".to_string(),
            vec!["gap".to_string(), "rms".to_string(), "dmin".to_string()],
        );
        groups.insert("source".to_string(), vec!["depth".to_string()]);
        FeatureGroups(groups)
    }

    /// Load group definitions from a JSON file mapping group name to
    /// attribute list.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read feature-group file: {}", path.display()))?;
        let groups: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid feature-group JSON: {}", path.display()))?;
        Ok(FeatureGroups(groups))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
