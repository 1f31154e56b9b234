//! Error types for the analysis pipeline.
//!
//! Three conditions cover every failure mode: a named attribute is absent
//! from the dataset, too few observations remain for a computation, or a
//! statistic is undefined for the values present. Per-pair and per-attribute
//! occurrences of the latter two are recorded as omissions with a reason;
//! only the variants below abort a run.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Fatal analysis errors. Each identifies the component and attribute(s)
/// responsible so a failed run is never a partial, silently-wrong report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required attribute name is absent from the dataset's columns.
    #[error("attribute '{name}' not found in dataset columns")]
    MissingAttribute { name: String },

    /// Fewer valid observations than the operation's minimum.
    #[error("{component}: {observed} complete rows available, at least {required} required")]
    InsufficientData {
        component: &'static str,
        observed: usize,
        required: usize,
    },

    /// A statistic could not be computed for the values present.
    #[error("statistic undefined for attribute '{attribute}': {reason}")]
    UndefinedStatistic { attribute: String, reason: String },

    /// Underlying columnar-engine failure (cast, column access).
    #[error(transparent)]
    Frame(#[from] PolarsError),
}

/// Why a per-pair or per-attribute entry was omitted instead of reported.
///
/// Omissions are recorded, never silently dropped: the correlation matrix
/// keeps the pair undefined and the significance report lists the attribute
/// with this reason attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than the minimum valid co-observations for the statistic.
    TooFewObservations { observed: usize, required: usize },
    /// One of the inputs has zero variance over the co-observed rows.
    ZeroVariance,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::TooFewObservations { observed, required } => write!(
                f,
                "{} valid co-observations, at least {} required",
                observed, required
            ),
            SkipReason::ZeroVariance => write!(f, "zero variance over co-observed rows"),
        }
    }
}
