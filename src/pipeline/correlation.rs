//! Pairwise correlation matrix over the attribute set
//!
//! Each unordered attribute pair is estimated independently over the rows
//! where both values are present (pairwise-complete deletion), so one sparse
//! attribute cannot shrink the sample for every other pair. Pairs with fewer
//! than two co-observations or zero variance stay undefined in the matrix
//! rather than failing the run.

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use super::error::{AnalysisError, SkipReason};

/// Default absolute-coefficient threshold for the strong-correlation list.
pub const DEFAULT_STRONG_THRESHOLD: f64 = 0.5;

/// Minimum co-observed rows for a pairwise coefficient to be defined.
pub const MIN_CO_OBSERVATIONS: usize = 2;

/// A single defined pairwise estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairEstimate {
    /// Pearson coefficient in [-1, 1].
    pub coefficient: f64,
    /// Count of valid co-observations the estimate used.
    pub observations: usize,
}

/// One strongly correlated attribute pair, reported exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct StrongCorrelation {
    pub attribute_a: String,
    pub attribute_b: String,
    pub coefficient: f64,
}

/// Symmetric pairwise correlation matrix with per-pair observation counts.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    attributes: Vec<String>,
    // Row-major n*n storage; undefined pairs hold None. Symmetry is
    // maintained at construction, diagonal entries are exactly 1.
    entries: Vec<Option<PairEstimate>>,
}

impl CorrelationMatrix {
    /// The attribute set the matrix was built over, in run order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    fn index_of(&self, attribute: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == attribute)
    }

    /// Look up the estimate for an unordered pair. Returns `None` for
    /// unknown attributes and for undefined entries.
    pub fn get(&self, a: &str, b: &str) -> Option<PairEstimate> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.entries[i * self.attributes.len() + j]
    }

    /// Coefficient for an unordered pair, if defined.
    pub fn coefficient(&self, a: &str, b: &str) -> Option<f64> {
        self.get(a, b).map(|e| e.coefficient)
    }

    /// All pairs with `|coefficient| >= threshold`, self-pairs excluded,
    /// each unordered pair reported once, descending by absolute
    /// coefficient (stable, so ties keep attribute order).
    pub fn strong_correlations(&self, threshold: f64) -> Vec<StrongCorrelation> {
        let n = self.attributes.len();
        let mut pairs = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(est) = self.entries[i * n + j] {
                    if est.coefficient.abs() >= threshold {
                        pairs.push(StrongCorrelation {
                            attribute_a: self.attributes[i].clone(),
                            attribute_b: self.attributes[j].clone(),
                            coefficient: est.coefficient,
                        });
                    }
                }
            }
        }
        pairs.sort_by(|a, b| {
            b.coefficient
                .abs()
                .partial_cmp(&a.coefficient.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        pairs
    }

    /// Nested attribute -> attribute -> coefficient map for serialization.
    /// Undefined entries are omitted.
    pub fn to_nested_map(&self) -> BTreeMap<String, BTreeMap<String, f64>> {
        let n = self.attributes.len();
        let mut outer = BTreeMap::new();
        for i in 0..n {
            let mut inner = BTreeMap::new();
            for j in 0..n {
                if let Some(est) = self.entries[i * n + j] {
                    inner.insert(self.attributes[j].clone(), est.coefficient);
                }
            }
            outer.insert(self.attributes[i].clone(), inner);
        }
        outer
    }
}

/// Build the full pairwise correlation matrix for `attributes`.
///
/// Every attribute must exist in the frame as a numeric column. Pair
/// computations are independent and run in parallel; placement into the
/// matrix afterwards keeps the result deterministic.
pub fn build_correlation_matrix(
    df: &DataFrame,
    attributes: &[String],
) -> Result<CorrelationMatrix, AnalysisError> {
    let columns = collect_float_columns(df, attributes)?;
    let n = attributes.len();

    // Upper-triangle pair indices, estimated in parallel.
    let pair_indices: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let estimates: Vec<((usize, usize), Result<PairEstimate, SkipReason>)> = pair_indices
        .par_iter()
        .map(|&(i, j)| ((i, j), pairwise_pearson(&columns[i], &columns[j])))
        .collect();

    let mut entries: Vec<Option<PairEstimate>> = vec![None; n * n];
    for ((i, j), outcome) in estimates {
        if let Ok(est) = outcome {
            entries[i * n + j] = Some(est);
            entries[j * n + i] = Some(est);
        }
    }

    // Diagonal: exactly 1 whenever the attribute correlates with itself at
    // all (>= 2 observations, nonzero variance), undefined otherwise.
    for (i, column) in columns.iter().enumerate() {
        if let Ok(est) = pairwise_pearson(column, column) {
            entries[i * n + i] = Some(PairEstimate {
                coefficient: 1.0,
                observations: est.observations,
            });
        }
    }

    Ok(CorrelationMatrix {
        attributes: attributes.to_vec(),
        entries,
    })
}

/// Cast the requested attributes to Float64, surfacing missing attributes
/// immediately. The clone of the chunked array is cheap (shared buffers).
pub(crate) fn collect_float_columns(
    df: &DataFrame,
    attributes: &[String],
) -> Result<Vec<Float64Chunked>, AnalysisError> {
    attributes
        .iter()
        .map(|name| {
            let col = df
                .column(name)
                .map_err(|_| AnalysisError::MissingAttribute { name: name.clone() })?;
            Ok(col.cast(&DataType::Float64)?.f64()?.clone())
        })
        .collect()
}

/// Pearson coefficient over co-observed rows using a single-pass Welford
/// update. Rows where either side is missing are skipped; the surviving
/// count is returned with the estimate.
pub(crate) fn pairwise_pearson(
    xs: &Float64Chunked,
    ys: &Float64Chunked,
) -> Result<PairEstimate, SkipReason> {
    let mut n = 0usize;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut m2_x = 0.0;
    let mut m2_y = 0.0;
    let mut c_xy = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n as f64;
            mean_y += dy / n as f64;
            m2_x += dx * (x - mean_x);
            m2_y += dy * (y - mean_y);
            c_xy += dx * (y - mean_y);
        }
    }

    if n < MIN_CO_OBSERVATIONS {
        return Err(SkipReason::TooFewObservations {
            observed: n,
            required: MIN_CO_OBSERVATIONS,
        });
    }

    let std_x = (m2_x / n as f64).sqrt();
    let std_y = (m2_y / n as f64).sqrt();
    if std_x == 0.0 || std_y == 0.0 {
        return Err(SkipReason::ZeroVariance);
    }

    // Population forms cancel; clamp absorbs rounding at the extremes so
    // downstream t statistics never see |r| > 1.
    let coefficient = ((c_xy / n as f64) / (std_x * std_y)).clamp(-1.0, 1.0);
    Ok(PairEstimate {
        coefficient,
        observations: n,
    })
}
