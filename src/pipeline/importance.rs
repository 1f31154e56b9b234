//! Feature importance via a seeded random-forest regressor
//!
//! Complete-case rows (no missing value in any predictor or the target) are
//! fed to an ensemble of variance-reduction regression trees with bootstrap
//! sampling and per-node random feature subsets. Importance is the total
//! squared-error reduction attributed to each predictor across the forest,
//! normalized to sum to 1.
//!
//! Determinism contract: every tree derives its RNG from the run seed plus
//! the tree index, and per-tree importance vectors are summed in index
//! order, so repeated runs with the same seed are bit-identical.

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use super::attributes::FeatureGroups;
use super::correlation::collect_float_columns;
use super::error::AnalysisError;

/// Hard floor on complete rows regardless of predictor count.
pub const MIN_COMPLETE_ROWS: usize = 10;

/// Forest shape and seeding. The defaults fit catalog-sized frames; the
/// seed is part of the run configuration so reports are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct ForestConfig {
    pub trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: 8,
            min_samples_split: 4,
            seed: 42,
        }
    }
}

/// Normalized importance weight for one predictor.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeImportance {
    pub attribute: String,
    pub score: f64,
}

/// Aggregate importance for one named feature group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupImportance {
    pub group: String,
    pub score: f64,
}

/// Ranked importance output: per-attribute scores descending, group
/// aggregates descending, and the complete-case sample size used.
#[derive(Debug, Clone, Serialize)]
pub struct ImportanceReport {
    pub scores: Vec<AttributeImportance>,
    pub groups: Vec<GroupImportance>,
    pub complete_rows: usize,
}

/// Rank predictors of `target` by random-forest importance.
///
/// Fails with `InsufficientData` when fewer than
/// `max(predictors + 1, MIN_COMPLETE_ROWS)` complete rows survive; partial
/// fits are never reported.
pub fn rank_feature_importance(
    df: &DataFrame,
    attributes: &[String],
    target: &str,
    groups: &FeatureGroups,
    config: &ForestConfig,
) -> Result<ImportanceReport, AnalysisError> {
    let predictors: Vec<String> = attributes
        .iter()
        .filter(|a| a.as_str() != target)
        .cloned()
        .collect();
    if predictors.is_empty() {
        return Err(AnalysisError::InsufficientData {
            component: "feature importance",
            observed: 0,
            required: 1,
        });
    }

    let mut wanted = predictors.clone();
    wanted.push(target.to_string());
    let columns = collect_float_columns(df, &wanted)?;

    let (rows, responses) = complete_cases(&columns);
    let required = (predictors.len() + 1).max(MIN_COMPLETE_ROWS);
    if rows.len() < required {
        return Err(AnalysisError::InsufficientData {
            component: "feature importance",
            observed: rows.len(),
            required,
        });
    }

    let raw = fit_forest_importance(&rows, &responses, predictors.len(), config);
    let normalized = normalize(&raw);

    let mut scores: Vec<AttributeImportance> = predictors
        .iter()
        .zip(normalized.iter())
        .map(|(attribute, &score)| AttributeImportance {
            attribute: attribute.clone(),
            score,
        })
        .collect();
    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let groups = aggregate_groups(&scores, groups);

    Ok(ImportanceReport {
        scores,
        groups,
        complete_rows: rows.len(),
    })
}

/// Sum member scores for every group; members absent from the predictor set
/// contribute nothing. Groups are ranked descending by aggregate.
pub fn aggregate_groups(
    scores: &[AttributeImportance],
    groups: &FeatureGroups,
) -> Vec<GroupImportance> {
    let mut aggregates: Vec<GroupImportance> = groups
        .iter()
        .map(|(name, members)| {
            let score = scores
                .iter()
                .filter(|s| members.contains(&s.attribute))
                .map(|s| s.score)
                .sum();
            GroupImportance {
                group: name.clone(),
                score,
            }
        })
        .collect();
    aggregates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    aggregates
}

/// Extract rows where every predictor and the response are present. The
/// last column of `columns` is the response.
fn complete_cases(columns: &[Float64Chunked]) -> (Vec<Vec<f64>>, Vec<f64>) {
    let height = columns.first().map(|c| c.len()).unwrap_or(0);
    let mut rows = Vec::new();
    let mut responses = Vec::new();

    'rows: for idx in 0..height {
        let mut row = Vec::with_capacity(columns.len() - 1);
        for (c, column) in columns.iter().enumerate() {
            match column.get(idx) {
                Some(value) => {
                    if c < columns.len() - 1 {
                        row.push(value);
                    } else {
                        responses.push(value);
                    }
                }
                None => continue 'rows,
            }
        }
        rows.push(row);
    }
    (rows, responses)
}

/// Normalize raw gains to sum to 1; a forest with no informative split
/// falls back to uniform weights so the sum-to-1 contract holds.
fn normalize(raw: &[f64]) -> Vec<f64> {
    let total: f64 = raw.iter().sum();
    if total > 0.0 {
        raw.iter().map(|g| g / total).collect()
    } else {
        vec![1.0 / raw.len() as f64; raw.len()]
    }
}

/// Fit the forest and return per-predictor total split gain.
///
/// Trees are grown in parallel but their contributions are collected into
/// an index-ordered vector and summed sequentially.
fn fit_forest_importance(
    rows: &[Vec<f64>],
    responses: &[f64],
    predictors: usize,
    config: &ForestConfig,
) -> Vec<f64> {
    let per_tree: Vec<Vec<f64>> = (0..config.trees)
        .into_par_iter()
        .map(|tree_idx| {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(tree_idx as u64));
            let sample: Vec<usize> = (0..rows.len())
                .map(|_| rng.gen_range(0..rows.len()))
                .collect();
            let mut gains = vec![0.0; predictors];
            grow_tree(rows, responses, &sample, 0, config, &mut rng, &mut gains);
            gains
        })
        .collect();

    let mut totals = vec![0.0; predictors];
    for gains in per_tree {
        for (total, gain) in totals.iter_mut().zip(gains.iter()) {
            *total += gain;
        }
    }
    totals
}

/// Best split found for a node: feature index, threshold, achieved gain,
/// and the partitioned sample index sets.
#[allow(dead_code)] // threshold is kept for debugging/inspection
struct NodeSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Recursively grow one tree over `sample` (indices into `rows`),
/// accumulating split gains into `gains`. The tree structure itself is not
/// retained; only the importance contributions matter to the caller.
fn grow_tree(
    rows: &[Vec<f64>],
    responses: &[f64],
    sample: &[usize],
    depth: usize,
    config: &ForestConfig,
    rng: &mut StdRng,
    gains: &mut [f64],
) {
    if depth >= config.max_depth || sample.len() < config.min_samples_split {
        return;
    }
    if node_sse(responses, sample) <= 1e-12 {
        return;
    }

    let predictors = gains.len();
    // Regression-forest convention: roughly a third of the predictors are
    // candidates at each node.
    let mtry = (predictors / 3).max(1);
    let mut candidates: Vec<usize> = (0..predictors).collect();
    candidates.shuffle(rng);
    candidates.truncate(mtry);

    let mut best: Option<NodeSplit> = None;
    for &feature in &candidates {
        if let Some(split) = best_split_for_feature(rows, responses, sample, feature) {
            let better = match &best {
                Some(current) => split.gain > current.gain,
                None => true,
            };
            if better {
                best = Some(split);
            }
        }
    }

    if let Some(split) = best {
        gains[split.feature] += split.gain;
        grow_tree(rows, responses, &split.left, depth + 1, config, rng, gains);
        grow_tree(rows, responses, &split.right, depth + 1, config, rng, gains);
    }
}

/// Sum of squared deviations from the node mean.
fn node_sse(responses: &[f64], sample: &[usize]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    let mean = sample.iter().map(|&i| responses[i]).sum::<f64>() / sample.len() as f64;
    sample
        .iter()
        .map(|&i| {
            let d = responses[i] - mean;
            d * d
        })
        .sum()
}

/// Scan the sorted sample for the split of `feature` that maximizes SSE
/// reduction, requiring at least one sample on each side and distinct
/// values across the boundary.
fn best_split_for_feature(
    rows: &[Vec<f64>],
    responses: &[f64],
    sample: &[usize],
    feature: usize,
) -> Option<NodeSplit> {
    let mut order: Vec<usize> = sample.to_vec();
    order.sort_by(|&a, &b| {
        rows[a][feature]
            .partial_cmp(&rows[b][feature])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let n = order.len();
    let total_sum: f64 = order.iter().map(|&i| responses[i]).sum();
    let total_sq: f64 = order.iter().map(|&i| responses[i] * responses[i]).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;

    let mut left_sum = 0.0;
    let mut left_sq = 0.0;
    let mut best: Option<(usize, f64)> = None;

    for split_at in 1..n {
        let y = responses[order[split_at - 1]];
        left_sum += y;
        left_sq += y * y;

        let left_val = rows[order[split_at - 1]][feature];
        let right_val = rows[order[split_at]][feature];
        if (right_val - left_val).abs() < 1e-12 {
            continue;
        }

        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;
        let left_n = split_at as f64;
        let right_n = (n - split_at) as f64;
        let child_sse =
            (left_sq - left_sum * left_sum / left_n) + (right_sq - right_sum * right_sum / right_n);
        let gain = parent_sse - child_sse;

        if gain > best.map(|(_, g)| g).unwrap_or(0.0) {
            best = Some((split_at, gain));
        }
    }

    best.map(|(split_at, gain)| {
        let threshold =
            (rows[order[split_at - 1]][feature] + rows[order[split_at]][feature]) / 2.0;
        NodeSplit {
            feature,
            threshold,
            gain,
            left: order[..split_at].to_vec(),
            right: order[split_at..].to_vec(),
        }
    })
}
