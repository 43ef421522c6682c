// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Threshold calculation from posterior artifact probabilities.
//!
//! Each posterior is treated as the expected false positive contribution of its call,
//! and one minus the posterior as its expected true positive contribution.
//! Calls with a posterior strictly above the returned threshold are filtered.

use anyhow::{bail, Result};
use itertools::Itertools;
use ordered_float::NotNan;

use crate::errors;

pub(crate) const THRESHOLD_FILTER_NONE: f64 = 1.0;
pub(crate) const THRESHOLD_FILTER_ALL: f64 = 0.0;

/// Validate the given posteriors and return them in ascending order.
/// The caller's slice is left untouched.
pub(crate) fn sorted_posteriors(posteriors: &[f64]) -> Result<Vec<NotNan<f64>>> {
    posteriors
        .iter()
        .map(|&p| match NotNan::new(p) {
            Ok(p) if *p >= 0.0 && *p <= 1.0 => Ok(p),
            _ => Err(anyhow::Error::from(errors::Error::InvalidPosterior {
                value: p,
            })),
        })
        .collect::<Result<Vec<_>>>()
        .map(|posteriors| posteriors.into_iter().sorted().collect_vec())
}

/// Compute the threshold that keeps the expected false positive rate among the
/// passing calls at or below `max_false_positive_rate`.
///
/// # Arguments
///
/// * `posteriors` - posterior artifact probabilities of all calls in the pass
/// * `max_false_positive_rate` - tolerated expected fraction of false positives among passing calls
///
/// # Returns
///
/// `1.0` if no call has to be filtered (including an empty pass), `0.0` if already the
/// smallest posterior exceeds the tolerated rate, otherwise the largest posterior that
/// may still pass.
pub fn threshold_by_false_discovery_rate(
    posteriors: &[f64],
    max_false_positive_rate: f64,
) -> Result<f64> {
    if max_false_positive_rate.is_nan() || max_false_positive_rate < 0.0 {
        bail!(errors::Error::InvalidFalsePositiveRate {
            value: max_false_positive_rate
        });
    }
    let posteriors = sorted_posteriors(posteriors)?;

    let mut cumulative_expected_fps = 0.0;
    for (i, posterior) in posteriors.iter().enumerate() {
        // the expected FPR of the first i + 1 calls is monotonically increasing in i
        let expected_fpr = (cumulative_expected_fps + **posterior) / (i + 1) as f64;
        if expected_fpr > max_false_positive_rate
            && !relative_eq!(expected_fpr, max_false_positive_rate, epsilon = 0.0)
        {
            return Ok(if i > 0 {
                *posteriors[i - 1]
            } else {
                THRESHOLD_FILTER_ALL
            });
        }
        cumulative_expected_fps += **posterior;
    }

    Ok(THRESHOLD_FILTER_NONE)
}

/// Compute the threshold that maximizes the expected F-score
/// `(1 + β²)·TP / ((1 + β²)·TP + β²·FN + FP)`.
/// The score is evaluated as `TP / (TP + w·FN + (1 - w)·FP)` with `w = β² / (1 + β²)`,
/// which stays finite for any finite beta.
///
/// Starting from filtering everything, calls are admitted in order of increasing
/// posterior. Among equally good prefixes, the longest one wins.
///
/// # Arguments
///
/// * `posteriors` - posterior artifact probabilities of all calls in the pass
/// * `beta` - relative weight of recall to precision
pub fn threshold_by_optimal_f_score(posteriors: &[f64], beta: f64) -> Result<f64> {
    if !beta.is_finite() || beta < 0.0 {
        bail!(errors::Error::InvalidFScoreBeta { value: beta });
    }
    let posteriors = sorted_posteriors(posteriors)?;

    // w and 1 - w, each computed without cancellation
    let (recall_weight, precision_weight) = if beta > 1.0 {
        let inv_beta_squared = (1.0 / beta).powi(2);
        (
            1.0 / (1.0 + inv_beta_squared),
            inv_beta_squared / (1.0 + inv_beta_squared),
        )
    } else {
        let beta_squared = beta * beta;
        (
            beta_squared / (1.0 + beta_squared),
            1.0 / (1.0 + beta_squared),
        )
    };
    let expected_true_positives: f64 = posteriors.iter().map(|p| 1.0 - **p).sum();

    let mut true_positives = 0.0;
    let mut false_positives = 0.0;
    // last index of the optimal prefix, None means filter everything
    let mut optimal_index = None;
    // excluding everything gives a recall of zero
    let mut optimal_f_score = 0.0;

    for (n, posterior) in posteriors.iter().enumerate() {
        true_positives += 1.0 - **posterior;
        false_positives += **posterior;
        let false_negatives = expected_true_positives - true_positives;

        // without expected true positives the score is zero, even if the weighted
        // denominator underflows
        let f_score = if true_positives > 0.0 {
            true_positives
                / (true_positives
                    + recall_weight * false_negatives
                    + precision_weight * false_positives)
        } else {
            0.0
        };
        if f_score >= optimal_f_score {
            optimal_f_score = f_score;
            optimal_index = Some(n);
        }
    }

    Ok(match optimal_index {
        None => THRESHOLD_FILTER_ALL,
        Some(k) if k == posteriors.len() - 1 => THRESHOLD_FILTER_NONE,
        Some(k) => *posteriors[k],
    })
}
