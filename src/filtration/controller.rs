// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{bail, Result};

use crate::errors;
use crate::filtration::strategy::ThresholdStrategy;
use crate::filtration::threshold::{
    threshold_by_false_discovery_rate, threshold_by_optimal_f_score,
};

/// Threshold in effect before the first filtering pass.
pub const FIRST_PASS_THRESHOLD: f64 = 0.5;

/// Owner of the artifact probability threshold of a run.
///
/// The threshold is replaced once per filtering pass via `recompute`, calls are then
/// judged against it with `is_filtered`.
#[derive(Debug, Clone, CopyGetters)]
pub struct ThresholdController {
    #[get_copy = "pub"]
    strategy: ThresholdStrategy,
    #[get_copy = "pub"]
    threshold: f64,
}

impl ThresholdController {
    pub fn new(strategy: ThresholdStrategy) -> Self {
        ThresholdController {
            strategy,
            threshold: FIRST_PASS_THRESHOLD,
        }
    }

    /// Compute the threshold for the given posteriors of a pass and store it.
    /// If this fails, the previous threshold stays in effect.
    pub fn recompute(&mut self, posteriors: &[f64]) -> Result<f64> {
        let warn_empty = || {
            if posteriors.is_empty() {
                warn!("No posteriors given for filtering pass, using boundary threshold.");
            }
        };
        let threshold = match self.strategy {
            ThresholdStrategy::Constant {
                posterior_threshold,
            } => {
                if posterior_threshold.is_nan() || !(0.0..=1.0).contains(&posterior_threshold) {
                    bail!(errors::Error::InvalidPosteriorThreshold {
                        value: posterior_threshold
                    });
                }
                posterior_threshold
            }
            ThresholdStrategy::FalseDiscoveryRate {
                max_false_positive_rate,
            } => {
                warn_empty();
                threshold_by_false_discovery_rate(posteriors, max_false_positive_rate)?
            }
            ThresholdStrategy::OptimalFScore { beta } => {
                warn_empty();
                threshold_by_optimal_f_score(posteriors, beta)?
            }
        };
        info!(
            "Artifact probability threshold ({}, {} calls): {}",
            self.strategy.kind(),
            posteriors.len(),
            threshold
        );

        self.threshold = threshold;
        Ok(threshold)
    }

    /// Whether a call with the given posterior artifact probability fails filtering.
    pub fn is_filtered(&self, posterior: f64) -> bool {
        posterior > self.threshold
    }
}
