// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Selector for the thresholding strategy, as named in filtering configurations.
#[derive(
    Display,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdStrategyKind {
    Constant,
    FalseDiscoveryRate,
    OptimalFScore,
}

impl Default for ThresholdStrategyKind {
    fn default() -> Self {
        ThresholdStrategyKind::OptimalFScore
    }
}

/// Thresholding strategy together with its parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdStrategy {
    /// Use the given posterior threshold verbatim.
    Constant { posterior_threshold: f64 },
    /// Bound the expected false positive rate among passing calls.
    FalseDiscoveryRate { max_false_positive_rate: f64 },
    /// Maximize the expected F-score with the given beta.
    OptimalFScore { beta: f64 },
}

impl ThresholdStrategy {
    pub fn kind(&self) -> ThresholdStrategyKind {
        match self {
            ThresholdStrategy::Constant { .. } => ThresholdStrategyKind::Constant,
            ThresholdStrategy::FalseDiscoveryRate { .. } => {
                ThresholdStrategyKind::FalseDiscoveryRate
            }
            ThresholdStrategy::OptimalFScore { .. } => ThresholdStrategyKind::OptimalFScore,
        }
    }
}

fn default_posterior_threshold() -> f64 {
    0.1
}

fn default_max_false_positive_rate() -> f64 {
    0.05
}

fn default_f_score_beta() -> f64 {
    1.0
}

fn default_contamination_estimate() -> Option<f64> {
    Some(0.0)
}

/// Arguments controlling the filtering of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, CopyGetters)]
#[serde(rename_all = "kebab-case")]
pub struct FilteringArgs {
    #[serde(default)]
    #[get_copy = "pub"]
    threshold_strategy: ThresholdStrategyKind,
    /// threshold for the constant strategy
    #[serde(default = "default_posterior_threshold")]
    #[get_copy = "pub"]
    posterior_threshold: f64,
    /// bound for the false discovery rate strategy
    #[serde(default = "default_max_false_positive_rate")]
    #[get_copy = "pub"]
    max_false_positive_rate: f64,
    /// relative weight of recall to precision for the F-score strategy
    #[serde(default = "default_f_score_beta")]
    #[get_copy = "pub"]
    f_score_beta: f64,
    /// contamination of samples without an own estimate
    #[serde(default = "default_contamination_estimate")]
    #[get_copy = "pub"]
    contamination_estimate: Option<f64>,
}

impl Default for FilteringArgs {
    fn default() -> Self {
        FilteringArgs {
            threshold_strategy: ThresholdStrategyKind::default(),
            posterior_threshold: default_posterior_threshold(),
            max_false_positive_rate: default_max_false_positive_rate(),
            f_score_beta: default_f_score_beta(),
            contamination_estimate: default_contamination_estimate(),
        }
    }
}

impl FilteringArgs {
    pub fn with_strategy(mut self, strategy: ThresholdStrategy) -> Self {
        self.threshold_strategy = strategy.kind();
        match strategy {
            ThresholdStrategy::Constant {
                posterior_threshold,
            } => self.posterior_threshold = posterior_threshold,
            ThresholdStrategy::FalseDiscoveryRate {
                max_false_positive_rate,
            } => self.max_false_positive_rate = max_false_positive_rate,
            ThresholdStrategy::OptimalFScore { beta } => self.f_score_beta = beta,
        }
        self
    }

    pub fn with_contamination_estimate(mut self, contamination_estimate: Option<f64>) -> Self {
        self.contamination_estimate = contamination_estimate;
        self
    }

    /// The configured strategy with its parameter.
    pub fn strategy(&self) -> ThresholdStrategy {
        match self.threshold_strategy {
            ThresholdStrategyKind::Constant => ThresholdStrategy::Constant {
                posterior_threshold: self.posterior_threshold,
            },
            ThresholdStrategyKind::FalseDiscoveryRate => ThresholdStrategy::FalseDiscoveryRate {
                max_false_positive_rate: self.max_false_positive_rate,
            },
            ThresholdStrategyKind::OptimalFScore => ThresholdStrategy::OptimalFScore {
                beta: self.f_score_beta,
            },
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("unable to read filtering arguments from {}", path.display()))?;
        Self::from_yaml(&yaml)
    }
}
