// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Threshold selection and per-sample filtering state for somatic variant filtration.
//!
//! Upstream models assign each candidate call a posterior probability of being an
//! artifact. This crate turns the posteriors of a filtering pass into a single
//! threshold (bounded false discovery rate or optimal F-score), and keeps the
//! per-sample context (contamination, minor allele fraction segments) and the
//! registry of filtered phased calls needed to apply that threshold consistently.

#[macro_use]
extern crate log;
#[macro_use]
extern crate approx;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate derive_new;
#[macro_use]
extern crate getset;
#[macro_use]
extern crate strum_macros;

pub mod errors;
pub mod filtration;
pub mod utils;

pub use crate::filtration::context::{ContaminationRecord, FilteringContext, MinorAlleleFractionRecord};
pub use crate::filtration::controller::{ThresholdController, FIRST_PASS_THRESHOLD};
pub use crate::filtration::phasing::{Genotype, PhaseRecord, PhasedCallTracker, VariantCall};
pub use crate::filtration::strategy::{FilteringArgs, ThresholdStrategy, ThresholdStrategyKind};
pub use crate::filtration::threshold::{
    threshold_by_false_discovery_rate, threshold_by_optimal_f_score,
};
