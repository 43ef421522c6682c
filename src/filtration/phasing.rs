// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Registry of filtered phased calls.
//!
//! For each phase set, the position and the phased genotypes of the last recorded
//! variant are kept, so that later calls of the same phase set can be checked for
//! consistent filtering.

use std::collections::{HashMap, HashSet};

use bio_types::genome::Position;
use itertools::Itertools;

/// Genotype attribute holding the phase set identifier.
pub const PHASING_ID_KEY: &str = "PID";
/// Genotype attribute holding the phased genotype.
pub const PHASING_GT_KEY: &str = "PGT";

/// Genotype call of a single sample with its extended attributes.
#[derive(new, Debug, Clone, PartialEq, Getters)]
#[get = "pub"]
pub struct Genotype {
    sample_name: String,
    #[new(default)]
    attributes: HashMap<String, String>,
}

impl Genotype {
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Genotype carrying the given phase set id and phased genotype.
    pub fn phased(sample_name: &str, phase_set_id: &str, phased_genotype: &str) -> Self {
        Genotype::new(sample_name.to_owned())
            .with_attribute(PHASING_ID_KEY, phase_set_id)
            .with_attribute(PHASING_GT_KEY, phased_genotype)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|value| value.as_str())
    }

    pub fn phase_set_id(&self) -> Option<&str> {
        self.attribute(PHASING_ID_KEY)
    }

    pub fn phased_genotype(&self) -> Option<&str> {
        self.attribute(PHASING_GT_KEY)
    }

    /// Both a phase set id and a phased genotype are present.
    pub fn has_phase_info(&self) -> bool {
        self.phase_set_id().is_some() && self.phased_genotype().is_some()
    }
}

/// A variant with its per-sample genotype calls.
#[derive(new, Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct VariantCall {
    #[get = "pub"]
    contig: String,
    #[get_copy = "pub"]
    start: Position,
    #[get = "pub"]
    genotypes: Vec<Genotype>,
}

/// Last recorded variant of a phase set.
#[derive(new, Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct PhaseRecord {
    #[get_copy = "pub"]
    position: Position,
    #[get = "pub"]
    phased_genotypes: HashSet<String>,
}

#[derive(Debug, Clone, Default, Getters)]
pub struct PhasedCallTracker {
    #[get = "pub"]
    normal_samples: HashSet<String>,
    #[get = "pub"]
    filtered_phased_calls: HashMap<String, PhaseRecord>,
}

impl PhasedCallTracker {
    pub fn new(normal_samples: HashSet<String>) -> Self {
        PhasedCallTracker {
            normal_samples,
            filtered_phased_calls: HashMap::new(),
        }
    }

    /// Record the phased genotypes of the non-normal samples of the given variant.
    /// The record of each touched phase set is replaced, not merged.
    pub fn record_filtered_haplotypes(&mut self, variant: &VariantCall) {
        let phased_genotypes_by_phase_set = variant
            .genotypes()
            .iter()
            .filter(|genotype| !self.normal_samples.contains(genotype.sample_name()))
            .filter_map(|genotype| match (genotype.phase_set_id(), genotype.phased_genotype()) {
                (Some(phase_set_id), Some(phased_genotype)) => {
                    Some((phase_set_id.to_owned(), phased_genotype.to_owned()))
                }
                _ => None,
            })
            .into_group_map();

        for (phase_set_id, phased_genotypes) in phased_genotypes_by_phase_set {
            self.filtered_phased_calls.insert(
                phase_set_id,
                PhaseRecord::new(variant.start(), phased_genotypes.into_iter().collect()),
            );
        }
    }

    pub fn get(&self, phase_set_id: &str) -> Option<&PhaseRecord> {
        self.filtered_phased_calls.get(phase_set_id)
    }
}
