// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use bio_types::genome::Position;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("requested false positive rate must be non-negative, found {value}")]
    InvalidFalsePositiveRate { value: f64 },
    #[error("requested F-score beta must be non-negative, found {value}")]
    InvalidFScoreBeta { value: f64 },
    #[error("constant posterior threshold must be within [0, 1], found {value}")]
    InvalidPosteriorThreshold { value: f64 },
    #[error("invalid posterior probability {value}, must be within [0, 1]")]
    InvalidPosterior { value: f64 },
    #[error("contamination refers to unknown sample {name}; it is not part of the cohort")]
    InvalidContaminationSampleName { name: String },
    #[error("more than one contamination record given for sample {name}")]
    DuplicateContaminationRecord { name: String },
    #[error("invalid contamination fraction {value} for sample {name}, must be within [0, 1]")]
    InvalidContaminationFraction { name: String, value: f64 },
    #[error("no contamination estimate for sample {name} and no default contamination configured")]
    MissingContamination { name: String },
    #[error("more than one segmentation given for sample {name}")]
    DuplicateSegmentation { name: String },
    #[error("invalid interval {contig}:{start}-{end}; start has to be smaller than end")]
    InvalidInterval {
        contig: String,
        start: Position,
        end: Position,
    },
}
