// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use anyhow::{bail, Result};
use bio_types::genome::{AbstractInterval, AbstractLocus, Interval, Position};

use crate::errors;
use crate::filtration::controller::ThresholdController;
use crate::filtration::phasing::PhasedCallTracker;
use crate::filtration::strategy::FilteringArgs;
use crate::utils::IntervalIndex;

/// Measured contamination of a sample.
#[derive(new, Debug, Clone, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct ContaminationRecord {
    #[get = "pub"]
    sample: String,
    #[get_copy = "pub"]
    contamination: f64,
}

/// Genomic segment annotated with its minor allele fraction.
#[derive(new, Debug, Clone, PartialEq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct MinorAlleleFractionRecord {
    #[get = "pub"]
    interval: Interval,
    #[get_copy = "pub"]
    minor_allele_fraction: f64,
}

impl AbstractInterval for MinorAlleleFractionRecord {
    fn contig(&self) -> &str {
        self.interval.contig()
    }

    fn range(&self) -> Range<Position> {
        self.interval.range()
    }
}

pub type SegmentIndex = IntervalIndex<MinorAlleleFractionRecord>;

fn check_fraction(sample: &str, value: f64) -> Result<f64> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        bail!(errors::Error::InvalidContaminationFraction {
            name: sample.to_owned(),
            value,
        });
    }
    Ok(value)
}

/// Per-run filtering information: arguments, normal samples, contamination of every
/// sample and the minor allele fraction segments of the tumor samples.
#[derive(Debug, Getters)]
#[get = "pub"]
pub struct FilteringContext {
    args: FilteringArgs,
    normal_samples: HashSet<String>,
    contamination_by_sample: HashMap<String, f64>,
    tumor_segments: HashMap<String, SegmentIndex>,
}

impl FilteringContext {
    /// Build the context of a run.
    ///
    /// # Arguments
    ///
    /// * `args` - filtering arguments, including the default contamination
    /// * `normal_samples` - names of the samples declared as normal
    /// * `sample_names` - all samples of the cohort
    /// * `contamination_records` - measured contamination, at most one per cohort sample
    /// * `segmentations` - minor allele fraction segments per sample
    pub fn new<C, S>(
        args: FilteringArgs,
        normal_samples: HashSet<String>,
        sample_names: &[String],
        contamination_records: C,
        segmentations: S,
    ) -> Result<Self>
    where
        C: IntoIterator<Item = ContaminationRecord>,
        S: IntoIterator<Item = (String, Vec<MinorAlleleFractionRecord>)>,
    {
        let cohort: HashSet<&str> = sample_names.iter().map(|name| name.as_str()).collect();

        let mut contamination_by_sample = HashMap::new();
        for record in contamination_records {
            if !cohort.contains(record.sample().as_str()) {
                bail!(errors::Error::InvalidContaminationSampleName {
                    name: record.sample().to_owned(),
                });
            }
            let contamination = check_fraction(record.sample(), record.contamination())?;
            if contamination_by_sample
                .insert(record.sample().to_owned(), contamination)
                .is_some()
            {
                bail!(errors::Error::DuplicateContaminationRecord {
                    name: record.sample().to_owned(),
                });
            }
        }

        for sample in sample_names {
            if contamination_by_sample.contains_key(sample) {
                continue;
            }
            let contamination = match args.contamination_estimate() {
                Some(estimate) => check_fraction(sample, estimate)?,
                None => bail!(errors::Error::MissingContamination {
                    name: sample.to_owned(),
                }),
            };
            debug!(
                "No contamination estimate for sample {}, using default {}.",
                sample, contamination
            );
            contamination_by_sample.insert(sample.to_owned(), contamination);
        }

        let mut tumor_segments = HashMap::new();
        for (sample, records) in segmentations {
            let index = SegmentIndex::new(records)?;
            debug!("Loaded {} segments for sample {}.", index.len(), sample);
            if tumor_segments.insert(sample.clone(), index).is_some() {
                bail!(errors::Error::DuplicateSegmentation { name: sample });
            }
        }

        Ok(FilteringContext {
            args,
            normal_samples,
            contamination_by_sample,
            tumor_segments,
        })
    }

    pub fn is_normal(&self, sample: &str) -> bool {
        self.normal_samples.contains(sample)
    }

    pub fn contamination(&self, sample: &str) -> Option<f64> {
        self.contamination_by_sample.get(sample).cloned()
    }

    pub fn segments(&self, sample: &str) -> Option<&SegmentIndex> {
        self.tumor_segments.get(sample)
    }

    /// Minor allele fraction of the segment of the given sample containing the locus.
    pub fn minor_allele_fraction<L: AbstractLocus>(&self, sample: &str, locus: &L) -> Option<f64> {
        self.segments(sample)?
            .last_overlapping(locus)
            .map(|segment| segment.minor_allele_fraction())
    }

    /// Threshold controller for the configured strategy, starting at the first pass threshold.
    pub fn threshold_controller(&self) -> ThresholdController {
        ThresholdController::new(self.args.strategy())
    }

    /// Empty phasing registry ignoring the normal samples of this run.
    pub fn phased_call_tracker(&self) -> PhasedCallTracker {
        PhasedCallTracker::new(self.normal_samples.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bio_types::genome::Locus;

    fn samples() -> Vec<String> {
        vec!["tumor".to_owned(), "normal".to_owned(), "relapse".to_owned()]
    }

    fn normals() -> HashSet<String> {
        vec!["normal".to_owned()].into_iter().collect()
    }

    fn segment(start: Position, end: Position, maf: f64) -> MinorAlleleFractionRecord {
        MinorAlleleFractionRecord::new(Interval::new("chr1".to_owned(), start..end), maf)
    }

    #[test]
    fn test_contamination_fallback() {
        let args = FilteringArgs::default().with_contamination_estimate(Some(0.02));
        let context = FilteringContext::new(
            args,
            normals(),
            &samples(),
            vec![ContaminationRecord::new("tumor".to_owned(), 0.1)],
            vec![],
        )
        .unwrap();

        assert_eq!(context.contamination("tumor"), Some(0.1));
        assert_eq!(context.contamination("normal"), Some(0.02));
        assert_eq!(context.contamination("relapse"), Some(0.02));
        assert_eq!(context.contamination_by_sample().len(), 3);
        assert!(context.is_normal("normal"));
        assert!(!context.is_normal("tumor"));
    }

    #[test]
    fn test_unknown_contamination_sample() {
        let err = FilteringContext::new(
            FilteringArgs::default(),
            normals(),
            &samples(),
            vec![ContaminationRecord::new("other".to_owned(), 0.1)],
            vec![],
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<errors::Error>(),
            Some(&errors::Error::InvalidContaminationSampleName {
                name: "other".to_owned()
            })
        );
    }

    #[test]
    fn test_duplicate_contamination() {
        let err = FilteringContext::new(
            FilteringArgs::default(),
            normals(),
            &samples(),
            vec![
                ContaminationRecord::new("tumor".to_owned(), 0.1),
                ContaminationRecord::new("tumor".to_owned(), 0.2),
            ],
            vec![],
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<errors::Error>(),
            Some(&errors::Error::DuplicateContaminationRecord {
                name: "tumor".to_owned()
            })
        );
    }

    #[test]
    fn test_missing_contamination() {
        let args = FilteringArgs::default().with_contamination_estimate(None);
        let err = FilteringContext::new(
            args.clone(),
            normals(),
            &samples(),
            vec![ContaminationRecord::new("tumor".to_owned(), 0.1)],
            vec![],
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<errors::Error>(),
            Some(&errors::Error::MissingContamination {
                name: "normal".to_owned()
            })
        );

        // without fallback, every sample needs a measurement
        let records = samples()
            .into_iter()
            .map(|sample| ContaminationRecord::new(sample, 0.0))
            .collect::<Vec<_>>();
        assert!(FilteringContext::new(args, normals(), &samples(), records, vec![]).is_ok());
    }

    #[test]
    fn test_invalid_fraction() {
        assert!(FilteringContext::new(
            FilteringArgs::default(),
            normals(),
            &samples(),
            vec![ContaminationRecord::new("tumor".to_owned(), 1.2)],
            vec![],
        )
        .is_err());
    }

    #[test]
    fn test_segments() {
        let context = FilteringContext::new(
            FilteringArgs::default(),
            normals(),
            &samples(),
            vec![],
            vec![(
                "tumor".to_owned(),
                vec![segment(0, 1000, 0.5), segment(1000, 5000, 0.2)],
            )],
        )
        .unwrap();

        let maf = |pos| context.minor_allele_fraction("tumor", &Locus::new("chr1".to_owned(), pos));
        assert_eq!(maf(999), Some(0.5));
        assert_eq!(maf(1000), Some(0.2));
        assert_eq!(maf(5000), None);
        assert_eq!(
            context.minor_allele_fraction("relapse", &Locus::new("chr1".to_owned(), 10)),
            None
        );
        assert_eq!(context.segments("tumor").unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_segmentation() {
        let err = FilteringContext::new(
            FilteringArgs::default(),
            normals(),
            &samples(),
            vec![],
            vec![
                ("tumor".to_owned(), vec![segment(0, 10, 0.5)]),
                ("tumor".to_owned(), vec![segment(10, 20, 0.5)]),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<errors::Error>(),
            Some(&errors::Error::DuplicateSegmentation {
                name: "tumor".to_owned()
            })
        );
    }
}
