// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Point queries against a static set of genomic intervals.
//!
//! Each contig gets its own array backed interval tree. Intervals are half-open and 0-based,
//! so a locus at `pos` is looked up as the interval `pos..pos + 1`.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use anyhow::{bail, Result};
use bio::data_structures::interval_tree::ArrayBackedIntervalTree;
use bio_types::genome::{AbstractInterval, AbstractLocus, Position};
use itertools::Itertools;

use crate::errors::Error;

/// Read-only index of intervals supporting point-in-interval queries.
pub struct IntervalIndex<T> {
    contigs: HashMap<String, ArrayBackedIntervalTree<Position, T>>,
    len: usize,
}

impl<T> fmt::Debug for IntervalIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalIndex")
            .field("contigs", &self.contigs.keys().sorted().collect_vec())
            .field("len", &self.len)
            .finish()
    }
}

impl<T: AbstractInterval + Clone> IntervalIndex<T> {
    /// Build the index. Fails on empty or inverted intervals.
    pub fn new<I: IntoIterator<Item = T>>(records: I) -> Result<Self> {
        let mut contigs: HashMap<String, ArrayBackedIntervalTree<Position, T>> = HashMap::new();
        let mut len = 0;
        for record in records {
            let Range { start, end } = record.range();
            if start >= end {
                bail!(Error::InvalidInterval {
                    contig: record.contig().to_owned(),
                    start,
                    end,
                });
            }
            contigs
                .entry(record.contig().to_owned())
                .or_insert_with(ArrayBackedIntervalTree::new)
                .insert(start..end, record);
            len += 1;
        }
        for tree in contigs.values_mut() {
            tree.index();
        }

        Ok(IntervalIndex { contigs, len })
    }

    /// All intervals containing the given locus, ordered by start.
    pub fn overlapping<L: AbstractLocus>(&self, locus: &L) -> Vec<&T> {
        let pos = locus.pos();
        match (self.contigs.get(locus.contig()), pos.checked_add(1)) {
            (Some(tree), Some(next)) => tree
                .find(pos..next)
                .into_iter()
                .sorted_by_key(|entry| (entry.interval().start, entry.interval().end))
                .map(|entry| entry.data())
                .collect_vec(),
            _ => Vec::new(),
        }
    }

    /// The interval with the largest start among those containing the given locus.
    pub fn last_overlapping<L: AbstractLocus>(&self, locus: &L) -> Option<&T> {
        self.overlapping(locus).pop()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bio_types::genome::{Interval, Locus};

    fn locus(contig: &str, pos: Position) -> Locus {
        Locus::new(contig.to_owned(), pos)
    }

    fn index() -> IntervalIndex<Interval> {
        IntervalIndex::new(vec![
            Interval::new("chr1".to_owned(), 500..600),
            Interval::new("chr1".to_owned(), 100..1000),
            Interval::new("chr1".to_owned(), 150..200),
            Interval::new("chr2".to_owned(), 0..50),
        ])
        .unwrap()
    }

    #[test]
    fn test_overlapping() {
        let index = index();
        assert_eq!(index.len(), 4);

        let hits = index.overlapping(&locus("chr1", 550));
        assert_eq!(
            hits.iter().map(|i| i.range()).collect::<Vec<_>>(),
            vec![100..1000, 500..600]
        );
        assert_eq!(index.overlapping(&locus("chr1", 170)).len(), 2);
        assert_eq!(index.overlapping(&locus("chr1", 300)).len(), 1);
    }

    #[test]
    fn test_last_overlapping() {
        let index = index();
        assert_eq!(
            index.last_overlapping(&locus("chr1", 170)).unwrap().range(),
            150..200
        );
        assert_eq!(
            index.last_overlapping(&locus("chr1", 300)).unwrap().range(),
            100..1000
        );
    }

    #[test]
    fn test_half_open() {
        let index = index();
        assert_eq!(index.overlapping(&locus("chr1", 100)).len(), 1);
        assert!(index.overlapping(&locus("chr1", 1000)).is_empty());
        assert!(index.overlapping(&locus("chr1", 99)).is_empty());
        assert_eq!(index.overlapping(&locus("chr2", 49)).len(), 1);
        assert!(index.overlapping(&locus("chr2", 50)).is_empty());
        assert!(index.overlapping(&locus("chr2", Position::MAX)).is_empty());
    }

    #[test]
    fn test_unknown_contig() {
        assert!(index().last_overlapping(&locus("chrX", 10)).is_none());
    }

    #[test]
    fn test_invalid_interval() {
        let err = IntervalIndex::new(vec![Interval::new("chr1".to_owned(), 10..10)]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::InvalidInterval {
                contig: "chr1".to_owned(),
                start: 10,
                end: 10
            })
        );
    }
}
