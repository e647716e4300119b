//! Year/Bucket Aggregator
//! Sums award amounts per (year, bucket) and rolls them up per year.

use crate::data::{Bucket, ClassifiedAward};
use std::collections::{BTreeMap, BTreeSet};

/// Sparse totals keyed by (year, bucket). Keys with no contributing award
/// are absent rather than zero. Iteration is year ascending, then bucket
/// in canonical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearBucketTotals {
    totals: BTreeMap<(i32, Bucket), f64>,
}

impl YearBucketTotals {
    /// Group awards by (year, bucket) and sum their amounts.
    pub fn aggregate<'a>(awards: impl IntoIterator<Item = &'a ClassifiedAward>) -> Self {
        let mut totals = BTreeMap::new();
        for award in awards {
            *totals.entry((award.year, award.bucket)).or_insert(0.0) += award.amount;
        }
        Self { totals }
    }

    pub fn get(&self, year: i32, bucket: Bucket) -> Option<f64> {
        self.totals.get(&(year, bucket)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, Bucket, f64)> + '_ {
        self.totals
            .iter()
            .map(|(&(year, bucket), &amount)| (year, bucket, amount))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.totals.keys().map(|&(year, _)| year).collect();
        years.into_iter().collect()
    }

    /// Buckets that have at least one total, in canonical order.
    pub fn buckets(&self) -> Vec<Bucket> {
        let buckets: BTreeSet<Bucket> = self.totals.keys().map(|&(_, bucket)| bucket).collect();
        buckets.into_iter().collect()
    }

    /// Sum across buckets for each year.
    pub fn totals_by_year(&self) -> BTreeMap<i32, f64> {
        let mut by_year = BTreeMap::new();
        for (year, _, amount) in self.iter() {
            *by_year.entry(year).or_insert(0.0) += amount;
        }
        by_year
    }

    /// New table with every amount transformed; keys are unchanged.
    pub fn map_amounts(&self, mut f: impl FnMut(i32, Bucket, f64) -> f64) -> Self {
        let totals = self
            .iter()
            .map(|(year, bucket, amount)| ((year, bucket), f(year, bucket, amount)))
            .collect();
        Self { totals }
    }
}
