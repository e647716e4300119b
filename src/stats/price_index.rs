//! Price Index Builder
//! Compounds annual inflation rates into a chained index anchored at 100.

use crate::data::InflationObservation;
use std::collections::BTreeMap;
use thiserror::Error;

/// Index value assigned to the earliest observed year.
pub const BASE_INDEX_VALUE: f64 = 100.0;

#[derive(Error, Debug, PartialEq)]
pub enum IndexError {
    #[error("Inflation table has no usable rows")]
    Empty,
    #[error("Inflation table lists year {0} more than once")]
    DuplicateYear(i32),
    #[error("Inflation table is not sorted: year {year} follows {previous}")]
    Unsorted { previous: i32, year: i32 },
}

/// Year → cumulative index lookup. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceIndex {
    values: BTreeMap<i32, f64>,
}

impl PriceIndex {
    /// Build the index from observations sorted ascending by year.
    ///
    /// The first year is pinned to [`BASE_INDEX_VALUE`] regardless of its own
    /// rate. Every later year is `previous * (1 + rate / 100)`. A NaN rate
    /// yields a NaN index for that year and every year after it.
    ///
    /// The input is not re-sorted; out-of-order and repeated years are errors.
    pub fn build(observations: &[InflationObservation]) -> Result<Self, IndexError> {
        let mut values = BTreeMap::new();
        let mut previous: Option<(i32, f64)> = None;

        for obs in observations {
            let value = match previous {
                None => BASE_INDEX_VALUE,
                Some((prev_year, _)) if obs.year == prev_year => {
                    return Err(IndexError::DuplicateYear(obs.year));
                }
                Some((prev_year, _)) if obs.year < prev_year => {
                    return Err(IndexError::Unsorted {
                        previous: prev_year,
                        year: obs.year,
                    });
                }
                Some((_, prev_index)) => prev_index * (1.0 + obs.rate_percent / 100.0),
            };

            values.insert(obs.year, value);
            previous = Some((obs.year, value));
        }

        if values.is_empty() {
            return Err(IndexError::Empty);
        }

        Ok(Self { values })
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        self.values.get(&year).copied()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.values.contains_key(&year)
    }

    /// `index[target] / index[year]`, or exactly 1 when either year is not covered.
    pub fn multiplier(&self, year: i32, target_year: i32) -> f64 {
        match (self.get(year), self.get(target_year)) {
            (Some(from), Some(to)) => to / from,
            _ => 1.0,
        }
    }

    /// (year, index) pairs, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values.iter().map(|(&year, &value)| (year, value))
    }

    pub fn first_year(&self) -> Option<i32> {
        self.values.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(year: i32, rate_percent: f64) -> InflationObservation {
        InflationObservation { year, rate_percent }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_compounding() {
        let index = PriceIndex::build(&[obs(2000, 0.0), obs(2001, 10.0), obs(2002, -10.0)]).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(2000), Some(100.0));
        assert!(approx(index.get(2001).unwrap(), 110.0));
        assert!(approx(index.get(2002).unwrap(), 99.0));
        assert_eq!(index.first_year(), Some(2000));
    }

    #[test]
    fn test_first_year_ignores_its_rate() {
        let index = PriceIndex::build(&[obs(1990, 42.0), obs(1991, 5.0)]).unwrap();
        assert_eq!(index.get(1990), Some(BASE_INDEX_VALUE));
        assert!(approx(index.get(1991).unwrap(), 105.0));

        let single = PriceIndex::build(&[obs(2010, f64::NAN)]).unwrap();
        assert_eq!(single.get(2010), Some(100.0));
    }

    #[test]
    fn test_gaps_between_years_are_allowed() {
        let index = PriceIndex::build(&[obs(2000, 0.0), obs(2005, 20.0)]).unwrap();
        assert!(approx(index.get(2005).unwrap(), 120.0));
        assert!(!index.contains(2003));
    }

    #[test]
    fn test_nan_rate_propagates() {
        let index =
            PriceIndex::build(&[obs(2000, 0.0), obs(2001, f64::NAN), obs(2002, 3.0)]).unwrap();
        assert_eq!(index.get(2000), Some(100.0));
        assert!(index.get(2001).unwrap().is_nan());
        assert!(index.get(2002).unwrap().is_nan());
    }

    #[test]
    fn test_invalid_input_is_flagged() {
        assert_eq!(PriceIndex::build(&[]), Err(IndexError::Empty));
        assert_eq!(
            PriceIndex::build(&[obs(2000, 1.0), obs(2000, 2.0)]),
            Err(IndexError::DuplicateYear(2000))
        );
        assert_eq!(
            PriceIndex::build(&[obs(2001, 1.0), obs(2000, 2.0)]),
            Err(IndexError::Unsorted { previous: 2001, year: 2000 })
        );
    }

    #[test]
    fn test_multiplier() {
        let index = PriceIndex::build(&[obs(2000, 0.0), obs(2001, 10.0), obs(2002, -10.0)]).unwrap();
        assert!(approx(index.multiplier(2000, 2002), 0.99));
        assert!(approx(index.multiplier(2002, 2001), 110.0 / 99.0));
        assert_eq!(index.multiplier(2001, 2001), 1.0);
        assert_eq!(index.multiplier(1990, 2002), 1.0);
        assert_eq!(index.multiplier(2000, 2024), 1.0);
    }
}
