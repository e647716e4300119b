//! Inflation Adjuster
//! Converts nominal amounts into constant dollars of a target year.

use super::aggregator::YearBucketTotals;
use super::price_index::PriceIndex;

/// Target year used when none is configured.
pub const DEFAULT_TARGET_YEAR: i32 = 2024;

/// Restate `amount` (recorded in `year`) in `target_year` dollars.
///
/// Years the index does not cover pass through unchanged, so rows outside
/// the inflation table are kept rather than dropped.
pub fn adjust(amount: f64, year: i32, index: &PriceIndex, target_year: i32) -> f64 {
    amount * index.multiplier(year, target_year)
}

/// Adjust every (year, bucket) total.
pub fn adjust_totals(
    totals: &YearBucketTotals,
    index: &PriceIndex,
    target_year: i32,
) -> YearBucketTotals {
    totals.map_amounts(|year, _, amount| adjust(amount, year, index, target_year))
}

/// Aggregate years whose amounts pass through unadjusted. When the target
/// year itself is missing from the index, that is every year.
pub fn uncovered_years(totals: &YearBucketTotals, index: &PriceIndex, target_year: i32) -> Vec<i32> {
    totals
        .years()
        .into_iter()
        .filter(|&year| !index.contains(year) || !index.contains(target_year))
        .collect()
}
