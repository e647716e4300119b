//! Stats module - aggregation, price index and inflation adjustment

mod adjuster;
mod aggregator;
mod price_index;

pub use adjuster::{adjust_totals, uncovered_years, DEFAULT_TARGET_YEAR};
pub use aggregator::YearBucketTotals;
pub use price_index::{IndexError, PriceIndex, BASE_INDEX_VALUE};
