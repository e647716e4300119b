//! Data module - CSV loading, cleaning and bucketing

mod bucket;
mod loader;
mod processor;

pub use bucket::Bucket;
pub use loader::{DataLoader, InflationObservation, InflationTable, LoaderError};
pub use processor::{ClassifiedAward, DataProcessor, DropCounts};
