//! Data Processor Module
//! Resolves award years, drops unusable rows and classifies the rest into buckets.

use super::bucket::Bucket;
use super::loader::AwardRecord;
use chrono::Datelike;
use serde::Serialize;

/// An award that survived cleaning: year resolved, amount numeric, bucket assigned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedAward {
    pub year: i32,
    pub bucket: Bucket,
    pub amount: f64,
}

/// Rows excluded from aggregation, by reason. A row missing both a date and
/// an amount is counted once, under `missing_date`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DropCounts {
    pub missing_date: usize,
    pub missing_amount: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.missing_date + self.missing_amount
    }
}

/// Output of the cleaning pass.
#[derive(Debug, Clone, Default)]
pub struct ProcessedAwards {
    pub awards: Vec<ClassifiedAward>,
    pub dropped: DropCounts,
}

/// Handles record cleaning and classification.
pub struct DataProcessor;

impl DataProcessor {
    /// Clean and classify raw award records. Rows without a resolvable year or
    /// with a missing/NaN amount are excluded and counted, never raised.
    pub fn classify_records(records: &[AwardRecord]) -> ProcessedAwards {
        let mut processed = ProcessedAwards::default();

        for record in records {
            let Some(date) = record.award_date else {
                processed.dropped.missing_date += 1;
                continue;
            };

            let amount = match record.amount {
                Some(v) if !v.is_nan() => v,
                _ => {
                    processed.dropped.missing_amount += 1;
                    continue;
                }
            };

            processed.awards.push(ClassifiedAward {
                year: date.year(),
                bucket: Bucket::classify(record.program_label.as_deref()),
                amount,
            });
        }

        processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: Option<(i32, u32, u32)>, amount: Option<f64>, label: Option<&str>) -> AwardRecord {
        AwardRecord {
            award_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            amount,
            program_label: label.map(String::from),
        }
    }

    #[test]
    fn test_classify_records() {
        let records = vec![
            record(Some((2020, 1, 5)), Some(50.0), Some("Education")),
            record(Some((2021, 7, 1)), Some(10.0), Some("Cybersecurity")),
            record(Some((2021, 7, 1)), Some(3.0), None),
        ];

        let processed = DataProcessor::classify_records(&records);
        assert_eq!(
            processed.awards,
            vec![
                ClassifiedAward { year: 2020, bucket: Bucket::Education, amount: 50.0 },
                ClassifiedAward { year: 2021, bucket: Bucket::Cyber, amount: 10.0 },
                ClassifiedAward { year: 2021, bucket: Bucket::Other, amount: 3.0 },
            ]
        );
        assert_eq!(processed.dropped.total(), 0);
    }

    #[test]
    fn test_unusable_rows_are_dropped_and_counted() {
        let records = vec![
            record(None, Some(50.0), Some("Education")),
            record(Some((2020, 1, 1)), None, Some("Education")),
            record(Some((2020, 1, 1)), Some(f64::NAN), Some("Cyber")),
            record(None, None, None),
            record(Some((2020, 1, 1)), Some(1.0), Some("Cyber")),
        ];

        let processed = DataProcessor::classify_records(&records);
        assert_eq!(processed.awards.len(), 1);
        assert_eq!(processed.awards[0].amount, 1.0);
        assert_eq!(
            processed.dropped,
            DropCounts { missing_date: 2, missing_amount: 2 }
        );
        assert_eq!(processed.dropped.total(), 4);
    }

    #[test]
    fn test_negative_and_zero_amounts_are_kept() {
        let records = vec![
            record(Some((2019, 2, 2)), Some(-5.0), Some("Regional")),
            record(Some((2019, 2, 2)), Some(0.0), Some("SBAC")),
        ];

        let processed = DataProcessor::classify_records(&records);
        assert_eq!(processed.awards.len(), 2);
        assert!(processed.awards.iter().all(|a| a.bucket == Bucket::RegionalSbac));
    }
}
