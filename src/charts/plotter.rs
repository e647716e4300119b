//! Chart Data Module
//! Shapes aggregated totals and the price index into drawable series.

use crate::data::Bucket;
use crate::stats::{PriceIndex, YearBucketTotals};
use plotters::style::RGBColor;

/// Dollars per billion; bar charts are drawn in billions.
pub const BILLION: f64 = 1_000_000_000.0;

/// Bucket colours, indexed by canonical bucket position (wrapping).
pub const PALETTE: [RGBColor; 11] = [
    RGBColor(0xF4, 0xB0, 0x00), // Yellow-gold
    RGBColor(0xF5, 0xDE, 0x00), // Bright yellow
    RGBColor(0x7B, 0x00, 0x85), // Purple
    RGBColor(0xFA, 0x2D, 0x01), // Red-orange
    RGBColor(0x42, 0x00, 0x9E), // Deep purple
    RGBColor(0xCB, 0x5F, 0x00), // Orange-brown
    RGBColor(0x00, 0x39, 0xF4), // Blue
    RGBColor(0x00, 0xEA, 0xFB), // Cyan
    RGBColor(0x5D, 0x8E, 0x00), // Olive green
    RGBColor(0x70, 0x00, 0x27), // Burgundy
    RGBColor(0x00, 0x41, 0x0E), // Dark green
];

pub fn bucket_color(bucket: Bucket) -> RGBColor {
    PALETTE[bucket.index() % PALETTE.len()]
}

/// One bucket's values, one per year slot.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub bucket: Bucket,
    pub values: Vec<f64>,
}

/// A single rectangle in the stacked bar chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSegment {
    pub bucket: Bucket,
    pub slot: usize,
    pub bottom: f64,
    pub top: f64,
}

/// Stacked bar chart input: one bar per year, one segment per bucket.
#[derive(Debug, Clone)]
pub struct StackedBarData {
    pub title: String,
    pub y_label: String,
    pub years: Vec<i32>,
    /// Stacking order, bottom first. Also the legend order.
    pub series: Vec<BarSeries>,
}

impl StackedBarData {
    /// Pivot totals into year × bucket, scaled to billions. Only buckets with
    /// data get a series; they are stacked in reverse canonical order and
    /// missing (year, bucket) cells are zero.
    pub fn from_totals(totals: &YearBucketTotals, title: &str, y_label: &str) -> Self {
        let years = totals.years();
        let series = totals
            .buckets()
            .into_iter()
            .rev()
            .map(|bucket| BarSeries {
                bucket,
                values: years
                    .iter()
                    .map(|&year| totals.get(year, bucket).unwrap_or(0.0) / BILLION)
                    .collect(),
            })
            .collect();

        Self {
            title: title.to_string(),
            y_label: y_label.to_string(),
            years,
            series,
        }
    }

    /// Rectangles to draw, with each series stacked on the ones before it.
    /// Positive values grow upward from zero and negative values downward,
    /// each on their own running base. Zero-height segments are skipped.
    pub fn segments(&self) -> Vec<BarSegment> {
        let mut above = vec![0.0; self.years.len()];
        let mut below = vec![0.0; self.years.len()];
        let mut segments = Vec::new();

        for series in &self.series {
            for (slot, &value) in series.values.iter().enumerate() {
                if value == 0.0 {
                    continue;
                }
                let base = if value > 0.0 {
                    &mut above[slot]
                } else {
                    &mut below[slot]
                };
                segments.push(BarSegment {
                    bucket: series.bucket,
                    slot,
                    bottom: *base,
                    top: *base + value,
                });
                *base += value;
            }
        }

        segments
    }

    /// Extent of the value axis: lowest and highest stack edge, always including 0.
    pub fn value_range(&self) -> (f64, f64) {
        self.segments()
            .iter()
            .flat_map(|s| [s.bottom, s.top])
            .filter(|v| v.is_finite())
            .fold((0.0, 0.0), |(lo, hi), v| (f64::min(lo, v), f64::max(hi, v)))
    }
}

/// Line chart input for the price index.
#[derive(Debug, Clone)]
pub struct LineChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(i32, f64)>,
}

impl LineChartData {
    /// Index values by year. Non-finite values cannot be placed and are left out.
    pub fn from_index(index: &PriceIndex) -> Self {
        Self {
            title: "CPI Index Values Over Time (Base Year Index = 100)".to_string(),
            x_label: "Year".to_string(),
            y_label: "CPI Index Value".to_string(),
            points: index.iter().filter(|(_, v)| v.is_finite()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ClassifiedAward, InflationObservation};

    fn totals() -> YearBucketTotals {
        let awards = [
            ClassifiedAward { year: 2020, bucket: Bucket::Education, amount: 2.0 * BILLION },
            ClassifiedAward { year: 2020, bucket: Bucket::Cyber, amount: 0.5 * BILLION },
            ClassifiedAward { year: 2021, bucket: Bucket::Other, amount: 1.0 * BILLION },
        ];
        YearBucketTotals::aggregate(&awards)
    }

    #[test]
    fn test_from_totals_pivots_in_reverse_canonical_order() {
        let data = StackedBarData::from_totals(&totals(), "t", "y");

        assert_eq!(data.years, vec![2020, 2021]);
        let order: Vec<Bucket> = data.series.iter().map(|s| s.bucket).collect();
        assert_eq!(order, vec![Bucket::Other, Bucket::Education, Bucket::Cyber]);

        assert_eq!(data.series[0].values, vec![0.0, 1.0]);
        assert_eq!(data.series[1].values, vec![2.0, 0.0]);
        assert_eq!(data.series[2].values, vec![0.5, 0.0]);
    }

    #[test]
    fn test_segments_stack_per_year() {
        let data = StackedBarData::from_totals(&totals(), "t", "y");
        let segments = data.segments();

        assert_eq!(
            segments,
            vec![
                BarSegment { bucket: Bucket::Other, slot: 1, bottom: 0.0, top: 1.0 },
                BarSegment { bucket: Bucket::Education, slot: 0, bottom: 0.0, top: 2.0 },
                BarSegment { bucket: Bucket::Cyber, slot: 0, bottom: 2.0, top: 2.5 },
            ]
        );
        assert_eq!(data.value_range(), (0.0, 2.5));
    }

    #[test]
    fn test_negative_values_stack_below_zero() {
        let awards = [
            ClassifiedAward { year: 2020, bucket: Bucket::Other, amount: 1.0 * BILLION },
            ClassifiedAward { year: 2020, bucket: Bucket::Education, amount: -0.5 * BILLION },
            ClassifiedAward { year: 2020, bucket: Bucket::Cyber, amount: -0.25 * BILLION },
            ClassifiedAward { year: 2020, bucket: Bucket::CultureRaceEquity, amount: 0.5 * BILLION },
        ];
        let data = StackedBarData::from_totals(&YearBucketTotals::aggregate(&awards), "t", "y");

        assert_eq!(
            data.segments(),
            vec![
                BarSegment { bucket: Bucket::Other, slot: 0, bottom: 0.0, top: 1.0 },
                BarSegment { bucket: Bucket::Education, slot: 0, bottom: 0.0, top: -0.5 },
                BarSegment { bucket: Bucket::Cyber, slot: 0, bottom: -0.5, top: -0.75 },
                BarSegment { bucket: Bucket::CultureRaceEquity, slot: 0, bottom: 1.0, top: 1.5 },
            ]
        );
        assert_eq!(data.value_range(), (-0.75, 1.5));
    }

    #[test]
    fn test_empty_totals() {
        let data = StackedBarData::from_totals(&YearBucketTotals::default(), "t", "y");
        assert!(data.years.is_empty());
        assert!(data.series.is_empty());
        assert_eq!(data.value_range(), (0.0, 0.0));
    }

    #[test]
    fn test_bucket_colors() {
        assert_eq!(bucket_color(Bucket::CultureRaceEquity), PALETTE[0]);
        assert_eq!(bucket_color(Bucket::UsDemocracy), PALETTE[10]);
        // Other wraps around to the first colour
        assert_eq!(bucket_color(Bucket::Other), PALETTE[0]);
    }

    #[test]
    fn test_line_data_skips_nan() {
        let index = PriceIndex::build(&[
            InflationObservation { year: 2000, rate_percent: 0.0 },
            InflationObservation { year: 2001, rate_percent: 10.0 },
            InflationObservation { year: 2002, rate_percent: f64::NAN },
        ])
        .unwrap();

        let data = LineChartData::from_index(&index);
        assert_eq!(data.points.len(), 2);
        assert_eq!(data.points[0], (2000, 100.0));
    }
}
