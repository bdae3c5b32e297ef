//! Historical price series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One `(timestamp, price)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Sample time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Price in USD
    pub price: f64,
}

/// Price samples ordered by ascending timestamp.
///
/// Ordering is established on construction, whatever order the source used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    points: Vec<PricePoint>,
}

impl HistoricalSeries {
    /// Build a series, sorting the samples by timestamp.
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    /// Samples in ascending time order.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// First and last timestamps.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.points.first()?.timestamp, self.points.last()?.timestamp))
    }

    /// Lowest and highest prices.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.price).fold(None, |acc, price| match acc {
            None => Some((price, price)),
            Some((lo, hi)) => Some((lo.min(price), hi.max(price))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64, price: f64) -> PricePoint {
        PricePoint {
            timestamp: DateTime::from_timestamp_millis(ms).unwrap(),
            price,
        }
    }

    #[test]
    fn test_points_sorted_on_construction() {
        let series = HistoricalSeries::new(vec![at(3_000, 3.0), at(1_000, 1.0), at(2_000, 2.0)]);
        let prices: Vec<_> = series.points().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.latest().map(|p| p.price), Some(3.0));
    }

    #[test]
    fn test_ranges() {
        let series = HistoricalSeries::new(vec![at(1_000, 5.0), at(2_000, 2.0), at(3_000, 9.0)]);
        assert_eq!(series.price_range(), Some((2.0, 9.0)));
        let (start, end) = series.time_range().unwrap();
        assert!(start < end);
    }

    #[test]
    fn test_empty_series() {
        let series = HistoricalSeries::new(Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.price_range(), None);
        assert_eq!(series.time_range(), None);
    }
}
