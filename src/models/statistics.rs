use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::utils::round_to_tenths;

/// Running statistics for one station.
///
/// `count` is exact and `sum` accumulates in observation order, so
/// `sum / count` is the arithmetic mean at any point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationStats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
}

impl StationStats {
    pub fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    /// Fold a single observation into the running statistics
    #[inline]
    pub fn observe(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Combine statistics gathered elsewhere (another chunk, another worker)
    pub fn merge(&mut self, other: &StationStats) {
        self.count += other.count;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    pub fn summary(&self) -> StationSummary {
        StationSummary {
            min: round_to_tenths(self.min),
            mean: round_to_tenths(self.mean()),
            max: round_to_tenths(self.max),
        }
    }
}

/// Station name to running statistics, one per chunk or for the whole file
pub type StationMap = HashMap<String, StationStats>;

/// Display-ready values, rounded to one decimal place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

/// The fully merged result for one input file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    stations: StationMap,
}

impl Measurements {
    pub fn new(stations: StationMap) -> Self {
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, station: &str) -> Option<&StationStats> {
        self.stations.get(station)
    }

    pub fn total_records(&self) -> u64 {
        self.stations.values().map(|stats| stats.count).sum()
    }

    /// Stations in lexicographic byte order of their names
    pub fn sorted(&self) -> Vec<(&str, &StationStats)> {
        let mut entries: Vec<(&str, &StationStats)> = self
            .stations
            .iter()
            .map(|(name, stats)| (name.as_str(), stats))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn summaries(&self) -> BTreeMap<&str, StationSummary> {
        self.stations
            .iter()
            .map(|(name, stats)| (name.as_str(), stats.summary()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_observation() {
        let stats = StationStats::new(-12.4);
        assert_eq!(stats.min, -12.4);
        assert_eq!(stats.max, -12.4);
        assert_eq!(stats.mean(), -12.4);
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn test_observe_tracks_extremes() {
        let mut stats = StationStats::new(5.0);
        stats.observe(-3.0);
        stats.observe(11.0);
        stats.observe(4.0);

        assert_eq!(stats.min, -3.0);
        assert_eq!(stats.max, 11.0);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.sum, 17.0);
        assert_eq!(stats.mean(), 4.25);
    }

    #[test]
    fn test_merge_combines_both_sides() {
        let mut left = StationStats::new(1.0);
        left.observe(3.0);
        let mut right = StationStats::new(-2.0);
        right.observe(8.5);

        left.merge(&right);

        assert_eq!(left.min, -2.0);
        assert_eq!(left.max, 8.5);
        assert_eq!(left.count, 4);
        assert_eq!(left.sum, 10.5);
    }

    #[test]
    fn test_summary_rounds_mean() {
        let mut stats = StationStats::new(1.0);
        stats.observe(1.0);
        stats.observe(2.0);
        // mean 1.333..
        let summary = stats.summary();
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.mean, 1.3);
        assert_eq!(summary.max, 2.0);
    }

    #[test]
    fn test_sorted_orders_by_name_bytes() {
        let mut map = StationMap::new();
        map.insert("Zürich".to_string(), StationStats::new(1.0));
        map.insert("Abha".to_string(), StationStats::new(2.0));
        map.insert("Zagreb".to_string(), StationStats::new(3.0));

        let measurements = Measurements::new(map);
        let names: Vec<&str> = measurements.sorted().into_iter().map(|(n, _)| n).collect();

        assert_eq!(names, vec!["Abha", "Zagreb", "Zürich"]);
        assert_eq!(measurements.total_records(), 3);
    }
}
