//! Demultiplexes samples into one series per (source, variable) key.
use crate::core::ChartKey;
use crate::data::series::{SeriesSnapshot, TimeSeries};
use tracing::debug;

/// Result of routing one sample into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// The sample started a new series at this creation index.
    Created(usize),
    /// The sample was appended to the existing series at this creation index.
    Appended(usize),
}

impl SampleOutcome {
    /// Creation index of the touched series.
    pub fn index(self) -> usize {
        match self {
            SampleOutcome::Created(index) | SampleOutcome::Appended(index) => index,
        }
    }

    /// True when the sample started a new series.
    pub fn is_created(self) -> bool {
        matches!(self, SampleOutcome::Created(_))
    }
}

/// Demultiplexes numeric samples into one series per (source, variable) key.
///
/// Series are kept in creation order. Lookup is a linear scan; the number of live series
/// is bounded by distinct instrumentation points, not by stream volume.
#[derive(Debug, Clone)]
pub struct ChartRegistry {
    series: Vec<TimeSeries>,
    max_points: usize,
}

impl ChartRegistry {
    /// Empty registry whose series keep at most `max_points` points.
    pub fn new(max_points: usize) -> Self {
        Self {
            series: Vec::new(),
            max_points,
        }
    }

    /// Appends `value` to the series for `(source_id, variable)`, creating it on first sight.
    pub fn add_sample(
        &mut self,
        source_id: &str,
        variable: &str,
        value: i64,
        simulated: bool,
        timestamp_ms: i64,
    ) -> SampleOutcome {
        if let Some(position) = self
            .series
            .iter()
            .position(|s| s.key().matches(source_id, variable))
        {
            self.series[position].append(timestamp_ms, value);
            return SampleOutcome::Appended(position);
        }

        let index = self.series.len();
        let key = ChartKey {
            source_id: source_id.to_string(),
            variable: variable.to_string(),
        };
        debug!(series = %key, index, "creating series");
        let mut series = TimeSeries::new(key, index, simulated, self.max_points);
        series.append(timestamp_ms, value);
        self.series.push(series);
        SampleOutcome::Created(index)
    }

    /// Series for `key`, if one exists.
    pub fn get(&self, key: &ChartKey) -> Option<&TimeSeries> {
        self.series
            .iter()
            .find(|s| s.key().matches(&key.source_id, &key.variable))
    }

    /// Series by creation index.
    pub fn get_index(&self, index: usize) -> Option<&TimeSeries> {
        self.series.get(index)
    }

    /// All series in creation order.
    pub fn series(&self) -> &[TimeSeries] {
        &self.series
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// True when no series exists.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Owned copies of every series.
    pub fn snapshot(&self) -> Vec<SeriesSnapshot> {
        self.series.iter().map(TimeSeries::snapshot).collect()
    }

    /// Drops every series; the next one created gets index 0.
    pub fn clear(&mut self) {
        self.series.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_shares_a_series() {
        let mut registry = ChartRegistry::new(100);
        assert_eq!(registry.add_sample("srcA", "temp", 10, true, 1), SampleOutcome::Created(0));
        assert_eq!(registry.add_sample("srcA", "temp", 12, true, 2), SampleOutcome::Appended(0));

        assert_eq!(registry.len(), 1);
        let key = ChartKey::new("srcA", Some("temp"));
        assert_eq!(registry.get(&key).map(TimeSeries::values), Some(vec![10, 12]));
    }

    #[test]
    fn different_source_creates_independent_series() {
        let mut registry = ChartRegistry::new(100);
        registry.add_sample("srcA", "temp", 10, true, 1);
        let outcome = registry.add_sample("srcB", "temp", 5, true, 2);

        assert!(outcome.is_created());
        assert_eq!(outcome.index(), 1);
        assert_eq!(registry.len(), 2);
        let b = registry.get(&ChartKey::new("srcB", Some("temp"))).unwrap();
        assert_eq!(b.values(), vec![5]);
        assert_eq!(b.index(), 1);
    }

    #[test]
    fn creation_index_restarts_after_clear() {
        let mut registry = ChartRegistry::new(100);
        registry.add_sample("srcA", "a", 1, false, 1);
        registry.add_sample("srcA", "b", 2, false, 1);
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.add_sample("srcA", "c", 3, false, 1), SampleOutcome::Created(0));
    }

    #[test]
    fn snapshot_preserves_creation_order() {
        let mut registry = ChartRegistry::new(100);
        registry.add_sample("s", "z", 1, false, 1);
        registry.add_sample("s", "a", 2, false, 1);
        registry.add_sample("s", "z", 3, false, 2);
        let snaps = registry.snapshot();
        let names: Vec<&str> = snaps.iter().map(|s| s.key.variable.as_str()).collect();
        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(snaps[0].points.len(), 2);
    }
}
