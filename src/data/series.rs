//! Time-stamped point sequences, one per chart key.
use crate::core::{ChartKey, Point};
use serde::Serialize;
use std::collections::VecDeque;

/// Stroke and fill colors handed to the chart renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LineStyle {
    /// Line color.
    pub stroke: &'static str,
    /// Area color under the line.
    pub fill: &'static str,
    /// Stroke width in pixels.
    pub line_width: u8,
}

/// Default line styles: red, blue, green, yellow.
pub const DEFAULT_PALETTE: [LineStyle; 4] = [
    LineStyle {
        stroke: "rgba(255, 0, 0, 1)",
        fill: "rgba(255, 0, 0, 0.2)",
        line_width: 4,
    },
    LineStyle {
        stroke: "rgba(0, 0, 255, 1)",
        fill: "rgba(0, 0, 255, 0.2)",
        line_width: 4,
    },
    LineStyle {
        stroke: "rgba(0, 255, 0, 1)",
        fill: "rgba(0, 255, 0, 0.2)",
        line_width: 4,
    },
    LineStyle {
        stroke: "rgba(255, 255, 0, 1)",
        fill: "rgba(255, 255, 0, 0.2)",
        line_width: 4,
    },
];

/// `size` styles taken from [`DEFAULT_PALETTE`], repeating it when more are asked for.
///
/// A size of zero still yields one style.
pub fn palette(size: usize) -> Vec<LineStyle> {
    DEFAULT_PALETTE.iter().copied().cycle().take(size.max(1)).collect()
}

/// Style of the series created `index`-th: `palette[index mod palette.len()]`.
pub fn style_for(index: usize, palette: &[LineStyle]) -> LineStyle {
    palette
        .get(index % palette.len().max(1))
        .copied()
        .unwrap_or(DEFAULT_PALETTE[0])
}

/// Append-only point sequence for one (source, variable) key.
///
/// Points are never reordered or rewritten. Memory is bounded by `max_points`: once the
/// cap is reached the oldest point is dropped for every new one.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    key: ChartKey,
    index: usize,
    simulated: bool,
    max_points: usize,
    points: VecDeque<Point>,
}

impl TimeSeries {
    /// Empty series; `max_points` is clamped to at least 1.
    pub fn new(key: ChartKey, index: usize, simulated: bool, max_points: usize) -> Self {
        Self {
            key,
            index,
            simulated,
            max_points: max_points.max(1),
            points: VecDeque::new(),
        }
    }

    /// Adds a point, dropping the oldest one when full.
    pub fn append(&mut self, timestamp_ms: i64, value: i64) {
        if self.points.len() >= self.max_points {
            self.points.pop_front();
        }
        self.points.push_back(Point {
            timestamp_ms,
            value,
        });
    }

    /// Source and variable of this series.
    pub fn key(&self) -> &ChartKey {
        &self.key
    }

    /// Creation order within the registry; stable for the lifetime of the series.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the series was created from simulator output.
    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    /// Points in arrival order.
    pub fn points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter()
    }

    /// Point values in arrival order.
    pub fn values(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Most recent point.
    pub fn last(&self) -> Option<Point> {
        self.points.back().copied()
    }

    /// Number of points kept.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True before the first point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Palette slot for this series: `index mod palette_size`.
    pub fn palette_slot(&self, palette_size: usize) -> usize {
        self.index % palette_size.max(1)
    }

    /// Line style picked from `palette`, falling back to the first default style for an
    /// empty palette.
    pub fn style(&self, palette: &[LineStyle]) -> LineStyle {
        style_for(self.index, palette)
    }

    /// Owned copy of the series.
    pub fn snapshot(&self) -> SeriesSnapshot {
        SeriesSnapshot {
            key: self.key.clone(),
            index: self.index,
            simulated: self.simulated,
            points: self.points.iter().copied().collect(),
        }
    }
}

/// Owned copy of a series, safe to hold across engine mutations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSnapshot {
    /// Source and variable.
    pub key: ChartKey,
    /// Creation index.
    pub index: usize,
    /// Whether it came from the simulator.
    pub simulated: bool,
    /// Points in arrival order.
    pub points: Vec<Point>,
}

impl SeriesSnapshot {
    /// Line style picked from `palette` by creation index.
    pub fn style(&self, palette: &[LineStyle]) -> LineStyle {
        style_for(self.index, palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(index: usize, max_points: usize) -> TimeSeries {
        TimeSeries::new(ChartKey::new("srcA", Some("temp")), index, true, max_points)
    }

    #[test]
    fn appends_in_arrival_order_with_duplicate_timestamps() {
        let mut s = series(0, 100);
        s.append(1_000, 10);
        s.append(1_000, 12);
        s.append(999, -3);
        assert_eq!(s.values(), vec![10, 12, -3]);
        let stamps: Vec<i64> = s.points().map(|p| p.timestamp_ms).collect();
        assert_eq!(stamps, vec![1_000, 1_000, 999]);
    }

    #[test]
    fn secondary_cap_drops_oldest_points() {
        let mut s = series(0, 3);
        for v in 0..5 {
            s.append(v, v);
        }
        assert_eq!(s.len(), 3);
        assert_eq!(s.values(), vec![2, 3, 4]);
        assert_eq!(s.last().map(|p| p.value), Some(4));
    }

    #[test]
    fn style_cycles_through_palette() {
        assert_eq!(series(0, 1).style(&DEFAULT_PALETTE), DEFAULT_PALETTE[0]);
        assert_eq!(series(5, 1).style(&DEFAULT_PALETTE), DEFAULT_PALETTE[1]);
        assert_eq!(series(7, 1).palette_slot(4), 3);
        assert_eq!(series(7, 1).style(&[]), DEFAULT_PALETTE[0]);
    }

    #[test]
    fn palette_repeats_defaults() {
        let six = palette(6);
        assert_eq!(six.len(), 6);
        assert_eq!(six[4], DEFAULT_PALETTE[0]);
        assert_eq!(palette(0), vec![DEFAULT_PALETTE[0]]);
        assert_eq!(series(3, 1).snapshot().style(&palette(2)), DEFAULT_PALETTE[1]);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut s = series(2, 10);
        s.append(1, 55);
        let snap = s.snapshot();
        s.append(2, 57);
        assert_eq!(snap.points.len(), 1);
        assert_eq!(snap.index, 2);
        assert!(snap.simulated);
    }
}
