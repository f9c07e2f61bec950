//! Core traits and data types shared by the engine and its collaborators.
use crate::console::ConsoleSnapshot;
use crate::data::series::SeriesSnapshot;
use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Variable name used for samples that carry no label.
pub const UNNAMED_VARIABLE: &str = " ";

/// The source subset the engine listens to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Output of the in-browser/in-process simulator.
    #[default]
    Simulator,
    /// Output of an attached hardware device.
    Device,
}

impl Channel {
    /// Builds the channel from a wire `sim` flag.
    pub fn from_simulated(simulated: bool) -> Self {
        if simulated {
            Channel::Simulator
        } else {
            Channel::Device
        }
    }

    /// True for the simulator channel.
    pub fn is_simulated(self) -> bool {
        matches!(self, Channel::Simulator)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Simulator => f.write_str("simulator"),
            Channel::Device => f.write_str("device"),
        }
    }
}

/// A single captured sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// Milliseconds since the Unix epoch at ingestion.
    pub timestamp_ms: i64,
    /// Integer sample value.
    pub value: i64,
}

/// Identifies one series: the emitting source and the sample's variable name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartKey {
    /// Emitting source.
    pub source_id: String,
    /// `" "` for unlabeled samples.
    pub variable: String,
}

impl ChartKey {
    /// Builds a key, mapping a missing variable name to [`UNNAMED_VARIABLE`].
    pub fn new(source_id: impl Into<String>, variable: Option<&str>) -> Self {
        Self {
            source_id: source_id.into(),
            variable: variable.unwrap_or(UNNAMED_VARIABLE).to_string(),
        }
    }

    /// Compares without building a key.
    pub fn matches(&self, source_id: &str, variable: &str) -> bool {
        self.source_id == source_id && self.variable == variable
    }

    /// True when the sample carried no label.
    pub fn is_unnamed(&self) -> bool {
        self.variable == UNNAMED_VARIABLE
    }
}

impl fmt::Display for ChartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unnamed() {
            write!(f, "{}", self.source_id)
        } else {
            write!(f, "{}/{}", self.source_id, self.variable)
        }
    }
}

/// Trait for the rendering side of the engine.
///
/// Every notification hands out owned snapshots, so an implementation may keep them
/// across message-processing turns without observing later mutations.
pub trait EngineObserver: Send {
    /// A new series was registered; a chart surface can be attached for it.
    fn on_series_created(&mut self, series: &SeriesSnapshot);

    /// The console entry list changed (new entry, repeat count bump or eviction).
    fn on_console_changed(&mut self, entries: &ConsoleSnapshot);

    /// A point was appended to an existing or freshly created series.
    fn on_point_appended(&mut self, _key: &ChartKey, _point: Point) {}

    /// Recording was paused (`false`) or resumed (`true`).
    fn on_recording_changed(&mut self, _active: bool) {}

    /// All series, console entries and the raw transcript were dropped.
    fn on_reset(&mut self) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl EngineObserver for NullObserver {
    fn on_series_created(&mut self, _series: &SeriesSnapshot) {}

    fn on_console_changed(&mut self, _entries: &ConsoleSnapshot) {}
}

/// Trait for the export collaborator ("download file").
pub trait TextExporter {
    fn download_text(&self, content: &str, filename: &str, mime_type: &str) -> AppResult<()>;
}

/// Source of point timestamps.
pub trait Clock: Send {
    fn now_millis(&self) -> i64;
}

/// Wall-clock time in milliseconds since the Unix epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_maps_to_sentinel() {
        let key = ChartKey::new("srcA", None);
        assert_eq!(key.variable, UNNAMED_VARIABLE);
        assert!(key.is_unnamed());
        assert_eq!(key.to_string(), "srcA");
    }

    #[test]
    fn key_match_is_exact_on_both_parts() {
        let key = ChartKey::new("srcA", Some("temp"));
        assert!(key.matches("srcA", "temp"));
        assert!(!key.matches("srcA", "temp "));
        assert!(!key.matches("srcB", "temp"));
        assert_eq!(key.to_string(), "srcA/temp");
    }

    #[test]
    fn channel_parses_from_lowercase_names() {
        let channel: Channel = serde_json::from_str("\"device\"").unwrap();
        assert_eq!(channel, Channel::Device);
        assert!(Channel::from_simulated(true).is_simulated());
        assert_eq!(Channel::Device.to_string(), "device");
    }
}
