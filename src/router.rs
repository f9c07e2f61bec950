//! Top-level stream router and engine lifecycle.
//!
//! The router owns every piece of aggregation state: the raw transcript, the chart
//! registry and the console aggregator, plus the [`EngineState`] gate. Messages are
//! processed synchronously, one at a time, to completion.
//!
//! ```text
//! message ─► gate (active?) ─► channel filter ─► raw transcript
//!                                             └► classify ─► registry ─► series
//!                                                         └► console aggregator
//! ```

use crate::classify::{is_graphable, parse_sample};
use crate::config::EngineConfig;
use crate::console::ConsoleAggregator;
use crate::core::{Channel, Clock, EngineObserver, NullObserver, SystemClock, TextExporter};
use crate::data::registry::{ChartRegistry, SampleOutcome};
use crate::data::ring_buffer::RawRingBuffer;
use crate::data::storage::{RAW_EXPORT_FILENAME, RAW_EXPORT_MIME};
use crate::error::AppResult;
use crate::messages::{Message, WireMessage};
use tracing::{debug, info, trace};

/// Activity gate and channel selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineState {
    /// False while recording is paused.
    pub active: bool,
    /// The only channel whose messages are accepted.
    pub channel: Channel,
}

impl EngineState {
    /// Active, listening on `channel`.
    pub fn new(channel: Channel) -> Self {
        Self {
            active: true,
            channel,
        }
    }

    /// True when the simulator channel is selected.
    pub fn simulator_mode(&self) -> bool {
        self.channel.is_simulated()
    }

    fn accepts(&self, message: &Message) -> bool {
        message.from_simulated_source == self.simulator_mode()
    }
}

/// Why a message had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// Recording is paused.
    Paused,
    /// The message came from the channel that is not selected.
    OtherChannel,
    /// The wire event was not a `serial` event.
    NotSerial,
    /// The wire event could not be decoded.
    Malformed,
}

/// What routing did with one message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Nothing changed.
    Dropped(DropReason),
    /// The message became a point in the series with this creation index.
    Plotted(SampleOutcome),
    /// The message went to the console; `flushed` is true if any entry changed.
    Logged { flushed: bool },
}

/// Receives messages and keeps the aggregated views up to date.
pub struct StreamRouter {
    state: EngineState,
    raw: RawRingBuffer,
    registry: ChartRegistry,
    console: ConsoleAggregator,
    observer: Box<dyn EngineObserver>,
    clock: Box<dyn Clock>,
}

impl StreamRouter {
    /// Empty, active router with no observer and the wall clock.
    pub fn new(config: &EngineConfig, channel: Channel) -> Self {
        Self {
            state: EngineState::new(channel),
            raw: RawRingBuffer::new(config.max_raw_buffer_length),
            registry: ChartRegistry::new(config.max_series_points),
            console: ConsoleAggregator::new(
                config.max_console_line_length,
                config.max_console_entries,
            ),
            observer: Box::new(NullObserver),
            clock: Box::new(SystemClock),
        }
    }

    /// Replaces the observer notified of view changes.
    pub fn with_observer(mut self, observer: impl EngineObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Replaces the timestamp source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Routes one message through the gate, the channel filter and classification.
    pub fn route(&mut self, message: &Message) -> RouteOutcome {
        if !self.state.active {
            trace!(source = %message.source_id, "recording paused, dropping message");
            return RouteOutcome::Dropped(DropReason::Paused);
        }
        if !self.state.accepts(message) {
            trace!(
                source = %message.source_id,
                channel = %message.channel(),
                "message from unselected channel"
            );
            return RouteOutcome::Dropped(DropReason::OtherChannel);
        }

        self.raw.append(&message.text);

        if is_graphable(&message.text) {
            let parsed = parse_sample(&message.text);
            if let Some((variable, value)) = parsed.plottable() {
                let outcome = self.registry.add_sample(
                    &message.source_id,
                    variable,
                    value,
                    message.from_simulated_source,
                    self.clock.now_millis(),
                );
                self.notify_sample(outcome);
                return RouteOutcome::Plotted(outcome);
            }
            debug!(source = %message.source_id, "graphable chunk without a value, logging instead");
        }

        let flushed = self.console.feed(&message.text);
        if flushed {
            self.observer.on_console_changed(&self.console.snapshot());
        }
        RouteOutcome::Logged { flushed }
    }

    fn notify_sample(&mut self, outcome: SampleOutcome) {
        let Some(series) = self.registry.get_index(outcome.index()) else {
            return;
        };
        if outcome.is_created() {
            info!(series = %series.key(), index = series.index(), "new series");
            self.observer.on_series_created(&series.snapshot());
        }
        if let Some(point) = series.last() {
            self.observer.on_point_appended(series.key(), point);
        }
    }

    /// Routes a decoded wire event; non-`serial` events are ignored.
    pub fn route_wire(&mut self, wire: WireMessage) -> RouteOutcome {
        match wire.into_message() {
            Some(message) => self.route(&message),
            None => RouteOutcome::Dropped(DropReason::NotSerial),
        }
    }

    /// Decodes and routes one JSON wire event. Malformed input is dropped.
    pub fn route_json(&mut self, line: &str) -> RouteOutcome {
        match WireMessage::from_json(line) {
            Ok(wire) => self.route_wire(wire),
            Err(err) => {
                debug!(error = %err, "dropping malformed wire message");
                RouteOutcome::Dropped(DropReason::Malformed)
            }
        }
    }

    /// Stops accepting messages. Already-aggregated data stays.
    pub fn pause(&mut self) {
        if self.state.active {
            info!("recording paused");
            self.state.active = false;
            self.observer.on_recording_changed(false);
        }
    }

    /// Accepts messages again.
    pub fn resume(&mut self) {
        if !self.state.active {
            info!("recording resumed");
            self.state.active = true;
            self.observer.on_recording_changed(true);
        }
    }

    /// Pauses when active, resumes otherwise.
    pub fn toggle_recording(&mut self) {
        if self.state.active {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Drops every series, console entry, the pending line and the raw transcript.
    ///
    /// The activity flag is left as is.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.console.clear();
        self.raw.clear();
        debug!("engine reset");
        self.observer.on_reset();
    }

    /// Switches the accepted channel. Always resets, even if the channel is unchanged.
    pub fn set_channel(&mut self, channel: Channel) {
        info!(%channel, "switching channel");
        self.state.channel = channel;
        self.reset();
    }

    /// Copy of the raw transcript.
    pub fn export_raw_text(&self) -> String {
        self.raw.snapshot()
    }

    /// Hands the raw transcript to the export collaborator as `data.txt`.
    pub fn export_raw(&self, exporter: &dyn TextExporter) -> AppResult<()> {
        exporter.download_text(&self.export_raw_text(), RAW_EXPORT_FILENAME, RAW_EXPORT_MIME)
    }

    /// Current gate and channel.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// False while paused.
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Series view.
    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    /// Console view.
    pub fn console(&self) -> &ConsoleAggregator {
        &self.console
    }

    /// Raw transcript view.
    pub fn raw_buffer(&self) -> &RawRingBuffer {
        &self.raw
    }
}

impl std::fmt::Debug for StreamRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamRouter")
            .field("state", &self.state)
            .field("series", &self.registry.len())
            .field("console_entries", &self.console.len())
            .field("raw", &self.raw)
            .finish()
    }
}
