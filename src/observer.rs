//! Ready-made engine observers for headless use.
use crate::console::ConsoleSnapshot;
use crate::core::{ChartKey, EngineObserver, Point};
use crate::data::series::{palette, LineStyle, SeriesSnapshot, DEFAULT_PALETTE};
use std::io::Write;
use tracing::{debug, info, warn};

/// Logs engine notifications through `tracing`.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    palette: Vec<LineStyle>,
}

impl TracingObserver {
    /// Uses the first `palette_size` default styles, repeating them if more are asked for.
    pub fn new(palette_size: usize) -> Self {
        Self {
            palette: palette(palette_size),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.len())
    }
}

impl EngineObserver for TracingObserver {
    fn on_series_created(&mut self, series: &SeriesSnapshot) {
        info!(
            source = %series.key.source_id,
            variable = %series.key.variable,
            index = series.index,
            stroke = series.style(&self.palette).stroke,
            "chart created"
        );
    }

    fn on_console_changed(&mut self, entries: &ConsoleSnapshot) {
        debug!(version = entries.version, entries = entries.entries.len(), "console updated");
    }

    fn on_recording_changed(&mut self, active: bool) {
        info!(active, "recording state changed");
    }

    fn on_reset(&mut self) {
        info!("charts and console cleared");
    }
}

/// Prints new series and each changed console line to a writer.
///
/// A series is announced with its stroke color. Within one message a single console line
/// is printed (the newest entry); repeats show up as the same text with a growing counter.
pub struct EchoObserver<W: Write + Send> {
    out: W,
    palette: Vec<LineStyle>,
    last_version: u64,
}

impl<W: Write + Send> EchoObserver<W> {
    /// Echoes to `out` using the full default palette.
    pub fn new(out: W) -> Self {
        Self {
            out,
            palette: DEFAULT_PALETTE.to_vec(),
            last_version: 0,
        }
    }

    /// Restricts series colors to the first `palette_size` default styles.
    pub fn with_palette_size(mut self, palette_size: usize) -> Self {
        self.palette = palette(palette_size);
        self
    }

    /// Gives back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> EngineObserver for EchoObserver<W> {
    fn on_series_created(&mut self, series: &SeriesSnapshot) {
        let stroke = series.style(&self.palette).stroke;
        if let Err(err) = writeln!(self.out, "# series {} (#{}) {stroke}", series.key, series.index) {
            warn!(error = %err, "failed to echo series");
        }
    }

    fn on_console_changed(&mut self, entries: &ConsoleSnapshot) {
        if entries.version == self.last_version {
            return;
        }
        self.last_version = entries.version;
        if let Some(entry) = entries.last() {
            if let Err(err) = writeln!(self.out, "{entry}") {
                warn!(error = %err, "failed to echo console line");
            }
        }
    }
}

/// Forwards every notification to two observers, first to `A`.
#[derive(Debug, Clone, Default)]
pub struct Fanout<A, B> {
    first: A,
    second: B,
}

impl<A: EngineObserver, B: EngineObserver> Fanout<A, B> {
    /// Pairs two observers.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: EngineObserver, B: EngineObserver> EngineObserver for Fanout<A, B> {
    fn on_series_created(&mut self, series: &SeriesSnapshot) {
        self.first.on_series_created(series);
        self.second.on_series_created(series);
    }

    fn on_console_changed(&mut self, entries: &ConsoleSnapshot) {
        self.first.on_console_changed(entries);
        self.second.on_console_changed(entries);
    }

    fn on_point_appended(&mut self, key: &ChartKey, point: Point) {
        self.first.on_point_appended(key, point);
        self.second.on_point_appended(key, point);
    }

    fn on_recording_changed(&mut self, active: bool) {
        self.first.on_recording_changed(active);
        self.second.on_recording_changed(active);
    }

    fn on_reset(&mut self) {
        self.first.on_reset();
        self.second.on_reset();
    }
}
