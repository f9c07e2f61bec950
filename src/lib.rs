//! # Serial Scope Core Library
//!
//! This crate aggregates the text output of a running simulator or an attached device into
//! two live views: numeric time series keyed by (source, variable), and a bounded console
//! log in which consecutive identical lines collapse into one entry with a repeat counter.
//! A bounded raw transcript of everything accepted is kept for export.
//!
//! ## Crate Structure
//!
//! - **`router`**: The `StreamRouter`, which owns all aggregation state, applies the
//!   recording gate and the simulator/device channel filter, and dispatches each message.
//! - **`classify`**: The `letters:number` heuristic and the sample parser.
//! - **`console`**: The line-coalescing, run-length collapsing console aggregator.
//! - **`data`**: The raw transcript ring buffer, per-key time series, the chart registry
//!   and export writers.
//! - **`core`**: Shared types (`ChartKey`, `Point`, `Channel`) and the collaborator traits
//!   `EngineObserver`, `TextExporter` and `Clock`.
//! - **`messages`**: The host wire shape and the per-event `Message`.
//! - **`observer`**: Observers for headless use (tracing, stdout echo).
//! - **`ingest`**: Async loops feeding the router from JSON lines or a message channel.
//! - **`serial_source`**: Reading device output from a serial port (feature
//!   `instrument_serial`).
//! - **`config`**: Figment-based configuration loading and validation.
//! - **`logging`**: `tracing-subscriber` initialization.
//! - **`error`**: The `ScopeError` enum for the fallible outer layers.

pub mod classify;
pub mod config;
pub mod console;
pub mod core;
pub mod data;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod messages;
pub mod observer;
pub mod router;
pub mod serial_source;

pub use crate::core::{Channel, ChartKey, Point};
pub use crate::messages::{Message, WireMessage};
pub use crate::router::{EngineState, RouteOutcome, StreamRouter};
