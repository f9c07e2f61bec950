//! Buffers, series storage and export writers.
pub mod registry;
pub mod ring_buffer;
pub mod series;
pub mod storage;
