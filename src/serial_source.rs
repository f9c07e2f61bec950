//! Device input read straight from a serial port.
//!
//! The port is read on a blocking task; each read that decodes to text becomes one
//! device-channel [`Message`] sent to the ingest loop. Reads are decoded with a
//! [`Utf8ChunkDecoder`] so characters split between reads arrive intact. The reader stops once the receiving side is
//! dropped or the port reports an error other than a read timeout.

use crate::config::SerialConfig;
use crate::error::{AppResult, ScopeError};
use crate::messages::Message;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Capacity of the channel between the blocking reader and the router.
pub const SERIAL_CHANNEL_CAPACITY: usize = 256;

/// Turns raw port reads into text without splitting multi-byte characters.
///
/// An incomplete UTF-8 sequence at the end of a read is held back and completed by the
/// next read. Invalid bytes become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    /// Creates a decoder with nothing held back.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `bytes` after any tail held back from the previous call.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut text = String::with_capacity(self.pending.len());
        let mut rest: &[u8] = &self.pending;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }
        self.pending = rest.to_vec();
        text
    }

    /// Bytes held back waiting for the rest of a character.
    pub fn held_back(&self) -> &[u8] {
        &self.pending
    }
}

/// Opens the configured port and starts forwarding its output.
#[cfg(feature = "instrument_serial")]
pub fn spawn_serial_reader(
    config: &SerialConfig,
) -> AppResult<(mpsc::Receiver<Message>, JoinHandle<AppResult<()>>)> {
    use std::io::Read;
    use std::time::Duration;
    use tracing::{debug, info, trace};

    let port_name = config
        .port
        .clone()
        .ok_or_else(|| ScopeError::Serial("no serial port configured".to_string()))?;
    let source_id = config.source_id.clone().unwrap_or_else(|| port_name.clone());

    let mut port = serialport::new(&port_name, config.baud_rate)
        .timeout(Duration::from_millis(100))
        .open()
        .map_err(|e| ScopeError::Serial(format!("failed to open '{port_name}': {e}")))?;
    info!(port = %port_name, baud = config.baud_rate, "serial port opened");

    let (tx, rx) = mpsc::channel(SERIAL_CHANNEL_CAPACITY);
    let handle = tokio::task::spawn_blocking(move || {
        let mut buffer = [0u8; 1024];
        let mut decoder = Utf8ChunkDecoder::new();
        loop {
            match port.read(&mut buffer) {
                Ok(0) => continue,
                Ok(n) => {
                    let text = decoder.decode(&buffer[..n]);
                    trace!(port = %port_name, bytes = n, "serial read");
                    if text.is_empty() {
                        continue;
                    }
                    if tx.blocking_send(Message::device(source_id.clone(), text)).is_err() {
                        debug!(port = %port_name, "router gone, stopping serial reader");
                        return Ok(());
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    if tx.is_closed() {
                        return Ok(());
                    }
                }
                Err(e) => {
                    return Err(ScopeError::Serial(format!("read from '{port_name}' failed: {e}")));
                }
            }
        }
    });

    Ok((rx, handle))
}

/// Always fails: serial support was not compiled in.
#[cfg(not(feature = "instrument_serial"))]
pub fn spawn_serial_reader(
    _config: &SerialConfig,
) -> AppResult<(mpsc::Receiver<Message>, JoinHandle<AppResult<()>>)> {
    Err(ScopeError::SerialFeatureDisabled)
}
