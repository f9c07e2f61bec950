//! Error types for the outer layers of the crate.
//!
//! The aggregation engine itself never fails: caps are enforced by eviction and malformed
//! wire messages are dropped. Errors only arise where the crate touches the outside world:
//!
//! - **`Config`**: wraps `figment` errors raised while reading or merging configuration.
//! - **`Configuration`**: semantic problems found by `ScopeConfig::validate`, e.g. a zero
//!   console entry cap.
//! - **`Io`**: file and stream I/O, including reading wire messages from stdin.
//! - **`Wire`**: a wire message that could not be decoded. The router drops these; only
//!   `WireMessage::from_json` callers see them.
//! - **`Serial`** / **`SerialFeatureDisabled`**: device input through a serial port.
//! - **`Task`**: a background reader task panicked or was cancelled.
//! - **`Export`**: an exporter collaborator refused the content.
//!
//! `#[from]` conversions keep the `?` operator usable across all of these.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type AppResult<T> = std::result::Result<T, ScopeError>;

/// Errors raised outside the aggregation engine.
#[derive(Error, Debug)]
pub enum ScopeError {
    /// Reading or merging configuration failed.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Configuration loaded but holds unusable values.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// File or stream I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A wire message could not be decoded.
    #[error("Malformed wire message: {0}")]
    Wire(#[from] serde_json::Error),

    /// Opening or reading the serial port failed.
    #[error("Serial port error: {0}")]
    Serial(String),

    /// Serial input requested in a build without it.
    #[error("Serial support not enabled. Rebuild with --features instrument_serial")]
    SerialFeatureDisabled,

    /// A background reader task panicked or was cancelled.
    #[error("Reader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The exporter refused the content.
    #[error("Export failed: {0}")]
    Export(String),
}

impl From<figment::Error> for ScopeError {
    fn from(value: figment::Error) -> Self {
        ScopeError::Config(Box::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_io_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.jsonl");
        let err: ScopeError = io.into();
        assert!(matches!(err, ScopeError::Io(_)));
        assert!(err.to_string().contains("missing.jsonl"));
    }

    #[test]
    fn wraps_wire_decode_errors() {
        let decode = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ScopeError = decode.into();
        assert!(err.to_string().starts_with("Malformed wire message"));
    }

    #[test]
    fn serial_feature_message_names_the_flag() {
        let err = ScopeError::SerialFeatureDisabled;
        assert!(err.to_string().contains("instrument_serial"));
    }
}
