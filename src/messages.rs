//! Message types delivered to the stream router.
//!
//! Hosts deliver events in the wire shape `{ "type": "serial", "id", "data", "sim" }`.
//! Only `serial` events carry stream text; anything else is ignored. Missing fields take
//! lenient defaults because the delivery channel is best-effort.

use crate::core::Channel;
use crate::error::AppResult;
use serde::{Deserialize, Serialize};

/// Wire `type` of stream events.
pub const SERIAL_MESSAGE_TYPE: &str = "serial";

/// Source id used when a wire message omits `id` or sends it empty.
pub const UNKNOWN_SOURCE: &str = "?";

/// Event as delivered by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Event type; only `serial` is routed.
    #[serde(rename = "type")]
    pub kind: String,
    /// Source id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Text chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// True when the source is the simulator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sim: Option<bool>,
}

impl WireMessage {
    /// A `serial` event carrying `data` from `id`.
    pub fn serial(id: impl Into<String>, data: impl Into<String>, sim: bool) -> Self {
        Self {
            kind: SERIAL_MESSAGE_TYPE.to_string(),
            id: Some(id.into()),
            data: Some(data.into()),
            sim: Some(sim),
        }
    }

    /// Decodes one JSON event.
    pub fn from_json(line: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// True for stream events.
    pub fn is_serial(&self) -> bool {
        self.kind == SERIAL_MESSAGE_TYPE
    }

    /// Converts a `serial` event into a [`Message`]; other event types yield `None`.
    pub fn into_message(self) -> Option<Message> {
        if !self.is_serial() {
            return None;
        }
        Some(Message {
            text: self.data.unwrap_or_default(),
            source_id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            from_simulated_source: self.sim.unwrap_or(false),
        })
    }
}

/// One chunk of stream text, constructed per incoming event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Raw chunk; may hold partial or several lines.
    pub text: String,
    /// Id of the emitting source.
    pub source_id: String,
    /// Channel of origin.
    pub from_simulated_source: bool,
}

impl Message {
    /// Message from either channel.
    pub fn new(
        source_id: impl Into<String>,
        text: impl Into<String>,
        from_simulated_source: bool,
    ) -> Self {
        Self {
            text: text.into(),
            source_id: source_id.into(),
            from_simulated_source,
        }
    }

    /// Message from the simulator channel.
    pub fn simulated(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(source_id, text, true)
    }

    /// Message from the device channel.
    pub fn device(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(source_id, text, false)
    }

    /// Channel the message arrived on.
    pub fn channel(&self) -> Channel {
        Channel::from_simulated(self.from_simulated_source)
    }
}
