//! Wire codec for recorder/plotter frames.
//!
//! Every message on the channel is a two-part ZeroMQ frame:
//!
//! | part | content                         | used for                |
//! |------|---------------------------------|-------------------------|
//! | 0    | JSON string of the topic        | SUB prefix filtering    |
//! | 1    | JSON of a tagged [`Message`]    | payload / end-of-stream |
//!
//! The topic part keeps its surrounding quotes, so ZeroMQ's prefix matching
//! is an exact match: `"a"` is not a prefix of `"ab"`.
//!
//! End of stream is an explicit `{"kind":"end"}` message rather than a magic
//! payload value, so no legitimate value can be mistaken for it on the wire.
//! The producer still refuses to record [`SENTINEL`](crate::types::SENTINEL)
//! as data.

use crate::error::{LivePlotError, Result};
use crate::types::{Topic, Value};
use serde::{Deserialize, Serialize};

/// Number of parts in every frame
pub const FRAME_PARTS: usize = 2;

/// Payload part of a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Message {
    /// A recorded value
    Data(Value),
    /// No further values for this topic
    End,
}

impl Message {
    pub fn is_end(&self) -> bool {
        matches!(self, Message::End)
    }
}

/// A fully decoded frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub topic: String,
    pub message: Message,
}

/// Encode the topic part. This is also the subscription prefix.
pub fn encode_topic(topic: &Topic) -> Result<String> {
    serde_json::to_string(topic.as_str())
        .map_err(|e| LivePlotError::Codec(format!("Failed to encode topic '{}': {}", topic, e)))
}

/// Encode the payload part
pub fn encode_message(message: &Message) -> Result<Vec<u8>> {
    if let Message::Data(value) = message {
        value.validate()?;
    }
    serde_json::to_vec(message)
        .map_err(|e| LivePlotError::Codec(format!("Failed to encode message: {}", e)))
}

/// Encode a complete frame as its two parts
pub fn encode_frame(topic: &Topic, message: &Message) -> Result<[Vec<u8>; FRAME_PARTS]> {
    Ok([encode_topic(topic)?.into_bytes(), encode_message(message)?])
}

/// Decode the payload part
pub fn decode_message(bytes: &[u8]) -> Result<Message> {
    let message: Message = serde_json::from_slice(bytes)
        .map_err(|e| LivePlotError::Codec(format!("Failed to decode message: {}", e)))?;
    if let Message::Data(value) = &message {
        value.validate()?;
    }
    Ok(message)
}

/// Decode a received frame from its raw parts
pub fn decode_frame<P: AsRef<[u8]>>(parts: &[P]) -> Result<Frame> {
    if parts.len() != FRAME_PARTS {
        return Err(LivePlotError::Codec(format!(
            "expected {} frame parts, got {}",
            FRAME_PARTS,
            parts.len()
        )));
    }

    let topic: String = serde_json::from_slice(parts[0].as_ref())
        .map_err(|e| LivePlotError::Codec(format!("Failed to decode topic: {}", e)))?;
    let message = decode_message(parts[1].as_ref())?;

    Ok(Frame { topic, message })
}
