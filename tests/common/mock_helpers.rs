//! Frame sources that do not need a recorder

use crossbeam_channel::{bounded, Receiver, Sender};
use liveplotter::error::Result;
use liveplotter::transport::{FrameSource, Receipt};
use liveplotter::types::Value;
use liveplotter::LivePlotError;
use std::collections::VecDeque;

/// Yields a fixed list of values, then closes
pub struct ScriptedSource {
    values: VecDeque<Value>,
    closed: bool,
    pub receives: usize,
}

impl ScriptedSource {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: values.into_iter().collect(),
            closed: false,
            receives: 0,
        }
    }
}

impl FrameSource for ScriptedSource {
    fn receive(&mut self) -> Result<Receipt> {
        self.receives += 1;
        if self.closed {
            return Err(LivePlotError::StreamClosed {
                topic: "scripted".to_string(),
            });
        }
        match self.values.pop_front() {
            Some(value) => Ok(Receipt::Value(value)),
            None => {
                self.closed = true;
                Ok(Receipt::Closed)
            }
        }
    }
}

/// Fed from another thread through a crossbeam channel; `None` closes the stream
pub struct ChannelSource {
    rx: Receiver<Option<Value>>,
}

impl FrameSource for ChannelSource {
    fn receive(&mut self) -> Result<Receipt> {
        match self.rx.recv() {
            Ok(Some(value)) => Ok(Receipt::Value(value)),
            Ok(None) | Err(_) => Ok(Receipt::Closed),
        }
    }
}

/// Create a channel-backed source and the sender feeding it
pub fn channel_source() -> (Sender<Option<Value>>, ChannelSource) {
    let (tx, rx) = bounded(16);
    (tx, ChannelSource { rx })
}
