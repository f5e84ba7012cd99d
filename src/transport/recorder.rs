//! Publisher side of the channel
//!
//! A [`Recorder`] is created explicitly by the simulation and passed to
//! wherever values are produced. It never waits for subscribers: a frame
//! published while nobody is connected is simply lost.

use super::build_runtime;
use crate::config::RecorderConfig;
use crate::error::{LivePlotError, Result};
use crate::protocol::{self, Message, FRAME_PARTS};
use crate::types::{Topic, Value};
use bytes::Bytes;
use std::collections::BTreeSet;
use tokio::runtime::Runtime;
use zeromq::{Endpoint, PubSocket, Socket, SocketSend, ZmqMessage};

/// Publishes `(topic, value)` frames on a bound PUB socket
pub struct Recorder {
    // Declared before the runtime so it is torn down first
    socket: Option<PubSocket>,
    runtime: Runtime,
    endpoint: String,
    port: u16,
    open_topics: BTreeSet<Topic>,
    frames_sent: u64,
}

impl Recorder {
    /// Bind the publish endpoint described by `config`
    ///
    /// Fails with [`LivePlotError::Bind`] if the port is unavailable. A port
    /// of 0 binds an OS-assigned port, available from [`port`](Self::port).
    pub fn open(config: &RecorderConfig) -> Result<Self> {
        let runtime = build_runtime("pub")?;
        let endpoint = config.endpoint();

        let (socket, bound) = runtime.block_on(async {
            let mut socket = PubSocket::new();
            let bound = socket.bind(&endpoint).await;
            (socket, bound)
        });
        let bound = bound.map_err(|source| LivePlotError::Bind {
            endpoint: endpoint.clone(),
            source,
        })?;

        let port = match bound {
            Endpoint::Tcp(_, port) => port,
            _ => config.port,
        };
        tracing::info!("Recorder bound to {} (port {})", endpoint, port);

        Ok(Self {
            socket: Some(socket),
            runtime,
            endpoint,
            port,
            open_topics: BTreeSet::new(),
            frames_sent: 0,
        })
    }

    /// Bind on all interfaces at `port`
    pub fn bind(port: u16) -> Result<Self> {
        Self::open(&RecorderConfig::with_port(port))
    }

    /// Port actually bound
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Endpoint string the socket was bound with
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of frames handed to the socket so far (data and end frames)
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Topics recorded at least once and not closed yet
    pub fn open_topics(&self) -> impl Iterator<Item = &str> {
        self.open_topics.iter().map(Topic::as_str)
    }

    /// Publish one value for `topic`
    ///
    /// The reserved [`SENTINEL`](crate::types::SENTINEL) text is refused, as
    /// are values that cannot be encoded; in both cases nothing is sent.
    pub fn record(&mut self, topic: &str, value: impl Into<Value>) -> Result<()> {
        let topic = Topic::new(topic)?;
        let value = value.into();
        if value.is_sentinel() {
            return Err(LivePlotError::SentinelValue {
                topic: topic.to_string(),
            });
        }

        let parts = protocol::encode_frame(&topic, &Message::Data(value))?;
        self.send(parts)?;

        if !self.open_topics.contains(&topic) {
            tracing::debug!("Topic '{}' opened", topic);
            self.open_topics.insert(topic);
        }
        Ok(())
    }

    /// Send the end-of-stream frame for `topic`
    ///
    /// Must be called once for every recorded topic; subscribers wait for it
    /// indefinitely otherwise.
    pub fn close(&mut self, topic: &str) -> Result<()> {
        let topic = Topic::new(topic)?;
        let parts = protocol::encode_frame(&topic, &Message::End)?;
        self.send(parts)?;

        if !self.open_topics.remove(&topic) {
            tracing::debug!("Closing topic '{}' that was never recorded", topic);
        }
        tracing::info!("Topic '{}' closed", topic);
        Ok(())
    }

    /// Close every topic that is still open
    pub fn close_all(&mut self) -> Result<()> {
        let topics: Vec<Topic> = self.open_topics.iter().cloned().collect();
        for topic in topics {
            self.close(topic.as_str())?;
        }
        Ok(())
    }

    fn send(&mut self, [topic, body]: [Vec<u8>; FRAME_PARTS]) -> Result<()> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| LivePlotError::State("recorder socket already shut down".into()))?;

        let mut message = ZmqMessage::from(Bytes::from(topic));
        message.push_back(Bytes::from(body));

        self.runtime.block_on(socket.send(message))?;
        self.frames_sent += 1;
        Ok(())
    }
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("endpoint", &self.endpoint)
            .field("port", &self.port)
            .field("open_topics", &self.open_topics)
            .field("frames_sent", &self.frames_sent)
            .finish()
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if !self.open_topics.is_empty() {
            tracing::warn!(
                "Recorder dropped with unclosed topics: {:?}",
                self.open_topics.iter().map(Topic::as_str).collect::<Vec<_>>()
            );
        }
        let _guard = self.runtime.enter();
        self.socket.take();
    }
}
