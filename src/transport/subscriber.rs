//! Subscriber side of the channel
//!
//! A [`SubscriberChannel`] belongs to exactly one plotter and one topic. The
//! topic filter is installed on the socket, so frames for other topics never
//! reach application code.

use super::build_runtime;
use crate::config::SubscriberConfig;
use crate::error::{LivePlotError, Result};
use crate::protocol::{self, Message};
use crate::types::{Topic, Value};
use std::time::Duration;
use tokio::runtime::Runtime;
use zeromq::{Endpoint, Socket, SocketRecv, SubSocket, ZmqMessage};

/// Result of one successful receive
#[derive(Debug, Clone, PartialEq)]
pub enum Receipt {
    /// Next value of the stream
    Value(Value),
    /// The recorder closed the stream. Reported exactly once.
    Closed,
}

/// Blocking source of values for one topic
#[cfg_attr(test, mockall::automock)]
pub trait FrameSource: Send {
    /// Block until the next frame arrives
    fn receive(&mut self) -> Result<Receipt>;
}

/// Topic-filtered connection to a recorder
pub struct SubscriberChannel {
    // Declared before the runtime so it is torn down first
    socket: Option<SubSocket>,
    runtime: Runtime,
    topic: Topic,
    endpoint: String,
    received: u64,
}

impl SubscriberChannel {
    /// Connect to the recorder described by `config` and subscribe to `topic`
    ///
    /// Plotters are usually started before the recorder binds, so the
    /// connection is retried until `connect_timeout_ms` expires (or forever
    /// when no timeout is configured).
    pub fn open(topic: &str, config: &SubscriberConfig) -> Result<Self> {
        let topic = Topic::new(topic)?;
        let prefix = protocol::encode_topic(&topic)?;
        let endpoint = config.endpoint();

        endpoint
            .parse::<Endpoint>()
            .map_err(|e| LivePlotError::Connect {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        let runtime = build_runtime("sub")?;
        let socket = runtime.block_on(connect_with_retry(
            &endpoint,
            &prefix,
            config.retry_interval(),
            config.connect_timeout(),
        ))?;
        tracing::info!("Subscribed to '{}' on {}", topic, endpoint);

        Ok(Self {
            socket: Some(socket),
            runtime,
            topic,
            endpoint,
            received: 0,
        })
    }

    pub fn topic(&self) -> &str {
        self.topic.as_str()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of data values received so far
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Whether the end-of-stream frame has been seen
    pub fn is_closed(&self) -> bool {
        self.socket.is_none()
    }

    /// Like [`receive`](FrameSource::receive) but gives up after `timeout`,
    /// returning `Ok(None)`.
    pub fn receive_timeout(&mut self, timeout: Duration) -> Result<Option<Receipt>> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| stream_closed(&self.topic))?;
        let outcome = self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, socket.recv()).await });

        match outcome {
            Ok(message) => self.accept(message?).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn accept(&mut self, message: ZmqMessage) -> Result<Receipt> {
        let parts = message.into_vec();
        let frame = protocol::decode_frame(&parts)?;
        if frame.topic != self.topic.as_str() {
            return Err(LivePlotError::Codec(format!(
                "received frame for topic '{}' on channel for '{}'",
                frame.topic, self.topic
            )));
        }

        match frame.message {
            Message::Data(value) => {
                self.received += 1;
                tracing::trace!("'{}' <- {}", self.topic, value.kind());
                Ok(Receipt::Value(value))
            }
            Message::End => {
                tracing::info!(
                    "Stream '{}' closed after {} values",
                    self.topic,
                    self.received
                );
                self.disconnect();
                Ok(Receipt::Closed)
            }
        }
    }

    fn disconnect(&mut self) {
        let _guard = self.runtime.enter();
        self.socket.take();
    }
}

impl FrameSource for SubscriberChannel {
    /// Block until the next frame for this topic arrives
    ///
    /// After [`Receipt::Closed`] has been returned once, every further call
    /// fails with [`LivePlotError::StreamClosed`].
    fn receive(&mut self) -> Result<Receipt> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| stream_closed(&self.topic))?;
        let message = self.runtime.block_on(socket.recv())?;
        self.accept(message)
    }
}

impl std::fmt::Debug for SubscriberChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberChannel")
            .field("topic", &self.topic)
            .field("endpoint", &self.endpoint)
            .field("received", &self.received)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for SubscriberChannel {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn stream_closed(topic: &Topic) -> LivePlotError {
    LivePlotError::StreamClosed {
        topic: topic.to_string(),
    }
}

async fn connect_with_retry(
    endpoint: &str,
    prefix: &str,
    retry: Duration,
    timeout: Option<Duration>,
) -> Result<SubSocket> {
    let deadline = timeout.map(|t| tokio::time::Instant::now() + t);
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let mut socket = SubSocket::new();
        let connected = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, socket.connect(endpoint))
                .await
                .map_err(|_| LivePlotError::Connect {
                    endpoint: endpoint.to_string(),
                    message: format!("no recorder after {} attempts", attempts),
                })?,
            None => socket.connect(endpoint).await,
        };

        match connected {
            Ok(()) => {
                socket.subscribe(prefix).await?;
                return Ok(socket);
            }
            Err(e) => {
                tracing::debug!("Connect attempt {} to {} failed: {}", attempts, endpoint, e);
                if deadline.is_some_and(|d| tokio::time::Instant::now() + retry >= d) {
                    return Err(LivePlotError::Connect {
                        endpoint: endpoint.to_string(),
                        message: e.to_string(),
                    });
                }
                tokio::time::sleep(retry).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unused_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_connect_times_out_without_recorder() {
        let mut config = SubscriberConfig::with_port(unused_port());
        config.connect_retry_interval_ms = 20;
        config.connect_timeout_ms = Some(200);

        let err = SubscriberChannel::open("x", &config).unwrap_err();
        assert!(matches!(err, LivePlotError::Connect { .. }));
    }

    #[test]
    fn test_invalid_topic_rejected() {
        let config = SubscriberConfig::with_port(unused_port());
        assert!(matches!(
            SubscriberChannel::open(crate::types::SENTINEL, &config),
            Err(LivePlotError::InvalidTopic(_))
        ));
    }

    #[test]
    fn test_bad_host_rejected() {
        let mut config = SubscriberConfig::with_port(unused_port());
        config.host = "not a host".to_string();
        config.connect_timeout_ms = Some(100);
        assert!(SubscriberChannel::open("x", &config).is_err());
    }
}
