//! ZeroMQ transport
//!
//! The recorder publishes on a PUB socket, each plotter reads from its own
//! SUB socket filtered on one topic. Both ends are synchronous from the
//! caller's point of view: the sockets live on a private tokio runtime owned
//! by the endpoint and every call blocks on it.
//!
//! # Main Types
//!
//! - [`Recorder`] - Publisher side, owned by the simulation
//! - [`SubscriberChannel`] - Subscriber side, owned by one plotter
//! - [`FrameSource`] - What the render driver pulls values from

pub mod recorder;
pub mod subscriber;

pub use recorder::Recorder;
pub use subscriber::{FrameSource, Receipt, SubscriberChannel};

use crate::error::Result;
use tokio::runtime::Runtime;

/// Build the runtime that drives one endpoint's socket
///
/// One worker thread keeps the socket's background tasks (peer handshakes,
/// outgoing queues) running between calls.
pub(crate) fn build_runtime(name: &str) -> Result<Runtime> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name(format!("liveplotter-{}", name))
        .enable_all()
        .build()?;
    Ok(runtime)
}
