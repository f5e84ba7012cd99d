//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use liveplotter::config::SubscriberConfig;
use liveplotter::transport::{Receipt, SubscriberChannel};
use std::time::Duration;

/// Upper bound for any single receive in tests
pub fn test_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Time for subscriptions to reach the publisher before recording starts
pub fn settle() {
    std::thread::sleep(Duration::from_millis(300));
}

/// A TCP port nothing is listening on right now
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe listener");
    listener.local_addr().expect("probe address").port()
}

/// Subscriber config for a local recorder on `port` that gives up after a few seconds
pub fn subscriber_config(port: u16) -> SubscriberConfig {
    let mut config = SubscriberConfig::with_port(port);
    config.connect_retry_interval_ms = 20;
    config.connect_timeout_ms = Some(5_000);
    config
}

/// Open a channel on `topic` and wait for the subscription to settle
pub fn subscribe(topic: &str, port: u16) -> SubscriberChannel {
    let channel = SubscriberChannel::open(topic, &subscriber_config(port)).expect("subscribe");
    settle();
    channel
}

/// Receive with the test timeout, failing the test if nothing arrives
pub fn next(channel: &mut SubscriberChannel) -> Receipt {
    channel
        .receive_timeout(test_timeout())
        .expect("receive")
        .unwrap_or_else(|| panic!("no frame for '{}' within {:?}", channel.topic(), test_timeout()))
}
