//! Headless tick host
//!
//! Runs a [`RenderDriver`] at a fixed cadence without a window. Used by
//! `liveplotter plot --headless` and by tests.

use super::{RenderDriver, TickOutcome};
use crate::config::PlotterConfig;
use crate::error::Result;
use crate::strategy::build_strategy;
use crate::transport::SubscriberChannel;
use std::time::{Duration, Instant};

/// What a headless run did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Values dispatched to the strategy
    pub values: u64,
    /// Ticks on which at least one artist was redrawn
    pub redraws: u64,
    /// Wall time until the stream closed
    pub elapsed: Duration,
}

/// Fixed-interval scheduler
///
/// Ticks come from a `crossbeam_channel::tick` channel, which holds at most
/// one pending tick: a slow tick delays the next one instead of queuing a
/// burst, so ticks never overlap.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    interval: Duration,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tick `driver` until its stream closes
    pub fn run(&self, driver: &mut RenderDriver) -> Result<RunSummary> {
        self.run_with(driver, |_, _| {})
    }

    /// Like [`run`](Self::run), calling `on_tick` after every tick
    pub fn run_with<F>(&self, driver: &mut RenderDriver, mut on_tick: F) -> Result<RunSummary>
    where
        F: FnMut(&RenderDriver, &TickOutcome),
    {
        let started = Instant::now();
        let ticker = crossbeam_channel::tick(self.interval);
        let mut summary = RunSummary::default();

        loop {
            // The sender side lives in a crossbeam thread and never disconnects
            if ticker.recv().is_err() {
                break;
            }

            let outcome = driver.tick()?;
            on_tick(driver, &outcome);
            match outcome {
                TickOutcome::Drawn(ids) => {
                    summary.values += 1;
                    if !ids.is_empty() {
                        summary.redraws += 1;
                    }
                }
                TickOutcome::Closed | TickOutcome::Idle => break,
            }
        }

        summary.elapsed = started.elapsed();
        tracing::info!(
            "Headless run finished: {} values, {} redraws in {:?}",
            summary.values,
            summary.redraws,
            summary.elapsed
        );
        Ok(summary)
    }
}

/// Run one plotter without a window until its stream closes
pub fn run_headless(config: &PlotterConfig) -> Result<RunSummary> {
    config.validate()?;
    let mut driver = RenderDriver::new(build_strategy(config.kind, &config.strategy));
    driver.initialize()?;

    let channel = SubscriberChannel::open(&config.topic, &config.subscriber)?;
    driver.attach(Box::new(channel))?;

    TickScheduler::new(config.tick_interval()).run(&mut driver)
}
