//! Render driver
//!
//! The driver owns one strategy, one [`Figure`] and (once running) one frame
//! source. Its host calls [`RenderDriver::tick`] at a fixed cadence on the
//! thread that owns the figure; each tick pulls at most one value.
//!
//! ```text
//! Created --initialize()--> Initialized --attach()--> Running --end frame--> Closed
//! ```
//!
//! Hosts:
//! - [`crate::frontend::PlotterApp`] - native window, ticks from the egui loop
//! - [`scheduler::TickScheduler`] - headless, ticks from a crossbeam ticker
//!
//! Each plotter runs in its own OS process ([`process::PlotterProcess`]),
//! so no drawing state is ever shared with the simulation or other plotters.

pub mod process;
pub mod scheduler;

pub use process::{PlotterGroup, PlotterProcess};
pub use scheduler::{run_headless, RunSummary, TickScheduler};

use crate::error::{LivePlotError, Result, ResultExt};
use crate::figure::{ArtistId, Figure};
use crate::strategy::RenderStrategy;
use crate::transport::{FrameSource, Receipt};
use std::fmt;

/// Lifecycle of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Created,
    Initialized,
    Running,
    Closed,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Created => "created",
            DriverState::Initialized => "initialized",
            DriverState::Running => "running",
            DriverState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// What one tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A value was consumed; these artists were redrawn (possibly none)
    Drawn(Vec<ArtistId>),
    /// The stream ended on this tick
    Closed,
    /// Already closed; nothing was done
    Idle,
}

/// Drives one render strategy from one frame source
pub struct RenderDriver {
    strategy: Box<dyn RenderStrategy>,
    figure: Figure,
    source: Option<Box<dyn FrameSource>>,
    state: DriverState,
    ticks: u64,
}

impl RenderDriver {
    pub fn new(strategy: Box<dyn RenderStrategy>) -> Self {
        Self {
            strategy,
            figure: Figure::new(),
            source: None,
            state: DriverState::Created,
            ticks: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    /// Name of the active strategy
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Number of values dispatched to the strategy
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run the strategy's setup on the driver's figure
    pub fn initialize(&mut self) -> Result<()> {
        self.expect_state(DriverState::Created, "initialize")?;
        self.strategy.init(&mut self.figure)?;
        self.state = DriverState::Initialized;
        tracing::debug!("Driver initialized with {} strategy", self.strategy.name());
        Ok(())
    }

    /// Attach the subscribed source and start running
    pub fn attach(&mut self, source: Box<dyn FrameSource>) -> Result<()> {
        self.expect_state(DriverState::Initialized, "attach")?;
        self.source = Some(source);
        self.state = DriverState::Running;
        Ok(())
    }

    /// Pull one value and hand it to the strategy
    ///
    /// Blocks in the source's receive. Once the stream has closed every
    /// further tick is a no-op returning [`TickOutcome::Idle`].
    pub fn tick(&mut self) -> Result<TickOutcome> {
        match self.state {
            DriverState::Closed => return Ok(TickOutcome::Idle),
            DriverState::Running => {}
            state => {
                return Err(LivePlotError::State(format!(
                    "tick called while {}",
                    state
                )))
            }
        }

        let source = self
            .source
            .as_mut()
            .ok_or_else(|| LivePlotError::State("running without a source".into()))?;

        match source.receive()? {
            Receipt::Closed => {
                self.source = None;
                self.state = DriverState::Closed;
                tracing::info!("Stream closed after {} ticks", self.ticks);
                Ok(TickOutcome::Closed)
            }
            Receipt::Value(value) => {
                let index = self.ticks;
                self.ticks += 1;
                let drawn = self
                    .strategy
                    .plot_loop(&value, index, &mut self.figure)
                    .with_context(|| format!("value {} on '{}'", index, self.strategy.name()))?;
                if !drawn.is_empty() {
                    tracing::trace!("Tick {} redrew {} artists", index, drawn.len());
                }
                Ok(TickOutcome::Drawn(drawn))
            }
        }
    }

    fn expect_state(&self, expected: DriverState, operation: &str) -> Result<()> {
        if self.state != expected {
            return Err(LivePlotError::State(format!(
                "{} requires state {}, driver is {}",
                operation, expected, self.state
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for RenderDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderDriver")
            .field("strategy", &self.strategy.name())
            .field("state", &self.state)
            .field("ticks", &self.ticks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategySettings;
    use crate::strategy::{build_strategy, StrategyKind};
    use crate::transport::subscriber::MockFrameSource;
    use crate::types::Value;
    use mockall::Sequence;

    fn line_driver(frequency: u32) -> RenderDriver {
        let settings = StrategySettings::default().with_plot_frequency(frequency);
        RenderDriver::new(build_strategy(StrategyKind::Line, &settings))
    }

    /// A mock that yields `values` in order, then the end frame
    fn scripted(values: Vec<Value>) -> MockFrameSource {
        let mut source = MockFrameSource::new();
        let mut seq = Sequence::new();
        for value in values {
            source
                .expect_receive()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move || Ok(Receipt::Value(value.clone())));
        }
        source
            .expect_receive()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(Receipt::Closed));
        source
    }

    #[test]
    fn test_lifecycle() {
        let mut driver = line_driver(1);
        assert_eq!(driver.state(), DriverState::Created);

        driver.initialize().unwrap();
        assert_eq!(driver.state(), DriverState::Initialized);

        driver
            .attach(Box::new(scripted(vec![Value::Scalar(1.0)])))
            .unwrap();
        assert_eq!(driver.state(), DriverState::Running);

        assert!(matches!(driver.tick().unwrap(), TickOutcome::Drawn(_)));
        assert_eq!(driver.tick().unwrap(), TickOutcome::Closed);
        assert_eq!(driver.state(), DriverState::Closed);
    }

    #[test]
    fn test_ticks_after_close_never_receive() {
        let mut driver = line_driver(1);
        driver.initialize().unwrap();
        // The mock fails the test if receive is called a second time
        driver.attach(Box::new(scripted(vec![]))).unwrap();

        assert_eq!(driver.tick().unwrap(), TickOutcome::Closed);
        for _ in 0..3 {
            assert_eq!(driver.tick().unwrap(), TickOutcome::Idle);
        }
    }

    #[test]
    fn test_tick_before_running_is_error() {
        let mut driver = line_driver(1);
        assert!(matches!(driver.tick(), Err(LivePlotError::State(_))));
        driver.initialize().unwrap();
        assert!(matches!(driver.tick(), Err(LivePlotError::State(_))));
    }

    #[test]
    fn test_out_of_order_lifecycle_calls() {
        let mut driver = line_driver(1);
        assert!(driver.attach(Box::new(MockFrameSource::new())).is_err());
        driver.initialize().unwrap();
        assert!(driver.initialize().is_err());
    }

    #[test]
    fn test_index_is_tick_ordinal() {
        let mut driver = line_driver(2);
        driver.initialize().unwrap();
        driver
            .attach(Box::new(scripted(vec![
                Value::Scalar(10.0),
                Value::Scalar(11.0),
                Value::Scalar(12.0),
            ])))
            .unwrap();

        let outcomes: Vec<bool> = (0..3)
            .map(|_| match driver.tick().unwrap() {
                TickOutcome::Drawn(ids) => !ids.is_empty(),
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(outcomes, vec![true, false, true]);
        assert_eq!(driver.ticks(), 3);

        // Fourth receive sees the end frame
        assert_eq!(driver.tick().unwrap(), TickOutcome::Closed);
        assert_eq!(driver.state(), DriverState::Closed);

        let line = &driver.figure().axes().lines[0];
        assert_eq!(line.xs, vec![0.0, 1.0, 2.0]);
        assert_eq!(line.ys, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_strategy_error_propagates() {
        let mut driver = line_driver(1);
        driver.initialize().unwrap();

        let mut source = MockFrameSource::new();
        source
            .expect_receive()
            .times(1)
            .returning(|| Ok(Receipt::Value(Value::Text("oops".into()))));
        driver.attach(Box::new(source)).unwrap();

        let err = driver.tick().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(driver.state(), DriverState::Running);
    }

    #[test]
    fn test_source_error_propagates() {
        let mut driver = line_driver(1);
        driver.initialize().unwrap();

        let mut source = MockFrameSource::new();
        source
            .expect_receive()
            .times(1)
            .returning(|| Err(LivePlotError::Codec("garbage".into())));
        driver.attach(Box::new(source)).unwrap();

        assert!(matches!(driver.tick(), Err(LivePlotError::Codec(_))));
    }

    #[test]
    fn test_multi_line_allocates_on_first_tick_only() {
        let settings = StrategySettings::default().with_plot_frequency(1);
        let mut driver = RenderDriver::new(build_strategy(StrategyKind::MultiLine, &settings));
        driver.initialize().unwrap();
        driver
            .attach(Box::new(scripted(vec![
                Value::Vector(vec![0.0; 4]),
                Value::Vector(vec![1.0; 4]),
            ])))
            .unwrap();

        driver.tick().unwrap();
        assert_eq!(driver.figure().axes().lines.len(), 4);
        driver.tick().unwrap();
        assert_eq!(driver.figure().axes().lines.len(), 4);
        assert_eq!(driver.tick().unwrap(), TickOutcome::Closed);
    }
}
