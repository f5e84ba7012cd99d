//! # liveplotter: live plotting of a running simulation
//!
//! A simulation publishes named variables through a [`Recorder`]; each
//! variable is plotted live by its own plotter process that subscribes to
//! it over ZeroMQ. Recording never blocks the simulation: values published
//! while no plotter is connected are simply lost.
//!
//! ## Architecture
//!
//! - **Transport**: a PUB socket in the simulation, one SUB socket per plotter,
//!   topic filtering done by the socket
//! - **Protocol**: two-part frames (JSON topic, tagged JSON message) with an
//!   explicit end-of-stream message per topic
//! - **Driver**: a small state machine that pulls one value per tick and hands
//!   it to a render strategy
//! - **Strategies**: line, multi-line, image and spike raster plots drawing on a
//!   retained-mode [`Figure`]
//! - **Frontend**: an eframe/egui window per plotter, egui_plot for rendering
//!
//! ## Configuration
//!
//! Plotters read a TOML [`PlotterConfig`]; when none is given the default
//! file in the platform config directory is used if present:
//!
//! - **Linux**: `~/.config/liveplotter/plotter.toml`
//! - **macOS**: `~/Library/Application Support/liveplotter/plotter.toml`
//! - **Windows**: `%APPDATA%\liveplotter\plotter.toml`
//!
//! ## Example
//!
//! ```ignore
//! use liveplotter::{PlotterConfig, PlotterProcess, Recorder, StrategyKind};
//!
//! fn main() -> liveplotter::Result<()> {
//!     let mut plotter = PlotterProcess::spawn(&PlotterConfig::new("x", StrategyKind::Line))?;
//!
//!     let mut recorder = Recorder::bind(liveplotter::DEFAULT_PORT)?;
//!     for i in 0..1000 {
//!         recorder.record("x", (i as f64 * 0.01).sin())?;
//!     }
//!     recorder.close("x")?;
//!
//!     plotter.wait()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod demo;
pub mod driver;
pub mod error;
pub mod figure;
pub mod frontend;
pub mod protocol;
pub mod strategy;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::{PlotterConfig, RecorderConfig, StrategySettings, SubscriberConfig};
pub use driver::{DriverState, PlotterProcess, RenderDriver, TickOutcome, TickScheduler};
pub use error::{LivePlotError, Result};
pub use figure::{ArtistId, Figure};
pub use strategy::{RenderStrategy, StrategyKind};
pub use transport::{FrameSource, Receipt, Recorder, SubscriberChannel};
pub use types::{Matrix, Topic, Value, DEFAULT_PORT, SENTINEL};
