//! Render strategies
//!
//! A render strategy turns the stream of values of one topic into updates
//! of a [`Figure`]. Every strategy has the same two-step contract:
//!
//! 1. [`RenderStrategy::init`] runs once, inside the plotting process, and
//!    builds the fixed parts of the figure (title, labels, empty artists).
//! 2. [`RenderStrategy::plot_loop`] runs once per received value with the
//!    tick index, accumulates history, and on redraw ticks pushes the history
//!    into the figure. It returns the artists it touched.
//!
//! Strategies validate their input before touching any state. A value of the
//! wrong shape, type or domain is an error for that tick and never enters the
//! accumulated history.
//!
//! # Variants
//!
//! - [`LineSeries`] - one line from scalars or `(scalar, x)` pairs
//! - [`MultiLineSeries`] - one line per vector element
//! - [`ImageFrame`] - a 2-D array shown as a colour image
//! - [`SpikeRaster`] - binary vectors drawn as a raster over a sliding window

pub mod image;
pub mod line;
pub mod multi_line;
pub mod spikes;

pub use image::ImageFrame;
pub use line::LineSeries;
pub use multi_line::MultiLineSeries;
pub use spikes::{SpikeRaster, SPIKE_OFF_AXIS};

use crate::config::StrategySettings;
use crate::error::{LivePlotError, Result};
use crate::figure::{ArtistId, Figure};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common capability of every plot variant
pub trait RenderStrategy: Send {
    /// Short name used in logs and validation errors
    fn name(&self) -> &'static str;

    /// Build the fixed elements of the figure. Called once before any value.
    fn init(&mut self, figure: &mut Figure) -> Result<()>;

    /// Consume one value received at tick `index`, returning the artists that
    /// were redrawn (empty on ticks that only accumulate).
    fn plot_loop(&mut self, value: &Value, index: u64, figure: &mut Figure)
        -> Result<Vec<ArtistId>>;
}

/// Selects a strategy from configuration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Single line series
    #[default]
    Line,
    /// One line per vector element
    MultiLine,
    /// 2-D image frame
    Image,
    /// Spike raster
    Spikes,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Line => "line",
            StrategyKind::MultiLine => "multi-line",
            StrategyKind::Image => "image",
            StrategyKind::Spikes => "spikes",
        };
        f.write_str(name)
    }
}

/// Build the strategy selected by `kind`
pub fn build_strategy(kind: StrategyKind, settings: &StrategySettings) -> Box<dyn RenderStrategy> {
    match kind {
        StrategyKind::Line => Box::new(LineSeries::new(settings.clone())),
        StrategyKind::MultiLine => Box::new(MultiLineSeries::new(settings.clone())),
        StrategyKind::Image => Box::new(ImageFrame::new(settings.clone())),
        StrategyKind::Spikes => Box::new(SpikeRaster::new(settings.clone())),
    }
}

/// Apply title and axis labels from the settings
fn decorate(figure: &mut Figure, settings: &StrategySettings) {
    if let Some(title) = &settings.title {
        figure.set_title(title.clone());
    }
    if let Some(xlabel) = &settings.xlabel {
        figure.set_xlabel(xlabel.clone());
    }
    if let Some(ylabel) = &settings.ylabel {
        figure.set_ylabel(ylabel.clone());
    }
}

/// Split a value into its payload and x coordinate; without an explicit x the
/// tick index is used.
fn payload_and_x(value: &Value, index: u64) -> (&Value, f64) {
    let (payload, x) = value.split_x();
    (payload, x.unwrap_or(index as f64))
}

fn not_initialized(strategy: &'static str) -> LivePlotError {
    LivePlotError::State(format!("{}: plot_loop called before init", strategy))
}
