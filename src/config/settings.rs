//! Per-plotter display settings
//!
//! These are the knobs handed to a render strategy when it builds its
//! figure, and to the window hosting it.
//!
//! # Main Types
//!
//! - [`StrategySettings`] - Titles, labels, redraw frequency, line and image styling
//! - [`WindowConfig`] - Native window size and title

use crate::figure::Colormap;
use serde::{Deserialize, Serialize};

/// Default number of ticks between redraws
pub const DEFAULT_PLOT_FREQUENCY: u32 = 10;

/// Default visible x-range of a spike raster
pub const DEFAULT_SPIKE_WINDOW: f64 = 100.0;

/// Settings passed to a render strategy's `init`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    /// Plot title
    pub title: Option<String>,

    /// X-axis label
    pub xlabel: Option<String>,

    /// Y-axis label
    pub ylabel: Option<String>,

    /// Redraw every N-th tick. Values in between are still accumulated
    /// (line series) or dropped (image frames).
    pub plot_frequency: u32,

    /// RGBA line colour; `None` picks from the palette
    pub line_color: Option<[u8; 4]>,

    /// Line width in points
    pub line_width: f32,

    /// Marker radius for spike rasters
    pub marker_radius: f32,

    /// Colormap for image frames
    pub colormap: Colormap,

    /// Width of the sliding x-window of a spike raster
    pub spike_window: f64,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            title: None,
            xlabel: None,
            ylabel: None,
            plot_frequency: DEFAULT_PLOT_FREQUENCY,
            line_color: None,
            line_width: 1.5,
            marker_radius: 2.0,
            colormap: Colormap::default(),
            spike_window: DEFAULT_SPIKE_WINDOW,
        }
    }
}

impl StrategySettings {
    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set both axis labels
    pub fn with_labels(mut self, xlabel: impl Into<String>, ylabel: impl Into<String>) -> Self {
        self.xlabel = Some(xlabel.into());
        self.ylabel = Some(ylabel.into());
        self
    }

    /// Set the redraw frequency
    pub fn with_plot_frequency(mut self, plot_frequency: u32) -> Self {
        self.plot_frequency = plot_frequency;
        self
    }

    /// Whether tick `index` is a redraw tick
    ///
    /// A frequency of zero is rejected by config validation; it is treated
    /// as 1 here so the check never divides by zero.
    pub fn is_redraw_tick(&self, index: u64) -> bool {
        index % u64::from(self.plot_frequency.max(1)) == 0
    }
}

/// Native window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Inner width in logical pixels
    pub width: f32,

    /// Inner height in logical pixels
    pub height: f32,

    /// Window title; defaults to the topic name
    pub title: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            title: None,
        }
    }
}
