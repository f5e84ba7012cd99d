//! Configuration module for liveplotter
//!
//! This module handles the configuration of both ends of the channel:
//! - [`RecorderConfig`] - where the simulation publishes
//! - [`SubscriberConfig`] - where a plotter connects and how it waits for the recorder
//! - [`PlotterConfig`] - everything one plotter process needs (topic, strategy, cadence, window)
//!
//! # Files
//!
//! Plotter configurations are stored as TOML. When no file is given on the
//! command line, the default location is used if it exists:
//! - **Linux**: `~/.config/liveplotter/plotter.toml`
//! - **macOS**: `~/Library/Application Support/liveplotter/plotter.toml`
//! - **Windows**: `%APPDATA%\liveplotter\plotter.toml`
//!
//! A parent process hands a complete configuration to a spawned plotter as
//! JSON (see [`PlotterConfig::to_json`]).
//!
//! # Example
//!
//! ```ignore
//! use liveplotter::config::PlotterConfig;
//! use liveplotter::strategy::StrategyKind;
//!
//! let mut config = PlotterConfig::new("divtime", StrategyKind::Image);
//! config.strategy.plot_frequency = 1;
//! config.save("divtime.toml")?;
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{LivePlotError, Result};
use crate::strategy::StrategyKind;
use crate::types::{Topic, DEFAULT_PORT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for config directories
pub const APP_ID: &str = "liveplotter";

/// Default plotter config filename
pub const PLOTTER_CONFIG_FILE: &str = "plotter.toml";

/// Default interval between render ticks in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Default delay between connection attempts in milliseconds
pub const DEFAULT_CONNECT_RETRY_MS: u64 = 100;

// ==================== Config Directory ====================

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path of the default plotter configuration file
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(PLOTTER_CONFIG_FILE))
}

// ==================== Recorder ====================

/// Publisher endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Interface to bind; `0.0.0.0` listens on all interfaces
    pub bind_host: String,

    /// TCP port to publish on. Port 0 lets the OS choose.
    pub port: u16,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl RecorderConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// ZeroMQ endpoint string
    pub fn endpoint(&self) -> String {
        format!("tcp://{}:{}", self.bind_host, self.port)
    }
}

// ==================== Subscriber ====================

/// Subscriber endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriberConfig {
    /// Host the recorder runs on
    pub host: String,

    /// TCP port the recorder publishes on
    pub port: u16,

    /// Delay between connection attempts while the recorder is not up yet
    pub connect_retry_interval_ms: u64,

    /// Give up connecting after this long; `None` waits forever
    pub connect_timeout_ms: Option<u64>,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            connect_retry_interval_ms: DEFAULT_CONNECT_RETRY_MS,
            connect_timeout_ms: None,
        }
    }
}

impl SubscriberConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// ZeroMQ endpoint string
    pub fn endpoint(&self) -> String {
        format!("tcp://{}:{}", self.host, self.port)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.connect_retry_interval_ms.max(1))
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}

// ==================== Plotter ====================

/// Complete configuration of one plotter process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterConfig {
    /// Topic (variable name) to plot; must match the name used by the recorder
    pub topic: String,

    /// Which render strategy draws the values
    pub kind: StrategyKind,

    /// Where to find the recorder
    pub subscriber: SubscriberConfig,

    /// Interval between render ticks in milliseconds
    pub tick_interval_ms: u64,

    /// Strategy settings
    pub strategy: StrategySettings,

    /// Window settings
    pub window: WindowConfig,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            topic: String::new(),
            kind: StrategyKind::default(),
            subscriber: SubscriberConfig::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            strategy: StrategySettings::default(),
            window: WindowConfig::default(),
        }
    }
}

impl PlotterConfig {
    /// Create a configuration for `topic` drawn with `kind`, everything else default
    pub fn new(topic: impl Into<String>, kind: StrategyKind) -> Self {
        Self {
            topic: topic.into(),
            kind,
            ..Default::default()
        }
    }

    /// Use a different recorder port
    pub fn with_port(mut self, port: u16) -> Self {
        self.subscriber.port = port;
        self
    }

    /// Use different strategy settings
    pub fn with_strategy(mut self, strategy: StrategySettings) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Title for the native window
    pub fn window_title(&self) -> String {
        self.window
            .title
            .clone()
            .or_else(|| self.strategy.title.clone())
            .unwrap_or_else(|| format!("liveplotter - {}", self.topic))
    }

    /// Check the configuration before a plotter is started
    pub fn validate(&self) -> Result<()> {
        if self.topic.is_empty() {
            return Err(LivePlotError::Config("a topic is required".to_string()));
        }
        Topic::new(self.topic.as_str())
            .map_err(|e| LivePlotError::Config(format!("topic: {}", e)))?;

        if self.strategy.plot_frequency == 0 {
            return Err(LivePlotError::Config(
                "plot_frequency must be at least 1".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(LivePlotError::Config(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }
        if !(self.strategy.spike_window.is_finite() && self.strategy.spike_window > 0.0) {
            return Err(LivePlotError::Config(
                "spike_window must be a positive number".to_string(),
            ));
        }
        Ok(())
    }

    /// Load a plotter configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LivePlotError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            LivePlotError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Load the default configuration file if it exists
    pub fn load_default() -> Result<Option<Self>> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(path).map(Some),
            _ => Ok(None),
        }
    }

    /// Save the configuration as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LivePlotError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| LivePlotError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            LivePlotError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Serialize for handing to a child process
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| LivePlotError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Parse a configuration produced by [`to_json`](Self::to_json)
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| LivePlotError::Config(format!("Failed to parse config JSON: {}", e)))
    }
}
