//! Error handling for liveplotter
//!
//! This module defines the error type shared by the recorder, the subscriber
//! channel, the render driver and the plot strategies, plus a Result alias.
//! None of these errors are retried: they propagate to the caller and are
//! expected to end the process context that raised them.

use thiserror::Error;

/// Main error type for liveplotter operations
#[derive(Error, Debug)]
pub enum LivePlotError {
    /// Errors related to configuration loading/saving or invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// The publish endpoint could not be bound (e.g. port already in use)
    #[error("Failed to bind {endpoint}: {source}")]
    Bind {
        endpoint: String,
        #[source]
        source: zeromq::ZmqError,
    },

    /// The subscriber could not reach the publish endpoint
    #[error("Failed to connect to {endpoint}: {message}")]
    Connect { endpoint: String, message: String },

    /// Errors raised by the ZeroMQ sockets after setup
    #[error("Transport error: {0}")]
    Transport(#[from] zeromq::ZmqError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(String),

    /// Attempt to record the reserved end-of-stream value as data
    #[error("Cannot record the reserved sentinel value on topic '{topic}'")]
    SentinelValue { topic: String },

    /// Topic names that cannot be used on the wire
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    /// `receive` called after the stream reported closure
    #[error("Stream for topic '{topic}' is already closed")]
    StreamClosed { topic: String },

    /// A plot strategy rejected a value (wrong shape, type or domain)
    #[error("{strategy}: {message}")]
    Validation {
        strategy: &'static str,
        message: String,
    },

    /// Render driver used outside of its lifecycle
    #[error("Driver state error: {0}")]
    State(String),

    /// Plotter child process errors
    #[error("Process error: {0}")]
    Process(String),

    /// Errors raised by the windowing toolkit
    #[error("GUI error: {0}")]
    Gui(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<LivePlotError>,
    },
}

impl LivePlotError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        LivePlotError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a strategy validation failure
    pub fn validation(strategy: &'static str, message: impl Into<String>) -> Self {
        LivePlotError::Validation {
            strategy,
            message: message.into(),
        }
    }

    /// Whether this error (or the error it wraps) is a validation failure
    pub fn is_validation(&self) -> bool {
        match self {
            LivePlotError::Validation { .. } => true,
            LivePlotError::WithContext { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

/// Result type alias for liveplotter operations
pub type Result<T> = std::result::Result<T, LivePlotError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LivePlotError::Codec("frame has 3 parts".to_string());
        assert_eq!(err.to_string(), "Codec error: frame has 3 parts");
    }

    #[test]
    fn test_error_with_context() {
        let err = LivePlotError::InvalidTopic("bad".to_string());
        let with_ctx = err.with_context("Failed to subscribe");
        assert!(with_ctx.to_string().contains("Failed to subscribe"));
    }

    #[test]
    fn test_sentinel_error_names_topic() {
        let err = LivePlotError::SentinelValue {
            topic: "divtime".to_string(),
        };
        assert!(err.to_string().contains("divtime"));
    }

    #[test]
    fn test_validation_survives_context() {
        let err = LivePlotError::validation("line", "expected a scalar");
        assert_eq!(err.to_string(), "line: expected a scalar");

        let wrapped: Result<()> = Err(err);
        let wrapped = wrapped.context("tick 4");
        assert!(wrapped.unwrap_err().is_validation());
    }
}
