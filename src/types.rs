//! Core data types for liveplotter
//!
//! This module contains the values that travel from a simulation to the
//! plotting processes.
//!
//! # Main Types
//!
//! - [`Value`] - A recorded payload (scalar, vector, matrix, text or a `(payload, x)` pair)
//! - [`Matrix`] - Row-major 2-D array used for image frames
//! - [`Topic`] - Validated name of one variable stream
//!
//! # Type identity
//!
//! Plot strategies branch on the variant of a [`Value`], so the wire codec
//! must hand back exactly the variant that was recorded: a `Pair` stays a
//! `Pair`, a `Matrix` stays a `Matrix`, an `Integer` does not turn into a
//! `Scalar`.

use crate::error::{LivePlotError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known port the recorder binds and plotters connect to
pub const DEFAULT_PORT: u16 = 5155;

/// Reserved end-of-stream marker. Recording it as data is a protocol violation.
pub const SENTINEL: &str = "SENTINEL";

/// Row-major 2-D array of `f64`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix, checking that `data` holds exactly `rows * cols` values
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        let matrix = Self { rows, cols, data };
        matrix.check_shape()?;
        Ok(matrix)
    }

    /// Matrix of the given shape filled with `value`
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Build a matrix from a list of equally sized rows
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|r| r.len() != n_cols) {
            return Err(LivePlotError::Codec(format!(
                "row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                n_cols
            )));
        }
        Self::new(n_rows, n_cols, rows.into_iter().flatten().collect())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Element at `(row, col)`, or `None` if out of range
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// Set element at `(row, col)`. Out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        if row < self.rows && col < self.cols {
            if let Some(slot) = self.data.get_mut(row * self.cols + col) {
                *slot = value;
            }
        }
    }

    /// Smallest and largest element, `None` for an empty matrix
    pub fn min_max(&self) -> Option<(f64, f64)> {
        if self.data.is_empty() {
            return None;
        }
        let min = self.data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    fn check_shape(&self) -> Result<()> {
        if self.rows.checked_mul(self.cols) != Some(self.data.len()) {
            return Err(LivePlotError::Codec(format!(
                "matrix {}x{} carries {} elements",
                self.rows,
                self.cols,
                self.data.len()
            )));
        }
        Ok(())
    }
}

/// A recorded payload
///
/// No schema is enforced at this level; each plot strategy decides which
/// variants it accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Single floating point sample
    Scalar(f64),
    /// Single integer sample
    Integer(i64),
    /// Free-form text
    Text(String),
    /// One value per series / source
    Vector(Vec<f64>),
    /// 2-D array (image frames)
    Matrix(Matrix),
    /// `(payload, x)` - a payload with an explicit x coordinate
    Pair(Box<Value>, f64),
}

impl Value {
    /// Whether this value equals the reserved end-of-stream marker
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Value::Text(s) if s == SENTINEL)
    }

    /// Short name of the variant, used in validation messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Integer(_) => "integer",
            Value::Text(_) => "text",
            Value::Vector(_) => "vector",
            Value::Matrix(_) => "matrix",
            Value::Pair(..) => "pair",
        }
    }

    /// Split the `(payload, x)` form into its parts; other values have no x
    pub fn split_x(&self) -> (&Value, Option<f64>) {
        match self {
            Value::Pair(payload, x) => (payload.as_ref(), Some(*x)),
            other => (other, None),
        }
    }

    /// Numeric value of a scalar or integer
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            Value::Matrix(m) => Some(m),
            _ => None,
        }
    }

    /// Check that the value can be carried on the wire: matrices must be
    /// well-shaped and every float finite.
    pub fn validate(&self) -> Result<()> {
        fn finite(v: f64, what: &str) -> Result<()> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(LivePlotError::Codec(format!("non-finite {} ({})", what, v)))
            }
        }

        match self {
            Value::Scalar(v) => finite(*v, "scalar"),
            Value::Integer(_) | Value::Text(_) => Ok(()),
            Value::Vector(vs) => vs.iter().try_for_each(|v| finite(*v, "vector element")),
            Value::Matrix(m) => {
                m.check_shape()?;
                m.data.iter().try_for_each(|v| finite(*v, "matrix element"))
            }
            Value::Pair(payload, x) => {
                if matches!(payload.as_ref(), Value::Pair(..)) {
                    return Err(LivePlotError::Codec("nested pair".to_string()));
                }
                finite(*x, "x coordinate")?;
                payload.validate()
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Vector(v) => write!(f, "vector[{}]", v.len()),
            Value::Matrix(m) => write!(f, "matrix[{}x{}]", m.rows, m.cols),
            Value::Pair(payload, x) => write!(f, "({}, x={})", payload, x),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Scalar(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Vector(v)
    }
}

impl From<Matrix> for Value {
    fn from(m: Matrix) -> Self {
        Value::Matrix(m)
    }
}

impl From<(f64, f64)> for Value {
    fn from((v, x): (f64, f64)) -> Self {
        Value::Pair(Box::new(Value::Scalar(v)), x)
    }
}

impl From<(Vec<f64>, f64)> for Value {
    fn from((v, x): (Vec<f64>, f64)) -> Self {
        Value::Pair(Box::new(Value::Vector(v)), x)
    }
}

impl From<(Matrix, f64)> for Value {
    fn from((m, x): (Matrix, f64)) -> Self {
        Value::Pair(Box::new(Value::Matrix(m)), x)
    }
}

/// Name of one logical variable stream
///
/// Never empty, never equal to [`SENTINEL`] and never contains NUL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(LivePlotError::InvalidTopic("topic must not be empty".to_string()));
        }
        if name == SENTINEL {
            return Err(LivePlotError::InvalidTopic(format!(
                "'{}' is reserved as the end-of-stream marker",
                SENTINEL
            )));
        }
        if name.contains('\0') {
            return Err(LivePlotError::InvalidTopic(format!(
                "{:?} contains a NUL character",
                name
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Topic {
    type Error = LivePlotError;

    fn try_from(value: String) -> Result<Self> {
        Topic::new(value)
    }
}

impl TryFrom<&str> for Topic {
    type Error = LivePlotError;

    fn try_from(value: &str) -> Result<Self> {
        Topic::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
