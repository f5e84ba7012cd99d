//! Retained-mode drawing surface
//!
//! A [`Figure`] is what a render strategy draws on. It mirrors the small part
//! of a plotting toolkit the strategies need: one set of axes holding line
//! artists and image artists whose data can be replaced in place, explicit
//! or automatic axis limits, and a few decorations (title, labels, fixed
//! ticks).
//!
//! The figure holds data only. The frontend turns it into pixels every frame
//! (see [`crate::frontend::FigureView`]), which keeps the strategies testable
//! without a window and keeps every toolkit object inside the process that
//! owns the figure.

use crate::error::{LivePlotError, Result};
use crate::types::Matrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Padding added around the data limits when autoscaling (fraction of range)
pub const AUTOSCALE_MARGIN: f64 = 0.05;

/// Handle to an artist on a [`Figure`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtistId(pub u32);

impl fmt::Debug for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArtistId({})", self.0)
    }
}

/// How a line artist is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    /// Connected line
    #[default]
    Solid,
    /// Unconnected point markers
    Markers,
}

/// Colormap used to turn image values into colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Colormap {
    #[default]
    Viridis,
    Gray,
    Hot,
}

impl Colormap {
    /// Map `t` in `[0, 1]` to RGB. Values outside the range are clamped.
    pub fn rgb(self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Gray => {
                let v = (t * 255.0).round() as u8;
                [v, v, v]
            }
            Colormap::Hot => {
                let r = (t * 3.0).min(1.0);
                let g = (t * 3.0 - 1.0).clamp(0.0, 1.0);
                let b = (t * 3.0 - 2.0).clamp(0.0, 1.0);
                [to_u8(r), to_u8(g), to_u8(b)]
            }
            Colormap::Viridis => {
                // Piecewise-linear through five anchor colours of viridis
                const ANCHORS: [[f64; 3]; 5] = [
                    [68.0, 1.0, 84.0],
                    [59.0, 82.0, 139.0],
                    [33.0, 145.0, 140.0],
                    [94.0, 201.0, 98.0],
                    [253.0, 231.0, 37.0],
                ];
                let scaled = t * (ANCHORS.len() - 1) as f64;
                let lo = (scaled.floor() as usize).min(ANCHORS.len() - 2);
                let frac = scaled - lo as f64;
                let mut out = [0u8; 3];
                for (c, slot) in out.iter_mut().enumerate() {
                    let v = ANCHORS[lo][c] + (ANCHORS[lo + 1][c] - ANCHORS[lo][c]) * frac;
                    *slot = v.round().clamp(0.0, 255.0) as u8;
                }
                out
            }
        }
    }
}

fn to_u8(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// A polyline or marker series
#[derive(Debug, Clone, PartialEq)]
pub struct LineArtist {
    pub id: ArtistId,
    pub label: Option<String>,
    pub style: LineStyle,
    pub color: Option<[u8; 4]>,
    pub width: f32,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl LineArtist {
    /// Points as `[x, y]` pairs
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.xs.iter().zip(&self.ys).map(|(x, y)| [*x, *y]).collect()
    }
}

/// A 2-D array drawn as a colour image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageArtist {
    pub id: ArtistId,
    pub data: Matrix,
    pub colormap: Colormap,
    /// Bumped every time the data is replaced
    pub revision: u64,
}

impl ImageArtist {
    /// Row-major RGB bytes, normalised over the current data range
    pub fn to_rgb(&self) -> Vec<u8> {
        let (min, max) = self.data.min_max().unwrap_or((0.0, 1.0));
        let span = max - min;
        let mut rgb = Vec::with_capacity(self.data.data().len() * 3);
        for v in self.data.data() {
            let t = if span > 0.0 { (v - min) / span } else { 0.0 };
            rgb.extend_from_slice(&self.colormap.rgb(t));
        }
        rgb
    }
}

/// Axis-aligned bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Bounds {
    fn padded(self, margin: f64) -> Self {
        Self {
            x: pad(self.x, margin),
            y: pad(self.y, margin),
        }
    }
}

fn pad((lo, hi): (f64, f64), margin: f64) -> (f64, f64) {
    let span = hi - lo;
    if span > 0.0 {
        (lo - span * margin, hi + span * margin)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// One set of axes
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub lines: Vec<LineArtist>,
    pub images: Vec<ImageArtist>,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub autoscale: bool,
    /// Fixed y tick positions, if any
    pub y_ticks: Option<Vec<f64>>,
    pub axis_visible: bool,
    data_limits: Option<Bounds>,
    view: Option<Bounds>,
}

impl Default for Axes {
    fn default() -> Self {
        Self {
            title: None,
            xlabel: None,
            ylabel: None,
            lines: Vec::new(),
            images: Vec::new(),
            xlim: None,
            ylim: None,
            autoscale: true,
            y_ticks: None,
            axis_visible: true,
            data_limits: None,
            view: None,
        }
    }
}

/// The drawing surface owned by one render driver
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Figure {
    axes: Axes,
    next_id: u32,
    revision: u64,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    /// Incremented by every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn allocate_id(&mut self) -> ArtistId {
        let id = ArtistId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.axes.title = Some(title.into());
        self.touch();
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.axes.xlabel = Some(label.into());
        self.touch();
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.axes.ylabel = Some(label.into());
        self.touch();
    }

    /// Enable or disable autoscaling of the view to the data limits
    pub fn set_autoscale(&mut self, on: bool) {
        self.axes.autoscale = on;
        self.touch();
    }

    /// Hide axes, grid and ticks (used for images)
    pub fn axis_off(&mut self) {
        self.axes.axis_visible = false;
        self.touch();
    }

    pub fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.axes.xlim = Some((lo, hi));
        self.touch();
    }

    pub fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.axes.ylim = Some((lo, hi));
        self.touch();
    }

    pub fn set_y_ticks(&mut self, ticks: Vec<f64>) {
        self.axes.y_ticks = Some(ticks);
        self.touch();
    }

    /// Add an empty line artist
    pub fn add_line(&mut self, style: LineStyle, color: Option<[u8; 4]>, width: f32) -> ArtistId {
        let id = self.allocate_id();
        self.axes.lines.push(LineArtist {
            id,
            label: None,
            style,
            color,
            width,
            xs: Vec::new(),
            ys: Vec::new(),
        });
        self.touch();
        id
    }

    /// Give a line a legend label
    pub fn set_line_label(&mut self, id: ArtistId, label: impl Into<String>) -> Result<()> {
        self.line_mut(id)?.label = Some(label.into());
        self.touch();
        Ok(())
    }

    /// Replace a line's data without recreating it
    pub fn set_line_data(&mut self, id: ArtistId, xs: Vec<f64>, ys: Vec<f64>) -> Result<()> {
        if xs.len() != ys.len() {
            return Err(LivePlotError::validation(
                "figure",
                format!("x has {} points but y has {}", xs.len(), ys.len()),
            ));
        }
        let line = self.line_mut(id)?;
        line.xs = xs;
        line.ys = ys;
        self.touch();
        Ok(())
    }

    pub fn line(&self, id: ArtistId) -> Option<&LineArtist> {
        self.axes.lines.iter().find(|l| l.id == id)
    }

    fn line_mut(&mut self, id: ArtistId) -> Result<&mut LineArtist> {
        self.axes
            .lines
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| LivePlotError::State(format!("no line artist {:?}", id)))
    }

    /// Add an image artist showing `data`
    pub fn add_image(&mut self, data: Matrix, colormap: Colormap) -> ArtistId {
        let id = self.allocate_id();
        self.axes.images.push(ImageArtist {
            id,
            data,
            colormap,
            revision: 0,
        });
        self.touch();
        id
    }

    /// Replace an image's backing buffer
    pub fn set_image_data(&mut self, id: ArtistId, data: Matrix) -> Result<()> {
        let image = self
            .axes
            .images
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| LivePlotError::State(format!("no image artist {:?}", id)))?;
        image.data = data;
        image.revision += 1;
        self.touch();
        Ok(())
    }

    pub fn image(&self, id: ArtistId) -> Option<&ImageArtist> {
        self.axes.images.iter().find(|i| i.id == id)
    }

    /// Recompute the data limits from the current line data
    pub fn relim(&mut self) {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for line in &self.axes.lines {
            for (px, py) in line.xs.iter().zip(&line.ys) {
                if !(px.is_finite() && py.is_finite()) {
                    continue;
                }
                x = (x.0.min(*px), x.1.max(*px));
                y = (y.0.min(*py), y.1.max(*py));
            }
        }
        self.axes.data_limits = (x.0 <= x.1).then_some(Bounds { x, y });
        self.touch();
    }

    /// Fit the view to the data limits (when autoscaling is on)
    pub fn autoscale_view(&mut self) {
        if self.axes.autoscale {
            self.axes.view = self
                .axes
                .data_limits
                .map(|b| b.padded(AUTOSCALE_MARGIN));
            self.touch();
        }
    }

    /// Last computed data limits
    pub fn data_limits(&self) -> Option<Bounds> {
        self.axes.data_limits
    }

    /// Bounds to display: explicit limits win, otherwise the autoscaled view
    pub fn view_bounds(&self) -> Option<Bounds> {
        let view = self.axes.view;
        let x = self.axes.xlim.or(view.map(|v| v.x))?;
        let y = self.axes.ylim.or(view.map(|v| v.y))?;
        Some(Bounds { x, y })
    }
}
