//! Figure rendering using egui_plot
//!
//! [`FigureView`] turns a [`Figure`] into egui widgets every frame. Line
//! artists become `egui_plot` lines or point markers inside one plot; image
//! artists become textures that are only re-uploaded when their data changes.

use crate::figure::{ArtistId, Axes, Bounds, Figure, ImageArtist, LineArtist, LineStyle};
use egui::load::SizedTexture;
use egui::{Color32, ColorImage, TextureHandle, TextureOptions, Ui};
use egui_plot::{Corner, GridInput, GridMark, Legend, Line, Plot, PlotBounds, PlotPoints, PlotUi, Points};
use std::collections::HashMap;

/// Palette for lines without an explicit colour
const PALETTE: [[u8; 3]; 8] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [127, 127, 127],
];

/// Colour for the `index`-th line
pub fn palette_color(index: usize) -> Color32 {
    let [r, g, b] = PALETTE[index % PALETTE.len()];
    Color32::from_rgb(r, g, b)
}

fn line_color(line: &LineArtist, index: usize) -> Color32 {
    match line.color {
        Some([r, g, b, a]) => Color32::from_rgba_unmultiplied(r, g, b, a),
        None => palette_color(index),
    }
}

/// Grid marks at exactly the given tick positions
fn fixed_marks(ticks: &[f64], input: GridInput) -> Vec<GridMark> {
    let (lo, hi) = input.bounds;
    let step_size = (hi - lo).abs().max(f64::EPSILON);
    ticks
        .iter()
        .filter(|t| **t >= lo && **t <= hi)
        .map(|t| GridMark {
            value: *t,
            step_size,
        })
        .collect()
}

fn plot_bounds(bounds: Bounds) -> PlotBounds {
    PlotBounds::from_min_max([bounds.x.0, bounds.y.0], [bounds.x.1, bounds.y.1])
}

/// Uploaded texture of one image artist
struct ImageTexture {
    revision: u64,
    handle: TextureHandle,
}

/// Renders a [`Figure`]
pub struct FigureView {
    id: String,
    show_grid: bool,
    textures: HashMap<ArtistId, ImageTexture>,
}

impl FigureView {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            show_grid: true,
            textures: HashMap::new(),
        }
    }

    /// Draw the figure into the remaining space of `ui`
    pub fn show(&mut self, ui: &mut Ui, figure: &Figure) {
        let axes = figure.axes();
        if let Some(title) = &axes.title {
            ui.vertical_centered(|ui| ui.heading(title));
        }

        if axes.lines.is_empty() && !axes.images.is_empty() {
            for image in &axes.images {
                self.show_image(ui, image);
            }
        } else {
            self.show_plot(ui, axes, figure.view_bounds());
        }
    }

    fn show_plot(&self, ui: &mut Ui, axes: &Axes, bounds: Option<Bounds>) {
        let mut plot = Plot::new(self.id.as_str())
            .show_axes(axes.axis_visible)
            .show_grid(self.show_grid && axes.axis_visible)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false);

        if let Some(label) = &axes.xlabel {
            plot = plot.x_axis_label(label.clone());
        }
        if let Some(label) = &axes.ylabel {
            plot = plot.y_axis_label(label.clone());
        }
        if axes.lines.iter().any(|l| l.label.is_some()) {
            plot = plot.legend(Legend::default().position(Corner::RightTop));
        }
        if let Some(ticks) = axes.y_ticks.clone() {
            plot = plot.y_grid_spacer(move |input| fixed_marks(&ticks, input));
        }

        plot.show(ui, |plot_ui| {
            if let Some(bounds) = bounds {
                plot_ui.set_plot_bounds(plot_bounds(bounds));
            }
            for (index, line) in axes.lines.iter().enumerate() {
                render_line(plot_ui, line, index);
            }
        });
    }

    fn show_image(&mut self, ui: &mut Ui, image: &ImageArtist) {
        let (rows, cols) = image.data.shape();
        if rows == 0 || cols == 0 {
            return;
        }

        let stale = self
            .textures
            .get(&image.id)
            .is_none_or(|t| t.revision != image.revision);
        if stale {
            let pixels = ColorImage::from_rgb([cols, rows], &image.to_rgb());
            let handle = ui.ctx().load_texture(
                format!("{}-{:?}", self.id, image.id),
                pixels,
                TextureOptions::NEAREST,
            );
            self.textures.insert(
                image.id,
                ImageTexture {
                    revision: image.revision,
                    handle,
                },
            );
        }

        if let Some(texture) = self.textures.get(&image.id) {
            // Fit inside the available area, keeping the aspect ratio
            let available = ui.available_size();
            let scale = (available.x / cols as f32).min(available.y / rows as f32);
            let size = egui::vec2(cols as f32 * scale, rows as f32 * scale);
            ui.centered_and_justified(|ui| {
                ui.add(
                    egui::Image::from_texture(SizedTexture::from_handle(&texture.handle))
                        .fit_to_exact_size(size),
                );
            });
        }
    }
}

fn render_line(plot_ui: &mut PlotUi, line: &LineArtist, index: usize) {
    if line.xs.is_empty() {
        return;
    }
    let name = line.label.clone().unwrap_or_default();
    let points = PlotPoints::from(line.points());
    let color = line_color(line, index);

    match line.style {
        LineStyle::Solid => {
            plot_ui.line(Line::new(name, points).color(color).width(line.width));
        }
        LineStyle::Markers => {
            plot_ui.points(Points::new(name, points).color(color).radius(line.width));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(0), palette_color(PALETTE.len()));
        assert_ne!(palette_color(0), palette_color(1));
    }

    #[test]
    fn test_explicit_color_wins() {
        let mut figure = Figure::new();
        let id = figure.add_line(LineStyle::Solid, Some([1, 2, 3, 255]), 1.0);
        let line = figure.line(id).unwrap();
        assert_eq!(line_color(line, 5), Color32::from_rgb(1, 2, 3));
    }

    #[test]
    fn test_plot_bounds_conversion() {
        let bounds = plot_bounds(Bounds {
            x: (0.0, 10.0),
            y: (-1.0, 1.0),
        });
        assert_eq!(bounds.min(), [0.0, -1.0]);
        assert_eq!(bounds.max(), [10.0, 1.0]);
    }
}
