//! Spike raster over a sliding window

use super::{decorate, not_initialized, payload_and_x, RenderStrategy};
use crate::config::StrategySettings;
use crate::error::{LivePlotError, Result};
use crate::figure::{ArtistId, Figure, LineStyle};
use crate::types::Value;
use std::collections::VecDeque;

const NAME: &str = "spikes";

/// Y coordinate given to inactive sources so their markers fall outside the
/// visible range `[1, n + 1]`.
pub const SPIKE_OFF_AXIS: f64 = -10.0;

/// Map a binary activity vector to marker heights: source `j` sits at
/// `j + 1` when active, off-axis otherwise.
pub fn encode_spikes(spikes: &[f64]) -> Vec<f64> {
    spikes
        .iter()
        .enumerate()
        .map(|(j, s)| if *s == 1.0 { (j + 1) as f64 } else { SPIKE_OFF_AXIS })
        .collect()
}

/// Raster of binary spike vectors
///
/// One marker series per source. On redraw ticks the x-range shown is
/// `[last_x - spike_window, last_x]`; samples older than that are discarded.
#[derive(Debug)]
pub struct SpikeRaster {
    settings: StrategySettings,
    initialized: bool,
    lines: Vec<ArtistId>,
    history: VecDeque<(f64, Vec<f64>)>,
}

impl SpikeRaster {
    pub fn new(settings: StrategySettings) -> Self {
        Self {
            settings,
            initialized: false,
            lines: Vec::new(),
            history: VecDeque::new(),
        }
    }

    /// Number of samples currently retained
    pub fn retained(&self) -> usize {
        self.history.len()
    }

    fn allocate(&mut self, count: usize, figure: &mut Figure) {
        for _ in 0..count {
            let id = figure.add_line(
                LineStyle::Markers,
                self.settings.line_color,
                self.settings.marker_radius,
            );
            self.lines.push(id);
        }
        let top = (count + 1) as f64;
        figure.set_ylim(1.0, top);
        figure.set_y_ticks(vec![0.0, top]);
        tracing::debug!("{} allocated {} sources", NAME, count);
    }

    fn check(values: &[f64]) -> Result<()> {
        if values.is_empty() {
            return Err(LivePlotError::validation(NAME, "empty spike vector"));
        }
        if let Some(bad) = values.iter().find(|v| **v != 0.0 && **v != 1.0) {
            return Err(LivePlotError::validation(
                NAME,
                format!("spike values must be 0 or 1, got {}", bad),
            ));
        }
        Ok(())
    }
}

impl RenderStrategy for SpikeRaster {
    fn name(&self) -> &'static str {
        NAME
    }

    fn init(&mut self, figure: &mut Figure) -> Result<()> {
        decorate(figure, &self.settings);
        figure.set_autoscale(false);
        self.initialized = true;
        Ok(())
    }

    fn plot_loop(
        &mut self,
        value: &Value,
        index: u64,
        figure: &mut Figure,
    ) -> Result<Vec<ArtistId>> {
        if !self.initialized {
            return Err(not_initialized(NAME));
        }

        let (payload, x) = payload_and_x(value, index);
        let values = payload.as_vector().ok_or_else(|| {
            LivePlotError::validation(
                NAME,
                format!("expected a binary vector, got {}", value.kind()),
            )
        })?;
        Self::check(values)?;

        if self.lines.is_empty() {
            self.allocate(values.len(), figure);
        } else if values.len() != self.lines.len() {
            return Err(LivePlotError::validation(
                NAME,
                format!(
                    "source count changed from {} to {}",
                    self.lines.len(),
                    values.len()
                ),
            ));
        }

        self.history.push_back((x, encode_spikes(values)));

        if !self.settings.is_redraw_tick(index) {
            return Ok(Vec::new());
        }

        let lo = x - self.settings.spike_window;
        while self.history.front().is_some_and(|(hx, _)| *hx < lo) {
            self.history.pop_front();
        }

        let xs: Vec<f64> = self.history.iter().map(|(hx, _)| *hx).collect();
        for (j, id) in self.lines.iter().enumerate() {
            let ys = self.history.iter().map(|(_, sps)| sps[j]).collect();
            figure.set_line_data(*id, xs.clone(), ys)?;
        }
        figure.set_xlim(lo, x);
        figure.relim();
        Ok(self.lines.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(frequency: u32, window: f64) -> (SpikeRaster, Figure) {
        let mut figure = Figure::new();
        let mut settings = StrategySettings::default().with_plot_frequency(frequency);
        settings.spike_window = window;
        let mut strategy = SpikeRaster::new(settings);
        strategy.init(&mut figure).unwrap();
        (strategy, figure)
    }

    #[test]
    fn test_encode_spikes() {
        assert_eq!(
            encode_spikes(&[1.0, 0.0, 1.0]),
            vec![1.0, SPIKE_OFF_AXIS, 3.0]
        );
    }

    #[test]
    fn test_first_value_allocates_sources() {
        let (mut strategy, mut figure) = setup(1, 100.0);
        let drawn = strategy
            .plot_loop(&Value::Vector(vec![1.0, 0.0, 1.0]), 0, &mut figure)
            .unwrap();

        assert_eq!(drawn.len(), 3);
        let axes = figure.axes();
        assert_eq!(axes.ylim, Some((1.0, 4.0)));
        assert_eq!(axes.y_ticks, Some(vec![0.0, 4.0]));
        assert!(axes.lines.iter().all(|l| l.style == LineStyle::Markers));
        assert_eq!(axes.lines[1].ys, vec![SPIKE_OFF_AXIS]);
        assert_eq!(axes.lines[2].ys, vec![3.0]);
    }

    #[test]
    fn test_rejects_non_binary() {
        let (mut strategy, mut figure) = setup(1, 100.0);
        let err = strategy
            .plot_loop(&Value::Vector(vec![0.0, 0.5]), 0, &mut figure)
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(strategy.retained(), 0);
        assert!(figure.axes().lines.is_empty());
    }

    #[test]
    fn test_rejects_source_count_change() {
        let (mut strategy, mut figure) = setup(1, 100.0);
        strategy
            .plot_loop(&Value::Vector(vec![0.0, 1.0]), 0, &mut figure)
            .unwrap();
        assert!(strategy
            .plot_loop(&Value::Vector(vec![0.0]), 1, &mut figure)
            .is_err());
        assert_eq!(strategy.retained(), 1);
    }

    #[test]
    fn test_sliding_window() {
        let (mut strategy, mut figure) = setup(1, 5.0);
        for index in 0..20 {
            strategy
                .plot_loop(&Value::Vector(vec![1.0]), index, &mut figure)
                .unwrap();
        }

        let axes = figure.axes();
        assert_eq!(axes.xlim, Some((14.0, 19.0)));
        assert_eq!(axes.lines[0].xs.first(), Some(&14.0));
        assert_eq!(axes.lines[0].xs.last(), Some(&19.0));
        assert_eq!(strategy.retained(), 6);
    }

    #[test]
    fn test_explicit_x_drives_window() {
        let (mut strategy, mut figure) = setup(1, 1.0);
        strategy
            .plot_loop(&Value::from((vec![1.0, 1.0], 10.0)), 0, &mut figure)
            .unwrap();
        assert_eq!(figure.axes().xlim, Some((9.0, 10.0)));
    }

    #[test]
    fn test_accumulates_between_redraws() {
        let (mut strategy, mut figure) = setup(3, 100.0);
        for index in 0..3 {
            strategy
                .plot_loop(&Value::Vector(vec![1.0]), index, &mut figure)
                .unwrap();
        }
        assert_eq!(figure.axes().lines[0].xs.len(), 1);
        strategy
            .plot_loop(&Value::Vector(vec![0.0]), 3, &mut figure)
            .unwrap();
        assert_eq!(figure.axes().lines[0].ys, vec![1.0, 1.0, 1.0, SPIKE_OFF_AXIS]);
    }
}
