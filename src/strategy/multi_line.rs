//! One line per vector element

use super::{decorate, not_initialized, payload_and_x, RenderStrategy};
use crate::config::StrategySettings;
use crate::error::{LivePlotError, Result};
use crate::figure::{ArtistId, Figure, LineStyle};
use crate::types::Value;

const NAME: &str = "multi-line";

/// Multi-line plot of a fixed-length vector
///
/// The first value decides how many lines there are. Every later value must
/// have the same length.
#[derive(Debug)]
pub struct MultiLineSeries {
    settings: StrategySettings,
    initialized: bool,
    lines: Vec<ArtistId>,
    xs: Vec<f64>,
    series: Vec<Vec<f64>>,
}

impl MultiLineSeries {
    pub fn new(settings: StrategySettings) -> Self {
        Self {
            settings,
            initialized: false,
            lines: Vec::new(),
            xs: Vec::new(),
            series: Vec::new(),
        }
    }

    /// Number of allocated lines (zero until the first value)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn allocate(&mut self, count: usize, figure: &mut Figure) -> Result<()> {
        for j in 0..count {
            let id = figure.add_line(LineStyle::Solid, None, self.settings.line_width);
            figure.set_line_label(id, format!("[{}]", j))?;
            self.lines.push(id);
            self.series.push(Vec::new());
        }
        tracing::debug!("{} allocated {} lines", NAME, count);
        Ok(())
    }
}

impl RenderStrategy for MultiLineSeries {
    fn name(&self) -> &'static str {
        NAME
    }

    fn init(&mut self, figure: &mut Figure) -> Result<()> {
        decorate(figure, &self.settings);
        figure.set_autoscale(true);
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
                format!("expected a vector or (vector, x), got {}", value.kind()),
            )
        })?;

        if self.lines.is_empty() {
            if values.is_empty() {
                return Err(LivePlotError::validation(NAME, "first vector is empty"));
            }
            self.allocate(values.len(), figure)?;
        } else if values.len() != self.lines.len() {
            return Err(LivePlotError::validation(
                NAME,
                format!(
                    "vector length changed from {} to {}",
                    self.lines.len(),
                    values.len()
                ),
            ));
        }

        self.xs.push(x);
        for (history, v) in self.series.iter_mut().zip(values) {
            history.push(*v);
        }

        if !self.settings.is_redraw_tick(index) {
            return Ok(Vec::new());
        }

        for (id, history) in self.lines.iter().zip(&self.series) {
            figure.set_line_data(*id, self.xs.clone(), history.clone())?;
        }
        figure.relim();
        figure.autoscale_view();
        Ok(self.lines.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(frequency: u32) -> (MultiLineSeries, Figure) {
        let mut figure = Figure::new();
        let mut strategy =
            MultiLineSeries::new(StrategySettings::default().with_plot_frequency(frequency));
        strategy.init(&mut figure).unwrap();
        (strategy, figure)
    }

    #[test]
    fn test_no_lines_before_first_value() {
        let (strategy, figure) = setup(1);
        assert_eq!(strategy.line_count(), 0);
        assert!(figure.axes().lines.is_empty());
    }

    #[test]
    fn test_allocates_one_line_per_element() {
        let (mut strategy, mut figure) = setup(1);
        let drawn = strategy
            .plot_loop(&Value::Vector(vec![1.0, 2.0, 3.0]), 0, &mut figure)
            .unwrap();

        assert_eq!(drawn.len(), 3);
        assert_eq!(figure.axes().lines.len(), 3);
        assert_eq!(figure.axes().lines[2].ys, vec![3.0]);
        assert_eq!(figure.axes().lines[1].label.as_deref(), Some("[1]"));
    }

    #[test]
    fn test_length_change_rejected() {
        let (mut strategy, mut figure) = setup(1);
        strategy
            .plot_loop(&Value::Vector(vec![1.0, 2.0]), 0, &mut figure)
            .unwrap();

        let err = strategy
            .plot_loop(&Value::Vector(vec![1.0, 2.0, 3.0]), 1, &mut figure)
            .unwrap_err();
        assert!(err.is_validation());

        // History untouched by the rejected value
        strategy
            .plot_loop(&Value::Vector(vec![5.0, 6.0]), 2, &mut figure)
            .unwrap();
        assert_eq!(figure.axes().lines[0].ys, vec![1.0, 5.0]);
        assert_eq!(figure.axes().lines[0].xs, vec![0.0, 2.0]);
    }

    #[test]
    fn test_empty_first_vector_rejected() {
        let (mut strategy, mut figure) = setup(1);
        assert!(strategy
            .plot_loop(&Value::Vector(vec![]), 0, &mut figure)
            .is_err());
        assert_eq!(strategy.line_count(), 0);
    }

    #[test]
    fn test_scalar_rejected() {
        let (mut strategy, mut figure) = setup(1);
        let err = strategy
            .plot_loop(&Value::Scalar(1.0), 0, &mut figure)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_explicit_x() {
        let (mut strategy, mut figure) = setup(1);
        strategy
            .plot_loop(&Value::from((vec![1.0, 2.0], 0.1)), 0, &mut figure)
            .unwrap();
        assert_eq!(figure.axes().lines[1].xs, vec![0.1]);
    }

    #[test]
    fn test_redraws_on_index_zero() {
        let (mut strategy, mut figure) = setup(4);
        let drawn = strategy
            .plot_loop(&Value::Vector(vec![1.0]), 0, &mut figure)
            .unwrap();
        assert_eq!(drawn.len(), 1);

        let drawn = strategy
            .plot_loop(&Value::Vector(vec![1.0]), 1, &mut figure)
            .unwrap();
        assert!(drawn.is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_line_count_is_first_length(
                k in 1usize..12,
                ticks in 1u64..30,
            ) {
                let (mut strategy, mut figure) = setup(1);
                for index in 0..ticks {
                    strategy
                        .plot_loop(&Value::Vector(vec![index as f64; k]), index, &mut figure)
                        .unwrap();
                }
                prop_assert_eq!(figure.axes().lines.len(), k);
                for line in &figure.axes().lines {
                    prop_assert_eq!(line.ys.len() as u64, ticks);
                }
            }
        }
    }
}
