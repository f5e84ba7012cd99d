//! Single line series

use super::{decorate, not_initialized, payload_and_x, RenderStrategy};
use crate::config::StrategySettings;
use crate::error::{LivePlotError, Result};
use crate::figure::{ArtistId, Figure, LineStyle};
use crate::types::Value;

const NAME: &str = "line";

/// Live line plot of one variable
///
/// Accepts a scalar (x is the tick index) or a `(scalar, x)` pair. Every value
/// is appended to the history; the line is redrawn and the axes rescaled only
/// on ticks where `index % plot_frequency == 0`.
#[derive(Debug)]
pub struct LineSeries {
    settings: StrategySettings,
    line: Option<ArtistId>,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LineSeries {
    pub fn new(settings: StrategySettings) -> Self {
        Self {
            settings,
            line: None,
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }

    /// Number of accumulated samples
    pub fn len(&self) -> usize {
        self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ys.is_empty()
    }
}

impl RenderStrategy for LineSeries {
    fn name(&self) -> &'static str {
        NAME
    }

    fn init(&mut self, figure: &mut Figure) -> Result<()> {
        decorate(figure, &self.settings);
        figure.set_autoscale(true);
        self.line = Some(figure.add_line(
            LineStyle::Solid,
            self.settings.line_color,
            self.settings.line_width,
        ));
        tracing::debug!("{} strategy initialized", NAME);
        Ok(())
    }

    fn plot_loop(
        &mut self,
        value: &Value,
        index: u64,
        figure: &mut Figure,
    ) -> Result<Vec<ArtistId>> {
        let line = self.line.ok_or_else(|| not_initialized(NAME))?;

        let (payload, x) = payload_and_x(value, index);
        let y = payload.as_f64().ok_or_else(|| {
            LivePlotError::validation(
                NAME,
                format!("expected a scalar or (scalar, x), got {}", value.kind()),
            )
        })?;

        self.xs.push(x);
        self.ys.push(y);

        if !self.settings.is_redraw_tick(index) {
            return Ok(Vec::new());
        }

        figure.set_line_data(line, self.xs.clone(), self.ys.clone())?;
        figure.relim();
        figure.autoscale_view();
        Ok(vec![line])
    }
}
