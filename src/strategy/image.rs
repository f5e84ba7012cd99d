//! 2-D image frames

use super::{decorate, not_initialized, RenderStrategy};
use crate::config::StrategySettings;
use crate::error::{LivePlotError, Result};
use crate::figure::{ArtistId, Figure};
use crate::types::{Matrix, Value};

const NAME: &str = "image";

/// Shows the latest 2-D array as a colour image
///
/// The image artist is created from the first frame. After that only frames
/// arriving on redraw ticks replace its buffer; the rest are dropped.
#[derive(Debug)]
pub struct ImageFrame {
    settings: StrategySettings,
    initialized: bool,
    image: Option<ArtistId>,
}

impl ImageFrame {
    pub fn new(settings: StrategySettings) -> Self {
        Self {
            settings,
            initialized: false,
            image: None,
        }
    }

    fn frame<'a>(value: &'a Value) -> Result<&'a Matrix> {
        let matrix = value.as_matrix().ok_or_else(|| {
            LivePlotError::validation(NAME, format!("expected a 2-D matrix, got {}", value.kind()))
        })?;
        if matrix.rows() == 0 || matrix.cols() == 0 {
            return Err(LivePlotError::validation(
                NAME,
                format!("empty frame {}x{}", matrix.rows(), matrix.cols()),
            ));
        }
        Ok(matrix)
    }
}

impl RenderStrategy for ImageFrame {
    fn name(&self) -> &'static str {
        NAME
    }

    fn init(&mut self, figure: &mut Figure) -> Result<()> {
        decorate(figure, &self.settings);
        figure.axis_off();
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
        let matrix = Self::frame(value)?;

        match self.image {
            None => {
                let id = figure.add_image(matrix.clone(), self.settings.colormap);
                self.image = Some(id);
                tracing::debug!("{} created {}x{} frame", NAME, matrix.rows(), matrix.cols());
                Ok(vec![id])
            }
            Some(id) if self.settings.is_redraw_tick(index) => {
                figure.set_image_data(id, matrix.clone())?;
                Ok(vec![id])
            }
            Some(_) => Ok(Vec::new()),
        }
    }
}
