//! Frontend module for egui UI
//!
//! Hosts one [`RenderDriver`] in a native eframe window. The egui event loop
//! is the tick source: every `update` checks whether a tick is due, ticks
//! the driver at most once, paints the figure and asks for the next repaint
//! with `request_repaint_after`. All of this happens on the UI thread, so
//! ticks never overlap and the figure never leaves the thread that draws it.
//!
//! # Main Types
//!
//! - [`PlotterApp`] - Application state implementing [`eframe::App`]
//! - [`FigureView`] - Figure rendering with egui_plot
//!
//! The subscriber channel is opened on the first due tick, after the window
//! has painted once, so the window is visible while the plotter waits for
//! the recorder.

mod plot;

pub use plot::{palette_color, FigureView};

use crate::config::PlotterConfig;
use crate::driver::{DriverState, RenderDriver, TickOutcome};
use crate::error::{LivePlotError, Result};
use crate::strategy::build_strategy;
use crate::transport::SubscriberChannel;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Error slot shared between the app and [`run_plotter_window`]
type FailureSlot = Arc<Mutex<Option<LivePlotError>>>;

/// One plotter window
pub struct PlotterApp {
    config: PlotterConfig,
    driver: RenderDriver,
    view: FigureView,
    next_tick: Instant,
    painted: bool,
    failure: FailureSlot,
    span: tracing::Span,
}

impl PlotterApp {
    /// Create the app around an initialized driver
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: PlotterConfig,
        driver: RenderDriver,
        failure: FailureSlot,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let span = tracing::info_span!("plotter", topic = %config.topic, pid = std::process::id());
        let view = FigureView::new(format!("figure-{}", config.topic));
        Self {
            config,
            driver,
            view,
            next_tick: Instant::now(),
            painted: false,
            failure,
            span,
        }
    }

    pub fn state(&self) -> DriverState {
        self.driver.state()
    }

    fn is_failed(&self) -> bool {
        self.failure.lock().map(|slot| slot.is_some()).unwrap_or(true)
    }

    /// Open the channel if needed and tick once
    fn step(&mut self) -> Result<()> {
        if self.driver.state() == DriverState::Initialized {
            let channel = SubscriberChannel::open(&self.config.topic, &self.config.subscriber)?;
            self.driver.attach(Box::new(channel))?;
        }

        if let TickOutcome::Closed = self.driver.tick()? {
            tracing::info!("Stream ended; keeping the last frame on screen");
        }
        Ok(())
    }

    fn fail(&mut self, ctx: &egui::Context, error: LivePlotError) {
        tracing::error!("Plotter for '{}' failed: {}", self.config.topic, error);
        if let Ok(mut slot) = self.failure.lock() {
            slot.get_or_insert(error);
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn status_text(&self) -> String {
        format!(
            "{} | {} | {} | {} values",
            self.config.topic,
            self.driver.strategy_name(),
            self.driver.state(),
            self.driver.ticks()
        )
    }
}

impl eframe::App for PlotterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let span = self.span.clone();
        let _entered = span.enter();

        let active = self.driver.state() != DriverState::Closed && !self.is_failed();
        if active && self.painted && Instant::now() >= self.next_tick {
            if let Err(e) = self.step() {
                self.fail(ctx, e);
            }
            self.next_tick = Instant::now() + self.config.tick_interval();
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(self.status_text());
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.view.show(ui, self.driver.figure());
        });
        self.painted = true;

        if self.driver.state() != DriverState::Closed && !self.is_failed() {
            ctx.request_repaint_after(self.next_tick.saturating_duration_since(Instant::now()));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        tracing::debug!(
            "Plotter window for '{}' closed in state {}",
            self.config.topic,
            self.driver.state()
        );
    }
}

/// Open a native window plotting `config.topic` until the window is closed
///
/// Returns the error that made the plotter give up, if any.
pub fn run_plotter_window(config: PlotterConfig) -> Result<()> {
    config.validate()?;

    let mut driver = RenderDriver::new(build_strategy(config.kind, &config.strategy));
    driver.initialize()?;

    let title = config.window_title();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([320.0, 240.0])
            .with_title(title.clone()),
        ..Default::default()
    };

    let failure: FailureSlot = Arc::new(Mutex::new(None));
    let app_failure = failure.clone();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| Ok(Box::new(PlotterApp::new(cc, config, driver, app_failure)))),
    )
    .map_err(|e| LivePlotError::Gui(e.to_string()))?;

    let failure = failure.lock().ok().and_then(|mut slot| slot.take());
    match failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

