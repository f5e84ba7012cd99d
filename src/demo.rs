//! Demo simulation
//!
//! A small simulation that exercises every plot variant at once:
//!
//! | topic      | kind         | value                                          |
//! |------------|--------------|------------------------------------------------|
//! | `divtime`  | `image`      | Mandelbrot divergence times, one escape step per frame |
//! | `sine`     | `line`       | `(sin t, t)`                                   |
//! | `phases`   | `multi-line` | `sin(t + k pi/4)` for four phases              |
//! | `spikes`   | `spikes`     | binary activity of eight sources               |

use crate::error::Result;
use crate::strategy::StrategyKind;
use crate::transport::Recorder;
use crate::types::{Matrix, Value};
use std::f64::consts::FRAC_PI_4;
use std::time::Duration;

pub const DIVTIME_TOPIC: &str = "divtime";
pub const SINE_TOPIC: &str = "sine";
pub const PHASES_TOPIC: &str = "phases";
pub const SPIKES_TOPIC: &str = "spikes";

/// Number of spike sources
pub const SPIKE_SOURCES: usize = 8;

/// Topics the demo records and how each is plotted
pub fn demo_topics() -> [(&'static str, StrategyKind); 4] {
    [
        (DIVTIME_TOPIC, StrategyKind::Image),
        (SINE_TOPIC, StrategyKind::Line),
        (PHASES_TOPIC, StrategyKind::MultiLine),
        (SPIKES_TOPIC, StrategyKind::Spikes),
    ]
}

/// Demo parameters
#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Side length of the Mandelbrot image
    pub size: usize,
    /// Escape iterations; one frame is recorded per iteration
    pub steps: usize,
    /// Pause between steps
    pub step_delay: Duration,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            size: 200,
            steps: 40,
            step_delay: Duration::from_millis(100),
        }
    }
}

/// Iterative computation of Mandelbrot divergence times
///
/// Every pixel starts at `max_iter`; a pixel that escapes at iteration `i`
/// gets `i + 100` so escaped pixels stand out from the interior.
#[derive(Debug, Clone)]
pub struct Mandelbrot {
    c: Vec<(f64, f64)>,
    z: Vec<(f64, f64)>,
    divtime: Matrix,
    max_iter: usize,
    iteration: usize,
}

impl Mandelbrot {
    pub fn new(height: usize, width: usize, max_iter: usize) -> Self {
        let linspace = |lo: f64, hi: f64, n: usize, k: usize| {
            if n > 1 {
                lo + (hi - lo) * k as f64 / (n - 1) as f64
            } else {
                lo
            }
        };

        let mut c = Vec::with_capacity(height * width);
        for row in 0..height {
            let im = linspace(-1.4, 1.4, height, row);
            for col in 0..width {
                c.push((linspace(-2.0, 0.8, width, col), im));
            }
        }

        Self {
            z: c.clone(),
            c,
            divtime: Matrix::filled(height, width, max_iter as f64),
            max_iter,
            iteration: 0,
        }
    }

    /// Run one escape iteration; `None` once all iterations are done
    pub fn step(&mut self) -> Option<&Matrix> {
        if self.iteration >= self.max_iter {
            return None;
        }
        let cols = self.divtime.cols();
        let unset = self.max_iter as f64;

        for (k, (z, c)) in self.z.iter_mut().zip(&self.c).enumerate() {
            let (re, im) = *z;
            *z = (re * re - im * im + c.0, 2.0 * re * im + c.1);
            if z.0 * z.0 + z.1 * z.1 > 4.0 {
                let (row, col) = (k / cols, k % cols);
                if self.divtime.get(row, col) == Some(unset) {
                    self.divtime.set(row, col, (self.iteration + 100) as f64);
                }
                *z = (2.0, 0.0);
            }
        }

        self.iteration += 1;
        Some(&self.divtime)
    }
}

/// Values of the line, multi-line and spike topics at step `step`
pub fn signals(step: usize) -> [(&'static str, Value); 3] {
    let t = step as f64 * 0.1;
    let phases = (0..4).map(|k| (t + k as f64 * FRAC_PI_4).sin()).collect::<Vec<_>>();
    let spikes = (0..SPIKE_SOURCES)
        .map(|j| if (step * (j + 3)) % 7 == 0 { 1.0 } else { 0.0 })
        .collect::<Vec<_>>();

    [
        (SINE_TOPIC, Value::from((t.sin(), t))),
        (PHASES_TOPIC, Value::from((phases, t))),
        (SPIKES_TOPIC, Value::Vector(spikes)),
    ]
}

/// Record the whole demo on `recorder`, then close every topic
///
/// Returns the number of steps recorded.
pub fn run_demo(recorder: &mut Recorder, options: &DemoOptions) -> Result<usize> {
    let mut mandelbrot = Mandelbrot::new(options.size, options.size, options.steps);
    let mut step = 0;

    while let Some(divtime) = mandelbrot.step() {
        recorder.record(DIVTIME_TOPIC, divtime.clone())?;
        for (topic, value) in signals(step) {
            recorder.record(topic, value)?;
        }
        tracing::debug!("Demo step {}", step);
        step += 1;
        std::thread::sleep(options.step_delay);
    }

    recorder.close_all()?;
    tracing::info!("Demo finished after {} steps", step);
    Ok(step)
}
