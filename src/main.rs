//! liveplotter - Main Entry Point
//!
//! `liveplotter plot` runs one plotter (window or headless) for one topic.
//! `liveplotter demo` runs the demo simulation and spawns a plotter per topic.

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use liveplotter::{
    config::PlotterConfig,
    demo::{self, DemoOptions},
    driver::{process::plotter_program, run_headless, PlotterGroup, PlotterProcess},
    frontend::run_plotter_window,
    strategy::StrategyKind,
    transport::Recorder,
    types::DEFAULT_PORT,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "liveplotter", version, about = "Live plots of a running simulation")]
struct Cli {
    /// Also write daily-rotated log files to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plot one topic until its stream closes.
    Plot(PlotArgs),
    /// Run the demo simulation with one plotter per topic.
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Topic (variable name) to plot.
    #[arg(long)]
    topic: Option<String>,

    /// Plot variant.
    #[arg(long, value_enum)]
    kind: Option<StrategyKind>,

    /// Recorder port.
    #[arg(long)]
    port: Option<u16>,

    /// Recorder host.
    #[arg(long)]
    host: Option<String>,

    /// TOML plotter configuration.
    #[arg(long, conflicts_with = "config_json")]
    config: Option<PathBuf>,

    /// Complete plotter configuration as JSON (used when spawned by a parent).
    #[arg(long)]
    config_json: Option<String>,

    /// Redraw every N-th value.
    #[arg(long)]
    plot_frequency: Option<u32>,

    /// Plot title.
    #[arg(long)]
    title: Option<String>,

    /// X-axis label.
    #[arg(long)]
    xlabel: Option<String>,

    /// Y-axis label.
    #[arg(long)]
    ylabel: Option<String>,

    /// Interval between ticks in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Give up if the recorder is not reachable within this many milliseconds.
    #[arg(long)]
    connect_timeout_ms: Option<u64>,

    /// Run without a window and exit when the stream closes.
    #[arg(long, default_value_t = false)]
    headless: bool,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Port to record on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Number of simulation steps.
    #[arg(long, default_value_t = 40)]
    steps: usize,

    /// Side length of the Mandelbrot image.
    #[arg(long, default_value_t = 200)]
    size: usize,

    /// Delay between steps in milliseconds.
    #[arg(long, default_value_t = 100)]
    step_delay_ms: u64,

    /// Do not start plotter processes (start them yourself).
    #[arg(long, default_value_t = false)]
    no_spawn: bool,

    /// Start plotters without windows.
    #[arg(long, default_value_t = false)]
    headless: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.log_dir.as_deref())?;

    match cli.cmd {
        Command::Plot(args) => cmd_plot(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

/// Install the global subscriber; the returned guard flushes the log file on drop
fn init_logging(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create log dir '{}'", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "liveplotter.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,liveplotter=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

fn resolve_plot_config(args: &PlotArgs) -> anyhow::Result<PlotterConfig> {
    let mut config = if let Some(json) = &args.config_json {
        PlotterConfig::from_json(json)?
    } else if let Some(path) = &args.config {
        PlotterConfig::load(path)?
    } else {
        PlotterConfig::load_default()?.unwrap_or_default()
    };

    if let Some(topic) = &args.topic {
        config.topic = topic.clone();
    }
    if let Some(kind) = args.kind {
        config.kind = kind;
    }
    if let Some(port) = args.port {
        config.subscriber.port = port;
    }
    if let Some(host) = &args.host {
        config.subscriber.host = host.clone();
    }
    if let Some(frequency) = args.plot_frequency {
        config.strategy.plot_frequency = frequency;
    }
    if let Some(title) = &args.title {
        config.strategy.title = Some(title.clone());
    }
    if let Some(xlabel) = &args.xlabel {
        config.strategy.xlabel = Some(xlabel.clone());
    }
    if let Some(ylabel) = &args.ylabel {
        config.strategy.ylabel = Some(ylabel.clone());
    }
    if let Some(interval) = args.interval_ms {
        config.tick_interval_ms = interval;
    }
    if let Some(timeout) = args.connect_timeout_ms {
        config.subscriber.connect_timeout_ms = Some(timeout);
    }

    config.validate()?;
    Ok(config)
}

fn cmd_plot(args: PlotArgs) -> anyhow::Result<()> {
    let config = resolve_plot_config(&args)?;
    let span = tracing::info_span!("plotter", topic = %config.topic, pid = std::process::id());
    let _entered = span.enter();

    tracing::info!(
        "Plotting '{}' as {} from {}",
        config.topic,
        config.kind,
        config.subscriber.endpoint()
    );

    if args.headless {
        let summary = run_headless(&config)?;
        tracing::info!(
            "'{}' done: {} values, {} redraws",
            config.topic,
            summary.values,
            summary.redraws
        );
    } else {
        run_plotter_window(config)?;
    }
    Ok(())
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    // Bind before any plotter exists so a busy port starts nothing
    let mut recorder = Recorder::bind(args.port)?;

    // Dropping the group on an early return kills the plotters
    let mut plotters = PlotterGroup::new();
    if !args.no_spawn {
        for (topic, kind) in demo::demo_topics() {
            let mut config = PlotterConfig::new(topic, kind).with_port(recorder.port());
            config.strategy.plot_frequency = 1;
            config.strategy.title = Some(topic.to_string());
            config.tick_interval_ms = 10;
            plotters.push(PlotterProcess::spawn_with(
                plotter_program(),
                &config,
                args.headless,
            )?);
        }
    }

    // Give the plotters time to connect; earlier values would be lost
    std::thread::sleep(Duration::from_secs(1));

    let options = DemoOptions {
        size: args.size,
        steps: args.steps,
        step_delay: Duration::from_millis(args.step_delay_ms),
    };
    demo::run_demo(&mut recorder, &options)?;

    // Let the end frames drain before the socket goes away
    std::thread::sleep(Duration::from_millis(500));
    drop(recorder);

    for (topic, status) in plotters.wait_all()? {
        if !status.success() {
            tracing::warn!("Plotter for '{}' exited with {}", topic, status);
        }
    }
    Ok(())
}
