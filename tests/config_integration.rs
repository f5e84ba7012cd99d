//! Integration tests for plotter configuration files

mod common;

use liveplotter::config::{PlotterConfig, DEFAULT_SPIKE_WINDOW};
use liveplotter::figure::Colormap;
use liveplotter::strategy::StrategyKind;
use liveplotter::LivePlotError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("plotter.toml");

    let mut config = PlotterConfig::new("divtime", StrategyKind::Image).with_port(6200);
    config.strategy.colormap = Colormap::Hot;
    config.strategy.title = Some("Divergence".to_string());
    config.subscriber.connect_timeout_ms = Some(1_500);
    config.save(&path).unwrap();

    let loaded = PlotterConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_handwritten_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("spikes.toml");
    fs::write(
        &path,
        r#"
topic = "spikes"
kind = "spikes"
tick_interval_ms = 50

[subscriber]
host = "10.0.0.2"
port = 7000

[strategy]
plot_frequency = 2
line_color = [255, 0, 0, 255]
"#,
    )
    .unwrap();

    let config = PlotterConfig::load(&path).unwrap();
    assert_eq!(config.kind, StrategyKind::Spikes);
    assert_eq!(config.subscriber.endpoint(), "tcp://10.0.0.2:7000");
    assert_eq!(config.strategy.line_color, Some([255, 0, 0, 255]));
    assert_eq!(config.strategy.spike_window, DEFAULT_SPIKE_WINDOW);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = PlotterConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, LivePlotError::Config(_)));
}

#[test]
fn test_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "topic = [").unwrap();
    assert!(matches!(
        PlotterConfig::load(&path),
        Err(LivePlotError::Config(_))
    ));
}

#[test]
fn test_unknown_kind_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad_kind.toml");
    fs::write(&path, "topic = \"x\"\nkind = \"pie\"\n").unwrap();
    assert!(PlotterConfig::load(&path).is_err());
}
