//! Test data builders for creating test objects

use liveplotter::config::PlotterConfig;
use liveplotter::strategy::StrategyKind;

/// Builder for plotter configurations pointing at a local test recorder
pub struct PlotterConfigBuilder {
    config: PlotterConfig,
}

impl PlotterConfigBuilder {
    pub fn new(topic: &str) -> Self {
        let mut config = PlotterConfig::new(topic, StrategyKind::Line);
        config.subscriber = super::subscriber_config(config.subscriber.port);
        config.tick_interval_ms = 5;
        config.strategy.plot_frequency = 1;
        Self { config }
    }

    pub fn kind(mut self, kind: StrategyKind) -> Self {
        self.config.kind = kind;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.subscriber.port = port;
        self
    }

    pub fn plot_frequency(mut self, frequency: u32) -> Self {
        self.config.strategy.plot_frequency = frequency;
        self
    }

    pub fn build(self) -> PlotterConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plotter_config_builder() {
        let config = PlotterConfigBuilder::new("x")
            .kind(StrategyKind::Spikes)
            .port(6100)
            .plot_frequency(3)
            .build();

        assert_eq!(config.topic, "x");
        assert_eq!(config.kind, StrategyKind::Spikes);
        assert_eq!(config.subscriber.port, 6100);
        assert_eq!(config.strategy.plot_frequency, 3);
        assert!(config.validate().is_ok());
    }
}
