//! Startup constants. Loaded once (defaults, optional YAML file, command-line
//! overrides) and never changed afterwards.

use crate::data::{Millis, Window};
use crate::device::Ramp;

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub duration_ms: Millis,
    pub refresh_ms: Millis,
    pub max_points: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            duration_ms: 3000,
            refresh_ms: 16,
            max_points: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub idle_delay_ms: Millis,
    pub max_table_rows: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            idle_delay_ms: 800,
            max_table_rows: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalogConfig {
    pub enabled: bool,
    pub threshold: f64,
    pub max_depth: f64,
    pub poll_ms: Millis,
    pub rise_step: f64,
    pub fall_step: f64,
    pub force_simulation: bool,
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.1,
            max_depth: 1.0,
            poll_ms: 16,
            rise_step: 0.05,
            fall_step: 0.1,
            force_simulation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chart: ChartConfig,
    pub ui: UiConfig,
    pub analog: AnalogConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config: {}", e),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {}: {}", field, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Parse(e)
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        Config::from_yaml(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chart.duration_ms == 0 {
            return Err(invalid("chart.duration_ms", "must be positive"));
        }
        if self.chart.refresh_ms == 0 {
            return Err(invalid("chart.refresh_ms", "must be positive"));
        }
        if self.chart.max_points == 0 {
            return Err(invalid("chart.max_points", "must be positive"));
        }
        if self.ui.max_table_rows == 0 {
            return Err(invalid("ui.max_table_rows", "must be positive"));
        }
        if self.analog.poll_ms == 0 {
            return Err(invalid("analog.poll_ms", "must be positive"));
        }
        // written so NaN fails every check
        if !(self.analog.max_depth > 0.0 && self.analog.max_depth <= 1.0) {
            return Err(invalid("analog.max_depth", "must be in (0, 1]"));
        }
        if !(0.0..self.analog.max_depth).contains(&self.analog.threshold) {
            return Err(invalid("analog.threshold", "must be in [0, max_depth)"));
        }
        if !(self.analog.rise_step > 0.0 && self.analog.rise_step.is_finite()) {
            return Err(invalid("analog.rise_step", "must be positive"));
        }
        if !(self.analog.fall_step > 0.0 && self.analog.fall_step.is_finite()) {
            return Err(invalid("analog.fall_step", "must be positive"));
        }
        Ok(())
    }

    pub fn window(&self) -> Window {
        Window {
            max_points: self.chart.max_points,
            duration: self.chart.duration_ms,
        }
    }

    pub fn ramp(&self) -> Ramp {
        Ramp {
            rise_step: self.analog.rise_step,
            fall_step: self.analog.fall_step,
            max_depth: self.analog.max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_visualizer() {
        let c = Config::default();
        assert_eq!(c.chart.duration_ms, 3000);
        assert_eq!(c.chart.max_points, 1000);
        assert_eq!(c.ui.max_table_rows, 100);
        assert_eq!(c.analog.threshold, 0.1);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let c = Config::from_yaml("chart:\n  duration_ms: 5000\nanalog:\n  enabled: false\n")
            .unwrap();
        assert_eq!(c.chart.duration_ms, 5000);
        assert_eq!(c.chart.max_points, 1000);
        assert!(!c.analog.enabled);
        assert_eq!(c.analog.poll_ms, 16);
    }

    #[test]
    fn rejects_bad_values() {
        let err = Config::from_yaml("analog:\n  threshold: 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "analog.threshold", .. }));

        let err = Config::from_yaml("chart:\n  max_points: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "chart.max_points", .. }));

        assert!(matches!(
            Config::from_yaml("chart:\n  duration_ms: soon\n").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn rejects_nan_and_infinite_steps() {
        for (yaml, field) in [
            ("analog:\n  rise_step: .nan\n", "analog.rise_step"),
            ("analog:\n  fall_step: .nan\n", "analog.fall_step"),
            ("analog:\n  rise_step: .inf\n", "analog.rise_step"),
            ("analog:\n  max_depth: .nan\n", "analog.max_depth"),
            ("analog:\n  threshold: .nan\n", "analog.threshold"),
        ] {
            let err = Config::from_yaml(yaml).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { field: f, .. } if f == field),
                "{}: {}",
                yaml,
                err
            );
        }
    }
}
