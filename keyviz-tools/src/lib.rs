use clap::Parser;
use keyviz::config::{Config, ConfigError};

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

pub mod chart;
pub mod keys;

#[derive(Parser, Debug, Clone, Default)]
pub struct VizOpts {
    /// YAML file with chart/ui/analog settings
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Chart window in milliseconds
    #[arg(long = "duration", value_name = "MS")]
    pub duration_ms: Option<u64>,

    /// Maximum points kept per chart
    #[arg(long = "max-points", value_name = "N")]
    pub max_points: Option<usize>,

    /// Redraw rate in frames per second
    #[arg(long = "fps", value_name = "N")]
    pub fps: Option<u64>,

    /// Analog poll interval in milliseconds
    #[arg(long = "poll-ms", value_name = "MS")]
    pub poll_ms: Option<u64>,

    /// Rows kept in each event table
    #[arg(long = "table-rows", value_name = "N")]
    pub table_rows: Option<usize>,

    /// Depth above which a key counts as pressed (0-1)
    #[arg(long = "threshold", value_name = "DEPTH")]
    pub threshold: Option<f64>,

    /// Start with analog polling switched off
    #[arg(long = "no-analog")]
    pub no_analog: bool,

    /// Skip device detection and simulate key depth
    #[arg(long = "simulate")]
    pub simulate: bool,

    /// Append log output to this file
    #[arg(short = 'l', long = "log", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl VizOpts {
    /// Defaults, then the config file, then flags.
    pub fn config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(ms) = self.duration_ms {
            config.chart.duration_ms = ms;
        }
        if let Some(n) = self.max_points {
            config.chart.max_points = n;
        }
        if let Some(fps) = self.fps {
            config.chart.refresh_ms = 1000 / fps.max(1);
        }
        if let Some(ms) = self.poll_ms {
            config.analog.poll_ms = ms;
        }
        if let Some(n) = self.table_rows {
            config.ui.max_table_rows = n;
        }
        if let Some(t) = self.threshold {
            config.analog.threshold = t;
        }
        if self.no_analog {
            config.analog.enabled = false;
        }
        if self.simulate {
            config.analog.force_simulation = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Sets up `env_logger` with a local-time prefix. Without a log file the
/// output goes to stderr when `to_stderr` is set and is discarded otherwise,
/// since the monitor owns the terminal.
pub fn init_logging(
    log_file: Option<&PathBuf>,
    verbose: bool,
    to_stderr: bool,
) -> std::io::Result<()> {
    let level = match (log_file.is_some() || to_stderr, verbose) {
        (false, _) => log::LevelFilter::Off,
        (true, true) => log::LevelFilter::Debug,
        (true, false) => log::LevelFilter::Info,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} {}: {}",
            chrono::Local::now().format("%T%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });
    if level != log::LevelFilter::Off {
        builder.parse_default_env();
    }

    if let Some(path) = log_file {
        let file = File::options().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    // a second init is harmless; keep the first logger
    let _ = builder.try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let opts = VizOpts::parse_from([
            "keyviz-monitor",
            "--duration",
            "5000",
            "--fps",
            "30",
            "--no-analog",
            "--simulate",
        ]);
        let config = opts.config().unwrap();
        assert_eq!(config.chart.duration_ms, 5000);
        assert_eq!(config.chart.refresh_ms, 33);
        assert!(!config.analog.enabled);
        assert!(config.analog.force_simulation);
        assert_eq!(config.chart.max_points, 1000);
    }

    #[test]
    fn flags_override_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "ui:\n  max_table_rows: 20\nanalog:\n  poll_ms: 8\n").unwrap();
        let opts = VizOpts {
            config: Some(tmp.path().to_path_buf()),
            poll_ms: Some(32),
            ..Default::default()
        };
        let config = opts.config().unwrap();
        assert_eq!(config.ui.max_table_rows, 20);
        assert_eq!(config.analog.poll_ms, 32);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let opts = VizOpts {
            threshold: Some(-0.5),
            ..Default::default()
        };
        assert!(opts.config().is_err());
    }
}
