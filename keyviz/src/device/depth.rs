use super::simulator::{DepthSimulator, Ramp};
use crate::data::Millis;

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct DepthReading {
    pub key: Arc<str>,
    pub depth: f64,
}

#[derive(Debug)]
pub enum DeviceError {
    Io(std::io::Error),
    NotFound,
    Unsupported(String),
    Disconnected,
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceError::Io(e) => write!(f, "device I/O error: {}", e),
            DeviceError::NotFound => write!(f, "no analog keyboard found"),
            DeviceError::Unsupported(what) => write!(f, "unsupported: {}", what),
            DeviceError::Disconnected => write!(f, "device disconnected"),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DeviceError {
    fn from(e: std::io::Error) -> Self {
        DeviceError::Io(e)
    }
}

/// A keyboard that reports per-key travel on its own.
pub trait AnalogDevice: Send {
    fn name(&self) -> &str;
    fn read(&mut self) -> Result<Vec<DepthReading>, DeviceError>;
}

pub enum DepthSource {
    RealDevice(Box<dyn AnalogDevice>),
    SimulatedRamp(DepthSimulator),
}

impl std::fmt::Debug for DepthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthSource::RealDevice(dev) => write!(f, "RealDevice({})", dev.name()),
            DepthSource::SimulatedRamp(_) => write!(f, "SimulatedRamp"),
        }
    }
}

pub const STATUS_SIMULATED: &str = "Analog keyboard not detected. Using simulation mode.";
pub const STATUS_DETECT_ERROR: &str = "Error detecting analog keyboard. Using simulation mode.";
pub const STATUS_READ_ERROR: &str = "Analog keyboard communication error. Using simulation mode.";

/// Depth channel input: the selected source plus the emission filter.
#[derive(Debug)]
pub struct AnalogInput {
    source: DepthSource,
    ramp: Ramp,
    threshold: f64,
    status: String,
}

impl AnalogInput {
    pub fn new(source: DepthSource, ramp: Ramp, threshold: f64, status: String) -> Self {
        Self {
            source,
            ramp,
            threshold,
            status,
        }
    }

    pub fn simulated(ramp: Ramp, threshold: f64) -> Self {
        Self::new(
            DepthSource::SimulatedRamp(DepthSimulator::new(ramp)),
            ramp,
            threshold,
            STATUS_SIMULATED.to_string(),
        )
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.source, DepthSource::SimulatedRamp(_))
    }

    /// One poll tick. Returns the readings worth recording: depth above the
    /// activation threshold, or exactly zero.
    pub fn poll(&mut self, held: &[Arc<str>], now: Millis) -> Vec<DepthReading> {
        let result = match &mut self.source {
            DepthSource::RealDevice(dev) => dev
                .read()
                .map_err(|e| format!("{}: {}", dev.name(), e)),
            DepthSource::SimulatedRamp(sim) => Ok(sim.tick(held, now)),
        };
        let readings = match result {
            Ok(readings) => readings,
            Err(e) => {
                log::warn!("{}; falling back to simulation", e);
                self.status = STATUS_READ_ERROR.to_string();
                self.source = DepthSource::SimulatedRamp(DepthSimulator::new(self.ramp));
                return self.poll(held, now);
            }
        };

        readings
            .into_iter()
            .filter(|r| r.depth > self.threshold || r.depth == 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlakyDevice {
        reads: usize,
    }

    impl AnalogDevice for FlakyDevice {
        fn name(&self) -> &str {
            "flaky"
        }

        fn read(&mut self) -> Result<Vec<DepthReading>, DeviceError> {
            self.reads += 1;
            if self.reads > 1 {
                return Err(DeviceError::Disconnected);
            }
            Ok(vec![
                DepthReading {
                    key: "KeyA".into(),
                    depth: 0.6,
                },
                DepthReading {
                    key: "KeyB".into(),
                    depth: 0.05,
                },
            ])
        }
    }

    #[test]
    fn device_readings_are_filtered() {
        let mut input = AnalogInput::new(
            DepthSource::RealDevice(Box::new(FlakyDevice { reads: 0 })),
            Ramp::default(),
            0.1,
            "detected".to_string(),
        );
        let readings = input.poll(&[], 0);
        assert_eq!(readings.len(), 1);
        assert_eq!(&*readings[0].key, "KeyA");
        assert!(!input.is_simulated());
    }

    #[test]
    fn read_error_falls_back_to_simulation() {
        let mut input = AnalogInput::new(
            DepthSource::RealDevice(Box::new(FlakyDevice { reads: 1 })),
            Ramp::default(),
            0.1,
            "detected".to_string(),
        );
        let held: Vec<Arc<str>> = vec!["KeyA".into()];
        // first simulated tick reaches 0.05, below threshold
        assert!(input.poll(&held, 0).is_empty());
        assert!(input.is_simulated());
        assert_eq!(input.status(), STATUS_READ_ERROR);
    }

    #[test]
    fn simulated_emission_threshold() {
        let mut input = AnalogInput::simulated(Ramp::default(), 0.1);
        let held: Vec<Arc<str>> = vec!["KeyA".into()];
        assert!(input.poll(&held, 0).is_empty()); // 0.05
        assert!(input.poll(&held, 16).is_empty()); // 0.10, not above
        assert_eq!(input.poll(&held, 32).len(), 1); // 0.15

        // release: 0.05 is filtered, the terminal zero is not
        assert_eq!(input.poll(&[], 48).len(), 0);
        let last = input.poll(&[], 64);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].depth, 0.0);
    }
}
