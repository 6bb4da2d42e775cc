//! Analog keyboard detection.
//!
//! We cannot talk to the vendor SDK, so detection goes by USB VID/PID as seen
//! through the hidraw class in sysfs (readable without extra permissions).

use super::depth::{
    AnalogDevice, AnalogInput, DepthReading, DepthSource, DeviceError, STATUS_DETECT_ERROR,
    STATUS_SIMULATED,
};
use super::simulator::{DepthSimulator, Ramp};

use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogKeyboard {
    WootingOne,
    WootingTwo,
}

impl AnalogKeyboard {
    pub fn from_ids(vid: u16, pid: u16) -> Option<AnalogKeyboard> {
        match (vid, pid) {
            (0x31E3, 0x1100) => Some(AnalogKeyboard::WootingOne),
            (0x31E3, 0x1101) => Some(AnalogKeyboard::WootingTwo),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnalogKeyboard::WootingOne => "Wooting One",
            AnalogKeyboard::WootingTwo => "Wooting Two",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub kind: AnalogKeyboard,
    pub vid: u16,
    pub pid: u16,
    pub path: PathBuf,
    pub product: String,
}

impl std::fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:04x}:{:04x}  {}  {}",
            self.kind.name(),
            self.vid,
            self.pid,
            self.path.display(),
            self.product
        )
    }
}

pub trait DeviceProbe {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, DeviceError>;
    fn open(&self, info: &DeviceInfo) -> Result<Box<dyn AnalogDevice>, DeviceError>;

    fn detect(&self) -> Result<Option<DeviceInfo>, DeviceError> {
        Ok(self.enumerate()?.into_iter().next())
    }
}

pub struct SysfsProbe {
    class_dir: PathBuf,
    dev_dir: PathBuf,
}

impl Default for SysfsProbe {
    fn default() -> Self {
        Self::new("/sys/class/hidraw", "/dev")
    }
}

impl SysfsProbe {
    pub fn new(class_dir: impl Into<PathBuf>, dev_dir: impl Into<PathBuf>) -> Self {
        Self {
            class_dir: class_dir.into(),
            dev_dir: dev_dir.into(),
        }
    }
}

/// Parses `HID_ID=0003:000031E3:00001100` into (vid, pid).
fn parse_hid_id(value: &str) -> Option<(u16, u16)> {
    let mut parts = value.trim().split(':');
    let _bus = parts.next()?;
    let vid = u32::from_str_radix(parts.next()?, 16).ok()?;
    let pid = u32::from_str_radix(parts.next()?, 16).ok()?;
    Some((u16::try_from(vid).ok()?, u16::try_from(pid).ok()?))
}

fn read_uevent(path: &Path) -> Option<((u16, u16), String)> {
    let text = std::fs::read_to_string(path).ok()?;
    let mut ids = None;
    let mut name = String::new();
    for line in text.lines() {
        if let Some(v) = line.strip_prefix("HID_ID=") {
            ids = parse_hid_id(v);
        } else if let Some(v) = line.strip_prefix("HID_NAME=") {
            name = v.to_string();
        }
    }
    ids.map(|ids| (ids, name))
}

impl DeviceProbe for SysfsProbe {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, DeviceError> {
        let entries = match std::fs::read_dir(&self.class_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut found = Vec::new();
        for entry in entries.flatten() {
            let uevent = entry.path().join("device").join("uevent");
            let Some(((vid, pid), product)) = read_uevent(&uevent) else {
                continue;
            };
            if let Some(kind) = AnalogKeyboard::from_ids(vid, pid) {
                found.push(DeviceInfo {
                    kind,
                    vid,
                    pid,
                    path: self.dev_dir.join(entry.file_name()),
                    product,
                });
            }
        }
        found.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(found)
    }

    fn open(&self, info: &DeviceInfo) -> Result<Box<dyn AnalogDevice>, DeviceError> {
        let file = File::open(&info.path)?;
        Ok(Box::new(HidrawDevice {
            name: info.kind.name().to_string(),
            _file: file,
        }))
    }
}

/// An opened hidraw node. Analog report decoding is vendor specific and not
/// implemented, so reads fail and the caller drops to simulation.
pub struct HidrawDevice {
    name: String,
    _file: File,
}

impl AnalogDevice for HidrawDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self) -> Result<Vec<DepthReading>, DeviceError> {
        Err(DeviceError::Unsupported(format!(
            "{} analog report decoding",
            self.name
        )))
    }
}

/// Picks the depth source once at startup.
pub fn select_source(
    probe: &dyn DeviceProbe,
    ramp: Ramp,
    threshold: f64,
    force_simulation: bool,
) -> AnalogInput {
    if force_simulation {
        log::info!("analog: simulation forced");
        return AnalogInput::simulated(ramp, threshold);
    }

    let opened = probe
        .detect()
        .and_then(|found| match found {
            Some(info) => probe.open(&info).map(|dev| Some((info, dev))),
            None => Ok(None),
        });

    match opened {
        Ok(Some((info, dev))) => {
            log::info!("analog: using {}", info);
            AnalogInput::new(
                DepthSource::RealDevice(dev),
                ramp,
                threshold,
                format!("{} detected!", info.kind.name()),
            )
        }
        Ok(None) => {
            log::info!("analog: no device found, simulating");
            AnalogInput::simulated(ramp, threshold)
        }
        Err(e) => {
            log::warn!("analog: detection failed: {}", e);
            AnalogInput::new(
                DepthSource::SimulatedRamp(DepthSimulator::new(ramp)),
                ramp,
                threshold,
                STATUS_DETECT_ERROR.to_string(),
            )
        }
    }
}
