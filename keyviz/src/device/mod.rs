mod depth;
mod detect;
pub mod hid;
mod simulator;

pub use depth::{
    AnalogDevice, AnalogInput, DepthReading, DepthSource, DeviceError, STATUS_DETECT_ERROR,
    STATUS_READ_ERROR, STATUS_SIMULATED,
};
pub use detect::{select_source, AnalogKeyboard, DeviceInfo, DeviceProbe, HidrawDevice, SysfsProbe};
pub use simulator::{DepthSimulator, KeyPressState, Ramp};
