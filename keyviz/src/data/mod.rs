mod sample;
mod series;
mod table;

pub use sample::{Millis, Sample, SampleValue};
pub use series::{BoundedTimeSeries, Snapshot, Window};
pub use table::{AnalogRow, KeystrokeRow, PressureLevel, RowLog};
