use std::sync::Arc;

/// Milliseconds on the visualizer clock.
pub type Millis = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleValue {
    Digital(bool),
    Depth(f64),
}

impl SampleValue {
    /// Value on the chart's y axis: 1/0 for transitions, the depth otherwise.
    pub fn as_f64(&self) -> f64 {
        match *self {
            SampleValue::Digital(true) => 1.0,
            SampleValue::Digital(false) => 0.0,
            SampleValue::Depth(d) => d,
        }
    }
}

impl std::fmt::Display for SampleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            SampleValue::Digital(true) => write!(f, "Down"),
            SampleValue::Digital(false) => write!(f, "Up"),
            SampleValue::Depth(d) => write!(f, "{:.3}", d),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: Millis,
    /// Display label (`a`, `Shift`).
    pub key: Arc<str>,
    /// Physical key identifier (`KeyA`, `ShiftLeft`). Distinct keys may share
    /// a label, never a code.
    pub code: Arc<str>,
    pub value: SampleValue,
}

impl Sample {
    /// Digital sample whose label doubles as its code.
    pub fn digital(timestamp: Millis, key: impl Into<Arc<str>>, down: bool) -> Sample {
        let key = key.into();
        Sample::keystroke(timestamp, key.clone(), key, down)
    }

    pub fn keystroke(
        timestamp: Millis,
        code: impl Into<Arc<str>>,
        label: impl Into<Arc<str>>,
        down: bool,
    ) -> Sample {
        Sample {
            timestamp,
            key: label.into(),
            code: code.into(),
            value: SampleValue::Digital(down),
        }
    }

    pub fn depth(timestamp: Millis, key: impl Into<Arc<str>>, depth: f64) -> Sample {
        let key = key.into();
        Sample {
            timestamp,
            code: key.clone(),
            key,
            value: SampleValue::Depth(depth),
        }
    }
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SAMPLE({}) {} {}", self.key, self.timestamp, self.value)
    }
}
