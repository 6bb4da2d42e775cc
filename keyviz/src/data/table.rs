use super::sample::Millis;
use std::collections::VecDeque;
use std::sync::Arc;

/// FIFO of display rows, capped at `max_rows`. Newest row is last.
#[derive(Debug, Clone)]
pub struct RowLog<T> {
    rows: VecDeque<T>,
    max_rows: usize,
}

impl<T: Clone> RowLog<T> {
    pub fn new(max_rows: usize) -> Self {
        Self {
            rows: VecDeque::with_capacity(max_rows.min(4096)),
            max_rows,
        }
    }

    pub fn push(&mut self, row: T) {
        self.rows.push_back(row);
        while self.rows.len() > self.max_rows {
            self.rows.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.rows.iter()
    }

    /// The newest `n` rows, oldest first.
    pub fn tail(&self, n: usize) -> Vec<T> {
        let skip = self.rows.len().saturating_sub(n);
        self.rows.iter().skip(skip).cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeystrokeRow {
    pub timestamp: Millis,
    pub label: Arc<str>,
    pub code: Arc<str>,
    pub scancode: Option<u8>,
    pub down: bool,
}

impl std::fmt::Display for KeystrokeRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scancode = match self.scancode {
            Some(sc) => format!("0x{:02X}", sc),
            None => "-".to_string(),
        };
        write!(
            f,
            "{:>13}  {:<10} {:<12} {:>5}  {}",
            self.timestamp,
            self.label,
            self.code,
            scancode,
            if self.down { "Down" } else { "Up" }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureLevel {
    Low,
    Medium,
    High,
}

impl PressureLevel {
    pub fn from_depth(depth: f64) -> PressureLevel {
        if depth < 0.3 {
            PressureLevel::Low
        } else if depth < 0.7 {
            PressureLevel::Medium
        } else {
            PressureLevel::High
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalogRow {
    pub timestamp: Millis,
    pub key: Arc<str>,
    pub depth: f64,
    pub active: bool,
    pub level: PressureLevel,
}

impl AnalogRow {
    pub fn new(timestamp: Millis, key: Arc<str>, depth: f64, threshold: f64) -> AnalogRow {
        AnalogRow {
            timestamp,
            key,
            depth,
            active: depth > threshold,
            level: PressureLevel::from_depth(depth),
        }
    }
}

impl std::fmt::Display for AnalogRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>13}  {:<12} {:>6.3}  {}",
            self.timestamp,
            self.key,
            self.depth,
            if self.active { "Active" } else { "Inactive" }
        )
    }
}
