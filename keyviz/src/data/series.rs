//! BoundedTimeSeries
//! Stores `Sample`s for one channel, windowed by count and by age.
//!
//! Assumptions:
//! 1. Timestamps come from a monotonic clock; a sample older than the tail is
//!    clamped to the tail's timestamp rather than rejected.
//! 2. Age eviction uses the appended sample's timestamp as "now" unless the
//!    caller supplies a clock reading.

use super::sample::{Millis, Sample};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub max_points: usize,
    pub duration: Millis,
}

#[derive(Debug, Clone)]
pub struct BoundedTimeSeries {
    window: Window,
    samples: VecDeque<Sample>,
    clamped: u64,
}

impl BoundedTimeSeries {
    pub fn new(window: Window) -> Self {
        let alloc = window.max_points.min(65_536);
        Self {
            window,
            samples: VecDeque::with_capacity(alloc),
            clamped: 0,
        }
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of appended samples whose timestamp had to be clamped.
    pub fn clamped(&self) -> u64 {
        self.clamped
    }

    pub fn last_timestamp(&self) -> Option<Millis> {
        self.samples.back().map(|s| s.timestamp)
    }

    pub fn append(&mut self, sample: Sample) {
        let now = sample.timestamp;
        self.append_at(sample, now);
    }

    pub fn append_at(&mut self, mut sample: Sample, now: Millis) {
        if let Some(last) = self.last_timestamp() {
            if sample.timestamp < last {
                log::debug!(
                    "clamping out-of-order sample for {} ({} < {})",
                    sample.key,
                    sample.timestamp,
                    last
                );
                sample.timestamp = last;
                self.clamped += 1;
            }
        }
        let now = now.max(sample.timestamp);
        self.samples.push_back(sample);

        while self.samples.len() > self.window.max_points {
            self.samples.pop_front();
        }
        self.evict_expired(now);
    }

    /// Drops every sample strictly older than `now - duration`.
    /// Returns how many were removed.
    pub fn evict_expired(&mut self, now: Millis) -> usize {
        let cutoff = now.saturating_sub(self.window.duration);
        let mut evicted = 0;
        while let Some(front) = self.samples.front() {
            if front.timestamp < cutoff {
                self.samples.pop_front();
                evicted += 1;
            } else {
                break;
            }
        }
        evicted
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            samples: self.samples.iter().cloned().collect(),
        }
    }
}

/// Owned copy of a series at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    samples: Vec<Sample>,
}

impl Snapshot {
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn timestamps(&self) -> Vec<Millis> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
