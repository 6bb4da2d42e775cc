//! Text renderings of the two series for a terminal chart.
//!
//! Both charts span `[now - duration, now]` across `width` columns, oldest
//! on the left.

use keyviz::data::{Millis, SampleValue, Snapshot};
use std::collections::BTreeSet;
use std::sync::Arc;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// End time (inclusive) of each column.
fn column_ends(now: Millis, duration: Millis, width: usize) -> impl Iterator<Item = Millis> {
    let start = now.saturating_sub(duration);
    let span = now - start;
    (1..=width as u64).map(move |col| start + span * col / width as u64)
}

/// Stepped line: a column is high while any key is down at its end time.
/// Keys are told apart by code, so ShiftLeft and ShiftRight count separately.
pub fn digital_strip(snapshot: &Snapshot, now: Millis, duration: Millis, width: usize) -> String {
    let mut held: BTreeSet<Arc<str>> = BTreeSet::new();
    let mut samples = snapshot.iter().peekable();
    let mut out = String::with_capacity(width * 3);

    for end in column_ends(now, duration, width) {
        let mut changed = false;
        while let Some(sample) = samples.next_if(|s| s.timestamp <= end) {
            if let SampleValue::Digital(down) = sample.value {
                if down {
                    held.insert(sample.code.clone());
                } else {
                    held.remove(&sample.code);
                }
                changed = true;
            }
        }
        out.push(match (held.is_empty(), changed) {
            (false, _) => '█',
            (true, true) => '▄',
            (true, false) => '▁',
        });
    }
    out
}

/// Peak depth per column as a bar; blank where no reading landed.
pub fn depth_sparkline(
    snapshot: &Snapshot,
    now: Millis,
    duration: Millis,
    width: usize,
    max_depth: f64,
) -> String {
    let mut samples = snapshot.iter().peekable();
    let mut out = String::with_capacity(width * 3);

    for end in column_ends(now, duration, width) {
        let mut peak: Option<f64> = None;
        while let Some(sample) = samples.next_if(|s| s.timestamp <= end) {
            let d = sample.value.as_f64();
            peak = Some(peak.map_or(d, |p| p.max(d)));
        }
        out.push(match peak {
            None => ' ',
            Some(d) => bar(d, max_depth),
        });
    }
    out
}

fn bar(depth: f64, max_depth: f64) -> char {
    if max_depth <= 0.0 {
        return BARS[0];
    }
    let frac = (depth / max_depth).clamp(0.0, 1.0);
    BARS[(frac * (BARS.len() - 1) as f64).round() as usize]
}
