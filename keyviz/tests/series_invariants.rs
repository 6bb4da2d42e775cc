//! Property tests for the windowed series.
//!
//! 1. After every append: len <= max_points and nothing older than now - duration.
//! 2. The retained samples are the longest suffix of the input meeting both bounds.
//! 3. A snapshot is not changed by later appends.

use keyviz::data::{BoundedTimeSeries, Millis, Sample, Window};
use proptest::prelude::*;

fn arb_timestamps() -> impl Strategy<Value = Vec<Millis>> {
    prop::collection::vec(0u64..500, 0..200).prop_map(|deltas| {
        let mut t = 0;
        deltas
            .into_iter()
            .map(|d| {
                t += d;
                t
            })
            .collect()
    })
}

fn arb_window() -> impl Strategy<Value = Window> {
    (1usize..64, 1u64..5000).prop_map(|(max_points, duration)| Window {
        max_points,
        duration,
    })
}

fn expected_suffix(timestamps: &[Millis], window: Window) -> Vec<Millis> {
    let Some(&now) = timestamps.last() else {
        return Vec::new();
    };
    let cutoff = now.saturating_sub(window.duration);
    let mut kept: Vec<Millis> = timestamps
        .iter()
        .rev()
        .take_while(|&&t| t >= cutoff)
        .take(window.max_points)
        .copied()
        .collect();
    kept.reverse();
    kept
}

proptest! {
    #[test]
    fn bounds_hold_after_every_append(timestamps in arb_timestamps(), window in arb_window()) {
        let mut series = BoundedTimeSeries::new(window);
        for &t in &timestamps {
            series.append(Sample::digital(t, "KeyA", true));
            prop_assert!(series.len() <= window.max_points);
            let cutoff = t.saturating_sub(window.duration);
            prop_assert!(series.snapshot().iter().all(|s| s.timestamp >= cutoff));
        }
    }

    #[test]
    fn retained_set_is_longest_valid_suffix(timestamps in arb_timestamps(), window in arb_window()) {
        let mut series = BoundedTimeSeries::new(window);
        for &t in &timestamps {
            series.append(Sample::depth(t, "KeyS", 0.5));
        }
        prop_assert_eq!(series.snapshot().timestamps(), expected_suffix(&timestamps, window));
    }

    #[test]
    fn snapshots_are_isolated(timestamps in arb_timestamps(), extra in 0u64..1000) {
        let window = Window { max_points: 16, duration: 1000 };
        let mut series = BoundedTimeSeries::new(window);
        for &t in &timestamps {
            series.append(Sample::digital(t, "KeyA", false));
        }
        let before = series.snapshot();
        let copy = before.clone();
        let next = timestamps.last().copied().unwrap_or(0) + extra;
        series.append(Sample::digital(next, "KeyB", true));
        prop_assert_eq!(before, copy);
    }
}

#[test]
fn three_second_window_scenario() {
    let mut series = BoundedTimeSeries::new(Window {
        max_points: 1000,
        duration: 3000,
    });
    for t in [0, 1000, 2000, 4000] {
        series.append(Sample::digital(t, "KeyA", t % 2000 == 0));
    }
    assert_eq!(series.snapshot().timestamps(), vec![1000, 2000, 4000]);
}
