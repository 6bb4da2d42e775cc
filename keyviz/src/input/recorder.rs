use crate::data::{KeystrokeRow, Millis, Sample};
use crate::device::hid;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// One observed key-down or key-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTransition {
    pub code: Arc<str>,
    pub label: Arc<str>,
    pub down: bool,
    pub timestamp: Millis,
}

impl KeyTransition {
    pub fn down(code: &str, label: &str, timestamp: Millis) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            down: true,
            timestamp,
        }
    }

    pub fn up(code: &str, label: &str, timestamp: Millis) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            down: false,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    Idle,
    Held,
}

/// Turns transitions into samples and table rows and tracks which on-screen
/// keys are lit. Codes outside `known` are recorded but never lit.
#[derive(Debug, Clone)]
pub struct KeyRecorder {
    known: HashSet<&'static str>,
    held: BTreeMap<Arc<str>, Highlight>,
}

impl KeyRecorder {
    pub fn new(known: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            known: known.into_iter().collect(),
            held: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, transition: &KeyTransition) -> (Sample, KeystrokeRow) {
        if self.known.contains(&*transition.code) {
            let state = if transition.down {
                Highlight::Held
            } else {
                Highlight::Idle
            };
            self.held.insert(transition.code.clone(), state);
        } else {
            log::debug!("no on-screen key for {}", transition.code);
        }

        let sample = Sample::keystroke(
            transition.timestamp,
            transition.code.clone(),
            transition.label.clone(),
            transition.down,
        );
        let row = KeystrokeRow {
            timestamp: transition.timestamp,
            label: transition.label.clone(),
            code: transition.code.clone(),
            scancode: hid::scancode(&transition.code),
            down: transition.down,
        };
        (sample, row)
    }

    /// Focus went away: no key-up will follow, so nothing may stay lit.
    pub fn focus_lost(&mut self) -> usize {
        let mut released = 0;
        for state in self.held.values_mut() {
            if *state == Highlight::Held {
                released += 1;
            }
            *state = Highlight::Idle;
        }
        released
    }

    pub fn highlight(&self, code: &str) -> Highlight {
        self.held.get(code).copied().unwrap_or_default()
    }

    pub fn held(&self) -> Vec<Arc<str>> {
        self.held
            .iter()
            .filter(|(_, s)| **s == Highlight::Held)
            .map(|(code, _)| code.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::layout::{codes, ANSI_LAYOUT};

    fn recorder() -> KeyRecorder {
        KeyRecorder::new(codes(ANSI_LAYOUT))
    }

    #[test]
    fn transitions_light_and_clear_keys() {
        let mut rec = recorder();
        let (sample, row) = rec.record(&KeyTransition::down("KeyA", "a", 10));
        assert_eq!(sample, Sample::keystroke(10, "KeyA", "a", true));
        assert_eq!(row.scancode, Some(0x04));
        assert_eq!(rec.highlight("KeyA"), Highlight::Held);
        assert_eq!(rec.held(), vec![Arc::<str>::from("KeyA")]);

        rec.record(&KeyTransition::up("KeyA", "a", 20));
        assert_eq!(rec.highlight("KeyA"), Highlight::Idle);
        assert!(rec.held().is_empty());
    }

    #[test]
    fn focus_loss_resets_everything() {
        let mut rec = recorder();
        rec.record(&KeyTransition::down("KeyA", "a", 0));
        rec.record(&KeyTransition::down("ShiftLeft", "Shift", 1));
        rec.record(&KeyTransition::down("KeyB", "B", 2));
        rec.record(&KeyTransition::up("KeyB", "B", 3));

        assert_eq!(rec.focus_lost(), 2);
        for code in ["KeyA", "ShiftLeft", "KeyB"] {
            assert_eq!(rec.highlight(code), Highlight::Idle);
        }
        assert!(rec.held().is_empty());
    }

    #[test]
    fn unknown_keys_are_recorded_but_not_lit() {
        let mut rec = recorder();
        let (sample, row) = rec.record(&KeyTransition::down("MediaPlayPause", "MediaPlayPause", 5));
        assert_eq!(sample.timestamp, 5);
        assert_eq!(row.scancode, None);
        assert_eq!(rec.highlight("MediaPlayPause"), Highlight::Idle);
        assert!(rec.held().is_empty());
    }

    #[test]
    fn shared_labels_keep_their_codes() {
        let mut rec = recorder();
        let (left, _) = rec.record(&KeyTransition::down("ShiftLeft", "Shift", 0));
        let (right, _) = rec.record(&KeyTransition::down("ShiftRight", "Shift", 1));
        assert_eq!(left.key, right.key);
        assert_eq!(&*left.code, "ShiftLeft");
        assert_eq!(&*right.code, "ShiftRight");
        assert_eq!(rec.held().len(), 2);
    }

    #[test]
    fn key_repeat_passes_through() {
        let mut rec = recorder();
        let a = rec.record(&KeyTransition::down("KeyA", "a", 0)).0;
        let b = rec.record(&KeyTransition::down("KeyA", "a", 30)).0;
        assert_eq!(a.value, b.value);
        assert_eq!(rec.held().len(), 1);
    }
}
