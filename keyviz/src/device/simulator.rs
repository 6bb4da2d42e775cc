use super::depth::DepthReading;
use crate::data::Millis;

use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub rise_step: f64,
    pub fall_step: f64,
    pub max_depth: f64,
}

impl Default for Ramp {
    fn default() -> Self {
        Self {
            rise_step: 0.05,
            fall_step: 0.1,
            max_depth: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPressState {
    pub depth: f64,
    pub last_update: Millis,
}

/// Linear press/release ramp standing in for variable-pressure hardware.
#[derive(Debug, Clone, Default)]
pub struct DepthSimulator {
    ramp: Ramp,
    keys: BTreeMap<Arc<str>, KeyPressState>,
}

impl DepthSimulator {
    pub fn new(ramp: Ramp) -> Self {
        Self {
            ramp,
            keys: BTreeMap::new(),
        }
    }

    pub fn ramp(&self) -> Ramp {
        self.ramp
    }

    pub fn state(&self, key: &str) -> Option<&KeyPressState> {
        self.keys.get(key)
    }

    pub fn tracked(&self) -> usize {
        self.keys.len()
    }

    /// Advances every key by one poll tick and returns the keys whose depth
    /// changed. Released keys that reach zero report once and are pruned.
    pub fn tick(&mut self, held: &[Arc<str>], now: Millis) -> Vec<DepthReading> {
        let mut updated = Vec::new();

        for key in held {
            let state = self.keys.entry(key.clone()).or_insert(KeyPressState {
                depth: 0.0,
                last_update: now,
            });
            if state.depth < self.ramp.max_depth {
                state.depth = (state.depth + self.ramp.rise_step).min(self.ramp.max_depth);
            }
            state.last_update = now;
            updated.push(DepthReading {
                key: key.clone(),
                depth: state.depth,
            });
        }

        let mut released = Vec::new();
        for (key, state) in self.keys.iter_mut() {
            if held.contains(key) || state.depth <= 0.0 {
                continue;
            }
            state.depth = (state.depth - self.ramp.fall_step).max(0.0);
            state.last_update = now;
            updated.push(DepthReading {
                key: key.clone(),
                depth: state.depth,
            });
            if state.depth == 0.0 {
                released.push(key.clone());
            }
        }
        for key in released {
            self.keys.remove(&key);
        }

        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: &str) -> Arc<str> {
        Arc::from(code)
    }

    #[test]
    fn held_key_ramps_to_max() {
        let mut sim = DepthSimulator::new(Ramp::default());
        let held = [key("KeyA")];
        let mut last = 0.0;
        for i in 0..20 {
            let readings = sim.tick(&held, i);
            assert_eq!(readings.len(), 1);
            assert!(readings[0].depth > last);
            last = readings[0].depth;
        }
        assert_eq!(sim.state("KeyA").map(|s| s.depth), Some(1.0));

        sim.tick(&held, 21);
        assert_eq!(sim.state("KeyA").map(|s| s.depth), Some(1.0));
    }

    #[test]
    fn released_key_decays_and_is_pruned() {
        let mut sim = DepthSimulator::new(Ramp::default());
        sim.keys.insert(
            key("KeyA"),
            KeyPressState {
                depth: 0.25,
                last_update: 0,
            },
        );

        let r = sim.tick(&[], 1);
        assert!((r[0].depth - 0.15).abs() < 1e-9);
        let r = sim.tick(&[], 2);
        assert!(r[0].depth > 0.0 && r[0].depth < 0.15);
        let r = sim.tick(&[], 3);
        assert_eq!(r[0].depth, 0.0);
        assert_eq!(sim.tracked(), 0);

        assert!(sim.tick(&[], 4).is_empty());
    }

    #[test]
    fn idle_simulator_reports_nothing() {
        let mut sim = DepthSimulator::new(Ramp::default());
        assert!(sim.tick(&[], 0).is_empty());
    }

    #[test]
    fn last_update_tracks_tick_time() {
        let mut sim = DepthSimulator::new(Ramp::default());
        sim.tick(&[key("Space")], 100);
        sim.tick(&[key("Space")], 116);
        assert_eq!(sim.state("Space").map(|s| s.last_update), Some(116));
    }
}
