//! Reactor
//! Single consumer of the command queue. Key transitions and poll ticks feed
//! the two series; frame ticks hand a `View` to the presenter when a redraw
//! is pending.

use crate::clock::Clock;
use crate::config::Config;
use crate::data::{
    AnalogRow, BoundedTimeSeries, KeystrokeRow, Millis, RowLog, Sample, Snapshot, Window,
};
use crate::device::AnalogInput;
use crate::input::{layout, KeyRecorder, KeyTransition, Layout, TextEcho};
use crate::throttle::RedrawThrottle;

use crossbeam::channel::{self, Receiver};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    KeyTransition(KeyTransition),
    PollTick,
    FocusLost,
    ToggleAnalog,
    ToggleShowChars,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Everything a presenter needs for one frame.
pub struct View<'a> {
    pub now: Millis,
    pub window: Window,
    pub keystrokes: Snapshot,
    pub analog: Snapshot,
    pub keystroke_rows: &'a RowLog<KeystrokeRow>,
    pub analog_rows: &'a RowLog<AnalogRow>,
    pub layout: Layout,
    pub recorder: &'a KeyRecorder,
    pub text: &'a TextEcho,
    pub analog_status: &'a str,
    pub analog_enabled: bool,
    pub threshold: f64,
    pub max_depth: f64,
}

pub trait Presenter {
    fn render(&mut self, view: &View<'_>) -> std::io::Result<()>;
}

pub struct Reactor<C: Clock> {
    clock: C,
    layout: Layout,
    poll_interval: Duration,
    frame_interval: Duration,
    max_depth: f64,
    keystrokes: BoundedTimeSeries,
    analog: BoundedTimeSeries,
    keystroke_rows: RowLog<KeystrokeRow>,
    analog_rows: RowLog<AnalogRow>,
    recorder: KeyRecorder,
    text: TextEcho,
    input: AnalogInput,
    analog_enabled: bool,
    throttle: RedrawThrottle,
    cursor_visible: bool,
}

impl<C: Clock> Reactor<C> {
    pub fn new(config: &Config, layout: Layout, input: AnalogInput, clock: C) -> Self {
        let window = config.window();
        Self {
            clock,
            layout,
            poll_interval: Duration::from_millis(config.analog.poll_ms),
            frame_interval: Duration::from_millis(config.chart.refresh_ms),
            max_depth: config.analog.max_depth,
            keystrokes: BoundedTimeSeries::new(window),
            analog: BoundedTimeSeries::new(window),
            keystroke_rows: RowLog::new(config.ui.max_table_rows),
            analog_rows: RowLog::new(config.ui.max_table_rows),
            recorder: KeyRecorder::new(layout::codes(layout)),
            text: TextEcho::new(config.ui.idle_delay_ms),
            input,
            analog_enabled: config.analog.enabled,
            throttle: RedrawThrottle::new(),
            cursor_visible: true,
        }
    }

    pub fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::KeyTransition(transition) => {
                if transition.down {
                    self.text.key_down(&transition.label, transition.timestamp);
                }
                let (sample, row) = self.recorder.record(&transition);
                self.keystrokes.append_at(sample, self.clock.now());
                self.keystroke_rows.push(row);
                self.throttle.request();
            }
            Command::PollTick => self.poll(),
            Command::FocusLost => {
                let released = self.recorder.focus_lost();
                log::debug!("focus lost, released {} keys", released);
                self.throttle.request();
            }
            Command::ToggleAnalog => {
                self.analog_enabled = !self.analog_enabled;
                log::info!(
                    "analog polling {}",
                    if self.analog_enabled { "on" } else { "off" }
                );
                self.throttle.request();
            }
            Command::ToggleShowChars => {
                self.text.toggle_show_chars();
                self.throttle.request();
            }
            Command::Shutdown => return Flow::Stop,
        }
        Flow::Continue
    }

    fn poll(&mut self) {
        if !self.analog_enabled {
            return;
        }
        let now = self.clock.now();
        let held = self.recorder.held();
        let readings = self.input.poll(&held, now);
        if readings.is_empty() {
            return;
        }
        let threshold = self.input.threshold();
        for reading in readings {
            self.analog_rows.push(AnalogRow::new(
                now,
                reading.key.clone(),
                reading.depth,
                threshold,
            ));
            self.analog
                .append_at(Sample::depth(now, reading.key, reading.depth), now);
        }
        self.throttle.request();
    }

    /// Frame boundary: age out old samples and draw if anything changed.
    /// Returns whether the presenter was called.
    pub fn frame(&mut self, presenter: &mut dyn Presenter) -> std::io::Result<bool> {
        let now = self.clock.now();
        let evicted = self.keystrokes.evict_expired(now) + self.analog.evict_expired(now);
        // charts scroll while they hold data
        if evicted > 0 || !self.keystrokes.is_empty() || !self.analog.is_empty() {
            self.throttle.request();
        }
        let cursor_visible = self.text.cursor_visible(now);
        if cursor_visible != self.cursor_visible {
            self.cursor_visible = cursor_visible;
            self.throttle.request();
        }

        if !self.throttle.take() {
            return Ok(false);
        }
        presenter.render(&self.view_at(now))?;
        Ok(true)
    }

    pub fn view(&self) -> View<'_> {
        self.view_at(self.clock.now())
    }

    fn view_at(&self, now: Millis) -> View<'_> {
        View {
            now,
            window: self.keystrokes.window(),
            keystrokes: self.keystrokes.snapshot(),
            analog: self.analog.snapshot(),
            keystroke_rows: &self.keystroke_rows,
            analog_rows: &self.analog_rows,
            layout: self.layout,
            recorder: &self.recorder,
            text: &self.text,
            analog_status: self.input.status(),
            analog_enabled: self.analog_enabled,
            threshold: self.input.threshold(),
            max_depth: self.max_depth,
        }
    }

    pub fn throttle(&self) -> &RedrawThrottle {
        &self.throttle
    }

    /// Runs until `Shutdown` arrives or every sender is gone. The poll and
    /// frame timers live only for the duration of this call.
    pub fn run(
        &mut self,
        commands: Receiver<Command>,
        presenter: &mut dyn Presenter,
    ) -> std::io::Result<()> {
        let poll = channel::tick(self.poll_interval);
        let frame = channel::tick(self.frame_interval);
        log::info!(
            "reactor running: poll every {:?}, frame every {:?}",
            self.poll_interval,
            self.frame_interval
        );

        loop {
            crossbeam::select! {
                recv(commands) -> command => {
                    match command {
                        Ok(command) => {
                            if self.handle(command) == Flow::Stop {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                recv(poll) -> _ => {
                    self.handle(Command::PollTick);
                }
                recv(frame) -> _ => {
                    self.frame(presenter)?;
                }
            }
        }

        log::info!(
            "reactor stopped after {} redraws ({} requested)",
            self.throttle.drawn(),
            self.throttle.requested()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::device::Ramp;
    use crate::input::{Highlight, ANSI_LAYOUT};
    use std::sync::Arc;

    #[derive(Default)]
    struct Frames {
        keystrokes: Vec<Vec<Millis>>,
        highlights: Vec<Highlight>,
    }

    impl Presenter for Frames {
        fn render(&mut self, view: &View<'_>) -> std::io::Result<()> {
            self.keystrokes.push(view.keystrokes.timestamps());
            self.highlights.push(view.recorder.highlight("KeyA"));
            Ok(())
        }
    }

    fn reactor(clock: Arc<ManualClock>) -> Reactor<Arc<ManualClock>> {
        let config = Config::default();
        let input = AnalogInput::simulated(Ramp::default(), config.analog.threshold);
        Reactor::new(&config, ANSI_LAYOUT, input, clock)
    }

    #[test]
    fn redraws_collapse_within_a_frame() {
        let clock = Arc::new(ManualClock::new(0));
        let mut r = reactor(clock.clone());
        let mut frames = Frames::default();

        assert!(!r.frame(&mut frames).unwrap());

        r.handle(Command::KeyTransition(KeyTransition::down("KeyA", "a", 0)));
        clock.set(5);
        r.handle(Command::KeyTransition(KeyTransition::up("KeyA", "a", 5)));
        assert!(r.frame(&mut frames).unwrap());
        assert_eq!(frames.keystrokes, vec![vec![0, 5]]);
        assert_eq!(r.throttle().drawn(), 1);
    }

    #[test]
    fn idle_frame_ages_out_samples() {
        let clock = Arc::new(ManualClock::new(0));
        let mut r = reactor(clock.clone());
        let mut frames = Frames::default();

        r.handle(Command::KeyTransition(KeyTransition::down("KeyA", "a", 0)));
        r.frame(&mut frames).unwrap();
        clock.set(3001);
        assert!(r.frame(&mut frames).unwrap());
        assert_eq!(frames.keystrokes.last(), Some(&vec![]));
    }

    #[test]
    fn poll_ticks_feed_the_analog_series() {
        let clock = Arc::new(ManualClock::new(0));
        let mut r = reactor(clock.clone());

        r.handle(Command::KeyTransition(KeyTransition::down("KeyA", "a", 0)));
        for _ in 0..5 {
            clock.advance(16);
            r.handle(Command::PollTick);
        }
        // 0.05 and 0.10 are filtered; 0.15, 0.20, 0.25 are kept
        let view = r.view();
        assert_eq!(view.analog.len(), 3);
        assert_eq!(view.analog_rows.len(), 3);
        assert!(view.analog_rows.iter().all(|row| row.active));
    }

    #[test]
    fn analog_toggle_stops_polling() {
        let clock = Arc::new(ManualClock::new(0));
        let mut r = reactor(clock.clone());
        r.handle(Command::ToggleAnalog);
        r.handle(Command::KeyTransition(KeyTransition::down("KeyA", "a", 0)));
        for _ in 0..10 {
            clock.advance(16);
            r.handle(Command::PollTick);
        }
        assert!(r.view().analog.is_empty());
        assert!(!r.view().analog_enabled);
    }

    #[test]
    fn focus_loss_clears_highlight_and_starts_decay() {
        let clock = Arc::new(ManualClock::new(0));
        let mut r = reactor(clock.clone());
        let mut frames = Frames::default();

        r.handle(Command::KeyTransition(KeyTransition::down("KeyA", "a", 0)));
        for _ in 0..4 {
            clock.advance(16);
            r.handle(Command::PollTick);
        }
        r.handle(Command::FocusLost);
        r.frame(&mut frames).unwrap();
        assert_eq!(frames.highlights, vec![Highlight::Idle]);

        for _ in 0..2 {
            clock.advance(16);
            r.handle(Command::PollTick);
        }
        let view = r.view();
        let last = view.analog.last().unwrap();
        assert_eq!(last.value, crate::data::SampleValue::Depth(0.0));
    }

    #[test]
    fn text_echo_follows_key_downs() {
        let clock = Arc::new(ManualClock::new(0));
        let mut r = reactor(clock);
        for (code, label) in [("KeyH", "h"), ("KeyI", "i"), ("Backspace", "Backspace")] {
            r.handle(Command::KeyTransition(KeyTransition::down(code, label, 0)));
            r.handle(Command::KeyTransition(KeyTransition::up(code, label, 0)));
        }
        assert_eq!(r.view().text.rendered(), "h");
        r.handle(Command::ToggleShowChars);
        assert_eq!(r.view().text.rendered(), "\u{2022}");
    }

    #[test]
    fn run_stops_on_shutdown() {
        let clock = Arc::new(ManualClock::new(0));
        let mut r = reactor(clock);
        let (tx, rx) = channel::unbounded();
        tx.send(Command::KeyTransition(KeyTransition::down("KeyA", "a", 0)))
            .unwrap();
        tx.send(Command::Shutdown).unwrap();
        let mut frames = Frames::default();
        r.run(rx, &mut frames).unwrap();
        assert_eq!(r.view().keystroke_rows.len(), 1);
    }

    #[test]
    fn run_stops_when_senders_are_gone() {
        let clock = Arc::new(ManualClock::new(0));
        let mut r = reactor(clock);
        let (tx, rx) = channel::unbounded::<Command>();
        drop(tx);
        let mut frames = Frames::default();
        r.run(rx, &mut frames).unwrap();
    }
}
