// keyviz-monitor
//
// Live keyboard visualizer: held keys on an on-screen layout, a digital
// keystroke strip, a key-depth sparkline and the recent event tables.
//
// Quit: Ctrl-C   Toggle analog: Ctrl-A   Toggle character echo: Ctrl-S

use chrono::{DateTime, Local};
use clap::Parser;
use crossbeam::channel::{self, Sender};
use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{cursor, style, terminal, ExecutableCommand, QueueableCommand};
use keyviz::data::{Millis, PressureLevel};
use keyviz::device::{select_source, SysfsProbe};
use keyviz::input::{Highlight, ANSI_LAYOUT};
use keyviz::{Clock, Command, Presenter, Reactor, SystemClock, View};
use keyviz_tools::keys::KeyTranslator;
use keyviz_tools::{chart, init_logging, VizOpts};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "keyviz-monitor", version, about = "Live keyboard and key-depth visualizer")]
struct Cli {
    #[command(flatten)]
    opts: VizOpts,
}

struct Tui {
    stdout: io::Stdout,
    enhanced: bool,
}

impl Tui {
    fn setup() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        stdout.execute(terminal::EnterAlternateScreen)?;
        stdout.execute(cursor::Hide)?;
        stdout.execute(event::EnableFocusChange)?;

        // key release events need the kitty keyboard protocol
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            stdout.execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES,
            ))?;
        } else {
            log::warn!("terminal lacks keyboard enhancement; key-up events will be missing");
        }
        Ok(Self { stdout, enhanced })
    }

    fn teardown(&mut self) {
        if self.enhanced {
            let _ = self.stdout.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.stdout.execute(event::DisableFocusChange);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }

    fn heading(&mut self, text: &str) -> io::Result<()> {
        self.stdout.queue(SetAttribute(Attribute::Bold))?;
        self.stdout.queue(style::Print(text))?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(cursor::MoveToNextLine(1))?;
        Ok(())
    }

    fn draw_keyboard(&mut self, view: &View<'_>) -> io::Result<()> {
        for row in view.layout {
            for cap in row.iter() {
                let width = cap.width as usize;
                let text = format!("[{:^w$}]", cap.label, w = width.saturating_sub(2));
                if view.recorder.highlight(cap.code) == Highlight::Held {
                    self.stdout.queue(SetAttribute(Attribute::Reverse))?;
                    self.stdout.queue(SetForegroundColor(Color::Green))?;
                    self.stdout.queue(style::Print(text))?;
                    self.stdout.queue(SetAttribute(Attribute::Reset))?;
                    self.stdout.queue(ResetColor)?;
                } else {
                    self.stdout.queue(style::Print(text))?;
                }
            }
            self.stdout.queue(cursor::MoveToNextLine(1))?;
        }
        Ok(())
    }
}

fn clock_time(ts: Millis) -> String {
    match DateTime::from_timestamp_millis(ts as i64) {
        Some(t) => t.with_timezone(&Local).format("%H:%M:%S%.3f").to_string(),
        None => ts.to_string(),
    }
}

fn level_color(level: PressureLevel) -> Color {
    match level {
        PressureLevel::Low => Color::Green,
        PressureLevel::Medium => Color::Yellow,
        PressureLevel::High => Color::Red,
    }
}

impl Presenter for Tui {
    fn render(&mut self, view: &View<'_>) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let chart_width = (cols as usize).saturating_sub(8).max(10);

        self.stdout.queue(cursor::MoveTo(0, 0))?;
        self.stdout
            .queue(terminal::Clear(terminal::ClearType::All))?;

        self.heading(&format!(
            "keyviz-monitor  window={}ms  analog={}",
            view.window.duration,
            if view.analog_enabled { "on" } else { "off" }
        ))?;
        self.stdout.queue(SetForegroundColor(Color::DarkGrey))?;
        self.stdout.queue(style::Print(view.analog_status))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(cursor::MoveToNextLine(2))?;

        self.draw_keyboard(view)?;
        self.stdout.queue(cursor::MoveToNextLine(1))?;

        let cursor_char = if view.text.cursor_visible(view.now) { "█" } else { " " };
        self.stdout.queue(style::Print(format!(
            "> {}{}",
            view.text.rendered(),
            cursor_char
        )))?;
        self.stdout.queue(cursor::MoveToNextLine(2))?;

        let duration = view.window.duration;
        self.stdout.queue(style::Print(format!(
            "keys   {}",
            chart::digital_strip(&view.keystrokes, view.now, duration, chart_width)
        )))?;
        self.stdout.queue(cursor::MoveToNextLine(1))?;
        self.stdout.queue(SetForegroundColor(Color::Cyan))?;
        self.stdout.queue(style::Print(format!(
            "depth  {}",
            chart::depth_sparkline(
                &view.analog,
                view.now,
                duration,
                chart_width,
                view.max_depth
            )
        )))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(cursor::MoveToNextLine(2))?;

        // whatever is left below the charts, split between the two tables
        let used = 8 + view.layout.len() as u16 + 6;
        let per_table = (rows.saturating_sub(used) / 2).saturating_sub(1) as usize;

        self.heading(&format!(
            "Keystrokes ({} of {})",
            per_table.min(view.keystroke_rows.len()),
            view.keystroke_rows.len()
        ))?;
        for row in view.keystroke_rows.tail(per_table).iter().rev() {
            let scancode = match row.scancode {
                Some(sc) => format!("0x{:02X}", sc),
                None => "-".to_string(),
            };
            self.stdout.queue(SetForegroundColor(if row.down {
                Color::White
            } else {
                Color::DarkGrey
            }))?;
            self.stdout.queue(style::Print(format!(
                "[{}] {:<10} {:<12} {:>5}  {}",
                clock_time(row.timestamp),
                row.label,
                row.code,
                scancode,
                if row.down { "Down" } else { "Up" }
            )))?;
            self.stdout.queue(ResetColor)?;
            self.stdout.queue(cursor::MoveToNextLine(1))?;
        }
        self.stdout.queue(cursor::MoveToNextLine(1))?;

        self.heading(&format!(
            "Analog (threshold {:.2}, {} of {})",
            view.threshold,
            per_table.min(view.analog_rows.len()),
            view.analog_rows.len()
        ))?;
        for row in view.analog_rows.tail(per_table).iter().rev() {
            self.stdout.queue(SetForegroundColor(level_color(row.level)))?;
            self.stdout.queue(style::Print(format!(
                "[{}] {:<12} {:>6.3}  {}",
                clock_time(row.timestamp),
                row.key,
                row.depth,
                if row.active { "Active" } else { "Inactive" }
            )))?;
            self.stdout.queue(ResetColor)?;
            self.stdout.queue(cursor::MoveToNextLine(1))?;
        }

        self.stdout.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
        self.stdout.queue(SetForegroundColor(Color::DarkGrey))?;
        self.stdout.queue(style::Print(
            "Ctrl-C quit  Ctrl-A toggle analog  Ctrl-S toggle characters",
        ))?;
        self.stdout.queue(ResetColor)?;

        self.stdout.flush()
    }
}

/// Reads terminal events until `stop` is set or the reactor hangs up.
fn spawn_input(
    tx: Sender<Command>,
    clock: SystemClock,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut translator = KeyTranslator::new();
        while !stop.load(Ordering::Relaxed) {
            match event::poll(Duration::from_millis(50)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    log::error!("terminal poll failed: {}", e);
                    let _ = tx.send(Command::Shutdown);
                    break;
                }
            }
            let command = match event::read() {
                Ok(Event::Key(key)) => translator.translate(&key, clock.now()),
                Ok(Event::FocusLost) => Some(Command::FocusLost),
                Ok(_) => None,
                Err(e) => {
                    log::warn!("terminal read failed: {}", e);
                    None
                }
            };
            if let Some(command) = command {
                if tx.send(command).is_err() {
                    break;
                }
            }
        }
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.opts.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("keyviz-monitor: {}", e);
            return ExitCode::from(2);
        }
    };
    if let Err(e) = init_logging(cli.opts.log_file.as_ref(), cli.opts.verbose, false) {
        eprintln!("keyviz-monitor: cannot open log file: {}", e);
        return ExitCode::FAILURE;
    }

    let input = select_source(
        &SysfsProbe::default(),
        config.ramp(),
        config.analog.threshold,
        config.analog.force_simulation,
    );

    let mut tui = match Tui::setup() {
        Ok(tui) => tui,
        Err(e) => {
            eprintln!("keyviz-monitor: terminal setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let enhanced = tui.enhanced;
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let mut t = Tui {
            stdout: io::stdout(),
            enhanced,
        };
        t.teardown();
        original_hook(panic_info);
    }));

    let clock = SystemClock::new();
    let (tx, rx) = channel::unbounded();
    let stop = Arc::new(AtomicBool::new(false));
    let reader = spawn_input(tx, clock, stop.clone());

    let mut reactor = Reactor::new(&config, ANSI_LAYOUT, input, clock);
    let result = reactor.run(rx, &mut tui);

    stop.store(true, Ordering::Relaxed);
    let _ = reader.join();
    tui.teardown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("render failed: {}", e);
            eprintln!("keyviz-monitor: {}", e);
            ExitCode::FAILURE
        }
    }
}
