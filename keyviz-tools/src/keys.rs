//! crossterm key events to browser-style key identifiers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};
use keyviz::data::Millis;
use keyviz::input::KeyTransition;
use keyviz::reactor::Command;
use std::collections::HashSet;

/// Physical key code for a printed character on a US layout.
pub fn char_code(c: char) -> Option<String> {
    let code = match c {
        'a'..='z' => format!("Key{}", c.to_ascii_uppercase()),
        'A'..='Z' => format!("Key{}", c),
        '0'..='9' => format!("Digit{}", c),
        ' ' => "Space".to_string(),
        '!' => "Digit1".to_string(),
        '@' => "Digit2".to_string(),
        '#' => "Digit3".to_string(),
        '$' => "Digit4".to_string(),
        '%' => "Digit5".to_string(),
        '^' => "Digit6".to_string(),
        '&' => "Digit7".to_string(),
        '*' => "Digit8".to_string(),
        '(' => "Digit9".to_string(),
        ')' => "Digit0".to_string(),
        '-' | '_' => "Minus".to_string(),
        '=' | '+' => "Equal".to_string(),
        '[' | '{' => "BracketLeft".to_string(),
        ']' | '}' => "BracketRight".to_string(),
        '\\' | '|' => "Backslash".to_string(),
        ';' | ':' => "Semicolon".to_string(),
        '\'' | '"' => "Quote".to_string(),
        '`' | '~' => "Backquote".to_string(),
        ',' | '<' => "Comma".to_string(),
        '.' | '>' => "Period".to_string(),
        '/' | '?' => "Slash".to_string(),
        _ => return None,
    };
    Some(code)
}

/// The character a US layout prints for `c` with Shift held. Characters that
/// are already shifted come back unchanged.
pub fn shifted(c: char) -> char {
    match c {
        'a'..='z' => c.to_ascii_uppercase(),
        '1' => '!',
        '2' => '@',
        '3' => '#',
        '4' => '$',
        '5' => '%',
        '6' => '^',
        '7' => '&',
        '8' => '*',
        '9' => '(',
        '0' => ')',
        '-' => '_',
        '=' => '+',
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        ';' => ':',
        '\'' => '"',
        '`' => '~',
        ',' => '<',
        '.' => '>',
        '/' => '?',
        _ => c,
    }
}

/// (code, label) for a crossterm key; `None` for keys we do not track.
///
/// With every key reported as an escape code the terminal sends the base
/// character plus `SHIFT`, so the printed label is derived here.
pub fn identify(code: &KeyCode, modifiers: KeyModifiers) -> Option<(String, String)> {
    let named = |code: &str, label: &str| Some((code.to_string(), label.to_string()));
    match code {
        KeyCode::Char(c) => {
            let c = if modifiers.contains(KeyModifiers::SHIFT) {
                shifted(*c)
            } else {
                *c
            };
            let label = c.to_string();
            match char_code(c) {
                Some(code) => Some((code, label)),
                None => Some((label.clone(), label)),
            }
        }
        KeyCode::Enter => named("Enter", "Enter"),
        KeyCode::Backspace => named("Backspace", "Backspace"),
        KeyCode::Tab | KeyCode::BackTab => named("Tab", "Tab"),
        KeyCode::Esc => named("Escape", "Escape"),
        KeyCode::Delete => named("Delete", "Delete"),
        KeyCode::Insert => named("Insert", "Insert"),
        KeyCode::Home => named("Home", "Home"),
        KeyCode::End => named("End", "End"),
        KeyCode::PageUp => named("PageUp", "PageUp"),
        KeyCode::PageDown => named("PageDown", "PageDown"),
        KeyCode::Up => named("ArrowUp", "ArrowUp"),
        KeyCode::Down => named("ArrowDown", "ArrowDown"),
        KeyCode::Left => named("ArrowLeft", "ArrowLeft"),
        KeyCode::Right => named("ArrowRight", "ArrowRight"),
        KeyCode::CapsLock => named("CapsLock", "CapsLock"),
        KeyCode::F(n) => {
            let name = format!("F{}", n);
            Some((name.clone(), name))
        }
        KeyCode::Modifier(m) => match m {
            ModifierKeyCode::LeftShift => named("ShiftLeft", "Shift"),
            ModifierKeyCode::RightShift => named("ShiftRight", "Shift"),
            ModifierKeyCode::LeftControl => named("ControlLeft", "Control"),
            ModifierKeyCode::RightControl => named("ControlRight", "Control"),
            ModifierKeyCode::LeftAlt => named("AltLeft", "Alt"),
            ModifierKeyCode::RightAlt => named("AltRight", "Alt"),
            ModifierKeyCode::LeftSuper => named("MetaLeft", "Meta"),
            ModifierKeyCode::RightSuper => named("MetaRight", "Meta"),
            _ => None,
        },
        _ => None,
    }
}

fn control_command(c: char) -> Option<Command> {
    match c {
        'c' => Some(Command::Shutdown),
        'a' => Some(Command::ToggleAnalog),
        's' => Some(Command::ToggleShowChars),
        _ => None,
    }
}

/// Turns terminal key events into reactor commands.
///
/// Ctrl-C quits, Ctrl-A toggles analog polling, Ctrl-S toggles character
/// echo. A chord fires on press and is never recorded: its repeats and its
/// release are swallowed too, even when Ctrl comes up first.
#[derive(Debug, Default)]
pub struct KeyTranslator {
    swallowed: HashSet<char>,
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &KeyEvent, timestamp: Millis) -> Option<Command> {
        if let KeyCode::Char(c) = event.code {
            let c = c.to_ascii_lowercase();
            if let Some(command) = control_command(c) {
                if event.kind == KeyEventKind::Release {
                    if self.swallowed.remove(&c) {
                        return None;
                    }
                } else if event.modifiers.contains(KeyModifiers::CONTROL) {
                    self.swallowed.insert(c);
                    return (event.kind == KeyEventKind::Press).then_some(command);
                }
            }
        }
        transition(event, timestamp).map(Command::KeyTransition)
    }
}

/// Press and repeat are key-down, release is key-up.
pub fn transition(event: &KeyEvent, timestamp: Millis) -> Option<KeyTransition> {
    let (code, label) = identify(&event.code, event.modifiers)?;
    Some(KeyTransition {
        code: code.into(),
        label: label.into(),
        down: event.kind != KeyEventKind::Release,
        timestamp,
    })
}
