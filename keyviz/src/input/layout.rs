//! On-screen keyboard: rows of key caps identified by browser-style codes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCap {
    pub code: &'static str,
    pub label: &'static str,
    /// Width in cells, label included.
    pub width: u16,
}

const fn cap(code: &'static str, label: &'static str, width: u16) -> KeyCap {
    KeyCap { code, label, width }
}

pub type Layout = &'static [&'static [KeyCap]];

pub static ANSI_LAYOUT: Layout = &[
    &[
        cap("Escape", "Esc", 5),
        cap("F1", "F1", 4),
        cap("F2", "F2", 4),
        cap("F3", "F3", 4),
        cap("F4", "F4", 4),
        cap("F5", "F5", 4),
        cap("F6", "F6", 4),
        cap("F7", "F7", 4),
        cap("F8", "F8", 4),
        cap("F9", "F9", 4),
        cap("F10", "F10", 5),
        cap("F11", "F11", 5),
        cap("F12", "F12", 5),
    ],
    &[
        cap("Backquote", "`", 4),
        cap("Digit1", "1", 4),
        cap("Digit2", "2", 4),
        cap("Digit3", "3", 4),
        cap("Digit4", "4", 4),
        cap("Digit5", "5", 4),
        cap("Digit6", "6", 4),
        cap("Digit7", "7", 4),
        cap("Digit8", "8", 4),
        cap("Digit9", "9", 4),
        cap("Digit0", "0", 4),
        cap("Minus", "-", 4),
        cap("Equal", "=", 4),
        cap("Backspace", "Bksp", 7),
    ],
    &[
        cap("Tab", "Tab", 6),
        cap("KeyQ", "Q", 4),
        cap("KeyW", "W", 4),
        cap("KeyE", "E", 4),
        cap("KeyR", "R", 4),
        cap("KeyT", "T", 4),
        cap("KeyY", "Y", 4),
        cap("KeyU", "U", 4),
        cap("KeyI", "I", 4),
        cap("KeyO", "O", 4),
        cap("KeyP", "P", 4),
        cap("BracketLeft", "[", 4),
        cap("BracketRight", "]", 4),
        cap("Backslash", "\\", 5),
    ],
    &[
        cap("CapsLock", "Caps", 7),
        cap("KeyA", "A", 4),
        cap("KeyS", "S", 4),
        cap("KeyD", "D", 4),
        cap("KeyF", "F", 4),
        cap("KeyG", "G", 4),
        cap("KeyH", "H", 4),
        cap("KeyJ", "J", 4),
        cap("KeyK", "K", 4),
        cap("KeyL", "L", 4),
        cap("Semicolon", ";", 4),
        cap("Quote", "'", 4),
        cap("Enter", "Enter", 8),
    ],
    &[
        cap("ShiftLeft", "Shift", 9),
        cap("KeyZ", "Z", 4),
        cap("KeyX", "X", 4),
        cap("KeyC", "C", 4),
        cap("KeyV", "V", 4),
        cap("KeyB", "B", 4),
        cap("KeyN", "N", 4),
        cap("KeyM", "M", 4),
        cap("Comma", ",", 4),
        cap("Period", ".", 4),
        cap("Slash", "/", 4),
        cap("ShiftRight", "Shift", 10),
    ],
    &[
        cap("ControlLeft", "Ctrl", 6),
        cap("AltLeft", "Alt", 5),
        cap("Space", "", 28),
        cap("AltRight", "Alt", 5),
        cap("ControlRight", "Ctrl", 6),
        cap("ArrowLeft", "<", 4),
        cap("ArrowUp", "^", 4),
        cap("ArrowDown", "v", 4),
        cap("ArrowRight", ">", 4),
    ],
];

pub fn codes(layout: Layout) -> impl Iterator<Item = &'static str> {
    layout.iter().flat_map(|row| row.iter().map(|k| k.code))
}

pub fn find(layout: Layout, code: &str) -> Option<&'static KeyCap> {
    layout.iter().flat_map(|row| row.iter()).find(|k| k.code == code)
}
