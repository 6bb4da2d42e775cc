//! USB HID keyboard usage IDs (usage page 0x07) keyed by browser-style
//! key codes (`KeyA`, `Digit1`, `ShiftLeft`, ...).

use num_enum::{FromPrimitive, IntoPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[derive(FromPrimitive, IntoPrimitive)]
pub enum HidUsage {
    KeyA = 0x04,
    KeyB = 0x05,
    KeyC = 0x06,
    KeyD = 0x07,
    KeyE = 0x08,
    KeyF = 0x09,
    KeyG = 0x0A,
    KeyH = 0x0B,
    KeyI = 0x0C,
    KeyJ = 0x0D,
    KeyK = 0x0E,
    KeyL = 0x0F,
    KeyM = 0x10,
    KeyN = 0x11,
    KeyO = 0x12,
    KeyP = 0x13,
    KeyQ = 0x14,
    KeyR = 0x15,
    KeyS = 0x16,
    KeyT = 0x17,
    KeyU = 0x18,
    KeyV = 0x19,
    KeyW = 0x1A,
    KeyX = 0x1B,
    KeyY = 0x1C,
    KeyZ = 0x1D,
    Digit1 = 0x1E,
    Digit2 = 0x1F,
    Digit3 = 0x20,
    Digit4 = 0x21,
    Digit5 = 0x22,
    Digit6 = 0x23,
    Digit7 = 0x24,
    Digit8 = 0x25,
    Digit9 = 0x26,
    Digit0 = 0x27,
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    BracketLeft = 0x2F,
    BracketRight = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Backquote = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,
    CapsLock = 0x39,
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,
    ControlLeft = 0xE0,
    ShiftLeft = 0xE1,
    AltLeft = 0xE2,
    ControlRight = 0xE4,
    ShiftRight = 0xE5,
    AltRight = 0xE6,
    #[num_enum(catch_all)]
    Unknown(u8),
}

const CODES: &[(&str, HidUsage)] = &[
    ("KeyA", HidUsage::KeyA),
    ("KeyB", HidUsage::KeyB),
    ("KeyC", HidUsage::KeyC),
    ("KeyD", HidUsage::KeyD),
    ("KeyE", HidUsage::KeyE),
    ("KeyF", HidUsage::KeyF),
    ("KeyG", HidUsage::KeyG),
    ("KeyH", HidUsage::KeyH),
    ("KeyI", HidUsage::KeyI),
    ("KeyJ", HidUsage::KeyJ),
    ("KeyK", HidUsage::KeyK),
    ("KeyL", HidUsage::KeyL),
    ("KeyM", HidUsage::KeyM),
    ("KeyN", HidUsage::KeyN),
    ("KeyO", HidUsage::KeyO),
    ("KeyP", HidUsage::KeyP),
    ("KeyQ", HidUsage::KeyQ),
    ("KeyR", HidUsage::KeyR),
    ("KeyS", HidUsage::KeyS),
    ("KeyT", HidUsage::KeyT),
    ("KeyU", HidUsage::KeyU),
    ("KeyV", HidUsage::KeyV),
    ("KeyW", HidUsage::KeyW),
    ("KeyX", HidUsage::KeyX),
    ("KeyY", HidUsage::KeyY),
    ("KeyZ", HidUsage::KeyZ),
    ("Digit1", HidUsage::Digit1),
    ("Digit2", HidUsage::Digit2),
    ("Digit3", HidUsage::Digit3),
    ("Digit4", HidUsage::Digit4),
    ("Digit5", HidUsage::Digit5),
    ("Digit6", HidUsage::Digit6),
    ("Digit7", HidUsage::Digit7),
    ("Digit8", HidUsage::Digit8),
    ("Digit9", HidUsage::Digit9),
    ("Digit0", HidUsage::Digit0),
    ("Enter", HidUsage::Enter),
    ("Escape", HidUsage::Escape),
    ("Backspace", HidUsage::Backspace),
    ("Tab", HidUsage::Tab),
    ("Space", HidUsage::Space),
    ("Minus", HidUsage::Minus),
    ("Equal", HidUsage::Equal),
    ("BracketLeft", HidUsage::BracketLeft),
    ("BracketRight", HidUsage::BracketRight),
    ("Backslash", HidUsage::Backslash),
    ("Semicolon", HidUsage::Semicolon),
    ("Quote", HidUsage::Quote),
    ("Backquote", HidUsage::Backquote),
    ("Comma", HidUsage::Comma),
    ("Period", HidUsage::Period),
    ("Slash", HidUsage::Slash),
    ("CapsLock", HidUsage::CapsLock),
    ("ArrowRight", HidUsage::ArrowRight),
    ("ArrowLeft", HidUsage::ArrowLeft),
    ("ArrowDown", HidUsage::ArrowDown),
    ("ArrowUp", HidUsage::ArrowUp),
    ("ControlLeft", HidUsage::ControlLeft),
    ("ShiftLeft", HidUsage::ShiftLeft),
    ("AltLeft", HidUsage::AltLeft),
    ("ControlRight", HidUsage::ControlRight),
    ("ShiftRight", HidUsage::ShiftRight),
    ("AltRight", HidUsage::AltRight),
];

impl HidUsage {
    pub fn from_code(code: &str) -> Option<HidUsage> {
        CODES
            .iter()
            .find(|(name, _)| *name == code)
            .map(|(_, usage)| *usage)
    }

    pub fn code(&self) -> Option<&'static str> {
        CODES
            .iter()
            .find(|(_, usage)| usage == self)
            .map(|(name, _)| *name)
    }
}

/// HID usage ID for a key code, if the key has one.
pub fn scancode(code: &str) -> Option<u8> {
    HidUsage::from_code(code).map(u8::from)
}
