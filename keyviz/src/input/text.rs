use crate::data::Millis;

const BLINK_PERIOD: Millis = 1000;
const BULLET: char = '\u{2022}';

/// The echo field under the keyboard.
#[derive(Debug, Clone)]
pub struct TextEcho {
    chars: Vec<char>,
    show_chars: bool,
    idle_delay: Millis,
    solid_until: Option<Millis>,
}

impl TextEcho {
    pub fn new(idle_delay: Millis) -> Self {
        Self {
            chars: Vec::new(),
            show_chars: true,
            idle_delay,
            solid_until: None,
        }
    }

    /// Applies a key-down by its label: `Enter` clears, `Backspace` deletes,
    /// single characters are appended, anything else only wakes the cursor.
    pub fn key_down(&mut self, label: &str, now: Millis) {
        match label {
            "Enter" => self.chars.clear(),
            "Backspace" => {
                self.chars.pop();
            }
            _ => {
                let mut it = label.chars();
                if let (Some(c), None) = (it.next(), it.next()) {
                    self.chars.push(c);
                }
            }
        }
        self.solid_until = Some(now + self.idle_delay);
    }

    pub fn toggle_show_chars(&mut self) -> bool {
        self.show_chars = !self.show_chars;
        self.solid_until = None;
        self.show_chars
    }

    pub fn show_chars(&self) -> bool {
        self.show_chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn rendered(&self) -> String {
        if self.show_chars {
            self.chars.iter().collect()
        } else {
            std::iter::repeat(BULLET).take(self.chars.len()).collect()
        }
    }

    pub fn cursor_solid(&self, now: Millis) -> bool {
        self.solid_until.is_some_and(|until| now < until)
    }

    pub fn cursor_visible(&self, now: Millis) -> bool {
        self.cursor_solid(now) || (now / (BLINK_PERIOD / 2)) % 2 == 0
    }
}
