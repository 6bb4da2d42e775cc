pub mod layout;
mod recorder;
mod text;

pub use layout::{KeyCap, Layout, ANSI_LAYOUT};
pub use recorder::{Highlight, KeyRecorder, KeyTransition};
pub use text::TextEcho;
