pub mod clock;
pub mod config;
pub mod data;
pub mod device;
pub mod input;
pub mod reactor;
pub mod throttle;

pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use reactor::{Command, Presenter, Reactor, View};
