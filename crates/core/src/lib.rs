pub mod cancel;
pub mod clock;
pub mod config;
pub mod error;
pub mod phase;

pub use cancel::CancelSignal;
pub use clock::{Clock, ClockError, ReferenceClock};
pub use config::{Config, SequentialConfig};
pub use error::*;
pub use phase::Phase;
