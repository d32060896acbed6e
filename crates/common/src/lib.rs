//! Shared types: entity ids, transforms, grid coordinates, polled timers and signals.

mod signal;
mod timer;
mod types;

pub use signal::{ListenerId, Signal};
pub use timer::{Clock, ManualClock, SystemClock, Timer};
pub use types::{EntityId, GridCoord, Transform};
