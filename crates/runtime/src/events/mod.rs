//! Topic-based event bus for runtime events.
//!
//! The world reports what happened during a tick as a list of [`Event`]s;
//! the simulation worker publishes them to topics so consumers subscribe
//! only to what they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{ScriptEvent, TickEvent, TickReport, WorldEvent};
