//! Script Host: one sandboxed Lua interpreter per scripted character.
//!
//! A script defines a global `decide(tick)` routine. The host runs it as a
//! coroutine, resuming it at most once per tick; the routine may suspend
//! itself with `wait(...)` and continues exactly where it paused once the
//! wake condition holds. Every resume is bounded by an instruction budget.
//!
//! Host calls never touch the world directly. They read and mutate a
//! [`ScriptFrame`] that the coordinator prepares before the resume and
//! commits only if the resume completes without a fault.
mod api;
mod error;
mod frame;
mod host;
mod policy;
mod wait;

pub use error::{ScriptError, ScriptFault};
pub use frame::{ScriptCommand, ScriptFrame};
pub use host::{Resume, ScriptHost, ScriptLimits, ScriptTurn};
pub use policy::{DisablePolicy, FaultAction, FaultPolicy, FaultPolicyConfig, ReloadPolicy};
pub use wait::{WaitStatus, WakeCondition};

/// Signals raised by the engine itself.
pub mod signals {
    /// The character took damage.
    pub const DAMAGED: &str = "damaged";
    /// The character gained at least one level.
    pub const LEVEL_UP: &str = "level_up";
    /// The character's target no longer exists or died.
    pub const TARGET_LOST: &str = "target_lost";
}
