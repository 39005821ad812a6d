//! Action domain: what a character wants to do, and whether it may.
//!
//! - `intent`: the brain-writable request ([`ActionIntent`])
//! - `machine`: cooldown/stamina gating and commit ([`ActionMachine`])
//! - `combat`: attack plans and block mitigation
//! - `error`: [`ActionRejection`]
mod combat;
mod error;
mod intent;
mod machine;

pub use combat::{AttackPlan, mitigate};
pub use error::ActionRejection;
pub use intent::ActionIntent;
pub use machine::{ActionMachine, ActionOutcome, ActionTimers};
