//! Runtime for scripted characters in a real-time skirmish.
//!
//! This crate hosts one sandboxed Lua interpreter per scripted character,
//! coordinates every entity through a generational registry, and drives the
//! deterministic rules of `skirmish-core` tick by tick. Consumers embed
//! [`World`] directly for synchronous simulation, or [`Runtime`] to run it
//! on a background worker and talk to it through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`world`] owns entities and the tick loop
//! - [`script`] hosts interpreters, the scripting API and fault policies
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`oracle`] adapts content data to the core oracles
pub mod api;
pub mod events;
pub mod oracle;
pub mod runtime;
pub mod script;
pub mod world;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, ScriptEvent, TickEvent, TickReport, Topic, WorldEvent};
pub use oracle::ArenaMap;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use script::{
    FaultAction, FaultPolicy, FaultPolicyConfig, ScriptError, ScriptFault, ScriptHost,
    ScriptLimits,
};
pub use world::{
    Brain, Character, Controller, Entity, FixedIntent, SceneSnapshot, SceneView, SnapshotEntry,
    World, WorldItem,
};
