//! Data-driven content definitions and loaders.
//!
//! This crate houses the data a skirmish is built from:
//! - Rules tables (TOML)
//! - Character templates, optionally with a behaviour script (RON + Lua)
//! - Item catalogs (RON)
//! - Scenarios placing characters and items in an arena (RON)
//!
//! Content is consumed by the runtime when it builds a world and never
//! appears in per-tick state.

pub mod script;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use script::ScriptSource;

#[cfg(feature = "loaders")]
pub use loaders::{
    ArenaSpec, CharacterDef, CharacterLoader, CharacterSpawn, ContentFactory, ItemDef, ItemLoader,
    LoadResult, Placement, RulesLoader, Scenario, ScenarioDef, ScenarioLoader,
};
