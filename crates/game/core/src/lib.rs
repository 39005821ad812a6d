//! Deterministic character rules for the skirmish engine.
//!
//! `skirmish-core` defines the per-character real-time rules: the
//! cooldown-gated action machine, the HP/stamina economy, leveling and
//! parameters, and the passive item/inventory collaborators. It owns no
//! interpreter and performs no I/O; the runtime drives it tick by tick and
//! supplies the scene through the oracles in [`env`].
pub mod action;
pub mod character;
pub mod config;
pub mod entity;
pub mod env;
pub mod error;
pub mod progression;
pub mod state;
pub mod stats;

pub use action::{
    ActionIntent, ActionMachine, ActionOutcome, ActionRejection, ActionTimers, AttackPlan,
    mitigate,
};
pub use character::{CharacterState, CharacterTemplate, KillEvent};
pub use config::{
    ExperienceRules, GameConfig, LevelCurve, ParameterCost, ParameterCostRules, RulesConfig,
    StaminaRules, StrongAttackRules,
};
pub use entity::{
    Capabilities, EntityHandle, EntityRecord, Inventory, InventoryError, InventorySlot, Item,
    ItemApplied, ItemEffect, ItemError,
};
pub use env::{EntityView, MapDimensions, MapOracle, SceneOracle};
pub use error::{ErrorSeverity, GameError};
pub use progression::{
    ExperiencePolicy, LevelUpError, NpcExperience, PlayerExperience, Progression, policy_for,
};
pub use state::{
    Action, AttackDirection, AttackType, Direction, HitBox, MovementType, ObjectType, Parameter,
    Position, Rect, Tick,
};
pub use stats::{BaseStats, DamageTaken, DerivedStats, ParameterLevels, Resources};
