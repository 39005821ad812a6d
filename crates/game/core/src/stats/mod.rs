//! Stat layers of a character.
//!
//! ```text
//! BaseStats + ParameterLevels + RulesConfig
//!            -> DerivedStats (computed, never stored)
//!            -> Resources (current HP / stamina, bounded by DerivedStats)
//! ```
mod derived;
mod parameters;
mod resources;

pub use derived::{
    ATTACK_COOLDOWN_PER_LEVEL, ATTACK_RANGE_PER_LEVEL, BaseStats, DAMAGE_PER_LEVEL, DerivedStats,
    HIT_POINTS_PER_LEVEL, MOVE_COOLDOWN_PER_LEVEL, STAMINA_PER_LEVEL, VISION_RANGE_PER_LEVEL,
};
pub use parameters::ParameterLevels;
pub use resources::{DamageTaken, Resources};
