//! Tunable rule constants.
//!
//! Compile-time capacities live on [`GameConfig`]; everything a designer may
//! want to tweak lives on [`RulesConfig`], which `skirmish-content` loads from
//! TOML. Missing TOML keys fall back to the defaults documented per field.

use crate::state::Parameter;
use strum::EnumCount;

/// Compile-time capacities used as type parameters.
pub struct GameConfig;

impl GameConfig {
    /// Maximum number of distinct items a character can carry.
    pub const MAX_INVENTORY_SLOTS: usize = 16;
    /// Number of parameters (size of every parameter table).
    pub const PARAMETER_COUNT: usize = Parameter::COUNT;
}

/// Runtime-tunable rules shared by every character in a world.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesConfig {
    /// Percentage of damage removed when the defender blocks the attacked
    /// height band. Clamped to `0..=100` when applied.
    pub block_mitigation_percent: u32,
    /// Sprint move cooldown as a percentage of the effective move cooldown.
    pub sprint_cooldown_percent: u32,
    pub strong_attack: StrongAttackRules,
    pub stamina: StaminaRules,
    pub level_curve: LevelCurve,
    pub parameter_cost: ParameterCostRules,
    pub experience: ExperienceRules,
    /// Inventory capacity in item size units.
    pub inventory_capacity: u32,
}

impl RulesConfig {
    pub const DEFAULT_BLOCK_MITIGATION_PERCENT: u32 = 75;
    pub const DEFAULT_SPRINT_COOLDOWN_PERCENT: u32 = 50;
    pub const DEFAULT_INVENTORY_CAPACITY: u32 = 10;

    pub fn new() -> Self {
        Self {
            block_mitigation_percent: Self::DEFAULT_BLOCK_MITIGATION_PERCENT,
            sprint_cooldown_percent: Self::DEFAULT_SPRINT_COOLDOWN_PERCENT,
            strong_attack: StrongAttackRules::default(),
            stamina: StaminaRules::default(),
            level_curve: LevelCurve::default(),
            parameter_cost: ParameterCostRules::default(),
            experience: ExperienceRules::default(),
            inventory_capacity: Self::DEFAULT_INVENTORY_CAPACITY,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Multipliers (percent) applied to a [`Strong`](crate::AttackType::Strong)
/// attack relative to a fast one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StrongAttackRules {
    pub damage_percent: u32,
    pub cooldown_percent: u32,
    pub stamina_percent: u32,
}

impl Default for StrongAttackRules {
    fn default() -> Self {
        Self {
            damage_percent: 200,
            cooldown_percent: 150,
            stamina_percent: 150,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaminaRules {
    /// Stamina restored per regeneration step.
    pub regen_amount: u32,
    /// Ticks between regeneration steps at `StaminaRegenFrequency` level 0.
    pub regen_interval: u64,
    /// Ticks removed from the interval per `StaminaRegenFrequency` level.
    pub regen_interval_step: u64,
    /// Stamina removed from every action cost per `StaminaCostReduction` level.
    pub cost_reduction_step: u32,
}

impl Default for StaminaRules {
    fn default() -> Self {
        Self {
            regen_amount: 5,
            regen_interval: 10,
            regen_interval_step: 1,
            cost_reduction_step: 1,
        }
    }
}

/// Experience thresholds: `base * level + growth * level * (level - 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelCurve {
    pub base: u32,
    pub growth: u32,
}

impl LevelCurve {
    /// Experience needed to advance past `level`.
    ///
    /// Strictly increasing in `level` as long as `base > 0`.
    pub fn threshold(&self, level: u32) -> u32 {
        let level = level.max(1);
        self.base
            .max(1)
            .saturating_mul(level)
            .saturating_add(self.growth.saturating_mul(level).saturating_mul(level - 1))
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base: 100,
            growth: 50,
        }
    }
}

/// Skill point price of raising a parameter: `base + level / step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParameterCost {
    pub base: u32,
    pub step: u32,
}

impl ParameterCost {
    pub fn at_level(&self, level: u32) -> u32 {
        self.base.max(1).saturating_add(level / self.step.max(1))
    }
}

impl Default for ParameterCost {
    fn default() -> Self {
        Self { base: 1, step: 5 }
    }
}

/// Per-parameter cost table with a shared fallback.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParameterCostRules {
    pub default: ParameterCost,
    pub overrides: Vec<(Parameter, ParameterCost)>,
}

impl ParameterCostRules {
    pub fn cost(&self, parameter: Parameter, level: u32) -> u32 {
        self.overrides
            .iter()
            .find(|(candidate, _)| *candidate == parameter)
            .map(|(_, cost)| cost)
            .unwrap_or(&self.default)
            .at_level(level)
    }
}

/// Numbers behind the Player and NPC experience policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExperienceRules {
    pub npc_base_value: u32,
    pub npc_value_per_level: u32,
    pub npc_gain_percent: u32,
    pub player_value_per_level: u32,
    pub player_gain_percent: u32,
}

impl Default for ExperienceRules {
    fn default() -> Self {
        Self {
            npc_base_value: 50,
            npc_value_per_level: 25,
            npc_gain_percent: 100,
            player_value_per_level: 100,
            player_gain_percent: 100,
        }
    }
}

/// Applies an integer percentage, rounding down.
pub(crate) fn percent_of(value: u32, percent: u32) -> u32 {
    ((u64::from(value) * u64::from(percent)) / 100).min(u64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_curve_is_strictly_increasing() {
        let curve = LevelCurve::default();
        assert_eq!(curve.threshold(1), 100);
        assert_eq!(curve.threshold(2), 300);
        assert_eq!(curve.threshold(3), 600);
        for level in 1..50 {
            assert!(curve.threshold(level + 1) > curve.threshold(level));
        }
    }

    #[test]
    fn parameter_cost_is_non_decreasing() {
        let rules = ParameterCostRules::default();
        assert_eq!(rules.cost(Parameter::HitPoints, 0), 1);
        assert_eq!(rules.cost(Parameter::HitPoints, 4), 1);
        assert_eq!(rules.cost(Parameter::HitPoints, 5), 2);
        for level in 0..40 {
            assert!(
                rules.cost(Parameter::AttackSpeed, level + 1)
                    >= rules.cost(Parameter::AttackSpeed, level)
            );
        }
    }

    #[test]
    fn overrides_apply_per_parameter() {
        let rules = ParameterCostRules {
            default: ParameterCost::default(),
            overrides: vec![(Parameter::VisionRange, ParameterCost { base: 3, step: 1 })],
        };
        assert_eq!(rules.cost(Parameter::VisionRange, 2), 5);
        assert_eq!(rules.cost(Parameter::HitPoints, 2), 1);
    }

    #[test]
    fn percent_rounds_down() {
        assert_eq!(percent_of(7, 50), 3);
        assert_eq!(percent_of(10, 150), 15);
    }
}
