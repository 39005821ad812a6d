//! Base stats and the closed-form effective values derived from them.
//!
//! Formulas (parameter levels are always >= 0):
//! - effective max HP       = base + 10 x level(HitPoints)
//! - effective max stamina  = base + 10 x level(StaminaPoints)
//! - effective damage       = base + 1 x level(AttackDamage)
//! - effective move cd      = max(0, base - 1 x level(MovementSpeed))
//! - effective attack cd    = max(0, base - 10 x level(AttackSpeed))
//! - effective vision range = base + 50 x level(VisionRange)
//! - effective attack range = base + 5 x level(AttackRange)

use super::ParameterLevels;
use crate::config::{RulesConfig, percent_of};
use crate::state::{AttackType, MovementType, Parameter};

pub const HIT_POINTS_PER_LEVEL: u32 = 10;
pub const STAMINA_PER_LEVEL: u32 = 10;
pub const DAMAGE_PER_LEVEL: u32 = 1;
pub const MOVE_COOLDOWN_PER_LEVEL: u64 = 1;
pub const ATTACK_COOLDOWN_PER_LEVEL: u64 = 10;
pub const VISION_RANGE_PER_LEVEL: u32 = 50;
pub const ATTACK_RANGE_PER_LEVEL: u32 = 5;

/// Stats a character is created with, before parameter modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub max_hit_points: u32,
    pub max_stamina: u32,
    pub damage: u32,
    /// Units travelled per accepted move.
    pub speed: u32,
    pub attack_range: u32,
    pub vision_range: u32,
    pub move_cooldown: u64,
    pub attack_cooldown: u64,
    pub attack_stamina_cost: u32,
    pub move_stamina_cost: u32,
    pub block_stamina_cost: u32,
    pub sprint_stamina_cost: u32,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            max_hit_points: 100,
            max_stamina: 100,
            damage: 10,
            speed: 1,
            attack_range: 5,
            vision_range: 200,
            move_cooldown: 1,
            attack_cooldown: 20,
            attack_stamina_cost: 10,
            move_stamina_cost: 1,
            block_stamina_cost: 2,
            sprint_stamina_cost: 2,
        }
    }
}

/// Effective stats for one character at one moment.
///
/// Never stored; recomputed from [`BaseStats`], [`ParameterLevels`] and the
/// rules whenever needed so it can never drift from its inputs.
#[derive(Clone, Copy, Debug)]
pub struct DerivedStats<'a> {
    base: &'a BaseStats,
    levels: &'a ParameterLevels,
    rules: &'a RulesConfig,
}

impl<'a> DerivedStats<'a> {
    pub fn new(base: &'a BaseStats, levels: &'a ParameterLevels, rules: &'a RulesConfig) -> Self {
        Self {
            base,
            levels,
            rules,
        }
    }

    fn level(&self, parameter: Parameter) -> u32 {
        self.levels.get(parameter)
    }

    pub fn max_hit_points(&self) -> u32 {
        self.base
            .max_hit_points
            .saturating_add(HIT_POINTS_PER_LEVEL.saturating_mul(self.level(Parameter::HitPoints)))
    }

    pub fn max_stamina(&self) -> u32 {
        self.base
            .max_stamina
            .saturating_add(STAMINA_PER_LEVEL.saturating_mul(self.level(Parameter::StaminaPoints)))
    }

    pub fn damage(&self) -> u32 {
        self.base
            .damage
            .saturating_add(DAMAGE_PER_LEVEL.saturating_mul(self.level(Parameter::AttackDamage)))
    }

    pub fn move_cooldown(&self) -> u64 {
        self.base.move_cooldown.saturating_sub(
            MOVE_COOLDOWN_PER_LEVEL.saturating_mul(u64::from(self.level(Parameter::MovementSpeed))),
        )
    }

    pub fn attack_cooldown(&self) -> u64 {
        self.base.attack_cooldown.saturating_sub(
            ATTACK_COOLDOWN_PER_LEVEL.saturating_mul(u64::from(self.level(Parameter::AttackSpeed))),
        )
    }

    pub fn vision_range(&self) -> u32 {
        self.base
            .vision_range
            .saturating_add(VISION_RANGE_PER_LEVEL.saturating_mul(self.level(Parameter::VisionRange)))
    }

    pub fn attack_range(&self) -> u32 {
        self.base
            .attack_range
            .saturating_add(ATTACK_RANGE_PER_LEVEL.saturating_mul(self.level(Parameter::AttackRange)))
    }

    pub fn speed(&self) -> u32 {
        self.base.speed
    }

    fn reduced_cost(&self, cost: u32) -> u32 {
        let reduction = self
            .rules
            .stamina
            .cost_reduction_step
            .saturating_mul(self.level(Parameter::StaminaCostReduction));
        cost.saturating_sub(reduction)
    }

    pub fn attack_stamina_cost(&self, attack: AttackType) -> u32 {
        let cost = match attack {
            AttackType::Fast => self.base.attack_stamina_cost,
            AttackType::Strong => percent_of(
                self.base.attack_stamina_cost,
                self.rules.strong_attack.stamina_percent,
            ),
        };
        self.reduced_cost(cost)
    }

    pub fn attack_damage(&self, attack: AttackType) -> u32 {
        match attack {
            AttackType::Fast => self.damage(),
            AttackType::Strong => percent_of(self.damage(), self.rules.strong_attack.damage_percent),
        }
    }

    pub fn attack_cooldown_for(&self, attack: AttackType) -> u64 {
        let cooldown = self.attack_cooldown();
        match attack {
            AttackType::Fast => cooldown,
            AttackType::Strong => {
                cooldown.saturating_mul(u64::from(self.rules.strong_attack.cooldown_percent)) / 100
            }
        }
    }

    pub fn move_stamina_cost(&self, movement: MovementType) -> u32 {
        match movement {
            MovementType::Default => self.reduced_cost(self.base.move_stamina_cost),
            MovementType::Sprint => self.reduced_cost(self.base.sprint_stamina_cost),
        }
    }

    pub fn move_cooldown_for(&self, movement: MovementType) -> u64 {
        let cooldown = self.move_cooldown();
        match movement {
            MovementType::Default => cooldown,
            MovementType::Sprint => {
                cooldown.saturating_mul(u64::from(self.rules.sprint_cooldown_percent)) / 100
            }
        }
    }

    pub fn block_stamina_cost(&self) -> u32 {
        self.reduced_cost(self.base.block_stamina_cost)
    }

    /// Ticks between stamina regeneration steps (at least 1).
    pub fn stamina_regen_interval(&self) -> u64 {
        let stamina = &self.rules.stamina;
        let reduction = stamina
            .regen_interval_step
            .saturating_mul(u64::from(self.level(Parameter::StaminaRegenFrequency)));
        stamina.regen_interval.saturating_sub(reduction).max(1)
    }

    pub fn stamina_regen_amount(&self) -> u32 {
        self.rules.stamina.regen_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formulas_match_reference_values() {
        let base = BaseStats {
            max_hit_points: 100,
            attack_cooldown: 500,
            ..BaseStats::default()
        };
        let levels = ParameterLevels::from_pairs([
            (Parameter::HitPoints, 3),
            (Parameter::AttackSpeed, 10),
        ]);
        let rules = RulesConfig::default();
        let stats = DerivedStats::new(&base, &levels, &rules);
        assert_eq!(stats.max_hit_points(), 130);
        assert_eq!(stats.attack_cooldown(), 400);
    }

    #[test]
    fn every_parameter_feeds_its_formula() {
        let base = BaseStats::default();
        let levels = ParameterLevels::from_pairs([
            (Parameter::StaminaPoints, 2),
            (Parameter::AttackDamage, 4),
            (Parameter::VisionRange, 1),
            (Parameter::AttackRange, 3),
        ]);
        let rules = RulesConfig::default();
        let stats = DerivedStats::new(&base, &levels, &rules);
        assert_eq!(stats.max_stamina(), base.max_stamina + 20);
        assert_eq!(stats.damage(), base.damage + 4);
        assert_eq!(stats.vision_range(), base.vision_range + 50);
        assert_eq!(stats.attack_range(), base.attack_range + 15);
    }

    #[test]
    fn cooldowns_floor_at_zero() {
        let base = BaseStats {
            move_cooldown: 3,
            attack_cooldown: 25,
            ..BaseStats::default()
        };
        let levels = ParameterLevels::from_pairs([
            (Parameter::MovementSpeed, 7),
            (Parameter::AttackSpeed, 9),
        ]);
        let rules = RulesConfig::default();
        let stats = DerivedStats::new(&base, &levels, &rules);
        assert_eq!(stats.move_cooldown(), 0);
        assert_eq!(stats.attack_cooldown(), 0);
    }

    #[test]
    fn sprint_and_strong_attack_multipliers() {
        let base = BaseStats {
            move_cooldown: 10,
            attack_cooldown: 20,
            damage: 10,
            attack_stamina_cost: 10,
            move_stamina_cost: 1,
            sprint_stamina_cost: 2,
            ..BaseStats::default()
        };
        let levels = ParameterLevels::default();
        let rules = RulesConfig::default();
        let stats = DerivedStats::new(&base, &levels, &rules);
        assert_eq!(stats.move_cooldown_for(MovementType::Sprint), 5);
        assert_eq!(stats.move_stamina_cost(MovementType::Sprint), 2);
        assert_eq!(stats.attack_damage(AttackType::Strong), 20);
        assert_eq!(stats.attack_cooldown_for(AttackType::Strong), 30);
        assert_eq!(stats.attack_stamina_cost(AttackType::Strong), 15);
    }

    #[test]
    fn cost_reduction_and_regen_frequency() {
        let base = BaseStats::default();
        let levels = ParameterLevels::from_pairs([
            (Parameter::StaminaCostReduction, 3),
            (Parameter::StaminaRegenFrequency, 20),
        ]);
        let rules = RulesConfig::default();
        let stats = DerivedStats::new(&base, &levels, &rules);
        assert_eq!(stats.attack_stamina_cost(AttackType::Fast), base.attack_stamina_cost - 3);
        assert_eq!(stats.move_stamina_cost(MovementType::Default), 0);
        assert_eq!(stats.stamina_regen_interval(), 1);
    }
}
