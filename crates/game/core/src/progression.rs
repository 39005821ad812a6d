//! Experience, levels and skill points.
//!
//! Experience surplus always carries over: a large gain may cascade through
//! several level-ups in one call and never resets to zero.
//!
//! Player and NPC characters differ only in their [`ExperiencePolicy`], which
//! decides how much experience a character is worth when killed and how
//! incoming experience is scaled.

use std::fmt;
use std::sync::Arc;

use crate::config::{ExperienceRules, LevelCurve, percent_of};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{ObjectType, Parameter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LevelUpError {
    #[error("raising {parameter} costs {cost} skill points but only {available} are available")]
    InsufficientSkillPoints {
        parameter: Parameter,
        cost: u32,
        available: u32,
    },
}

impl GameError for LevelUpError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientSkillPoints { .. } => "LEVEL_UP_INSUFFICIENT_POINTS",
        }
    }
}

/// Level state of one character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progression {
    level: u32,
    current_exp: u32,
    next_level_exp: u32,
    skill_points: u32,
}

impl Progression {
    /// Starts at `level` (minimum 1) with no experience banked.
    pub fn new(level: u32, skill_points: u32, curve: &LevelCurve) -> Self {
        let level = level.max(1);
        Self {
            level,
            current_exp: 0,
            next_level_exp: curve.threshold(level),
            skill_points,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_exp(&self) -> u32 {
        self.current_exp
    }

    pub fn next_level_exp(&self) -> u32 {
        self.next_level_exp
    }

    pub fn skill_points(&self) -> u32 {
        self.skill_points
    }

    /// Banks `amount` experience and levels up as many times as the total
    /// allows. Returns the number of levels gained.
    pub fn gain_exp(&mut self, amount: u32, curve: &LevelCurve) -> u32 {
        self.current_exp = self.current_exp.saturating_add(amount);
        let mut gained = 0;
        while self.current_exp >= self.next_level_exp {
            self.current_exp -= self.next_level_exp;
            self.level = self.level.saturating_add(1);
            self.skill_points = self.skill_points.saturating_add(1);
            self.next_level_exp = curve.threshold(self.level);
            gained += 1;
        }
        gained
    }

    /// Pays `cost` skill points for a parameter level.
    ///
    /// With too few points the state is unchanged.
    pub fn spend_skill_points(&mut self, parameter: Parameter, cost: u32) -> Result<(), LevelUpError> {
        if self.skill_points == 0 || self.skill_points < cost {
            return Err(LevelUpError::InsufficientSkillPoints {
                parameter,
                cost,
                available: self.skill_points,
            });
        }
        self.skill_points -= cost;
        Ok(())
    }
}

/// Experience rules that distinguish Players from NPCs.
pub trait ExperiencePolicy: Send + Sync + fmt::Debug {
    /// Experience granted to whoever kills a character at `level`.
    fn exp_value(&self, level: u32, rules: &ExperienceRules) -> u32;

    /// Scales experience the character is about to receive.
    fn scale_gain(&self, amount: u32, rules: &ExperienceRules) -> u32;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NpcExperience;

impl ExperiencePolicy for NpcExperience {
    fn exp_value(&self, level: u32, rules: &ExperienceRules) -> u32 {
        rules
            .npc_base_value
            .saturating_add(rules.npc_value_per_level.saturating_mul(level))
    }

    fn scale_gain(&self, amount: u32, rules: &ExperienceRules) -> u32 {
        percent_of(amount, rules.npc_gain_percent)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerExperience;

impl ExperiencePolicy for PlayerExperience {
    fn exp_value(&self, level: u32, rules: &ExperienceRules) -> u32 {
        rules.player_value_per_level.saturating_mul(level)
    }

    fn scale_gain(&self, amount: u32, rules: &ExperienceRules) -> u32 {
        percent_of(amount, rules.player_gain_percent)
    }
}

/// Default policy for a character kind.
pub fn policy_for(kind: ObjectType) -> Arc<dyn ExperiencePolicy> {
    match kind {
        ObjectType::Player => Arc::new(PlayerExperience),
        _ => Arc::new(NpcExperience),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surplus_carries_over_on_level_up() {
        let curve = LevelCurve::default();
        let mut progression = Progression::new(1, 0, &curve);
        progression.gain_exp(90, &curve);
        assert_eq!(progression.next_level_exp(), 100);

        let gained = progression.gain_exp(30, &curve);
        assert_eq!(gained, 1);
        assert_eq!(progression.level(), 2);
        assert_eq!(progression.current_exp(), 20);
        assert_eq!(progression.skill_points(), 1);
    }

    #[test]
    fn large_gain_cascades_through_levels() {
        let curve = LevelCurve::default();
        let mut progression = Progression::new(1, 0, &curve);
        // 100 (level 1) + 300 (level 2) + 50 surplus
        let gained = progression.gain_exp(450, &curve);
        assert_eq!(gained, 2);
        assert_eq!(progression.level(), 3);
        assert_eq!(progression.current_exp(), 50);
        assert_eq!(progression.next_level_exp(), 600);
        assert_eq!(progression.skill_points(), 2);
    }

    #[test]
    fn spending_without_points_is_a_no_op() {
        let curve = LevelCurve::default();
        let mut progression = Progression::new(1, 1, &curve);
        let err = progression
            .spend_skill_points(Parameter::HitPoints, 2)
            .unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
        assert_eq!(progression.skill_points(), 1);

        progression
            .spend_skill_points(Parameter::HitPoints, 1)
            .unwrap();
        assert_eq!(progression.skill_points(), 0);
        assert!(progression.spend_skill_points(Parameter::HitPoints, 0).is_err());
    }

    #[test]
    fn player_and_npc_policies_differ() {
        let rules = ExperienceRules::default();
        assert_eq!(NpcExperience.exp_value(2, &rules), 100);
        assert_eq!(PlayerExperience.exp_value(2, &rules), 200);

        let halved = ExperienceRules {
            player_gain_percent: 50,
            ..rules
        };
        assert_eq!(PlayerExperience.scale_gain(30, &halved), 15);
        assert_eq!(NpcExperience.scale_gain(30, &halved), 30);
    }
}
