use crate::config::RulesConfig;
use crate::entity::EntityHandle;
use crate::state::{AttackDirection, AttackType};

/// Attack committed this tick, resolved against its target once every
/// character has decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackPlan {
    /// Live target inside attack range at tick start, if any.
    pub target: Option<EntityHandle>,
    pub damage: u32,
    pub attack_type: AttackType,
    pub direction: AttackDirection,
}

/// Damage left after the defender's block.
///
/// Only a block held at the attacked height band mitigates; the result is
/// never larger than `damage`.
pub fn mitigate(
    damage: u32,
    attack: AttackDirection,
    block: Option<AttackDirection>,
    rules: &RulesConfig,
) -> u32 {
    if block != Some(attack) {
        return damage;
    }
    let kept = 100 - rules.block_mitigation_percent.min(100);
    ((u64::from(damage) * u64::from(kept)) / 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_block_strictly_reduces_damage() {
        let rules = RulesConfig::default();
        for damage in 1..200 {
            let blocked = mitigate(damage, AttackDirection::Head, Some(AttackDirection::Head), &rules);
            assert!(blocked < damage);
        }
        assert_eq!(
            mitigate(40, AttackDirection::Legs, Some(AttackDirection::Legs), &rules),
            10
        );
    }

    #[test]
    fn mismatched_or_absent_block_does_nothing() {
        let rules = RulesConfig::default();
        assert_eq!(
            mitigate(40, AttackDirection::Head, Some(AttackDirection::Legs), &rules),
            40
        );
        assert_eq!(mitigate(40, AttackDirection::Torso, None, &rules), 40);
    }

    #[test]
    fn mitigation_is_clamped_to_full_block() {
        let rules = RulesConfig {
            block_mitigation_percent: 250,
            ..RulesConfig::default()
        };
        assert_eq!(
            mitigate(40, AttackDirection::Torso, Some(AttackDirection::Torso), &rules),
            0
        );
    }
}
