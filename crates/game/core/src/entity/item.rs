use super::EntityRecord;
use crate::character::CharacterState;
use crate::config::RulesConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{HitBox, ObjectType, Position, Tick};

/// One-shot effect an item applies to whoever uses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEffect {
    Heal(u32),
    Exp(u32),
}

impl ItemEffect {
    pub const fn kind(self) -> ObjectType {
        match self {
            ItemEffect::Heal(_) => ObjectType::HealingItem,
            ItemEffect::Exp(_) => ObjectType::ExpItem,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("item has no charges left")]
    Exhausted,

    #[error("item is not carried by the user")]
    NotCarried,

    #[error("item use is on cooldown until tick {ready_at}")]
    OnCooldown { ready_at: Tick },

    #[error("item costs {cost} stamina but only {available} is available")]
    InsufficientStamina { cost: u32, available: u32 },
}

impl GameError for ItemError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotCarried => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Exhausted => "ITEM_EXHAUSTED",
            Self::NotCarried => "ITEM_NOT_CARRIED",
            Self::OnCooldown { .. } => "ITEM_ON_COOLDOWN",
            Self::InsufficientStamina { .. } => "ITEM_INSUFFICIENT_STAMINA",
        }
    }
}

/// What a single use did to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemApplied {
    pub healed: u32,
    pub exp_gained: u32,
    pub levels_gained: u32,
    /// The use consumed the last charge.
    pub exhausted: bool,
}

/// Passive pickup with a charge counter.
///
/// The item only knows how to apply itself; removing exhausted items is up
/// to whoever holds them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub record: EntityRecord,
    pub effect: ItemEffect,
    pub max_charges: u32,
    consumed: u32,
    /// Inventory capacity units occupied while carried.
    pub size: u32,
    /// Ticks the user must wait before using another item.
    pub use_cooldown: u64,
    pub stamina_cost: u32,
}

impl Item {
    pub const DEFAULT_HITBOX: HitBox = HitBox::new(10, 10);

    pub fn new(name: impl Into<String>, position: Position, effect: ItemEffect, max_charges: u32) -> Self {
        Self {
            record: EntityRecord::new(name, effect.kind(), position, Self::DEFAULT_HITBOX),
            effect,
            max_charges,
            consumed: 0,
            size: 1,
            use_cooldown: 0,
            stamina_cost: 0,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_use_cooldown(mut self, ticks: u64) -> Self {
        self.use_cooldown = ticks;
        self
    }

    pub fn with_stamina_cost(mut self, cost: u32) -> Self {
        self.stamina_cost = cost;
        self
    }

    pub fn consumed(&self) -> u32 {
        self.consumed
    }

    pub fn charges_left(&self) -> u32 {
        self.max_charges.saturating_sub(self.consumed)
    }

    pub fn is_exhausted(&self) -> bool {
        self.consumed >= self.max_charges
    }

    /// Applies the effect to `target` and consumes one charge.
    pub fn apply(
        &mut self,
        target: &mut CharacterState,
        rules: &RulesConfig,
    ) -> Result<ItemApplied, ItemError> {
        if self.is_exhausted() {
            return Err(ItemError::Exhausted);
        }
        let mut applied = ItemApplied::default();
        match self.effect {
            ItemEffect::Heal(amount) => applied.healed = target.gain_hp(amount, rules),
            ItemEffect::Exp(amount) => {
                let before = target.progression().level();
                applied.exp_gained = target.gain_exp(amount, rules);
                applied.levels_gained = target.progression().level() - before;
            }
        }
        self.consumed += 1;
        applied.exhausted = self.is_exhausted();
        Ok(applied)
    }

    /// Fresh copy with every charge restored.
    pub fn duplicate(&self) -> Self {
        Self {
            consumed: 0,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{CharacterState, CharacterTemplate};

    fn character(rules: &RulesConfig) -> CharacterState {
        CharacterState::from_template(
            &CharacterTemplate::named("hero", ObjectType::Player),
            Position::ORIGIN,
            rules,
            Tick::ZERO,
        )
    }

    #[test]
    fn healing_is_clamped_and_consumes_a_charge() {
        let rules = RulesConfig::default();
        let mut hero = character(&rules);
        hero.take_damage(30);

        let mut potion = Item::new("potion", Position::ORIGIN, ItemEffect::Heal(50), 2);
        let applied = potion.apply(&mut hero, &rules).unwrap();
        assert_eq!(applied.healed, 30);
        assert!(!applied.exhausted);
        assert_eq!(potion.charges_left(), 1);
    }

    #[test]
    fn exhausted_item_refuses_further_use() {
        let rules = RulesConfig::default();
        let mut hero = character(&rules);
        let mut tome = Item::new("tome", Position::ORIGIN, ItemEffect::Exp(150), 1);

        let applied = tome.apply(&mut hero, &rules).unwrap();
        assert_eq!(applied.levels_gained, 1);
        assert!(applied.exhausted);
        assert_eq!(tome.apply(&mut hero, &rules), Err(ItemError::Exhausted));

        let copy = tome.duplicate();
        assert_eq!(copy.charges_left(), 1);
        assert!(tome.is_exhausted());
    }
}
