use bitflags::bitflags;

use crate::state::ObjectType;

bitflags! {
    /// What the scene may do with an entity, independent of its kind.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        /// Other entities may overlap this one.
        const PASSABLE = 1 << 0;
        /// Has a one-shot effect that can be applied to a character.
        const APPLY_EFFECT = 1 << 1;
        /// May be duplicated into a fresh, independent instance.
        const DUPLICATE = 1 << 2;
    }
}

impl Capabilities {
    /// Default capability set for an entity of `kind`.
    pub const fn for_kind(kind: ObjectType) -> Self {
        match kind {
            ObjectType::Player | ObjectType::Npc => Self::DUPLICATE,
            ObjectType::HealingItem | ObjectType::ExpItem => Self::PASSABLE
                .union(Self::APPLY_EFFECT)
                .union(Self::DUPLICATE),
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characters_block_movement_items_do_not() {
        assert!(!Capabilities::for_kind(ObjectType::Npc).contains(Capabilities::PASSABLE));
        assert!(Capabilities::for_kind(ObjectType::ExpItem).contains(Capabilities::PASSABLE));
        assert!(Capabilities::for_kind(ObjectType::HealingItem).contains(Capabilities::APPLY_EFFECT));
    }
}
