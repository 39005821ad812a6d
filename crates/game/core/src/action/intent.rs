use crate::entity::EntityHandle;
use crate::state::{Action, AttackDirection, AttackType, Direction, MovementType};

/// What a character currently wants to do.
///
/// Written by the character's brain (script or controller) and persisted
/// across ticks; only [`evaluate`](crate::CharacterState::evaluate) turns it
/// into a committed action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionIntent {
    pub action: Action,
    pub direction: Direction,
    pub attack_type: AttackType,
    pub attack_direction: AttackDirection,
    pub block_direction: AttackDirection,
    pub movement_type: MovementType,
    /// Non-owning; may refer to an entity that no longer exists.
    pub target: Option<EntityHandle>,
}

impl ActionIntent {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(direction: Direction) -> Self {
        Self {
            action: Action::Move,
            direction,
            ..Self::default()
        }
    }

    pub fn attacking(target: EntityHandle) -> Self {
        Self {
            action: Action::Attack,
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn blocking(direction: AttackDirection) -> Self {
        Self {
            action: Action::Block,
            block_direction: direction,
            ..Self::default()
        }
    }
}
