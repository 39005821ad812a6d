//! Reasons a requested action was not committed.
//!
//! A rejection is never a fault: the character keeps its previous committed
//! action and timers, and the script learns about it only by polling.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Action, Position, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionRejection {
    #[error("{action} is on cooldown until tick {ready_at}")]
    OnCooldown { action: Action, ready_at: Tick },

    #[error("{action} costs {cost} stamina but only {available} is available")]
    InsufficientStamina {
        action: Action,
        cost: u32,
        available: u32,
    },

    #[error("move requested without a direction")]
    NoDirection,

    #[error("destination {destination} is not passable")]
    Blocked { destination: Position },

    #[error("an action was already evaluated at tick {tick}")]
    AlreadyEvaluated { tick: Tick },

    #[error("character is dead")]
    Dead,
}

impl GameError for ActionRejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoDirection => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OnCooldown { .. } => "ACTION_ON_COOLDOWN",
            Self::InsufficientStamina { .. } => "ACTION_INSUFFICIENT_STAMINA",
            Self::NoDirection => "ACTION_NO_DIRECTION",
            Self::Blocked { .. } => "ACTION_BLOCKED",
            Self::AlreadyEvaluated { .. } => "ACTION_ALREADY_EVALUATED",
            Self::Dead => "ACTION_DEAD",
        }
    }
}
