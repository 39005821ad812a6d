//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, world operations and content
//! loading so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use skirmish_core::{EntityHandle, InventoryError, ItemError, LevelUpError, Position};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime built without a world")]
    MissingWorld,

    #[error("entity {0:?} does not exist")]
    UnknownEntity(EntityHandle),

    #[error("entity {0:?} is not a character")]
    NotACharacter(EntityHandle),

    #[error("entity {0:?} is not an item")]
    NotAnItem(EntityHandle),

    #[error("entity {0:?} cannot be duplicated")]
    NotDuplicable(EntityHandle),

    #[error("character {0:?} is dead")]
    Dead(EntityHandle),

    #[error("position {position} is blocked")]
    PlacementBlocked { position: Position },

    #[error("item {item:?} is out of reach")]
    OutOfReach { item: EntityHandle },

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Item(#[from] ItemError),

    #[error(transparent)]
    LevelUp(#[from] LevelUpError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),
}
