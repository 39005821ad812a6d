use crate::entity::EntityHandle;
use crate::state::{ObjectType, Position, Rect, Tick};

/// Read-only view of the scene a character consults while deciding.
///
/// Implementations answer from a snapshot captured at tick start, so every
/// character in a tick sees the same clock and the same target positions.
pub trait SceneOracle {
    /// Current value of the scene clock.
    fn now(&self) -> Tick;

    /// Returns true if `mover` may occupy `area`.
    fn is_passable(&self, mover: EntityHandle, area: &Rect) -> bool;

    /// Looks up an entity; stale handles resolve to `None`.
    fn observe(&self, handle: EntityHandle) -> Option<EntityView>;
}

/// What one entity looks like to another at tick start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityView {
    pub handle: EntityHandle,
    pub kind: ObjectType,
    pub position: Position,
    pub area: Rect,
    /// Characters with HP left, or items with charges left.
    pub alive: bool,
}
