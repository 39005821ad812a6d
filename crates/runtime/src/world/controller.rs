use std::fmt;

use skirmish_core::{ActionIntent, CharacterState, EntityHandle};

use super::SceneSnapshot;

/// External brain for a data-driven character.
///
/// Called once per tick before the character's intent is evaluated.
/// Returning `None` keeps the current intent.
pub trait Controller: Send + fmt::Debug {
    fn decide(
        &mut self,
        me: EntityHandle,
        state: &CharacterState,
        snapshot: &SceneSnapshot,
    ) -> Option<ActionIntent>;

    /// Controller for a duplicate of the character; `None` leaves the
    /// duplicate passive.
    fn duplicate(&self) -> Option<Box<dyn Controller>> {
        None
    }
}

/// Repeats one intent forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedIntent(pub ActionIntent);

impl Controller for FixedIntent {
    fn decide(
        &mut self,
        _me: EntityHandle,
        _state: &CharacterState,
        _snapshot: &SceneSnapshot,
    ) -> Option<ActionIntent> {
        Some(self.0)
    }

    fn duplicate(&self) -> Option<Box<dyn Controller>> {
        Some(Box::new(*self))
    }
}
