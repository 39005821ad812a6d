use std::sync::Arc;

use skirmish_core::{CharacterState, DerivedStats, EntityHandle, ObjectType, Position, RulesConfig, Tick};

use crate::world::SceneSnapshot;

/// Requests that need the world and are applied after the resume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptCommand {
    UseItem(EntityHandle),
    TakeItem(EntityHandle),
}

/// Everything a script may see and touch during one resume.
///
/// `state` is a working copy of the character; it replaces the real state
/// only when the resume ends without a fault.
#[derive(Debug)]
pub struct ScriptFrame {
    pub me: EntityHandle,
    pub now: Tick,
    pub rules: Arc<RulesConfig>,
    pub state: CharacterState,
    pub snapshot: Arc<SceneSnapshot>,
    pub commands: Vec<ScriptCommand>,
}

impl ScriptFrame {
    pub fn new(
        me: EntityHandle,
        state: CharacterState,
        rules: Arc<RulesConfig>,
        snapshot: Arc<SceneSnapshot>,
    ) -> Self {
        Self {
            me,
            now: snapshot.now(),
            rules,
            state,
            snapshot,
            commands: Vec::new(),
        }
    }

    pub fn stats(&self) -> DerivedStats<'_> {
        self.state.stats(&self.rules)
    }

    /// Live entities in the world within vision range, as of tick start.
    pub fn visible_objects(&self) -> Vec<EntityHandle> {
        let me = self.state.record().area();
        let range = self.stats().vision_range();
        self.snapshot
            .in_world()
            .filter(|view| view.handle != self.me && view.alive)
            .filter(|view| me.within_range(&view.area, range))
            .map(|view| view.handle)
            .collect()
    }

    /// Kind of `handle`, including items carried by anyone.
    pub fn object_kind(&self, handle: EntityHandle) -> Option<ObjectType> {
        if handle == self.me {
            return Some(self.state.kind());
        }
        self.snapshot.entry(handle).map(|entry| entry.view.kind)
    }

    /// Position of `handle` if it is in the world; own position is current.
    pub fn object_position(&self, handle: EntityHandle) -> Option<Position> {
        if handle == self.me {
            return Some(self.state.position());
        }
        self.snapshot.observe(handle).map(|view| view.position)
    }

    pub fn carries(&self, item: EntityHandle) -> bool {
        self.state.inventory().contains(item)
    }
}
