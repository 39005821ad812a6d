use skirmish_content::ScriptSource;
use skirmish_core::{CharacterState, EntityHandle, EntityRecord, EntityView, Item};

use super::Controller;
use crate::script::ScriptHost;

/// What drives a character's intent each tick.
#[derive(Debug)]
pub enum Brain {
    Script(ScriptHost),
    Controller(Box<dyn Controller>),
    /// Intent only changes through the coordinator.
    Passive,
}

impl Brain {
    pub fn is_scripted(&self) -> bool {
        matches!(self, Brain::Script(_))
    }

    pub(crate) fn raise(&mut self, signal: &str) {
        if let Brain::Script(host) = self {
            host.raise(signal);
        }
    }
}

#[derive(Debug)]
pub struct Character {
    pub state: CharacterState,
    pub brain: Brain,
    /// Source the character was created with, even if its brain was
    /// disabled later; duplicates start from it.
    pub script: Option<ScriptSource>,
    pub(crate) reloads: u32,
}

impl Character {
    pub fn new(state: CharacterState, brain: Brain, script: Option<ScriptSource>) -> Self {
        Self {
            state,
            brain,
            script,
            reloads: 0,
        }
    }

    pub fn reloads(&self) -> u32 {
        self.reloads
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldItem {
    pub item: Item,
    pub carried_by: Option<EntityHandle>,
}

#[derive(Debug)]
pub enum Entity {
    Character(Character),
    Item(WorldItem),
}

impl Entity {
    pub fn record(&self) -> &EntityRecord {
        match self {
            Entity::Character(character) => character.state.record(),
            Entity::Item(world_item) => &world_item.item.record,
        }
    }

    pub fn as_character(&self) -> Option<&Character> {
        match self {
            Entity::Character(character) => Some(character),
            Entity::Item(_) => None,
        }
    }

    pub fn as_character_mut(&mut self) -> Option<&mut Character> {
        match self {
            Entity::Character(character) => Some(character),
            Entity::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&WorldItem> {
        match self {
            Entity::Item(world_item) => Some(world_item),
            Entity::Character(_) => None,
        }
    }

    pub fn as_item_mut(&mut self) -> Option<&mut WorldItem> {
        match self {
            Entity::Item(world_item) => Some(world_item),
            Entity::Character(_) => None,
        }
    }

    pub(crate) fn view(&self, handle: EntityHandle) -> EntityView {
        let record = self.record();
        let alive = match self {
            Entity::Character(character) => character.state.is_alive(),
            Entity::Item(world_item) => !world_item.item.is_exhausted(),
        };
        EntityView {
            handle,
            kind: record.kind,
            position: record.position,
            area: record.area(),
            alive,
        }
    }

    pub(crate) fn carried_by(&self) -> Option<EntityHandle> {
        match self {
            Entity::Item(world_item) => world_item.carried_by,
            Entity::Character(_) => None,
        }
    }
}
