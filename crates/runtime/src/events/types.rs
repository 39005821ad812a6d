use skirmish_core::{
    AttackDirection, AttackType, EntityHandle, ItemApplied, KillEvent, ObjectType, Position, Tick,
};

use super::Event;
use crate::script::FaultAction;

/// Changes to entities in the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    Spawned {
        handle: EntityHandle,
        kind: ObjectType,
        name: String,
        position: Position,
    },
    Despawned {
        handle: EntityHandle,
    },
    Moved {
        handle: EntityHandle,
        from: Position,
        to: Position,
    },
    /// An attack was committed; `target` is `None` when it hit nothing.
    Attacked {
        attacker: EntityHandle,
        target: Option<EntityHandle>,
        attack_type: AttackType,
        direction: AttackDirection,
    },
    Damaged {
        target: EntityHandle,
        attacker: EntityHandle,
        amount: u32,
        /// Damage absorbed by a matching block.
        blocked: u32,
        remaining: u32,
    },
    Killed(KillEvent),
    LeveledUp {
        handle: EntityHandle,
        level: u32,
    },
    ItemTaken {
        taker: EntityHandle,
        item: EntityHandle,
    },
    ItemUsed {
        user: EntityHandle,
        item: EntityHandle,
        applied: ItemApplied,
    },
}

/// Script lifecycle and faults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptEvent {
    /// The script failed to load; the character is passive.
    LoadFailed { handle: EntityHandle, error: String },
    /// A resume faulted and the fault policy chose `action`.
    Faulted {
        handle: EntityHandle,
        fault: String,
        action: FaultAction,
    },
    Reloaded { handle: EntityHandle },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickEvent {
    Completed { tick: Tick, characters: usize },
}

/// Everything one tick produced, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    pub events: Vec<Event>,
}

impl TickReport {
    pub fn new(tick: Tick) -> Self {
        Self {
            tick,
            events: Vec::new(),
        }
    }

    pub fn world_events(&self) -> impl Iterator<Item = &WorldEvent> {
        self.events.iter().filter_map(|event| match event {
            Event::World(event) => Some(event),
            _ => None,
        })
    }

    pub fn script_events(&self) -> impl Iterator<Item = &ScriptEvent> {
        self.events.iter().filter_map(|event| match event {
            Event::Script(event) => Some(event),
            _ => None,
        })
    }
}
