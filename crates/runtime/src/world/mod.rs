//! Entity Coordinator: owns every entity and drives them tick by tick.
//!
//! Characters and items live in one generational registry, so a handle to
//! a removed entity stops resolving instead of reaching a recycled slot.
//! The [`World`] is synchronous and deterministic; the async
//! [`SimulationWorker`](crate::workers::SimulationWorker) merely owns one.
mod controller;
mod entity;
mod scene;
mod tick;

pub use controller::{Controller, FixedIntent};
pub use entity::{Brain, Character, Entity, WorldItem};
pub use scene::{SceneSnapshot, SceneView, SnapshotEntry};

use std::sync::Arc;

use slotmap::{SecondaryMap, SlotMap};
use tracing::{debug, info, warn};

use skirmish_content::{Scenario, ScriptSource};
use skirmish_core::{
    ActionIntent, CharacterState, CharacterTemplate, EntityHandle, InventoryError, Item,
    ItemApplied, ItemError, MapOracle, Parameter, Position, Rect, RulesConfig, Tick,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, ScriptEvent, WorldEvent};
use crate::oracle::ArenaMap;
use crate::runtime::RuntimeConfig;
use crate::script::{FaultPolicy, ScriptHost, ScriptLimits, signals};

pub struct World {
    entities: SlotMap<EntityHandle, Entity>,
    /// Areas of live characters; items never block.
    occupancy: SecondaryMap<EntityHandle, Rect>,
    map: Box<dyn MapOracle>,
    clock: Tick,
    rules: Arc<RulesConfig>,
    limits: ScriptLimits,
    fault_policy: Box<dyn FaultPolicy>,
    remove_dead: bool,
    /// Events produced since the last tick report.
    pending: Vec<Event>,
}

impl World {
    pub fn new(map: impl MapOracle + 'static, config: &RuntimeConfig) -> Self {
        Self {
            entities: SlotMap::with_key(),
            occupancy: SecondaryMap::new(),
            map: Box::new(map),
            clock: Tick::ZERO,
            rules: Arc::new(config.rules.clone()),
            limits: config.limits,
            fault_policy: config.fault_policy.build(),
            remove_dead: config.remove_dead,
            pending: Vec::new(),
        }
    }

    /// Builds the arena and spawns everything the scenario places.
    pub fn from_scenario(scenario: &Scenario, config: &RuntimeConfig) -> Result<Self> {
        let mut world = Self::new(ArenaMap::from(&scenario.arena), config);
        for spawn in &scenario.characters {
            world.spawn_character(&spawn.template, spawn.position, spawn.script.clone())?;
        }
        for item in &scenario.items {
            world.spawn_item(item.clone());
        }
        info!(
            characters = scenario.characters.len(),
            items = scenario.items.len(),
            "World built from scenario"
        );
        Ok(world)
    }

    pub fn now(&self) -> Tick {
        self.clock
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn map(&self) -> &dyn MapOracle {
        self.map.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, handle: EntityHandle) -> bool {
        self.entities.contains_key(handle)
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(handle)
    }

    pub fn character(&self, handle: EntityHandle) -> Option<&Character> {
        self.entities.get(handle).and_then(Entity::as_character)
    }

    pub fn item(&self, handle: EntityHandle) -> Option<&WorldItem> {
        self.entities.get(handle).and_then(Entity::as_item)
    }

    /// Character handles in update order.
    pub fn characters(&self) -> impl Iterator<Item = (EntityHandle, &Character)> {
        self.entities
            .iter()
            .filter_map(|(handle, entity)| entity.as_character().map(|character| (handle, character)))
    }

    pub fn items(&self) -> impl Iterator<Item = (EntityHandle, &WorldItem)> {
        self.entities
            .iter()
            .filter_map(|(handle, entity)| entity.as_item().map(|item| (handle, item)))
    }

    /// Events produced by operations outside [`tick`](Self::tick).
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    // ------------------------------------------------------------------
    // Spawning
    // ------------------------------------------------------------------

    /// Spawns a character, scripted when `script` is given.
    ///
    /// A script that fails to load leaves the character passive and is
    /// reported as [`ScriptEvent::LoadFailed`]; it never fails the spawn.
    pub fn spawn_character(
        &mut self,
        template: &CharacterTemplate,
        position: Position,
        script: Option<ScriptSource>,
    ) -> Result<EntityHandle> {
        let state = CharacterState::from_template(template, position, &self.rules, self.clock);
        let handle = self.insert_character(state, Brain::Passive, script.clone())?;
        if let Some(source) = script {
            let brain = self.load_brain(handle, source);
            self.attach_brain(handle, brain);
        }
        Ok(handle)
    }

    /// Spawns a data-driven character steered by `controller`.
    pub fn spawn_controlled(
        &mut self,
        template: &CharacterTemplate,
        position: Position,
        controller: Box<dyn Controller>,
    ) -> Result<EntityHandle> {
        let state = CharacterState::from_template(template, position, &self.rules, self.clock);
        self.insert_character(state, Brain::Controller(controller), None)
    }

    pub fn spawn_item(&mut self, item: Item) -> EntityHandle {
        let (kind, name, position) = (item.record.kind, item.record.name.clone(), item.record.position);
        let handle = self.entities.insert(Entity::Item(WorldItem {
            item,
            carried_by: None,
        }));
        debug!(entity = ?handle, %name, %position, "Item spawned");
        self.pending.push(
            WorldEvent::Spawned {
                handle,
                kind,
                name,
                position,
            }
            .into(),
        );
        handle
    }

    /// Fresh, independent copy of a duplicable entity at `position`.
    ///
    /// Scripted characters get their own interpreter started from the
    /// original source; the copy shares no continuation with the original.
    pub fn duplicate(&mut self, handle: EntityHandle, position: Position) -> Result<EntityHandle> {
        let entity = self
            .entities
            .get(handle)
            .ok_or(RuntimeError::UnknownEntity(handle))?;
        if !entity.record().can_duplicate() {
            return Err(RuntimeError::NotDuplicable(handle));
        }

        match entity {
            Entity::Character(character) => {
                let state = character.state.duplicate(position, &self.rules, self.clock);
                let script = character.script.clone();
                let controller = match &character.brain {
                    Brain::Controller(controller) => controller.duplicate(),
                    _ => None,
                };
                let brain = controller.map_or(Brain::Passive, Brain::Controller);
                let copy = self.insert_character(state, brain, script.clone())?;
                if let Some(source) = script {
                    let brain = self.load_brain(copy, source);
                    self.attach_brain(copy, brain);
                }
                Ok(copy)
            }
            Entity::Item(world_item) => {
                let mut item = world_item.item.duplicate();
                item.record.position = position;
                Ok(self.spawn_item(item))
            }
        }
    }

    /// Removes an entity, releasing its interpreter and any suspended
    /// continuation. Items a character carried drop where it stood.
    pub fn despawn(&mut self, handle: EntityHandle) -> Result<()> {
        let entity = self
            .entities
            .remove(handle)
            .ok_or(RuntimeError::UnknownEntity(handle))?;
        self.occupancy.remove(handle);

        match &entity {
            Entity::Character(character) => {
                let position = character.state.position();
                for item in character.state.inventory().items() {
                    if let Some(world_item) = self.entities.get_mut(item).and_then(Entity::as_item_mut) {
                        world_item.carried_by = None;
                        world_item.item.record.position = position;
                    }
                }
            }
            Entity::Item(world_item) => {
                if let Some(carrier) = world_item.carried_by
                    && let Some(character) =
                        self.entities.get_mut(carrier).and_then(Entity::as_character_mut)
                {
                    let _ = character.state.inventory_mut().remove(handle);
                }
            }
        }

        info!(entity = ?handle, name = %entity.record().name, "Entity despawned");
        self.pending.push(WorldEvent::Despawned { handle }.into());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Coordinator commands
    // ------------------------------------------------------------------

    /// Replaces a character's intent; evaluated on the next tick.
    pub fn set_intent(&mut self, handle: EntityHandle, intent: ActionIntent) -> Result<()> {
        let character = character_mut(&mut self.entities, handle)?;
        *character.state.intent_mut() = intent;
        Ok(())
    }

    /// Raises a named signal for a scripted character's next turn.
    ///
    /// Returns false if the character has no script to receive it.
    pub fn signal(&mut self, handle: EntityHandle, signal: &str) -> Result<bool> {
        let character = character_mut(&mut self.entities, handle)?;
        character.brain.raise(signal);
        Ok(character.brain.is_scripted())
    }

    /// Spends skill points on `parameter`; returns the new level.
    pub fn level_up(&mut self, handle: EntityHandle, parameter: Parameter) -> Result<u32> {
        let character = character_mut(&mut self.entities, handle)?;
        Ok(character.state.level_up(parameter, &self.rules)?)
    }

    /// Uses a carried item on its carrier.
    ///
    /// The item applies its own effect and counts its own charges; the
    /// world removes it once exhausted.
    pub fn use_item(&mut self, user: EntityHandle, item: EntityHandle) -> Result<ItemApplied> {
        let now = self.clock;
        let [user_entity, item_entity] = disjoint_pair(&mut self.entities, user, item)?;
        let character = user_entity
            .as_character_mut()
            .ok_or(RuntimeError::NotACharacter(user))?;
        let world_item = item_entity
            .as_item_mut()
            .ok_or(RuntimeError::NotAnItem(item))?;
        if !character.state.is_alive() {
            return Err(RuntimeError::Dead(user));
        }
        if world_item.carried_by != Some(user) {
            return Err(ItemError::NotCarried.into());
        }

        let level_before = character.state.progression().level();
        let applied = character
            .state
            .use_item(item, &mut world_item.item, now, &self.rules)?;
        debug!(entity = ?user, item = ?item, ?applied, "Item used");
        self.pending.push(
            WorldEvent::ItemUsed {
                user,
                item,
                applied,
            }
            .into(),
        );

        let level = character.state.progression().level();
        if level > level_before {
            character.brain.raise(signals::LEVEL_UP);
            self.pending
                .push(WorldEvent::LeveledUp { handle: user, level }.into());
        }
        if applied.exhausted {
            let _ = character.state.inventory_mut().remove(item);
            self.entities.remove(item);
            self.pending.push(WorldEvent::Despawned { handle: item }.into());
        }
        Ok(applied)
    }

    /// Moves a world item within attack range into the taker's inventory.
    pub fn take_item(&mut self, taker: EntityHandle, item: EntityHandle) -> Result<()> {
        let [taker_entity, item_entity] = disjoint_pair(&mut self.entities, taker, item)?;
        let character = taker_entity
            .as_character_mut()
            .ok_or(RuntimeError::NotACharacter(taker))?;
        let world_item = item_entity
            .as_item_mut()
            .ok_or(RuntimeError::NotAnItem(item))?;
        if !character.state.is_alive() {
            return Err(RuntimeError::Dead(taker));
        }
        if world_item.carried_by.is_some() {
            return Err(InventoryError::AlreadyCarried.into());
        }

        let reach = character.state.stats(&self.rules).attack_range();
        let area = character.state.record().area();
        if !area.within_range(&world_item.item.record.area(), reach) {
            return Err(RuntimeError::OutOfReach { item });
        }
        character
            .state
            .inventory_mut()
            .add(item, world_item.item.size)?;
        world_item.carried_by = Some(taker);

        debug!(entity = ?taker, item = ?item, "Item taken");
        self.pending.push(WorldEvent::ItemTaken { taker, item }.into());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn insert_character(
        &mut self,
        state: CharacterState,
        brain: Brain,
        script: Option<ScriptSource>,
    ) -> Result<EntityHandle> {
        let area = state.record().area();
        let position = state.position();
        if !self.map.admits(&area) || self.occupancy.values().any(|occupied| occupied.intersects(&area)) {
            return Err(RuntimeError::PlacementBlocked { position });
        }

        let (kind, name) = (state.kind(), state.record().name.clone());
        let handle = self
            .entities
            .insert(Entity::Character(Character::new(state, brain, script)));
        self.occupancy.insert(handle, area);

        info!(entity = ?handle, %name, %kind, %position, "Character spawned");
        self.pending.push(
            WorldEvent::Spawned {
                handle,
                kind,
                name,
                position,
            }
            .into(),
        );
        Ok(handle)
    }

    fn load_brain(&mut self, handle: EntityHandle, source: ScriptSource) -> Brain {
        let name = source.name().to_owned();
        match ScriptHost::load(source, self.limits) {
            Ok(host) => {
                debug!(entity = ?handle, script = %name, "Script loaded");
                Brain::Script(host)
            }
            Err(error) => {
                warn!(entity = ?handle, script = %name, %error, "Script failed to load; character is passive");
                self.pending.push(
                    ScriptEvent::LoadFailed {
                        handle,
                        error: error.to_string(),
                    }
                    .into(),
                );
                Brain::Passive
            }
        }
    }

    fn attach_brain(&mut self, handle: EntityHandle, brain: Brain) {
        if matches!(brain, Brain::Passive) {
            return;
        }
        if let Some(character) = self.entities.get_mut(handle).and_then(Entity::as_character_mut) {
            character.brain = brain;
        }
    }
}

fn character_mut(
    entities: &mut SlotMap<EntityHandle, Entity>,
    handle: EntityHandle,
) -> Result<&mut Character> {
    entities
        .get_mut(handle)
        .ok_or(RuntimeError::UnknownEntity(handle))?
        .as_character_mut()
        .ok_or(RuntimeError::NotACharacter(handle))
}

fn disjoint_pair(
    entities: &mut SlotMap<EntityHandle, Entity>,
    first: EntityHandle,
    second: EntityHandle,
) -> Result<[&mut Entity; 2]> {
    for handle in [first, second] {
        if !entities.contains_key(handle) {
            return Err(RuntimeError::UnknownEntity(handle));
        }
    }
    entities
        .get_disjoint_mut([first, second])
        .ok_or(RuntimeError::NotAnItem(second))
}
