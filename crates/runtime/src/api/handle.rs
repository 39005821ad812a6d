//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the world or streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use skirmish_content::ScriptSource;
use skirmish_core::{
    ActionIntent, CharacterState, CharacterTemplate, EntityHandle, Item, ItemApplied, Parameter,
    Position, Tick,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advance the clock by `ticks`; returns the clock afterwards.
    pub async fn step(&self, ticks: u64) -> Result<Tick> {
        self.request(|reply| Command::Step { ticks, reply }).await
    }

    pub async fn spawn_character(
        &self,
        template: CharacterTemplate,
        position: Position,
        script: Option<ScriptSource>,
    ) -> Result<EntityHandle> {
        self.request(|reply| Command::SpawnCharacter {
            template: Box::new(template),
            position,
            script,
            reply,
        })
        .await?
    }

    pub async fn spawn_item(&self, item: Item) -> Result<EntityHandle> {
        self.request(|reply| Command::SpawnItem {
            item: Box::new(item),
            reply,
        })
        .await
    }

    pub async fn despawn(&self, handle: EntityHandle) -> Result<()> {
        self.request(|reply| Command::Despawn { handle, reply }).await?
    }

    pub async fn duplicate(&self, handle: EntityHandle, position: Position) -> Result<EntityHandle> {
        self.request(|reply| Command::Duplicate {
            handle,
            position,
            reply,
        })
        .await?
    }

    /// Raise a named signal; returns false if the character has no script.
    pub async fn signal(&self, handle: EntityHandle, signal: impl Into<String>) -> Result<bool> {
        let signal = signal.into();
        self.request(|reply| Command::Signal {
            handle,
            signal,
            reply,
        })
        .await?
    }

    pub async fn set_intent(&self, handle: EntityHandle, intent: ActionIntent) -> Result<()> {
        self.request(|reply| Command::SetIntent {
            handle,
            intent,
            reply,
        })
        .await?
    }

    pub async fn level_up(&self, handle: EntityHandle, parameter: Parameter) -> Result<u32> {
        self.request(|reply| Command::LevelUp {
            handle,
            parameter,
            reply,
        })
        .await?
    }

    pub async fn use_item(&self, user: EntityHandle, item: EntityHandle) -> Result<ItemApplied> {
        self.request(|reply| Command::UseItem { user, item, reply })
            .await?
    }

    pub async fn take_item(&self, taker: EntityHandle, item: EntityHandle) -> Result<()> {
        self.request(|reply| Command::TakeItem { taker, item, reply })
            .await?
    }

    /// Query a character's state (read-only copy)
    pub async fn query_character(&self, handle: EntityHandle) -> Result<CharacterState> {
        self.request(|reply| Command::QueryCharacter { handle, reply })
            .await?
    }

    pub async fn now(&self) -> Result<Tick> {
        self.request(|reply| Command::QueryClock { reply }).await
    }

    /// Stops the worker. Later commands from any handle fail with
    /// [`RuntimeError::CommandChannelClosed`].
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use skirmish_runtime::Topic;
    ///
    /// let mut world_rx = handle.subscribe(Topic::World);
    /// while let Ok(event) = world_rx.recv().await {
    ///     // Handle world events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
