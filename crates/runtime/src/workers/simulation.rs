//! Simulation worker that owns the authoritative [`World`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), advances
//! the clock on demand or on a fixed period, and publishes every event to
//! the [`EventBus`].
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info};

use skirmish_content::ScriptSource;
use skirmish_core::{
    ActionIntent, CharacterState, CharacterTemplate, EntityHandle, Item, ItemApplied, Parameter,
    Position, Tick,
};

use crate::api::{Result, RuntimeError};
use crate::events::EventBus;
use crate::world::World;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Advance the clock by `ticks`; replies with the new clock value.
    Step {
        ticks: u64,
        reply: oneshot::Sender<Tick>,
    },
    SpawnCharacter {
        template: Box<CharacterTemplate>,
        position: Position,
        script: Option<ScriptSource>,
        reply: oneshot::Sender<Result<EntityHandle>>,
    },
    SpawnItem {
        item: Box<Item>,
        reply: oneshot::Sender<EntityHandle>,
    },
    Despawn {
        handle: EntityHandle,
        reply: oneshot::Sender<Result<()>>,
    },
    Duplicate {
        handle: EntityHandle,
        position: Position,
        reply: oneshot::Sender<Result<EntityHandle>>,
    },
    Signal {
        handle: EntityHandle,
        signal: String,
        reply: oneshot::Sender<Result<bool>>,
    },
    SetIntent {
        handle: EntityHandle,
        intent: ActionIntent,
        reply: oneshot::Sender<Result<()>>,
    },
    LevelUp {
        handle: EntityHandle,
        parameter: Parameter,
        reply: oneshot::Sender<Result<u32>>,
    },
    UseItem {
        user: EntityHandle,
        item: EntityHandle,
        reply: oneshot::Sender<Result<ItemApplied>>,
    },
    TakeItem {
        taker: EntityHandle,
        item: EntityHandle,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query a character's state (read-only copy).
    QueryCharacter {
        handle: EntityHandle,
        reply: oneshot::Sender<Result<CharacterState>>,
    },
    QueryClock {
        reply: oneshot::Sender<Tick>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Background task that processes simulation commands.
pub struct SimulationWorker {
    world: World,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    tick_interval: Option<Duration>,
}

impl SimulationWorker {
    pub fn new(
        world: World,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        tick_interval: Option<Duration>,
    ) -> Self {
        info!(
            entities = world.len(),
            tick_interval = ?tick_interval,
            "SimulationWorker initialized"
        );
        Self {
            world,
            command_rx,
            event_bus,
            tick_interval,
        }
    }

    /// Main worker loop.
    ///
    /// Exits on [`Command::Shutdown`] or once every handle is dropped; the
    /// world, and every interpreter in it, goes with it.
    pub async fn run(mut self) {
        let mut ticker = self.tick_interval.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown { reply }) => {
                        if reply.send(()).is_err() {
                            debug!("Shutdown reply channel closed (caller dropped)");
                        }
                        break;
                    }
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = next_tick(&mut ticker) => {
                    self.step(1);
                }
            }
        }
        info!(tick = %self.world.now(), "SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Step { ticks, reply } => {
                let now = self.step(ticks);
                if reply.send(now).is_err() {
                    debug!("Step reply channel closed (caller dropped)");
                }
            }
            Command::SpawnCharacter {
                template,
                position,
                script,
                reply,
            } => {
                let result = self.world.spawn_character(&template, position, script);
                self.flush();
                if reply.send(result).is_err() {
                    debug!("SpawnCharacter reply channel closed (caller dropped)");
                }
            }
            Command::SpawnItem { item, reply } => {
                let handle = self.world.spawn_item(*item);
                self.flush();
                if reply.send(handle).is_err() {
                    debug!("SpawnItem reply channel closed (caller dropped)");
                }
            }
            Command::Despawn { handle, reply } => {
                let result = self.world.despawn(handle);
                self.flush();
                if reply.send(result).is_err() {
                    debug!("Despawn reply channel closed (caller dropped)");
                }
            }
            Command::Duplicate {
                handle,
                position,
                reply,
            } => {
                let result = self.world.duplicate(handle, position);
                self.flush();
                if reply.send(result).is_err() {
                    debug!("Duplicate reply channel closed (caller dropped)");
                }
            }
            Command::Signal {
                handle,
                signal,
                reply,
            } => {
                let result = self.world.signal(handle, &signal);
                if reply.send(result).is_err() {
                    debug!("Signal reply channel closed (caller dropped)");
                }
            }
            Command::SetIntent {
                handle,
                intent,
                reply,
            } => {
                let result = self.world.set_intent(handle, intent);
                if reply.send(result).is_err() {
                    debug!("SetIntent reply channel closed (caller dropped)");
                }
            }
            Command::LevelUp {
                handle,
                parameter,
                reply,
            } => {
                let result = self.world.level_up(handle, parameter);
                if reply.send(result).is_err() {
                    debug!("LevelUp reply channel closed (caller dropped)");
                }
            }
            Command::UseItem { user, item, reply } => {
                let result = self.world.use_item(user, item);
                self.flush();
                if reply.send(result).is_err() {
                    debug!("UseItem reply channel closed (caller dropped)");
                }
            }
            Command::TakeItem { taker, item, reply } => {
                let result = self.world.take_item(taker, item);
                self.flush();
                if reply.send(result).is_err() {
                    debug!("TakeItem reply channel closed (caller dropped)");
                }
            }
            Command::QueryCharacter { handle, reply } => {
                let result = self
                    .world
                    .character(handle)
                    .map(|character| character.state.clone())
                    .ok_or(RuntimeError::UnknownEntity(handle));
                if reply.send(result).is_err() {
                    debug!("QueryCharacter reply channel closed (caller dropped)");
                }
            }
            Command::QueryClock { reply } => {
                if reply.send(self.world.now()).is_err() {
                    debug!("QueryClock reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    fn step(&mut self, ticks: u64) -> Tick {
        for _ in 0..ticks {
            let report = self.world.tick();
            for event in report.events {
                self.event_bus.publish(event);
            }
        }
        self.world.now()
    }

    /// Publishes events produced outside a tick.
    fn flush(&mut self) {
        for event in self.world.drain_events() {
            self.event_bus.publish(event);
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
