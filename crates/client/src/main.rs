//! Skirmish headless client binary.
//!
//! Composition root: loads a scenario from a content directory, builds the
//! world and the runtime, logs the event stream and reports the survivors.
//!
//! ```bash
//! SKIRMISH_SCENARIO=duel SKIRMISH_TICKS=500 cargo run -p skirmish-client
//! # free-running clock at 20 ticks per second
//! SKIRMISH_TICK_MS=50 cargo run -p skirmish-client
//! ```
mod config;
mod logging;

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use skirmish_content::{ContentFactory, RulesLoader};
use skirmish_core::EntityHandle;
use skirmish_runtime::{Event, Runtime, RuntimeHandle, ScriptEvent, Topic, World, WorldEvent};

use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut config = ClientConfig::from_env();
    logging::setup_logging();

    tracing::info!("Starting skirmish client");
    tracing::info!("Scenario: {}", config.scenario);

    let factory = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    config.runtime.rules = match &config.rules {
        Some(path) => RulesLoader::load(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => factory.load_rules()?,
    };

    let scenario = factory
        .load_scenario(&config.scenario)
        .with_context(|| format!("failed to load scenario '{}'", config.scenario))?;
    let world = World::from_scenario(&scenario, &config.runtime)?;
    let roster: Vec<(EntityHandle, String)> = world
        .characters()
        .map(|(handle, character)| (handle, character.state.record().name.clone()))
        .collect();

    let runtime = Runtime::builder().config(config.runtime.clone()).world(world).build()?;
    let handle = runtime.handle();
    tracing::info!("Runtime built successfully");

    let logger = spawn_event_logger(&handle);

    let tick = match config.runtime.tick_interval {
        Some(period) => run_free(&handle, config.ticks, period).await?,
        None => handle.step(config.ticks).await?,
    };
    tracing::info!("Simulation stopped at tick {tick}");

    report(&handle, &roster).await;

    drop(handle);
    runtime.shutdown().await?;
    if let Err(e) = logger.await {
        tracing::warn!("Event logger ended abnormally: {e}");
    }

    Ok(())
}

/// Waits for the free-running clock to reach `ticks`.
async fn run_free(
    handle: &RuntimeHandle,
    ticks: u64,
    period: Duration,
) -> skirmish_runtime::Result<skirmish_core::Tick> {
    loop {
        let now = handle.now().await?;
        if now.0 >= ticks {
            return Ok(now);
        }
        tokio::time::sleep(period).await;
    }
}

async fn report(handle: &RuntimeHandle, roster: &[(EntityHandle, String)]) {
    for (entity, name) in roster {
        match handle.query_character(*entity).await {
            Ok(state) => tracing::info!(
                "{name}: level {} at {} with {} HP and {} stamina",
                state.progression().level(),
                state.position(),
                state.hit_points(),
                state.stamina(),
            ),
            Err(_) => tracing::info!("{name}: gone"),
        }
    }
}

fn spawn_event_logger(handle: &RuntimeHandle) -> JoinHandle<()> {
    let mut world_rx = handle.subscribe(Topic::World);
    let mut script_rx = handle.subscribe(Topic::Script);

    tokio::spawn(async move {
        let mut world_open = true;
        let mut script_open = true;
        while world_open || script_open {
            tokio::select! {
                received = world_rx.recv(), if world_open => {
                    world_open = log_received(received);
                }
                received = script_rx.recv(), if script_open => {
                    script_open = log_received(received);
                }
            }
        }
        tracing::debug!("Event logger stopped");
    })
}

/// Logs one bus delivery; returns false once the topic is closed.
fn log_received(received: Result<Event, RecvError>) -> bool {
    match received {
        Ok(event) => {
            log_event(&event);
            true
        }
        Err(broadcast::error::RecvError::Lagged(skipped)) => {
            tracing::warn!("Event logger lagged, skipped {skipped} events");
            true
        }
        Err(broadcast::error::RecvError::Closed) => false,
    }
}

fn log_event(event: &Event) {
    match event {
        Event::World(WorldEvent::Killed(kill)) => {
            tracing::info!("{:?} killed {:?}", kill.killer, kill.victim)
        }
        Event::World(WorldEvent::LeveledUp { handle, level }) => {
            tracing::info!("{handle:?} reached level {level}")
        }
        Event::World(event) => tracing::debug!("{event:?}"),
        Event::Script(ScriptEvent::LoadFailed { handle, error }) => {
            tracing::warn!("Script for {handle:?} failed to load: {error}")
        }
        Event::Script(ScriptEvent::Faulted {
            handle,
            fault,
            action,
        }) => tracing::warn!("Script for {handle:?} faulted ({fault}), {action:?}"),
        Event::Script(event) => tracing::info!("{event:?}"),
        Event::Tick(_) => {}
    }
}
