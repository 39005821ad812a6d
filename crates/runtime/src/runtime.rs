//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up the command channel and
//! the event bus, and exposes a builder-based API for clients.
use std::env;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use skirmish_core::RulesConfig;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::script::{FaultPolicyConfig, ScriptLimits};
use crate::workers::{Command, SimulationWorker};
use crate::world::World;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub rules: RulesConfig,
    pub limits: ScriptLimits,
    pub fault_policy: FaultPolicyConfig,
    /// Free-running tick period; `None` advances only on `step`.
    pub tick_interval: Option<Duration>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Despawn characters at the end of the tick they die in.
    pub remove_dead: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            limits: ScriptLimits::default(),
            fault_policy: FaultPolicyConfig::default(),
            tick_interval: None,
            event_buffer_size: 100,
            command_buffer_size: 32,
            remove_dead: true,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `SKIRMISH_INSTRUCTION_BUDGET` / `SKIRMISH_HOOK_GRANULARITY` / `SKIRMISH_SCRIPT_MEMORY`
    /// - `SKIRMISH_FAULT_POLICY` (`reload` or `disable`) / `SKIRMISH_MAX_RELOADS`
    /// - `SKIRMISH_TICK_MS` (0 disables the free-running clock)
    /// - `SKIRMISH_EVENT_BUFFER` / `SKIRMISH_COMMAND_BUFFER`
    /// - `SKIRMISH_REMOVE_DEAD`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(budget) = read_env::<u64>("SKIRMISH_INSTRUCTION_BUDGET") {
            config.limits.instruction_budget = budget.max(1);
        }
        if let Some(granularity) = read_env::<u32>("SKIRMISH_HOOK_GRANULARITY") {
            config.limits.hook_granularity = granularity.max(1);
        }
        if let Some(bytes) = read_env::<usize>("SKIRMISH_SCRIPT_MEMORY") {
            config.limits.memory_limit = bytes;
        }

        let max_reloads = read_env::<u32>("SKIRMISH_MAX_RELOADS");
        match env::var("SKIRMISH_FAULT_POLICY")
            .ok()
            .map(|value| value.to_lowercase())
            .as_deref()
        {
            Some("disable") => config.fault_policy = FaultPolicyConfig::Disable,
            Some("reload") | None => {
                if let Some(max_reloads) = max_reloads {
                    config.fault_policy = FaultPolicyConfig::Reload { max_reloads };
                }
            }
            Some(_) => {}
        }

        if let Some(millis) = read_env::<u64>("SKIRMISH_TICK_MS") {
            config.tick_interval = (millis > 0).then(|| Duration::from_millis(millis));
        }
        if let Some(capacity) = read_env::<usize>("SKIRMISH_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("SKIRMISH_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(remove_dead) = read_env_bool("SKIRMISH_REMOVE_DEAD") {
            config.remove_dead = remove_dead;
        }

        config
    }
}

/// Main runtime that owns the simulation worker.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Stops the worker and waits for it to exit.
    ///
    /// Every character's interpreter is released with the world.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await?;
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        info!("Runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    world: Option<World>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            world: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// World to simulate (required).
    pub fn world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    /// Free-running tick period.
    pub fn tick_interval(mut self, period: Duration) -> Self {
        self.config.tick_interval = Some(period);
        self
    }

    /// Spawns the simulation worker. Must be called inside a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let world = self.world.ok_or(RuntimeError::MissingWorld)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(world, command_rx, event_bus, self.config.tick_interval);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
