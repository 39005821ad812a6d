use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mlua::{
    Function, HookTriggers, Lua, LuaOptions, MultiValue, RegistryKey, StdLib, Thread,
    ThreadStatus, Value,
};
use serde::{Deserialize, Serialize};
use skirmish_content::ScriptSource;
use skirmish_core::{CharacterState, Tick};

use super::api;
use super::{ScriptCommand, ScriptError, ScriptFault, ScriptFrame, WaitStatus, WakeCondition};

/// Per-interpreter resource bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptLimits {
    /// Instructions a single resume may execute.
    pub instruction_budget: u64,
    /// Instructions between two watchdog checks.
    pub hook_granularity: u32,
    /// Bytes the interpreter may allocate.
    pub memory_limit: usize,
}

impl ScriptLimits {
    pub const DEFAULT_INSTRUCTION_BUDGET: u64 = 100_000;
    pub const DEFAULT_HOOK_GRANULARITY: u32 = 1_000;
    pub const DEFAULT_MEMORY_LIMIT: usize = 8 * 1024 * 1024;
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            instruction_budget: Self::DEFAULT_INSTRUCTION_BUDGET,
            hook_granularity: Self::DEFAULT_HOOK_GRANULARITY,
            memory_limit: Self::DEFAULT_MEMORY_LIMIT,
        }
    }
}

/// How the next resume enters the decision routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resume {
    /// Call `decide(tick)` from the top.
    Start,
    /// Continue after `wait`, which returns `(status, tick)`.
    Wake(WaitStatus),
}

/// Result of a completed resume.
#[derive(Debug)]
pub struct ScriptTurn {
    /// Working copy of the character after the script ran.
    pub state: CharacterState,
    pub commands: Vec<ScriptCommand>,
    /// The routine is suspended in `wait` rather than finished.
    pub suspended: bool,
}

struct Routine {
    thread: RegistryKey,
    wake: WakeCondition,
}

/// One sandboxed interpreter driving one character.
pub struct ScriptHost {
    source: ScriptSource,
    limits: ScriptLimits,
    lua: Lua,
    watchdog: Watchdog,
    routine: Option<Routine>,
    raised: Vec<String>,
}

impl ScriptHost {
    /// Creates the interpreter and runs the script's top level.
    pub fn load(source: ScriptSource, limits: ScriptLimits) -> Result<Self, ScriptError> {
        let libs = StdLib::TABLE | StdLib::STRING | StdLib::MATH | StdLib::COROUTINE;
        let lua = Lua::new_with(libs, LuaOptions::default()).map_err(ScriptError::Interpreter)?;
        lua.set_memory_limit(limits.memory_limit)
            .map_err(ScriptError::Interpreter)?;
        api::install(&lua).map_err(ScriptError::Interpreter)?;

        let watchdog = Watchdog::new(limits);
        watchdog.install(&lua);

        let load_error = |source_error| ScriptError::Load {
            name: source.name().to_owned(),
            source: source_error,
        };
        lua.load(source.text())
            .set_name(source.name())
            .exec()
            .map_err(load_error)?;
        let has_entry_point = matches!(
            lua.globals().get::<_, Value>("decide"),
            Ok(Value::Function(_))
        );
        if !has_entry_point {
            return Err(ScriptError::MissingEntryPoint {
                name: source.name().to_owned(),
            });
        }

        Ok(Self {
            source,
            limits,
            lua,
            watchdog,
            routine: None,
            raised: Vec::new(),
        })
    }

    /// Fresh interpreter for the same source.
    pub fn reload(&self) -> Result<Self, ScriptError> {
        Self::load(self.source.clone(), self.limits)
    }

    pub fn source(&self) -> &ScriptSource {
        &self.source
    }

    pub fn limits(&self) -> &ScriptLimits {
        &self.limits
    }

    /// The routine is parked in `wait`.
    pub fn is_suspended(&self) -> bool {
        self.routine.is_some()
    }

    pub fn wake_condition(&self) -> Option<&WakeCondition> {
        self.routine.as_ref().map(|routine| &routine.wake)
    }

    /// Queues a signal for the next [`poll`](Self::poll).
    pub fn raise(&mut self, signal: impl Into<String>) {
        self.raised.push(signal.into());
    }

    /// Decides whether the routine runs this tick.
    ///
    /// Signals raised since the previous poll are consumed either way.
    pub fn poll(&mut self, now: Tick) -> Option<Resume> {
        let raised = std::mem::take(&mut self.raised);
        match &self.routine {
            None => Some(Resume::Start),
            Some(routine) => routine.wake.poll(now, &raised).map(Resume::Wake),
        }
    }

    /// Runs the routine until it waits or returns.
    ///
    /// On a fault the frame is dropped, the suspended routine is discarded
    /// and the character's real state is left untouched. A resume that spent
    /// more than the instruction budget faults even if the script caught the
    /// abort inside a nested coroutine.
    pub fn resume(&mut self, resume: Resume, frame: ScriptFrame) -> Result<ScriptTurn, ScriptFault> {
        if resume == Resume::Start {
            self.discard_routine();
        }

        self.watchdog.reset();
        let driven = drive(
            &self.lua,
            self.routine.as_ref(),
            &self.watchdog,
            resume,
            frame,
        );
        let driven = match driven {
            Ok(driven) if self.watchdog.exceeded() => {
                if let Some(thread) = driven.parked {
                    let _ = self.lua.remove_registry_value(thread);
                }
                Err(self.watchdog.fault())
            }
            other => other,
        };
        let driven = match driven {
            Ok(driven) => driven,
            Err(fault) => {
                self.discard_routine();
                return Err(fault);
            }
        };

        let suspended = driven.wake.is_some();
        match (driven.wake, driven.parked) {
            (Some(wake), Some(thread)) => {
                self.discard_routine();
                self.routine = Some(Routine { thread, wake });
            }
            (Some(wake), None) => {
                if let Some(routine) = self.routine.as_mut() {
                    routine.wake = wake;
                }
            }
            (None, parked) => {
                if let Some(thread) = parked {
                    let _ = self.lua.remove_registry_value(thread);
                }
                self.discard_routine();
            }
        }

        Ok(ScriptTurn {
            state: driven.frame.state,
            commands: driven.frame.commands,
            suspended,
        })
    }

    /// [`poll`](Self::poll) followed by [`resume`](Self::resume); `None` if
    /// the routine keeps waiting.
    pub fn run_turn(&mut self, frame: ScriptFrame) -> Result<Option<ScriptTurn>, ScriptFault> {
        match self.poll(frame.now) {
            Some(resume) => self.resume(resume, frame).map(Some),
            None => Ok(None),
        }
    }

    /// Drops any suspended continuation; the next turn starts fresh.
    pub fn discard_routine(&mut self) {
        if let Some(routine) = self.routine.take() {
            let _ = self.lua.remove_registry_value(routine.thread);
        }
    }
}

impl Drop for ScriptHost {
    fn drop(&mut self) {
        self.discard_routine();
    }
}

impl fmt::Debug for ScriptHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptHost")
            .field("source", &self.source)
            .field("limits", &self.limits)
            .field("suspended", &self.is_suspended())
            .finish()
    }
}

/// What one resume left behind, free of any borrow of the interpreter.
struct Driven {
    frame: ScriptFrame,
    /// Set when the routine is parked in `wait`.
    wake: Option<WakeCondition>,
    /// Newly created thread that must be kept for the next resume.
    parked: Option<RegistryKey>,
}

/// Resumes the existing routine, or starts `decide` on a fresh thread.
fn drive(
    lua: &Lua,
    routine: Option<&Routine>,
    watchdog: &Watchdog,
    resume: Resume,
    frame: ScriptFrame,
) -> Result<Driven, ScriptFault> {
    let now = frame.now;
    let runtime = |error: mlua::Error| ScriptFault::Runtime(error.to_string());

    let (thread, fresh): (Thread, bool) = match routine {
        Some(routine) => (lua.registry_value(&routine.thread).map_err(runtime)?, false),
        None => {
            let decide: Function = lua.globals().get("decide").map_err(runtime)?;
            let thread = lua.create_thread(decide).map_err(runtime)?;
            watchdog.install_on(&thread);
            (thread, true)
        }
    };
    let args = match resume {
        Resume::Start => lua.pack_multi(now.0),
        Resume::Wake(status) => lua.pack_multi((status.code(), now.0)),
    }
    .map_err(runtime)?;

    lua.set_app_data(frame);
    let result = thread.resume::<_, MultiValue>(args);
    let frame = lua.remove_app_data::<ScriptFrame>();

    let yielded = result.map_err(|error| watchdog.classify(error))?;
    let frame = frame.ok_or(ScriptFault::FrameLost)?;

    if thread.status() != ThreadStatus::Resumable {
        return Ok(Driven {
            frame,
            wake: None,
            parked: None,
        });
    }
    let wake = WakeCondition::from_wait_args(now, &yielded);
    let parked = if fresh {
        Some(lua.create_registry_value(thread).map_err(runtime)?)
    } else {
        None
    };
    Ok(Driven {
        frame,
        wake: Some(wake),
        parked,
    })
}

/// Counts executed instructions and aborts the running code once the
/// budget is spent.
///
/// The hook is installed on the main state and on every decision thread;
/// coroutines a script creates inherit it from the thread that created
/// them. The counter stays over budget until the next resume.
#[derive(Clone, Debug)]
struct Watchdog {
    used: Arc<AtomicU64>,
    budget: u64,
    step: u32,
}

impl Watchdog {
    fn new(limits: ScriptLimits) -> Self {
        Self {
            used: Arc::new(AtomicU64::new(0)),
            budget: limits.instruction_budget,
            step: limits.hook_granularity.max(1),
        }
    }

    fn triggers(&self) -> HookTriggers {
        HookTriggers {
            every_nth_instruction: Some(self.step),
            ..HookTriggers::default()
        }
    }

    fn install(&self, lua: &Lua) {
        let watchdog = self.clone();
        lua.set_hook(self.triggers(), move |_lua, _debug| watchdog.count());
    }

    fn install_on(&self, thread: &Thread) {
        let watchdog = self.clone();
        thread.set_hook(self.triggers(), move |_lua, _debug| watchdog.count());
    }

    fn count(&self) -> mlua::Result<()> {
        let step = u64::from(self.step);
        let total = self.used.fetch_add(step, Ordering::Relaxed) + step;
        if total > self.budget {
            return Err(mlua::Error::RuntimeError(format!(
                "instruction budget of {} exceeded",
                self.budget
            )));
        }
        Ok(())
    }

    fn reset(&self) {
        self.used.store(0, Ordering::Relaxed);
    }

    fn exceeded(&self) -> bool {
        self.used.load(Ordering::Relaxed) > self.budget
    }

    fn fault(&self) -> ScriptFault {
        ScriptFault::Watchdog {
            budget: self.budget,
        }
    }

    fn classify(&self, error: mlua::Error) -> ScriptFault {
        if self.exceeded() {
            return self.fault();
        }
        match error {
            mlua::Error::MemoryError(_) => ScriptFault::Memory,
            other => ScriptFault::Runtime(other.to_string()),
        }
    }
}
