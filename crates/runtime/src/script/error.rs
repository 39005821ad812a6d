use skirmish_core::{ErrorSeverity, GameError};

/// Failure to bring a script up.
///
/// The character still exists; it simply has no AI.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to create interpreter: {0}")]
    Interpreter(#[source] mlua::Error),

    #[error("failed to load script '{name}': {source}")]
    Load {
        name: String,
        #[source]
        source: mlua::Error,
    },

    #[error("script '{name}' does not define a global `decide` function")]
    MissingEntryPoint { name: String },
}

impl GameError for ScriptError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Interpreter(_) => ErrorSeverity::Fatal,
            Self::Load { .. } | Self::MissingEntryPoint { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Interpreter(_) => "SCRIPT_INTERPRETER",
            Self::Load { .. } => "SCRIPT_LOAD",
            Self::MissingEntryPoint { .. } => "SCRIPT_MISSING_ENTRY_POINT",
        }
    }
}

/// Failure during a single resume.
///
/// The tick's decision is discarded and the character keeps its previously
/// committed state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptFault {
    #[error("script error: {0}")]
    Runtime(String),

    #[error("script exceeded its budget of {budget} instructions")]
    Watchdog { budget: u64 },

    #[error("script exceeded its memory limit")]
    Memory,

    #[error("script frame was lost during the resume")]
    FrameLost,
}

impl GameError for ScriptFault {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::FrameLost => ErrorSeverity::Internal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Runtime(_) => "SCRIPT_RUNTIME",
            Self::Watchdog { .. } => "SCRIPT_WATCHDOG",
            Self::Memory => "SCRIPT_MEMORY",
            Self::FrameLost => "SCRIPT_FRAME_LOST",
        }
    }
}
