//! What happens to a script after it faults.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ScriptFault;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultAction {
    /// Start again from a fresh interpreter with the same source.
    Reload,
    /// Leave the character passive for the rest of the simulation.
    Disable,
}

impl fmt::Display for FaultAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FaultAction::Reload => "reload",
            FaultAction::Disable => "disable",
        };
        write!(f, "{}", label)
    }
}

/// Decides the fate of a faulted script. Either way the simulation goes on.
pub trait FaultPolicy: Send + Sync + fmt::Debug {
    /// `reloads` counts how often this character's script was already
    /// reloaded.
    fn on_fault(&self, fault: &ScriptFault, reloads: u32) -> FaultAction;
}

/// Reloads up to `max_reloads` times, then disables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReloadPolicy {
    pub max_reloads: u32,
}

impl FaultPolicy for ReloadPolicy {
    fn on_fault(&self, fault: &ScriptFault, reloads: u32) -> FaultAction {
        match fault {
            ScriptFault::FrameLost => FaultAction::Disable,
            _ if reloads < self.max_reloads => FaultAction::Reload,
            _ => FaultAction::Disable,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisablePolicy;

impl FaultPolicy for DisablePolicy {
    fn on_fault(&self, _fault: &ScriptFault, _reloads: u32) -> FaultAction {
        FaultAction::Disable
    }
}

/// Serializable selection of a built-in [`FaultPolicy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaultPolicyConfig {
    Reload { max_reloads: u32 },
    Disable,
}

impl FaultPolicyConfig {
    pub const DEFAULT_MAX_RELOADS: u32 = 3;

    pub fn build(self) -> Box<dyn FaultPolicy> {
        match self {
            FaultPolicyConfig::Reload { max_reloads } => Box::new(ReloadPolicy { max_reloads }),
            FaultPolicyConfig::Disable => Box::new(DisablePolicy),
        }
    }
}

impl Default for FaultPolicyConfig {
    fn default() -> Self {
        FaultPolicyConfig::Reload {
            max_reloads: Self::DEFAULT_MAX_RELOADS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_policy_gives_up_after_the_limit() {
        let policy = FaultPolicyConfig::default().build();
        let fault = ScriptFault::Watchdog { budget: 10 };
        assert_eq!(policy.on_fault(&fault, 0), FaultAction::Reload);
        assert_eq!(policy.on_fault(&fault, 2), FaultAction::Reload);
        assert_eq!(policy.on_fault(&fault, 3), FaultAction::Disable);
    }

    #[test]
    fn disable_policy_never_reloads() {
        let policy = FaultPolicyConfig::Disable.build();
        let fault = ScriptFault::Runtime("boom".into());
        assert_eq!(policy.on_fault(&fault, 0), FaultAction::Disable);
    }
}
