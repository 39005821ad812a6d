//! Wake conditions for suspended decision routines.
//!
//! `wait` takes at most two arguments:
//!
//! | Call | Wakes |
//! |---|---|
//! | `wait()`, `wait(0)` | next tick |
//! | `wait(n)` | `n` ticks later |
//! | `wait("name")` | once the signal is raised |
//! | `wait("name", n)` | on the signal, or after `n` ticks |
//!
//! Malformed arguments fall back to "next tick"; they never fault.

use mlua::{MultiValue, Value};
use skirmish_core::Tick;

/// First value `wait` returns to the script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WaitStatus {
    Ready = 0,
    Signalled = 1,
    TimedOut = 2,
}

impl WaitStatus {
    pub const fn code(self) -> i64 {
        self as i64
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WakeCondition {
    At(Tick),
    Signal {
        name: String,
        deadline: Option<Tick>,
    },
}

impl WakeCondition {
    /// Parses the values passed to `wait`, suspended at `now`.
    pub fn from_wait_args(now: Tick, args: &MultiValue) -> Self {
        let mut args = args.iter();
        match args.next() {
            Some(Value::String(name)) => {
                let deadline = args.next().and_then(ticks_of).map(|ticks| now + ticks.max(1));
                match name.to_str() {
                    Ok(name) => WakeCondition::Signal {
                        name: name.to_owned(),
                        deadline,
                    },
                    Err(_) => WakeCondition::At(now + 1),
                }
            }
            Some(value) => WakeCondition::At(now + ticks_of(value).unwrap_or(0).max(1)),
            None => WakeCondition::At(now + 1),
        }
    }

    /// Returns the status to resume with, or `None` to keep waiting.
    pub fn poll(&self, now: Tick, raised: &[String]) -> Option<WaitStatus> {
        match self {
            WakeCondition::At(at) => (now >= *at).then_some(WaitStatus::Ready),
            WakeCondition::Signal { name, deadline } => {
                if raised.iter().any(|signal| signal == name) {
                    Some(WaitStatus::Signalled)
                } else if deadline.is_some_and(|deadline| now >= deadline) {
                    Some(WaitStatus::TimedOut)
                } else {
                    None
                }
            }
        }
    }
}

fn ticks_of(value: &Value) -> Option<u64> {
    match value {
        Value::Integer(ticks) => u64::try_from(*ticks).ok(),
        Value::Number(ticks) if ticks.is_finite() && *ticks >= 0.0 => Some(*ticks as u64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlua::Lua;

    #[test]
    fn bare_wait_resumes_next_tick() {
        let lua = Lua::new();
        let wake = WakeCondition::from_wait_args(Tick(5), &MultiValue::new());
        assert_eq!(wake, WakeCondition::At(Tick(6)));
        assert_eq!(wake.poll(Tick(5), &[]), None);
        assert_eq!(wake.poll(Tick(6), &[]), Some(WaitStatus::Ready));

        let zero = lua.pack_multi(0).unwrap();
        assert_eq!(
            WakeCondition::from_wait_args(Tick(5), &zero),
            WakeCondition::At(Tick(6))
        );
    }

    #[test]
    fn elapsed_ticks() {
        let lua = Lua::new();
        let three = lua.pack_multi(3).unwrap();
        let wake = WakeCondition::from_wait_args(Tick(10), &three);
        assert_eq!(wake.poll(Tick(12), &[]), None);
        assert_eq!(wake.poll(Tick(13), &[]), Some(WaitStatus::Ready));
    }

    #[test]
    fn signal_with_timeout() {
        let lua = Lua::new();
        let args = lua.pack_multi(("damaged", 4)).unwrap();
        let wake = WakeCondition::from_wait_args(Tick(1), &args);
        assert_eq!(
            wake,
            WakeCondition::Signal {
                name: "damaged".into(),
                deadline: Some(Tick(5)),
            }
        );

        let raised = vec!["damaged".to_string()];
        assert_eq!(wake.poll(Tick(2), &raised), Some(WaitStatus::Signalled));
        assert_eq!(wake.poll(Tick(2), &["other".to_string()]), None);
        assert_eq!(wake.poll(Tick(5), &[]), Some(WaitStatus::TimedOut));
    }

    #[test]
    fn signal_without_timeout_waits_forever() {
        let lua = Lua::new();
        let args = lua.pack_multi("ping").unwrap();
        let wake = WakeCondition::from_wait_args(Tick(1), &args);
        assert_eq!(wake.poll(Tick(1_000), &[]), None);
    }

    #[test]
    fn malformed_arguments_mean_next_tick() {
        let lua = Lua::new();
        let args = lua.pack_multi((true, -4)).unwrap();
        assert_eq!(
            WakeCondition::from_wait_args(Tick(7), &args),
            WakeCondition::At(Tick(8))
        );
        let negative = lua.pack_multi(-4).unwrap();
        assert_eq!(
            WakeCondition::from_wait_args(Tick(7), &negative),
            WakeCondition::At(Tick(8))
        );
    }
}
