//! Common error infrastructure for skirmish-core.
//!
//! Domain-specific errors (`ActionRejection`, `ItemError`, ...) live next to
//! the rules that produce them. They all implement [`GameError`] so callers can
//! decide how loudly to report a failure without matching on every variant.
//!
//! Almost everything the rules reject is [`ErrorSeverity::Recoverable`]: a
//! rejected request leaves state untouched and the caller simply tries again
//! on a later tick.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: temporary conditions (cooldown, stamina) that may succeed later
/// - **Validation**: malformed input that should not be retried unchanged
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: unrecoverable errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative request.
    ///
    /// Examples: action on cooldown, not enough stamina, inventory full
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: item not carried, unknown target
    Validation,

    /// Unexpected state inconsistency.
    Internal,

    /// Cannot continue.
    ///
    /// Examples: interpreter could not be constructed
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Classification shared by every rules error.
///
/// Implementors derive `thiserror::Error` for the message and pick a
/// severity by whether retrying later can succeed. `error_code` values are
/// stable; logs and tests match on them.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier of the variant; the type name unless overridden.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }
}
