//! Error types for the hook layer.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur in the hook layer.
///
/// Categories (1)–(3) of the failure taxonomy (hook logic error, hook
/// timeout, chain budget exhaustion) are converted by the chain runner
/// into [`HookOutcome`](crate::HookOutcome) records and never escape
/// [`ChainRunner::run`](crate::ChainRunner::run). The remaining variants
/// surface synchronously from registration and management calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// Unknown event type string.
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    /// Priority outside the allowed [0, 1000] range.
    #[error("hook '{id}': priority {priority} out of range (0..={max})")]
    InvalidPriority {
        /// ID of the offending definition.
        id: String,
        /// The rejected priority.
        priority: u16,
        /// Maximum allowed priority.
        max: u16,
    },

    /// Hook body returned an error.
    #[error("hook execution failed [{hook_id}]: {message}")]
    ExecutionFailed {
        /// ID of the hook that failed.
        hook_id: String,
        /// Error message from the hook body.
        message: String,
    },

    /// Hook exceeded its declared timeout.
    #[error("hook timed out [{hook_id}] after {timeout:?}")]
    Timeout {
        /// ID of the hook that timed out.
        hook_id: String,
        /// The deadline that fired.
        timeout: Duration,
    },

    /// The chain's aggregate budget was exhausted before this hook ran.
    #[error("chain budget exhausted before hook [{hook_id}]")]
    BudgetExhausted {
        /// ID of the hook that was next to run.
        hook_id: String,
    },

    /// Hook with the given ID was not found.
    #[error("hook not found: {0}")]
    NotFound(String),

    /// A declarative hook referenced a handler name with no registered
    /// handler.
    #[error("hook '{hook_id}': unknown handler '{handler}'")]
    UnknownHandler {
        /// ID of the declaration.
        hook_id: String,
        /// The unresolved handler name.
        handler: String,
    },
}
