//! Per-hook execution records — the audit trail of one chain run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of executing one hook within a chain.
///
/// Outcomes are append-only: once pushed onto a context's outcome list
/// they are never mutated. The full ordered list is the audit trail for
/// one chain run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookOutcome {
    /// ID of the hook this record describes.
    pub hook_id: String,

    /// Whether the hook completed without error or timeout.
    pub success: bool,

    /// Wall-clock time the hook's execution took (including any
    /// downstream delegation the hook performed).
    pub elapsed: Duration,

    /// Error text, present iff `success` is false.
    pub error: Option<String>,
}

impl HookOutcome {
    /// Creates a success record.
    #[must_use]
    pub fn success(hook_id: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            hook_id: hook_id.into(),
            success: true,
            elapsed,
            error: None,
        }
    }

    /// Creates a failure record with the given error text.
    #[must_use]
    pub fn failure(hook_id: impl Into<String>, elapsed: Duration, error: impl Into<String>) -> Self {
        Self {
            hook_id: hook_id.into(),
            success: false,
            elapsed,
            error: Some(error.into()),
        }
    }
}
