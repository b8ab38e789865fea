//! Hook context — the data carrier passed through one chain run.
//!
//! A context is exclusively owned by the single chain run that created
//! it; it is never shared across runs or tenants. Pre-phase payload
//! fields marked mutable below may be rewritten by hooks and are copied
//! back into the host operation by the tier adapter; post-phase result
//! fields are read-only by convention, except the tool tier which
//! permits result replacement.

use crate::{EventType, HookOutcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Tenant scope of a system-wide execution (or hook).
pub const SYSTEM_TENANT: &str = "";

/// Fallback abort reason when a hook sets abort without explaining itself.
const UNSPECIFIED_ABORT: &str = "aborted without reason";

/// Tier-specific payload carried by a [`HookContext`].
///
/// Mutation permissions per variant:
///
/// | Variant        | Hooks may mutate            |
/// |----------------|-----------------------------|
/// | `AgentPre`     | `inputs`, `system_prompt`   |
/// | `AgentPost`    | nothing                     |
/// | `ToolPre`      | `arguments`                 |
/// | `ToolPost`     | `result` (replacement)      |
/// | `WorkflowPre`  | `inputs`                    |
/// | `WorkflowPost` | nothing                     |
/// | `RequestPre`   | `headers`, `body`           |
/// | `RequestPost`  | nothing                     |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum EventPayload {
    /// Before an agent invocation.
    AgentPre {
        /// Agent identifier.
        agent: String,
        /// Resolved invocation inputs (mutable).
        inputs: Value,
        /// The not-yet-sent system prompt (mutable).
        system_prompt: String,
    },
    /// After an agent invocation.
    AgentPost {
        /// Agent identifier.
        agent: String,
        /// The completed result (read-only).
        result: Value,
        /// How long the invocation took.
        elapsed: Duration,
    },
    /// Before a tool executes.
    ToolPre {
        /// Tool name.
        tool: String,
        /// Tool arguments (mutable).
        arguments: Value,
    },
    /// After a tool execution.
    ToolPost {
        /// Tool name.
        tool: String,
        /// Tool result; hooks may substitute it (output transformation).
        result: Value,
        /// How long the execution took.
        elapsed: Duration,
    },
    /// Before a workflow step runs.
    WorkflowPre {
        /// Step identifier.
        step_id: String,
        /// Action name the step executes.
        action: String,
        /// Resolved step inputs (mutable).
        inputs: Value,
        /// Snapshot of workflow state (read-only).
        state: Value,
    },
    /// After a workflow step completes.
    WorkflowPost {
        /// Step identifier.
        step_id: String,
        /// Step result (read-only).
        result: Value,
        /// How long the step took.
        elapsed: Duration,
    },
    /// Before an inbound request is handled.
    RequestPre {
        /// HTTP-style method.
        method: String,
        /// Request path.
        path: String,
        /// Request headers (mutable).
        headers: HashMap<String, String>,
        /// Request body (mutable).
        body: Value,
    },
    /// After an inbound request produced a response.
    RequestPost {
        /// Response status code (read-only).
        status: u16,
        /// Response headers (read-only).
        headers: HashMap<String, String>,
    },
}

/// Context passed through one chain run.
///
/// Hooks read and mutate the payload/metadata, may set the abort flag,
/// and the chain runner appends one [`HookOutcome`] per hook considered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookContext {
    /// The lifecycle point this chain is running for.
    pub event_type: EventType,

    /// Tenant this execution belongs to; [`SYSTEM_TENANT`] (empty) for
    /// system-scope executions.
    pub tenant_id: String,

    /// Tier-specific data.
    pub payload: EventPayload,

    /// Open key-value bag for cross-hook communication within this
    /// chain run. Not persisted beyond the chain's lifetime.
    pub metadata: HashMap<String, Value>,

    /// Once true, no further hook's primary logic executes.
    pub abort: bool,

    /// Why the chain aborted. Non-empty iff `abort` is true.
    pub abort_reason: String,

    /// Ordered per-hook execution records, appended as the chain
    /// progresses. Read-only history — never mutated once appended.
    pub outcomes: Vec<HookOutcome>,
}

impl HookContext {
    /// Creates a context for one chain run.
    #[must_use]
    pub fn new(event_type: EventType, tenant_id: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            event_type,
            tenant_id: tenant_id.into(),
            payload,
            metadata: HashMap::new(),
            abort: false,
            abort_reason: String::new(),
            outcomes: Vec::new(),
        }
    }

    /// Adds a metadata entry (builder style).
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Marks the chain aborted with the given reason.
    ///
    /// An empty reason is replaced with a placeholder so the
    /// `abort ⟺ non-empty reason` invariant always holds.
    pub fn set_abort(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.abort = true;
        self.abort_reason = if reason.is_empty() {
            UNSPECIFIED_ABORT.to_string()
        } else {
            reason
        };
    }

    /// Returns `true` if this execution is system-scoped (no tenant).
    #[must_use]
    pub fn is_system_scope(&self) -> bool {
        self.tenant_id.is_empty()
    }
}
