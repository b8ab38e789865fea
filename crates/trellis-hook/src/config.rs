//! Declarative hook configuration.
//!
//! TOML-serializable hook declarations, loaded at process start and
//! registered in bulk. A declaration references its handler by name;
//! the loader resolves names against a handler map once, at
//! registration — never at chain-run time.
//!
//! # Example TOML
//!
//! ```toml
//! [[hooks]]
//! id = "input-sanitizer"
//! event_type = "agent.invoke.pre"
//! handler = "sanitize"
//! priority = 10
//! fail_mode = "closed"
//! timeout_ms = 50
//!
//! [[hooks]]
//! id = "tool-metrics"
//! event_type = "tool.execute.post"
//! handler = "metrics"
//! priority = 500
//! tenant_id = "tenant-a"
//! tags = ["metrics"]
//! ```

use crate::definition::{DEFAULT_PRIORITY, MAX_PRIORITY};
use crate::{EventType, FailMode, HookDefinition, HookError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

fn default_priority() -> u16 {
    DEFAULT_PRIORITY
}

fn default_timeout_ms() -> u64 {
    200
}

fn default_enabled() -> bool {
    true
}

/// Top-level hooks configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Declarative hook definitions.
    pub hooks: Vec<HookDecl>,
}

/// A single declarative hook definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookDecl {
    /// Unique hook ID.
    pub id: String,

    /// Display name. Defaults to the id.
    #[serde(default)]
    pub name: Option<String>,

    /// What this hook does.
    #[serde(default)]
    pub description: String,

    /// Event type string (e.g. "tool.execute.pre").
    pub event_type: String,

    /// Name of the registered handler to pair with this definition.
    pub handler: String,

    /// Priority (0–1000, lower runs earlier). Default: 100.
    #[serde(default = "default_priority")]
    pub priority: u16,

    /// Per-execution timeout in milliseconds. Default: 200.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether the hook is enabled. Default: true.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Tenant scope; empty = system hook.
    #[serde(default)]
    pub tenant_id: String,

    /// Failure-isolation policy. Default: open.
    #[serde(default)]
    pub fail_mode: FailMode,

    /// Diagnostic tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl HookDecl {
    /// Validates the declaration and converts it into a
    /// [`HookDefinition`].
    ///
    /// # Errors
    ///
    /// `HookError::UnknownEventType` for an unrecognized event string,
    /// `HookError::InvalidPriority` for a priority above 1000.
    pub fn validate(&self) -> Result<HookDefinition, HookError> {
        let event_type = EventType::from_str(&self.event_type)?;
        if self.priority > MAX_PRIORITY {
            return Err(HookError::InvalidPriority {
                id: self.id.clone(),
                priority: self.priority,
                max: MAX_PRIORITY,
            });
        }
        Ok(HookDefinition {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_else(|| self.id.clone()),
            description: self.description.clone(),
            event_type,
            priority: self.priority,
            timeout: Duration::from_millis(self.timeout_ms),
            enabled: self.enabled,
            tenant_id: self.tenant_id.clone(),
            fail_mode: self.fail_mode,
            tags: self.tags.clone(),
        })
    }
}

impl HooksConfig {
    /// Merges another config layer into this one.
    ///
    /// A hook in `other` whose id matches an existing hook replaces it
    /// (override semantics); new hooks are appended.
    pub fn merge(&mut self, other: &Self) {
        for hook in &other.hooks {
            self.hooks.retain(|h| h.id != hook.id);
            self.hooks.push(hook.clone());
        }
    }

    /// Validates every declaration, returning all errors (not just the
    /// first one).
    #[must_use]
    pub fn validate_all(&self) -> Vec<HookError> {
        self.hooks
            .iter()
            .filter_map(|h| h.validate().err())
            .collect()
    }
}
