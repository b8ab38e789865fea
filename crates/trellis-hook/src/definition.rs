//! Hook definitions — the registrable unit of extension.
//!
//! A definition is a plain attribute record: no executable code is
//! embedded, so it maps directly onto a key-value or relational store.
//! The executable handler is paired with the definition at registration
//! time (see [`HookRegistry::register`](crate::HookRegistry::register)).

use crate::EventType;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum allowed priority. Lower priorities run earlier.
pub const MAX_PRIORITY: u16 = 1000;

/// Default priority for hooks that do not declare one.
pub const DEFAULT_PRIORITY: u16 = 100;

/// Default per-hook timeout.
pub const DEFAULT_HOOK_TIMEOUT: Duration = Duration::from_millis(200);

/// Policy governing what happens when a hook's own execution fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailMode {
    /// Log the failure and continue the chain as though the hook were
    /// absent (its attempted mutations are discarded).
    #[default]
    Open,
    /// Abort the chain; the host operation terminates as if denied.
    Closed,
}

/// A registered hook's declared attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookDefinition {
    /// Unique identifier; registration with an existing id replaces it.
    pub id: String,

    /// Human-readable name for diagnostics.
    pub name: String,

    /// What this hook does.
    pub description: String,

    /// The single lifecycle point this hook fires on.
    pub event_type: EventType,

    /// Execution order: 0–1000, lower runs earlier. Ties break by
    /// registration order.
    pub priority: u16,

    /// Per-execution deadline. The runner actively cancels the hook
    /// when it fires.
    pub timeout: Duration,

    /// Disabled hooks stay registered but never fire.
    pub enabled: bool,

    /// Empty = system hook, visible to every tenant; non-empty =
    /// visible only when resolving for that tenant.
    pub tenant_id: String,

    /// Failure-isolation policy.
    pub fail_mode: FailMode,

    /// Free-form labels for diagnostics and filtering.
    pub tags: Vec<String>,
}

impl HookDefinition {
    /// Creates a definition with defaults: priority 100, 200 ms timeout,
    /// enabled, system scope, fail-open, no tags.
    #[must_use]
    pub fn new(id: impl Into<String>, event_type: EventType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            event_type,
            priority: DEFAULT_PRIORITY,
            timeout: DEFAULT_HOOK_TIMEOUT,
            enabled: true,
            tenant_id: String::new(),
            fail_mode: FailMode::default(),
            tags: Vec::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the per-execution timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scopes the hook to a tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = tenant_id.into();
        self
    }

    /// Sets the failure-isolation policy.
    #[must_use]
    pub fn with_fail_mode(mut self, fail_mode: FailMode) -> Self {
        self.fail_mode = fail_mode;
        self
    }

    /// Adds a diagnostic tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns `true` if this is a system hook (visible to all tenants).
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.tenant_id.is_empty()
    }

    /// Returns `true` if this hook applies when resolving for `tenant_id`.
    #[must_use]
    pub fn visible_to(&self, tenant_id: &str) -> bool {
        self.is_system() || self.tenant_id == tenant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_documented_defaults() {
        let def = HookDefinition::new("audit", EventType::ToolExecutePre);
        assert_eq!(def.id, "audit");
        assert_eq!(def.name, "audit");
        assert_eq!(def.priority, DEFAULT_PRIORITY);
        assert_eq!(def.timeout, Duration::from_millis(200));
        assert!(def.enabled);
        assert!(def.is_system());
        assert_eq!(def.fail_mode, FailMode::Open);
        assert!(def.tags.is_empty());
    }

    #[test]
    fn builder_chain() {
        let def = HookDefinition::new("sanitize", EventType::AgentInvokePre)
            .with_name("Input sanitizer")
            .with_description("strips dangerous inputs")
            .with_priority(10)
            .with_timeout(Duration::from_millis(50))
            .with_tenant("tenant-a")
            .with_fail_mode(FailMode::Closed)
            .with_tag("security")
            .with_enabled(false);
        assert_eq!(def.name, "Input sanitizer");
        assert_eq!(def.priority, 10);
        assert_eq!(def.timeout, Duration::from_millis(50));
        assert_eq!(def.tenant_id, "tenant-a");
        assert_eq!(def.fail_mode, FailMode::Closed);
        assert_eq!(def.tags, vec!["security"]);
        assert!(!def.enabled);
    }

    #[test]
    fn visibility() {
        let system = HookDefinition::new("sys", EventType::RequestPre);
        assert!(system.visible_to("tenant-a"));
        assert!(system.visible_to("tenant-b"));
        assert!(system.visible_to(""));

        let scoped = HookDefinition::new("scoped", EventType::RequestPre).with_tenant("tenant-a");
        assert!(scoped.visible_to("tenant-a"));
        assert!(!scoped.visible_to("tenant-b"));
        assert!(!scoped.visible_to(""));
    }

    #[test]
    fn fail_mode_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&FailMode::Open).unwrap(), "\"open\"");
        assert_eq!(serde_json::to_string(&FailMode::Closed).unwrap(), "\"closed\"");
    }

    #[test]
    fn serde_roundtrip() {
        let def = HookDefinition::new("audit", EventType::WorkflowStepPost)
            .with_priority(250)
            .with_tag("metrics");
        let json = serde_json::to_string(&def).unwrap();
        let restored: HookDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, def);
    }
}
