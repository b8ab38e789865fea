//! Hook registry — the catalog of registered hooks.
//!
//! Answers "which enabled hooks, in what order, apply to this event
//! type for this tenant?". Hooks are indexed by [`EventType`] and kept
//! sorted by `(priority, registration order)` at insert time.
//!
//! # Concurrency
//!
//! Wrap in [`SharedHookRegistry`] (`Arc<RwLock<HookRegistry>>`) for
//! concurrent access: [`resolve`](HookRegistry::resolve) takes `&self`
//! (read lock) and returns a point-in-time snapshot, so a concurrent
//! `register`/`deregister` can never mutate the list an in-flight chain
//! is iterating.

use crate::definition::MAX_PRIORITY;
use crate::{EventType, Hook, HookDefinition, HookError};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared handle to a registry, one per process (or per test).
pub type SharedHookRegistry = Arc<parking_lot::RwLock<HookRegistry>>;

/// A definition paired with its executable handler, as handed to the
/// chain runner. Produced by [`HookRegistry::resolve`]; the pairing is
/// fixed at registration time (no lookup by name at chain-run time).
pub struct ResolvedHook {
    /// The hook's declared attributes.
    pub definition: HookDefinition,
    /// The handler registered alongside the definition.
    pub handler: Arc<dyn Hook>,
}

struct RegisteredHook {
    definition: HookDefinition,
    handler: Arc<dyn Hook>,
}

/// Central catalog of hooks.
pub struct HookRegistry {
    hooks: HashMap<EventType, Vec<RegisteredHook>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Creates a shared, lockable registry handle.
    #[must_use]
    pub fn shared() -> SharedHookRegistry {
        Arc::new(parking_lot::RwLock::new(Self::new()))
    }

    /// Registers a hook, replacing any existing hook with the same id.
    ///
    /// The hook is inserted in priority order (stable: FIFO among equal
    /// priorities). A replacement takes a fresh registration order.
    ///
    /// # Errors
    ///
    /// `HookError::InvalidPriority` if `definition.priority` exceeds
    /// [`MAX_PRIORITY`]; the catalog is not mutated.
    pub fn register(
        &mut self,
        definition: HookDefinition,
        handler: Arc<dyn Hook>,
    ) -> Result<(), HookError> {
        if definition.priority > MAX_PRIORITY {
            return Err(HookError::InvalidPriority {
                id: definition.id.clone(),
                priority: definition.priority,
                max: MAX_PRIORITY,
            });
        }

        self.deregister(&definition.id);

        let bucket = self.hooks.entry(definition.event_type).or_default();
        let pos = bucket
            .iter()
            .position(|h| h.definition.priority > definition.priority)
            .unwrap_or(bucket.len());
        bucket.insert(pos, RegisteredHook { definition, handler });
        Ok(())
    }

    /// Removes a hook by id. Idempotent; returns `true` if it existed.
    pub fn deregister(&mut self, id: &str) -> bool {
        let mut found = false;
        for bucket in self.hooks.values_mut() {
            let before = bucket.len();
            bucket.retain(|h| h.definition.id != id);
            found |= bucket.len() < before;
        }
        found
    }

    /// Enables or disables a hook without removing it.
    ///
    /// Returns `true` if a hook with that id exists.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        for bucket in self.hooks.values_mut() {
            for h in bucket.iter_mut() {
                if h.definition.id == id {
                    h.definition.enabled = enabled;
                    return true;
                }
            }
        }
        false
    }

    /// Returns a copy of the definition registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<HookDefinition> {
        self.entry(id).map(|h| h.definition.clone())
    }

    /// Returns the definition plus handler registered under `id`
    /// (used by the management surface's dry-run).
    #[must_use]
    pub fn get_resolved(&self, id: &str) -> Option<ResolvedHook> {
        self.entry(id).map(|h| ResolvedHook {
            definition: h.definition.clone(),
            handler: Arc::clone(&h.handler),
        })
    }

    /// All registered definitions, sorted by id.
    #[must_use]
    pub fn list(&self) -> Vec<HookDefinition> {
        let mut defs: Vec<_> = self
            .hooks
            .values()
            .flatten()
            .map(|h| h.definition.clone())
            .collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }

    /// Resolves the effective hook set for `(event_type, tenant_id)`.
    ///
    /// Returns enabled hooks whose scope is system (empty tenant) or
    /// matches `tenant_id`, in `(priority, registration order)` order.
    /// Ordering is priority-only across scopes: a system hook and a
    /// tenant hook interleave by priority.
    ///
    /// The returned vector is a snapshot; concurrent registry mutation
    /// does not affect it.
    #[must_use]
    pub fn resolve(&self, event_type: EventType, tenant_id: &str) -> Vec<Arc<ResolvedHook>> {
        let Some(bucket) = self.hooks.get(&event_type) else {
            return Vec::new();
        };
        bucket
            .iter()
            .filter(|h| h.definition.enabled && h.definition.visible_to(tenant_id))
            .map(|h| {
                Arc::new(ResolvedHook {
                    definition: h.definition.clone(),
                    handler: Arc::clone(&h.handler),
                })
            })
            .collect()
    }

    /// Returns the number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.values().map(Vec::len).sum()
    }

    /// Returns `true` if no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, id: &str) -> Option<&RegisteredHook> {
        self.hooks
            .values()
            .flatten()
            .find(|h| h.definition.id == id)
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::testing::MockHook;
    use crate::FailMode;

    fn register(reg: &mut HookRegistry, def: HookDefinition) {
        let id = def.id.clone();
        reg.register(def, MockHook::pass_through(&id)).unwrap();
    }

    // ── Registration ─────────────────────────────────────────

    #[test]
    fn empty_registry() {
        let reg = HookRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
        assert!(reg.resolve(EventType::ToolExecutePre, "t").is_empty());
    }

    #[test]
    fn register_and_len() {
        let mut reg = HookRegistry::new();
        register(&mut reg, HookDefinition::new("a", EventType::ToolExecutePre));
        register(&mut reg, HookDefinition::new("b", EventType::RequestPost));
        assert_eq!(reg.len(), 2);
        assert!(!reg.is_empty());
    }

    #[test]
    fn register_rejects_priority_out_of_range() {
        let mut reg = HookRegistry::new();
        let def = HookDefinition::new("bad", EventType::ToolExecutePre).with_priority(1001);
        let err = reg.register(def, MockHook::pass_through("bad")).unwrap_err();
        assert!(matches!(err, HookError::InvalidPriority { priority: 1001, .. }));
        // Catalog untouched
        assert!(reg.is_empty());
    }

    #[test]
    fn register_accepts_boundary_priorities() {
        let mut reg = HookRegistry::new();
        register(
            &mut reg,
            HookDefinition::new("min", EventType::ToolExecutePre).with_priority(0),
        );
        register(
            &mut reg,
            HookDefinition::new("max", EventType::ToolExecutePre).with_priority(1000),
        );
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn register_replaces_by_id() {
        let mut reg = HookRegistry::new();
        register(
            &mut reg,
            HookDefinition::new("h", EventType::ToolExecutePre).with_priority(10),
        );
        register(
            &mut reg,
            HookDefinition::new("h", EventType::ToolExecutePre)
                .with_priority(500)
                .with_fail_mode(FailMode::Closed),
        );
        assert_eq!(reg.len(), 1);
        let def = reg.get("h").unwrap();
        assert_eq!(def.priority, 500);
        assert_eq!(def.fail_mode, FailMode::Closed);
    }

    #[test]
    fn register_replace_can_move_event_type() {
        let mut reg = HookRegistry::new();
        register(&mut reg, HookDefinition::new("h", EventType::ToolExecutePre));
        register(&mut reg, HookDefinition::new("h", EventType::RequestPre));
        assert_eq!(reg.len(), 1);
        assert!(reg.resolve(EventType::ToolExecutePre, "").is_empty());
        assert_eq!(reg.resolve(EventType::RequestPre, "").len(), 1);
    }

    // ── Round-trip ───────────────────────────────────────────

    #[test]
    fn get_returns_field_for_field_identical_definition() {
        let mut reg = HookRegistry::new();
        let def = HookDefinition::new("audit", EventType::WorkflowStepPre)
            .with_name("Audit")
            .with_description("records step inputs")
            .with_priority(42)
            .with_timeout(std::time::Duration::from_millis(75))
            .with_tenant("tenant-a")
            .with_fail_mode(FailMode::Closed)
            .with_tag("audit")
            .with_tag("compliance");
        register(&mut reg, def.clone());
        assert_eq!(reg.get("audit"), Some(def));
    }

    #[test]
    fn get_missing_is_none() {
        let reg = HookRegistry::new();
        assert!(reg.get("ghost").is_none());
        assert!(reg.get_resolved("ghost").is_none());
    }

    // ── Deregister / toggle ──────────────────────────────────

    #[test]
    fn deregister_is_idempotent() {
        let mut reg = HookRegistry::new();
        register(&mut reg, HookDefinition::new("h", EventType::ToolExecutePre));
        assert!(reg.deregister("h"));
        assert!(!reg.deregister("h"));
        assert!(reg.is_empty());
    }

    #[test]
    fn set_enabled_toggles_resolution() {
        let mut reg = HookRegistry::new();
        register(&mut reg, HookDefinition::new("h", EventType::ToolExecutePre));
        assert!(reg.set_enabled("h", false));
        assert!(reg.resolve(EventType::ToolExecutePre, "").is_empty());
        assert!(reg.set_enabled("h", true));
        assert_eq!(reg.resolve(EventType::ToolExecutePre, "").len(), 1);
    }

    #[test]
    fn set_enabled_missing_returns_false() {
        let mut reg = HookRegistry::new();
        assert!(!reg.set_enabled("ghost", true));
    }

    // ── Resolution ordering ──────────────────────────────────

    #[test]
    fn resolve_orders_by_priority() {
        let mut reg = HookRegistry::new();
        register(
            &mut reg,
            HookDefinition::new("late", EventType::ToolExecutePre).with_priority(300),
        );
        register(
            &mut reg,
            HookDefinition::new("early", EventType::ToolExecutePre).with_priority(10),
        );
        register(
            &mut reg,
            HookDefinition::new("mid", EventType::ToolExecutePre).with_priority(100),
        );
        let ids: Vec<_> = reg
            .resolve(EventType::ToolExecutePre, "")
            .iter()
            .map(|h| h.definition.id.clone())
            .collect();
        assert_eq!(ids, vec!["early", "mid", "late"]);
    }

    #[test]
    fn resolve_breaks_priority_ties_by_registration_order() {
        let mut reg = HookRegistry::new();
        register(
            &mut reg,
            HookDefinition::new("first", EventType::ToolExecutePre).with_priority(10),
        );
        register(
            &mut reg,
            HookDefinition::new("second", EventType::ToolExecutePre).with_priority(10),
        );
        register(
            &mut reg,
            HookDefinition::new("third", EventType::ToolExecutePre).with_priority(50),
        );
        let ids: Vec<_> = reg
            .resolve(EventType::ToolExecutePre, "")
            .iter()
            .map(|h| h.definition.id.clone())
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut reg = HookRegistry::new();
        register(
            &mut reg,
            HookDefinition::new("a", EventType::RequestPre).with_priority(5),
        );
        register(
            &mut reg,
            HookDefinition::new("b", EventType::RequestPre).with_priority(15),
        );
        let first: Vec<_> = reg
            .resolve(EventType::RequestPre, "t")
            .iter()
            .map(|h| h.definition.clone())
            .collect();
        let second: Vec<_> = reg
            .resolve(EventType::RequestPre, "t")
            .iter()
            .map(|h| h.definition.clone())
            .collect();
        assert_eq!(first, second);
    }

    // ── Tenant scoping ───────────────────────────────────────

    #[test]
    fn tenant_hook_is_invisible_to_other_tenants() {
        let mut reg = HookRegistry::new();
        register(
            &mut reg,
            HookDefinition::new("scoped", EventType::ToolExecutePre).with_tenant("tenant-a"),
        );
        assert_eq!(reg.resolve(EventType::ToolExecutePre, "tenant-a").len(), 1);
        assert!(reg.resolve(EventType::ToolExecutePre, "tenant-b").is_empty());
        assert!(reg.resolve(EventType::ToolExecutePre, "").is_empty());
    }

    #[test]
    fn system_hook_is_visible_to_every_tenant() {
        let mut reg = HookRegistry::new();
        register(&mut reg, HookDefinition::new("sys", EventType::ToolExecutePre));
        assert_eq!(reg.resolve(EventType::ToolExecutePre, "tenant-a").len(), 1);
        assert_eq!(reg.resolve(EventType::ToolExecutePre, "tenant-b").len(), 1);
        assert_eq!(reg.resolve(EventType::ToolExecutePre, "").len(), 1);
    }

    #[test]
    fn system_and_tenant_hooks_interleave_by_priority_only() {
        let mut reg = HookRegistry::new();
        register(
            &mut reg,
            HookDefinition::new("security", EventType::ToolExecutePre).with_priority(10),
        );
        register(
            &mut reg,
            HookDefinition::new("enrich", EventType::ToolExecutePre)
                .with_priority(150)
                .with_tenant("tenant-a"),
        );
        register(
            &mut reg,
            HookDefinition::new("metrics", EventType::ToolExecutePre).with_priority(500),
        );
        let ids: Vec<_> = reg
            .resolve(EventType::ToolExecutePre, "tenant-a")
            .iter()
            .map(|h| h.definition.id.clone())
            .collect();
        assert_eq!(ids, vec!["security", "enrich", "metrics"]);
    }

    #[test]
    fn resolve_filters_by_event_type() {
        let mut reg = HookRegistry::new();
        register(&mut reg, HookDefinition::new("pre", EventType::ToolExecutePre));
        register(&mut reg, HookDefinition::new("post", EventType::ToolExecutePost));
        let pre = reg.resolve(EventType::ToolExecutePre, "");
        assert_eq!(pre.len(), 1);
        assert_eq!(pre[0].definition.id, "pre");
    }

    // ── Snapshot isolation ───────────────────────────────────

    #[test]
    fn snapshot_is_immune_to_later_mutation() {
        let mut reg = HookRegistry::new();
        register(&mut reg, HookDefinition::new("a", EventType::ToolExecutePre));
        let snapshot = reg.resolve(EventType::ToolExecutePre, "");
        register(&mut reg, HookDefinition::new("b", EventType::ToolExecutePre));
        reg.deregister("a");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].definition.id, "a");
    }

    #[test]
    fn list_is_sorted_by_id() {
        let mut reg = HookRegistry::new();
        register(&mut reg, HookDefinition::new("zeta", EventType::RequestPre));
        register(&mut reg, HookDefinition::new("alpha", EventType::ToolExecutePost));
        let ids: Vec<_> = reg.list().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }
}
