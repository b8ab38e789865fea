//! Management surface — operator-facing hook administration.
//!
//! CRUD over hook definitions, enable/disable toggling, bulk
//! declarative loading, recent chain-execution records, and dry-run of
//! a single hook against an operator-supplied sample context (no live
//! host subsystem is touched).

use crate::log::{ChainRecord, ExecutionLog, LogFilter};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use trellis_hook::{
    ChainRunner, Hook, HookContext, HookDefinition, HookError, HookOutcome, HooksConfig,
    SharedHookRegistry,
};

/// Result of a dry-run: the hook's outcome plus the context it produced.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunReport {
    /// How the hook executed.
    pub outcome: HookOutcome,
    /// The (possibly mutated) context after the run; the input context
    /// unchanged when the hook failed.
    pub context: HookContext,
}

/// Operator-facing administration over a shared registry.
#[derive(Clone)]
pub struct HookManager {
    registry: SharedHookRegistry,
    log: Arc<ExecutionLog>,
    runner: ChainRunner,
}

impl HookManager {
    /// Creates a manager over the shared registry and log.
    #[must_use]
    pub fn new(registry: SharedHookRegistry, log: Arc<ExecutionLog>) -> Self {
        Self {
            registry,
            log,
            runner: ChainRunner::new(),
        }
    }

    /// Registers a new hook (or replaces an existing one with the same
    /// id).
    ///
    /// # Errors
    ///
    /// Propagates registration validation failures.
    pub fn create(
        &self,
        definition: HookDefinition,
        handler: Arc<dyn Hook>,
    ) -> Result<(), HookError> {
        self.registry.write().register(definition, handler)
    }

    /// Replaces an existing hook's definition and handler.
    ///
    /// # Errors
    ///
    /// `HookError::NotFound` if no hook with that id exists, plus any
    /// registration validation failure.
    pub fn update(
        &self,
        definition: HookDefinition,
        handler: Arc<dyn Hook>,
    ) -> Result<(), HookError> {
        let mut registry = self.registry.write();
        if registry.get(&definition.id).is_none() {
            return Err(HookError::NotFound(definition.id));
        }
        registry.register(definition, handler)
    }

    /// Removes a hook. Idempotent; returns `true` if it existed.
    pub fn delete(&self, id: &str) -> bool {
        self.registry.write().deregister(id)
    }

    /// Returns the definition registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<HookDefinition> {
        self.registry.read().get(id)
    }

    /// All registered definitions, sorted by id.
    #[must_use]
    pub fn list(&self) -> Vec<HookDefinition> {
        self.registry.read().list()
    }

    /// Enables or disables a hook. Returns `true` if it exists.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> bool {
        self.registry.write().set_enabled(id, enabled)
    }

    /// Bulk-registers declarative hooks, pairing each declaration with
    /// a handler from `handlers` by name. Handler resolution happens
    /// here, once — never at chain-run time.
    ///
    /// Declarations are processed independently; all errors are
    /// collected.
    ///
    /// # Errors
    ///
    /// A vector of per-declaration failures (invalid declaration,
    /// unknown handler name, registration rejection). Valid
    /// declarations are still registered.
    pub fn load(
        &self,
        config: &HooksConfig,
        handlers: &HashMap<String, Arc<dyn Hook>>,
    ) -> Result<usize, Vec<HookError>> {
        let mut errors = Vec::new();
        let mut loaded = 0;
        for decl in &config.hooks {
            let definition = match decl.validate() {
                Ok(definition) => definition,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            };
            let Some(handler) = handlers.get(&decl.handler) else {
                errors.push(HookError::UnknownHandler {
                    hook_id: decl.id.clone(),
                    handler: decl.handler.clone(),
                });
                continue;
            };
            match self.registry.write().register(definition, Arc::clone(handler)) {
                Ok(()) => loaded += 1,
                Err(err) => errors.push(err),
            }
        }
        if errors.is_empty() {
            Ok(loaded)
        } else {
            Err(errors)
        }
    }

    /// Recent chain-execution records matching `filter`, newest first.
    #[must_use]
    pub fn recent_executions(&self, filter: &LogFilter) -> Vec<ChainRecord> {
        self.log.recent(filter)
    }

    /// Executes the single named hook against `sample_ctx` with the
    /// terminal continuation, under the hook's declared timeout.
    ///
    /// # Errors
    ///
    /// `HookError::NotFound` if no hook with that id exists.
    pub async fn dry_run(
        &self,
        id: &str,
        sample_ctx: HookContext,
    ) -> Result<DryRunReport, HookError> {
        let resolved = self
            .registry
            .read()
            .get_resolved(id)
            .ok_or_else(|| HookError::NotFound(id.to_string()))?;
        let (outcome, context) = self.runner.dry_run(&resolved, sample_ctx).await;
        Ok(DryRunReport { outcome, context })
    }
}
