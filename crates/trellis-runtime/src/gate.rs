//! Shared gate plumbing used by all four tier adapters.

use crate::log::{ChainRecord, ExecutionLog};
use std::sync::Arc;
use thiserror::Error;
use trellis_hook::{ChainRunner, HookContext, SharedHookRegistry};

/// Error returned by a tier gate.
#[derive(Debug, Error)]
pub enum GateError<E> {
    /// The pre chain aborted; the host operation never ran.
    #[error("operation denied: {reason}")]
    Denied {
        /// The abort reason surfaced to the caller.
        reason: String,
    },

    /// The host operation itself failed. Post hooks did not run.
    #[error("host operation failed: {0}")]
    Host(E),
}

impl<E> GateError<E> {
    /// Returns `true` if the pre chain denied the operation.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }
}

/// Resolve-run-record plumbing shared by the tier adapters.
///
/// Holds the shared registry, a chain runner, and the execution log;
/// each adapter builds its tier-specific context and delegates here.
#[derive(Clone)]
pub struct HookGate {
    registry: SharedHookRegistry,
    runner: ChainRunner,
    log: Arc<ExecutionLog>,
}

impl HookGate {
    /// Creates a gate with a default [`ChainRunner`].
    #[must_use]
    pub fn new(registry: SharedHookRegistry, log: Arc<ExecutionLog>) -> Self {
        Self {
            registry,
            runner: ChainRunner::new(),
            log,
        }
    }

    /// Replaces the chain runner (e.g. to change the aggregate budget).
    #[must_use]
    pub fn with_runner(mut self, runner: ChainRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Runs the pre chain for `ctx`.
    ///
    /// Returns the final context for field copy-back, or the abort
    /// reason when a hook denied the operation. The chain run is
    /// recorded in the execution log either way.
    pub(crate) async fn run_pre(&self, ctx: HookContext) -> Result<HookContext, String> {
        let hooks = self.registry.read().resolve(ctx.event_type, &ctx.tenant_id);
        let out = self.runner.run(&hooks, ctx).await;
        self.log.record(ChainRecord::from_context(&out));
        if out.abort {
            Err(out.abort_reason)
        } else {
            Ok(out)
        }
    }

    /// Runs the post chain for `ctx`.
    ///
    /// Post chains are observability only: an abort here is logged and
    /// ignored — it cannot un-succeed the completed host operation.
    pub(crate) async fn run_post(&self, ctx: HookContext) -> HookContext {
        let hooks = self.registry.read().resolve(ctx.event_type, &ctx.tenant_id);
        let out = self.runner.run(&hooks, ctx).await;
        self.log.record(ChainRecord::from_context(&out));
        if out.abort {
            tracing::debug!(
                event_type = %out.event_type,
                tenant_id = %out.tenant_id,
                reason = %out.abort_reason,
                "post-chain abort ignored"
            );
        }
        out
    }
}
