//! Workflow-tier gate — wraps workflow-step execution in pre/post hook
//! chains.

use crate::gate::{GateError, HookGate};
use crate::log::ExecutionLog;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use trellis_hook::{EventPayload, EventType, HookContext, SharedHookRegistry};

/// Interception point for the workflow-step executor.
///
/// Pre hooks may mutate the step `inputs` or deny the step; `state` is
/// a read-only snapshot of workflow state. Post hooks observe the step
/// result.
#[derive(Clone)]
pub struct WorkflowGate {
    gate: HookGate,
}

impl WorkflowGate {
    /// Creates a workflow gate over the shared registry and log.
    #[must_use]
    pub fn new(registry: SharedHookRegistry, log: Arc<ExecutionLog>) -> Self {
        Self {
            gate: HookGate::new(registry, log),
        }
    }

    /// Creates a workflow gate from preconfigured plumbing.
    #[must_use]
    pub fn with_gate(gate: HookGate) -> Self {
        Self { gate }
    }

    /// Runs one workflow step under hook interception.
    ///
    /// `run` receives the (possibly hook-modified) inputs and executes
    /// the step's action.
    pub async fn run_step<F, Fut, E>(
        &self,
        tenant_id: &str,
        step_id: &str,
        action: &str,
        inputs: Value,
        state: Value,
        run: F,
    ) -> Result<Value, GateError<E>>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        let original_inputs = inputs.clone();
        let ctx = HookContext::new(
            EventType::WorkflowStepPre,
            tenant_id,
            EventPayload::WorkflowPre {
                step_id: step_id.to_string(),
                action: action.to_string(),
                inputs,
                state,
            },
        );
        let ctx = self
            .gate
            .run_pre(ctx)
            .await
            .map_err(|reason| GateError::Denied { reason })?;

        let inputs = match ctx.payload {
            EventPayload::WorkflowPre { inputs, .. } => inputs,
            _ => {
                tracing::warn!(step_id, "hook replaced payload variant, keeping original inputs");
                original_inputs
            }
        };

        let timer = Instant::now();
        let result = run(inputs).await.map_err(GateError::Host)?;
        let elapsed = timer.elapsed();

        let post_ctx = HookContext::new(
            EventType::WorkflowStepPost,
            tenant_id,
            EventPayload::WorkflowPost {
                step_id: step_id.to_string(),
                result: result.clone(),
                elapsed,
            },
        );
        // Observe-only: the step result is not replaceable.
        self.gate.run_post(post_ctx).await;
        Ok(result)
    }
}
