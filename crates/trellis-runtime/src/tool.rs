//! Tool-tier gate — wraps tool execution in pre/post hook chains.

use crate::gate::{GateError, HookGate};
use crate::log::ExecutionLog;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use trellis_hook::{EventPayload, EventType, HookContext, SharedHookRegistry};

/// Interception point for the tool-execution loop.
///
/// Pre hooks may mutate `arguments` or deny the call; post hooks
/// observe the result and — uniquely to this tier — may replace it
/// (output transformation).
#[derive(Clone)]
pub struct ToolGate {
    gate: HookGate,
}

impl ToolGate {
    /// Creates a tool gate over the shared registry and log.
    #[must_use]
    pub fn new(registry: SharedHookRegistry, log: Arc<ExecutionLog>) -> Self {
        Self {
            gate: HookGate::new(registry, log),
        }
    }

    /// Creates a tool gate from preconfigured plumbing.
    #[must_use]
    pub fn with_gate(gate: HookGate) -> Self {
        Self { gate }
    }

    /// Executes a tool call under hook interception.
    ///
    /// `invoke` receives the (possibly hook-modified) arguments and
    /// performs the actual tool call. A pre-chain abort returns
    /// [`GateError::Denied`] and `invoke` never runs; an `invoke`
    /// failure returns [`GateError::Host`] and the post chain is
    /// skipped.
    pub async fn execute<F, Fut, E>(
        &self,
        tenant_id: &str,
        tool: &str,
        arguments: Value,
        invoke: F,
    ) -> Result<Value, GateError<E>>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        let original_arguments = arguments.clone();
        let ctx = HookContext::new(
            EventType::ToolExecutePre,
            tenant_id,
            EventPayload::ToolPre {
                tool: tool.to_string(),
                arguments,
            },
        );
        let ctx = self
            .gate
            .run_pre(ctx)
            .await
            .map_err(|reason| GateError::Denied { reason })?;

        let arguments = match ctx.payload {
            EventPayload::ToolPre { arguments, .. } => arguments,
            _ => {
                tracing::warn!(tool, "hook replaced payload variant, keeping original arguments");
                original_arguments
            }
        };

        let timer = Instant::now();
        let result = invoke(arguments).await.map_err(GateError::Host)?;
        let elapsed = timer.elapsed();

        let original_result = result.clone();
        let post_ctx = HookContext::new(
            EventType::ToolExecutePost,
            tenant_id,
            EventPayload::ToolPost {
                tool: tool.to_string(),
                result,
                elapsed,
            },
        );
        let post = self.gate.run_post(post_ctx).await;

        // This tier permits result replacement by post hooks.
        Ok(match post.payload {
            EventPayload::ToolPost { result, .. } => result,
            _ => original_result,
        })
    }
}
