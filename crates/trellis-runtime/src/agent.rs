//! Agent-tier gate — wraps agent invocation in pre/post hook chains.

use crate::gate::{GateError, HookGate};
use crate::log::ExecutionLog;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use trellis_hook::{EventPayload, EventType, HookContext, SharedHookRegistry};

/// Interception point for agent invocation.
///
/// Pre hooks may mutate `inputs` and `system_prompt` (the prompt has
/// not been sent yet) or deny the invocation; post hooks observe the
/// completed result.
#[derive(Clone)]
pub struct AgentGate {
    gate: HookGate,
}

impl AgentGate {
    /// Creates an agent gate over the shared registry and log.
    #[must_use]
    pub fn new(registry: SharedHookRegistry, log: Arc<ExecutionLog>) -> Self {
        Self {
            gate: HookGate::new(registry, log),
        }
    }

    /// Creates an agent gate from preconfigured plumbing.
    #[must_use]
    pub fn with_gate(gate: HookGate) -> Self {
        Self { gate }
    }

    /// Invokes an agent under hook interception.
    ///
    /// `run` receives the (possibly hook-modified) inputs and system
    /// prompt and performs the actual invocation.
    pub async fn invoke<F, Fut, E>(
        &self,
        tenant_id: &str,
        agent: &str,
        inputs: Value,
        system_prompt: String,
        run: F,
    ) -> Result<Value, GateError<E>>
    where
        F: FnOnce(Value, String) -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        let original = (inputs.clone(), system_prompt.clone());
        let ctx = HookContext::new(
            EventType::AgentInvokePre,
            tenant_id,
            EventPayload::AgentPre {
                agent: agent.to_string(),
                inputs,
                system_prompt,
            },
        );
        let ctx = self
            .gate
            .run_pre(ctx)
            .await
            .map_err(|reason| GateError::Denied { reason })?;

        let (inputs, system_prompt) = match ctx.payload {
            EventPayload::AgentPre {
                inputs,
                system_prompt,
                ..
            } => (inputs, system_prompt),
            _ => {
                tracing::warn!(agent, "hook replaced payload variant, keeping original inputs");
                original
            }
        };

        let timer = Instant::now();
        let result = run(inputs, system_prompt).await.map_err(GateError::Host)?;
        let elapsed = timer.elapsed();

        let post_ctx = HookContext::new(
            EventType::AgentInvokePost,
            tenant_id,
            EventPayload::AgentPost {
                agent: agent.to_string(),
                result: result.clone(),
                elapsed,
            },
        );
        // Observe-only: the agent result is not replaceable.
        self.gate.run_post(post_ctx).await;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::convert::Infallible;
    use trellis_hook::testing::MockHook;
    use trellis_hook::{FailMode, HookDefinition, HookRegistry};

    fn gate_with(register: impl FnOnce(&mut HookRegistry)) -> (AgentGate, Arc<ExecutionLog>) {
        let registry = HookRegistry::shared();
        register(&mut registry.write());
        let log = Arc::new(ExecutionLog::new());
        (AgentGate::new(registry, log.clone()), log)
    }

    #[tokio::test]
    async fn hooks_can_rewrite_prompt_and_inputs() {
        let (gate, _log) = gate_with(|reg| {
            reg.register(
                HookDefinition::new("enrich", EventType::AgentInvokePre),
                MockHook::modifier("enrich", |ctx| {
                    if let EventPayload::AgentPre {
                        inputs,
                        system_prompt,
                        ..
                    } = &mut ctx.payload
                    {
                        inputs["locale"] = json!("en");
                        system_prompt.push_str(" Be brief.");
                    }
                }),
            )
            .unwrap();
        });
        let result = gate
            .invoke(
                "t",
                "planner",
                json!({}),
                "You plan.".into(),
                |inputs, prompt| async move {
                    Ok::<_, Infallible>(json!({"inputs": inputs, "prompt": prompt}))
                },
            )
            .await
            .unwrap();
        assert_eq!(result["inputs"], json!({"locale": "en"}));
        assert_eq!(result["prompt"], json!("You plan. Be brief."));
    }

    #[tokio::test]
    async fn dangerous_inputs_are_denied_before_invocation() {
        let (gate, _log) = gate_with(|reg| {
            reg.register(
                HookDefinition::new("guard", EventType::AgentInvokePre)
                    .with_priority(10)
                    .with_fail_mode(FailMode::Closed),
                MockHook::guard("guard", "dangerous input", |ctx| {
                    matches!(
                        &ctx.payload,
                        EventPayload::AgentPre { inputs, .. }
                            if inputs.get("danger") == Some(&json!(true))
                    )
                }),
            )
            .unwrap();
        });
        let mut invoked = false;
        let err = gate
            .invoke(
                "t",
                "planner",
                json!({"danger": true}),
                String::new(),
                |_, _| {
                    invoked = true;
                    async move { Ok::<_, Infallible>(json!(null)) }
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::Denied { ref reason } if reason == "dangerous input"));
        assert!(!invoked);
    }

    #[tokio::test]
    async fn post_chain_observes_result_and_duration() {
        let (gate, log) = gate_with(|reg| {
            reg.register(
                HookDefinition::new("observe", EventType::AgentInvokePost),
                MockHook::pass_through("observe"),
            )
            .unwrap();
        });
        let result = gate
            .invoke("t", "planner", json!({}), String::new(), |_, _| async move {
                Ok::<_, Infallible>(json!("answer"))
            })
            .await
            .unwrap();
        assert_eq!(result, json!("answer"));
        let records = log.recent(
            &crate::log::LogFilter::any().with_event_type(EventType::AgentInvokePost),
        );
        assert_eq!(records.len(), 1);
        assert!(records[0].outcomes[0].success);
    }
}
