//! Request-tier gate — wraps inbound request handling in pre/post hook
//! chains.

use crate::gate::{GateError, HookGate};
use crate::log::ExecutionLog;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use trellis_hook::{EventPayload, EventType, HookContext, SharedHookRegistry};

/// The host's response shape as seen by this gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Value,
}

/// Interception point for the inbound request pipeline.
///
/// Pre hooks may mutate request `headers` and `body` or deny the
/// request; post hooks observe the response status and headers.
#[derive(Clone)]
pub struct RequestGate {
    gate: HookGate,
}

impl RequestGate {
    /// Creates a request gate over the shared registry and log.
    #[must_use]
    pub fn new(registry: SharedHookRegistry, log: Arc<ExecutionLog>) -> Self {
        Self {
            gate: HookGate::new(registry, log),
        }
    }

    /// Creates a request gate from preconfigured plumbing.
    #[must_use]
    pub fn with_gate(gate: HookGate) -> Self {
        Self { gate }
    }

    /// Handles a request under hook interception.
    ///
    /// `handle` receives the (possibly hook-modified) headers and body
    /// and produces the host's response. A pre-chain abort returns
    /// [`GateError::Denied`]; the host maps it onto its own denied
    /// representation (e.g. a 403) carrying the reason.
    pub async fn handle<F, Fut, E>(
        &self,
        tenant_id: &str,
        method: &str,
        path: &str,
        headers: HashMap<String, String>,
        body: Value,
        handle: F,
    ) -> Result<Response, GateError<E>>
    where
        F: FnOnce(HashMap<String, String>, Value) -> Fut,
        Fut: Future<Output = Result<Response, E>>,
    {
        let original = (headers.clone(), body.clone());
        let ctx = HookContext::new(
            EventType::RequestPre,
            tenant_id,
            EventPayload::RequestPre {
                method: method.to_string(),
                path: path.to_string(),
                headers,
                body,
            },
        );
        let ctx = self
            .gate
            .run_pre(ctx)
            .await
            .map_err(|reason| GateError::Denied { reason })?;

        let (headers, body) = match ctx.payload {
            EventPayload::RequestPre { headers, body, .. } => (headers, body),
            _ => {
                tracing::warn!(path, "hook replaced payload variant, keeping original request");
                original
            }
        };

        let response = handle(headers, body).await.map_err(GateError::Host)?;

        let post_ctx = HookContext::new(
            EventType::RequestPost,
            tenant_id,
            EventPayload::RequestPost {
                status: response.status,
                headers: response.headers.clone(),
            },
        );
        // Observe-only: the response is not replaceable.
        self.gate.run_post(post_ctx).await;
        Ok(response)
    }
}
