//! Hook trait and continuation handle.

use crate::{HookContext, HookError};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;

/// A link in the composed chain: takes the context, runs everything
/// downstream, returns the final context.
pub(crate) type Continuation =
    Arc<dyn Fn(HookContext) -> BoxFuture<'static, HookContext> + Send + Sync>;

/// Handle to the downstream portion of the chain.
///
/// A hook receives a `Next` and decides whether to delegate:
///
/// - `next.run(ctx).await` — continue the chain, optionally running
///   code before (pre-modification) and after (post-inspection) the
///   downstream call;
/// - return without calling it — deliberate short-circuit, with or
///   without setting [`HookContext::set_abort`].
#[derive(Clone)]
pub struct Next {
    inner: Continuation,
}

impl Next {
    pub(crate) fn new(inner: Continuation) -> Self {
        Self { inner }
    }

    /// The terminal continuation: returns the context unchanged.
    ///
    /// Used as the innermost link of every chain, and by dry-run and
    /// tests that execute a single hook in isolation.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            inner: Arc::new(|ctx| Box::pin(async move { ctx })),
        }
    }

    /// Runs the downstream chain with the given context.
    pub async fn run(self, ctx: HookContext) -> HookContext {
        (self.inner)(ctx).await
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Next")
    }
}

/// A single hook handler.
///
/// Handlers are registered alongside a
/// [`HookDefinition`](crate::HookDefinition) and invoked by the
/// [`ChainRunner`](crate::ChainRunner) in `(priority, registration
/// order)` sequence. Resolution from definition to handler happens once,
/// at registration — never by name at chain-run time.
///
/// # Failure handling
///
/// Returning an error (or exceeding the definition's timeout) never
/// propagates to the caller; the runner converts it into a failure
/// [`HookOutcome`](crate::HookOutcome) and applies the definition's
/// [`FailMode`](crate::FailMode).
///
/// # Thread safety
///
/// Hooks must be `Send + Sync`; chains for different events run
/// concurrently. The framework never calls the same hook concurrently
/// from within one chain run.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Processes the context, either delegating via `next` or
    /// short-circuiting.
    async fn execute(&self, ctx: HookContext, next: Next) -> Result<HookContext, HookError>;
}

/// Test utilities for the hook layer.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Behavior = Box<
        dyn Fn(HookContext, Next) -> BoxFuture<'static, Result<HookContext, HookError>>
            + Send
            + Sync,
    >;

    /// A closure-backed hook for tests.
    ///
    /// Tracks invocation count via `call_count`.
    pub struct MockHook {
        /// Hook ID reported in error messages.
        pub id: String,
        behavior: Behavior,
        /// Number of times `execute()` has been called.
        pub call_count: Arc<AtomicUsize>,
    }

    impl MockHook {
        fn with_behavior(id: &str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                behavior,
                call_count: Arc::new(AtomicUsize::new(0)),
            })
        }

        /// Delegates downstream without touching the context.
        pub fn pass_through(id: &str) -> Arc<Self> {
            Self::with_behavior(id, Box::new(|ctx, next| Box::pin(async move { Ok(next.run(ctx).await) })))
        }

        /// Applies `f` to the context, then delegates downstream.
        pub fn modifier(
            id: &str,
            f: impl Fn(&mut HookContext) + Send + Sync + 'static,
        ) -> Arc<Self> {
            Self::with_behavior(
                id,
                Box::new(move |mut ctx, next| {
                    f(&mut ctx);
                    Box::pin(async move { Ok(next.run(ctx).await) })
                }),
            )
        }

        /// Sets abort with the given reason and returns without
        /// delegating.
        pub fn aborter(id: &str, reason: &str) -> Arc<Self> {
            let reason = reason.to_string();
            Self::with_behavior(
                id,
                Box::new(move |mut ctx, _next| {
                    ctx.set_abort(reason.clone());
                    Box::pin(async move { Ok(ctx) })
                }),
            )
        }

        /// Aborts only when `predicate(&ctx)` holds; otherwise delegates.
        pub fn guard(
            id: &str,
            reason: &str,
            predicate: impl Fn(&HookContext) -> bool + Send + Sync + 'static,
        ) -> Arc<Self> {
            let reason = reason.to_string();
            Self::with_behavior(
                id,
                Box::new(move |mut ctx, next| {
                    if predicate(&ctx) {
                        ctx.set_abort(reason.clone());
                        Box::pin(async move { Ok(ctx) })
                    } else {
                        Box::pin(async move { Ok(next.run(ctx).await) })
                    }
                }),
            )
        }

        /// Always returns an execution error.
        pub fn failer(id: &str, message: &str) -> Arc<Self> {
            let id_owned = id.to_string();
            let message = message.to_string();
            Self::with_behavior(
                id,
                Box::new(move |_ctx, _next| {
                    let err = HookError::ExecutionFailed {
                        hook_id: id_owned.clone(),
                        message: message.clone(),
                    };
                    Box::pin(async move { Err(err) })
                }),
            )
        }

        /// Sleeps for `dur`, then delegates downstream.
        pub fn sleeper(id: &str, dur: Duration) -> Arc<Self> {
            Self::with_behavior(
                id,
                Box::new(move |ctx, next| {
                    Box::pin(async move {
                        tokio::time::sleep(dur).await;
                        Ok(next.run(ctx).await)
                    })
                }),
            )
        }

        /// Returns the number of times this hook has been executed.
        pub fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Hook for MockHook {
        async fn execute(&self, ctx: HookContext, next: Next) -> Result<HookContext, HookError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            (self.behavior)(ctx, next).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockHook;
    use super::*;
    use crate::{EventPayload, EventType};
    use serde_json::json;

    fn test_ctx() -> HookContext {
        HookContext::new(
            EventType::ToolExecutePre,
            "tenant-a",
            EventPayload::ToolPre {
                tool: "search".into(),
                arguments: json!({"q": "x"}),
            },
        )
    }

    #[tokio::test]
    async fn noop_next_returns_context_unchanged() {
        let ctx = test_ctx();
        let out = Next::noop().run(ctx.clone()).await;
        assert_eq!(out, ctx);
    }

    #[tokio::test]
    async fn mock_pass_through_delegates() {
        let hook = MockHook::pass_through("p");
        let out = hook.execute(test_ctx(), Next::noop()).await.unwrap();
        assert!(!out.abort);
        assert_eq!(hook.calls(), 1);
    }

    #[tokio::test]
    async fn mock_modifier_applies_change() {
        let hook = MockHook::modifier("m", |ctx| {
            ctx.metadata.insert("seen".into(), json!(true));
        });
        let out = hook.execute(test_ctx(), Next::noop()).await.unwrap();
        assert_eq!(out.metadata.get("seen"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn mock_aborter_sets_abort_without_delegating() {
        let hook = MockHook::aborter("a", "blocked");
        let out = hook.execute(test_ctx(), Next::noop()).await.unwrap();
        assert!(out.abort);
        assert_eq!(out.abort_reason, "blocked");
    }

    #[tokio::test]
    async fn mock_failer_returns_error() {
        let hook = MockHook::failer("f", "boom");
        let err = hook.execute(test_ctx(), Next::noop()).await.unwrap_err();
        assert!(matches!(err, HookError::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn mock_guard_aborts_only_on_predicate() {
        let hook = MockHook::guard("g", "danger", |ctx| {
            ctx.metadata.get("danger") == Some(&json!(true))
        });
        let safe = hook.execute(test_ctx(), Next::noop()).await.unwrap();
        assert!(!safe.abort);

        let ctx = test_ctx().with_metadata("danger", json!(true));
        let blocked = hook.execute(ctx, Next::noop()).await.unwrap();
        assert!(blocked.abort);
        assert_eq!(hook.calls(), 2);
    }

    #[tokio::test]
    async fn mock_call_count_increments() {
        let hook = MockHook::pass_through("p");
        for _ in 0..3 {
            hook.execute(test_ctx(), Next::noop()).await.unwrap();
        }
        assert_eq!(hook.calls(), 3);
    }
}
