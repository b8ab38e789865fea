//! Chain runner — composes and executes hook chains.
//!
//! The sequential runner builds a continuation-passing chain from a
//! priority-sorted hook snapshot: an explicit reverse fold wraps each
//! hook around the previously built continuation, terminating at a
//! no-op, so the first hook in the list executes first and the last
//! delegates to the terminal. Every link captures its own hook and its
//! own downstream continuation by value.
//!
//! Hook-caused failures (errors, timeouts, budget exhaustion) never
//! escape [`ChainRunner::run`]; they become [`HookOutcome`] records and
//! are handled per the failing hook's [`FailMode`].

use crate::hook::Continuation;
use crate::{FailMode, HookContext, HookError, HookOutcome, Next, ResolvedHook};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default aggregate budget for one chain run.
pub const DEFAULT_CHAIN_BUDGET: Duration = Duration::from_millis(500);

/// Executes hook chains against a context.
///
/// The runner itself holds no mutable state; one instance can serve any
/// number of concurrent chain runs. Chains execute on the calling task —
/// a slow hook blocks only its own chain instance.
#[derive(Debug, Clone)]
pub struct ChainRunner {
    budget: Duration,
}

impl ChainRunner {
    /// Creates a runner with the default 500 ms aggregate budget.
    #[must_use]
    pub fn new() -> Self {
        Self {
            budget: DEFAULT_CHAIN_BUDGET,
        }
    }

    /// Creates a runner with a custom aggregate budget.
    #[must_use]
    pub fn with_budget(budget: Duration) -> Self {
        Self { budget }
    }

    /// Runs `hooks` sequentially against `ctx`.
    ///
    /// `hooks` must already be in `(priority, registration order)` order
    /// (the registry's responsibility) and `ctx.abort` must be false on
    /// entry.
    ///
    /// Per hook: the effective deadline is the smaller of the hook's
    /// declared timeout and the chain's remaining budget, so an
    /// aggregate-budget breach surfaces as a timeout at whichever hook
    /// was executing, handled by that hook's own fail mode. A timed-out
    /// hook future is dropped (actively cancelled), never left running.
    ///
    /// On failure, fail-open continues downstream with the context the
    /// failed hook received (its attempted mutations are discarded);
    /// fail-closed sets abort naming the failed hook and returns.
    pub async fn run(&self, hooks: &[Arc<ResolvedHook>], ctx: HookContext) -> HookContext {
        debug_assert!(!ctx.abort, "chain must not start on an aborted context");
        tracing::debug!(
            event_type = %ctx.event_type,
            tenant_id = %ctx.tenant_id,
            hooks = hooks.len(),
            "running hook chain"
        );
        if hooks.is_empty() {
            return ctx;
        }

        let started = Instant::now();
        let budget = self.budget;

        let mut next: Continuation = Arc::new(|ctx| Box::pin(async move { ctx }));
        for hook in hooks.iter().rev() {
            let hook = Arc::clone(hook);
            let downstream = Arc::clone(&next);
            next = Arc::new(move |ctx: HookContext| {
                let hook = Arc::clone(&hook);
                let downstream = Arc::clone(&downstream);
                Box::pin(async move { invoke(hook, downstream, ctx, started, budget).await })
            });
        }

        (next)(ctx).await
    }

    /// Runs `hooks` concurrently against clones of `ctx`.
    ///
    /// Intended only for post-phase, order-independent, side-effect-only
    /// hooks (metrics emission, notification fan-out). Each hook gets
    /// its own context clone and the terminal continuation, under its
    /// own timeout. Context mutations are discarded, `abort` is never
    /// honored, and outcomes are collected in hook order.
    pub async fn run_concurrent(
        &self,
        hooks: &[Arc<ResolvedHook>],
        mut ctx: HookContext,
    ) -> HookContext {
        let attempts = hooks.iter().map(|hook| {
            let hook = Arc::clone(hook);
            let ctx = ctx.clone();
            async move {
                let def = &hook.definition;
                let timer = Instant::now();
                let attempt = hook.handler.execute(ctx, Next::noop());
                let result = match tokio::time::timeout(def.timeout, attempt).await {
                    Ok(Ok(_)) => Ok(()),
                    Ok(Err(err)) => Err(err),
                    Err(_) => Err(HookError::Timeout {
                        hook_id: def.id.clone(),
                        timeout: def.timeout,
                    }),
                };
                let elapsed = timer.elapsed();
                match result {
                    Ok(()) => HookOutcome::success(&def.id, elapsed),
                    Err(err) => {
                        tracing::warn!(
                            hook_id = %def.id,
                            error = %err,
                            elapsed_ms = elapsed.as_millis() as u64,
                            "concurrent hook failed"
                        );
                        HookOutcome::failure(&def.id, elapsed, err.to_string())
                    }
                }
            }
        });

        let outcomes = futures::future::join_all(attempts).await;
        ctx.outcomes.extend(outcomes);
        ctx
    }

    /// Executes a single hook in isolation with the terminal
    /// continuation, under its declared timeout.
    ///
    /// Returns the outcome and the resulting context (the input context
    /// unchanged when the hook failed). Used by the management
    /// surface's dry-run; touches no host subsystem.
    pub async fn dry_run(
        &self,
        hook: &ResolvedHook,
        ctx: HookContext,
    ) -> (HookOutcome, HookContext) {
        let def = &hook.definition;
        let original = ctx.clone();
        let timer = Instant::now();
        let attempt = hook.handler.execute(ctx, Next::noop());
        let result = match tokio::time::timeout(def.timeout, attempt).await {
            Ok(Ok(out)) => Ok(out),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(HookError::Timeout {
                hook_id: def.id.clone(),
                timeout: def.timeout,
            }),
        };
        let elapsed = timer.elapsed();
        match result {
            Ok(out) => (HookOutcome::success(&def.id, elapsed), out),
            Err(err) => (
                HookOutcome::failure(&def.id, elapsed, err.to_string()),
                original,
            ),
        }
    }
}

impl Default for ChainRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// One chain link: timeout enforcement, outcome recording, fail policy.
async fn invoke(
    hook: Arc<ResolvedHook>,
    downstream: Continuation,
    ctx: HookContext,
    started: Instant,
    budget: Duration,
) -> HookContext {
    // Already-aborted short-circuit: the hook's primary logic never runs.
    if ctx.abort {
        return ctx;
    }

    let def = &hook.definition;
    let mark = ctx.outcomes.len();

    let remaining = budget.saturating_sub(started.elapsed());
    if remaining.is_zero() {
        let err = HookError::BudgetExhausted {
            hook_id: def.id.clone(),
        };
        return fail(&hook, downstream, ctx, Duration::ZERO, err).await;
    }
    let deadline = remaining.min(def.timeout);

    // Keep the incoming context so a failed hook's mutations can be
    // discarded.
    let original = ctx.clone();
    let timer = Instant::now();
    let attempt = hook
        .handler
        .execute(ctx, Next::new(Arc::clone(&downstream)));
    let result = match tokio::time::timeout(deadline, attempt).await {
        Ok(Ok(out)) => Ok(out),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(HookError::Timeout {
            hook_id: def.id.clone(),
            timeout: deadline,
        }),
    };
    let elapsed = timer.elapsed();

    match result {
        Ok(mut out) => {
            // The continuation returns inside-out; inserting at the
            // position this hook held when it started keeps the audit
            // trail in execution order.
            let at = mark.min(out.outcomes.len());
            out.outcomes
                .insert(at, HookOutcome::success(&def.id, elapsed));
            out
        }
        Err(err) => fail(&hook, downstream, original, elapsed, err).await,
    }
}

async fn fail(
    hook: &ResolvedHook,
    downstream: Continuation,
    mut ctx: HookContext,
    elapsed: Duration,
    err: HookError,
) -> HookContext {
    let def = &hook.definition;
    tracing::warn!(
        hook_id = %def.id,
        event_type = %def.event_type,
        fail_mode = ?def.fail_mode,
        error = %err,
        elapsed_ms = elapsed.as_millis() as u64,
        "hook failed"
    );
    ctx.outcomes
        .push(HookOutcome::failure(&def.id, elapsed, err.to_string()));
    match def.fail_mode {
        FailMode::Open => Next::new(downstream).run(ctx).await,
        FailMode::Closed => {
            ctx.set_abort(format!("hook '{}' failed: {err}", def.id));
            ctx
        }
    }
}
