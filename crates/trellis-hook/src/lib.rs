//! Hook layer for the Trellis runtime.
//!
//! A priority-ordered, multi-tier middleware chain that intercepts
//! lifecycle events of an agent-execution runtime without the core
//! execution paths needing to know hooks exist.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Hook Layer                    ◄── HERE   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-hook : Hook trait, ChainRunner, HookRegistry,      │
//! │                 declarative config                          │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Runtime Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-runtime : tier gates (agent, tool, workflow,       │
//! │                    request), execution log, management      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Core Concepts
//!
//! ## Event taxonomy
//!
//! [`EventType`] enumerates the 8 lifecycle points across 4 tiers
//! (agent, tool, workflow, request), each with a pre and a post point.
//!
//! ## Hook contract
//!
//! A hook is a [`HookDefinition`] (a plain attribute record: priority,
//! timeout, tenant scope, fail mode) paired at registration time with a
//! [`Hook`] handler:
//!
//! ```ignore
//! #[async_trait]
//! pub trait Hook: Send + Sync {
//!     async fn execute(&self, ctx: HookContext, next: Next) -> Result<HookContext, HookError>;
//! }
//! ```
//!
//! A handler may run code before and after `next.run(ctx).await`,
//! decline to delegate, or set abort to short-circuit the chain and the
//! host operation behind it.
//!
//! ## Chain runner
//!
//! [`ChainRunner`] composes a snapshot of hooks into a
//! continuation-passing chain, enforces per-hook timeouts and an
//! aggregate budget, and converts every hook failure into a
//! [`HookOutcome`] record handled per the hook's [`FailMode`] —
//! fail-open continues as though the hook were absent, fail-closed
//! aborts the chain.
//!
//! ## Registry
//!
//! [`HookRegistry`] owns the catalog, indexed by event type, and
//! resolves the effective hook set for an `(event type, tenant)` pair:
//! system hooks (empty tenant) apply everywhere, tenant hooks only to
//! their owner, ordered by `(priority, registration order)` across both
//! scopes.
//!
//! # Concurrency
//!
//! Chains run on the calling task. The registry is the only shared
//! state; wrap it in [`SharedHookRegistry`]
//! (`Arc<RwLock<HookRegistry>>`) — resolution returns a point-in-time
//! snapshot, so in-flight chains are immune to concurrent registration
//! changes.
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use std::sync::Arc;
//! use trellis_hook::{
//!     ChainRunner, EventPayload, EventType, Hook, HookContext, HookDefinition, HookError,
//!     HookRegistry, Next,
//! };
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Hook for Audit {
//!     async fn execute(&self, mut ctx: HookContext, next: Next) -> Result<HookContext, HookError> {
//!         ctx.metadata.insert("audited".into(), serde_json::json!(true));
//!         Ok(next.run(ctx).await)
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut registry = HookRegistry::new();
//! registry
//!     .register(
//!         HookDefinition::new("audit", EventType::ToolExecutePre).with_priority(10),
//!         Arc::new(Audit),
//!     )
//!     .unwrap();
//!
//! let ctx = HookContext::new(
//!     EventType::ToolExecutePre,
//!     "tenant-a",
//!     EventPayload::ToolPre {
//!         tool: "search".into(),
//!         arguments: serde_json::json!({"query": "rust"}),
//!     },
//! );
//!
//! let hooks = registry.resolve(EventType::ToolExecutePre, "tenant-a");
//! let out = ChainRunner::new().run(&hooks, ctx).await;
//! assert!(!out.abort);
//! assert_eq!(out.outcomes.len(), 1);
//! # }
//! ```

mod chain;
mod config;
mod context;
mod definition;
mod error;
mod event;
pub mod hook;
mod outcome;
mod registry;

pub use chain::{ChainRunner, DEFAULT_CHAIN_BUDGET};
pub use config::{HookDecl, HooksConfig};
pub use context::{EventPayload, HookContext, SYSTEM_TENANT};
pub use definition::{
    FailMode, HookDefinition, DEFAULT_HOOK_TIMEOUT, DEFAULT_PRIORITY, MAX_PRIORITY,
};
pub use error::HookError;
pub use event::EventType;
pub use hook::{Hook, Next};
pub use outcome::HookOutcome;
pub use registry::{HookRegistry, ResolvedHook, SharedHookRegistry};

// Re-export testing utilities
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    //! Test utilities for the hook layer.
    //!
    //! Provides [`MockHook`] for use in tests.
    pub use crate::hook::testing::MockHook;
}
