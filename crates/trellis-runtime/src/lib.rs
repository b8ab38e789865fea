//! Runtime integration layer for the Trellis hook framework.
//!
//! Tier gates that weave [`trellis_hook`] chains into the host
//! runtime's execution paths, an execution log for auditing, and an
//! operator-facing management surface.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Host Runtime                          │
//! │   agent invoker · tool executor · workflow engine · server  │
//! └──────────────┬──────────────────────────────────────────────┘
//!                │ wraps each operation in a gate
//! ┌──────────────▼──────────────────────────────────────────────┐
//! │                  trellis-runtime         ◄── HERE           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  AgentGate │ ToolGate │ WorkflowGate │ RequestGate          │
//! │       └──────────┴─────── HookGate ──────────┘              │
//! │                    ExecutionLog · HookManager               │
//! └──────────────┬──────────────────────────────────────────────┘
//!                │ resolve + run chains
//! ┌──────────────▼──────────────────────────────────────────────┐
//! │                     trellis-hook                            │
//! │     HookRegistry · ChainRunner · Hook trait                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Tier gates
//!
//! Each gate wraps one host operation in a pre chain and a post chain.
//! The host passes its operation as a closure; the gate hands it the
//! (possibly hook-modified) inputs, so the core execution path never
//! needs to know hooks exist:
//!
//! - [`AgentGate::invoke`] — pre hooks may rewrite agent inputs and the
//!   system prompt;
//! - [`ToolGate::execute`] — pre hooks may rewrite arguments, post
//!   hooks may replace the result;
//! - [`WorkflowGate::run_step`] — pre hooks may rewrite step inputs and
//!   see a read-only state snapshot;
//! - [`RequestGate::handle`] — pre hooks may rewrite headers and body.
//!
//! A pre-chain abort surfaces as [`GateError::Denied`] and the host
//! operation never runs. Post chains are observe-only (except tool
//! result replacement); their aborts are logged and ignored.
//!
//! # Auditing and management
//!
//! Every chain run is recorded in the shared [`ExecutionLog`], a
//! bounded in-memory ring. [`HookManager`] exposes CRUD over hook
//! definitions, bulk declarative loading, the recent execution records,
//! and a [`HookManager::dry_run`] that executes one hook against a
//! sample context without touching any host subsystem.

mod agent;
mod gate;
mod log;
mod management;
mod request;
mod tool;
mod workflow;

pub use agent::AgentGate;
pub use gate::{GateError, HookGate};
pub use log::{ChainRecord, ExecutionLog, LogFilter, DEFAULT_LOG_CAPACITY};
pub use management::{DryRunReport, HookManager};
pub use request::{RequestGate, Response};
pub use tool::ToolGate;
pub use workflow::WorkflowGate;
