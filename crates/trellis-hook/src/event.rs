//! Event taxonomy — the lifecycle points where chains run.
//!
//! Every tier exposes a "pre" point (hooks may modify inputs or abort
//! the operation) and a "post" point (hooks observe the completed
//! result; the tool tier additionally permits result replacement).

use crate::HookError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// All lifecycle points where hook chains can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Before an agent invocation is dispatched.
    AgentInvokePre,
    /// After an agent invocation completes.
    AgentInvokePost,
    /// Before a tool executes.
    ToolExecutePre,
    /// After a tool execution completes.
    ToolExecutePost,
    /// Before a workflow step runs.
    WorkflowStepPre,
    /// After a workflow step completes.
    WorkflowStepPost,
    /// Before an inbound request is handled.
    RequestPre,
    /// After an inbound request produces a response.
    RequestPost,
}

impl EventType {
    /// Returns `true` if this is a "pre" point (hooks can modify/abort).
    #[must_use]
    pub fn is_pre(&self) -> bool {
        matches!(
            self,
            Self::AgentInvokePre
                | Self::ToolExecutePre
                | Self::WorkflowStepPre
                | Self::RequestPre
        )
    }

    /// Returns `true` if this is a "post" point (observe-only by default).
    #[must_use]
    pub fn is_post(&self) -> bool {
        !self.is_pre()
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgentInvokePre => "agent.invoke.pre",
            Self::AgentInvokePost => "agent.invoke.post",
            Self::ToolExecutePre => "tool.execute.pre",
            Self::ToolExecutePost => "tool.execute.post",
            Self::WorkflowStepPre => "workflow.step.pre",
            Self::WorkflowStepPost => "workflow.step.post",
            Self::RequestPre => "request.pre",
            Self::RequestPost => "request.post",
        }
    }

    /// All taxonomy values, in documentation order.
    pub const ALL: &'static [EventType] = &[
        Self::AgentInvokePre,
        Self::AgentInvokePost,
        Self::ToolExecutePre,
        Self::ToolExecutePost,
        Self::WorkflowStepPre,
        Self::WorkflowStepPost,
        Self::RequestPre,
        Self::RequestPost,
    ];
}

impl FromStr for EventType {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent.invoke.pre" => Ok(Self::AgentInvokePre),
            "agent.invoke.post" => Ok(Self::AgentInvokePost),
            "tool.execute.pre" => Ok(Self::ToolExecutePre),
            "tool.execute.post" => Ok(Self::ToolExecutePost),
            "workflow.step.pre" => Ok(Self::WorkflowStepPre),
            "workflow.step.post" => Ok(Self::WorkflowStepPost),
            "request.pre" => Ok(Self::RequestPre),
            "request.post" => Ok(Self::RequestPost),
            _ => Err(HookError::UnknownEventType(s.to_string())),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
