//! Chain-execution log — recent outcome records for the management
//! surface.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use trellis_hook::{EventType, HookContext, HookOutcome};
use uuid::Uuid;

/// Default number of chain records retained.
pub const DEFAULT_LOG_CAPACITY: usize = 256;

/// Record of one completed chain run.
///
/// A plain attribute record: storable as-is in a key-value or
/// relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Which lifecycle point the chain ran for.
    pub event_type: EventType,
    /// Tenant the chain ran for (empty = system scope).
    pub tenant_id: String,
    /// When the chain completed.
    pub at: DateTime<Utc>,
    /// Whether the chain ended aborted.
    pub aborted: bool,
    /// Abort reason, empty when not aborted.
    pub abort_reason: String,
    /// Per-hook outcomes, in execution order.
    pub outcomes: Vec<HookOutcome>,
}

impl ChainRecord {
    /// Builds a record from the final context of a chain run.
    #[must_use]
    pub fn from_context(ctx: &HookContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: ctx.event_type,
            tenant_id: ctx.tenant_id.clone(),
            at: Utc::now(),
            aborted: ctx.abort,
            abort_reason: ctx.abort_reason.clone(),
            outcomes: ctx.outcomes.clone(),
        }
    }
}

/// Filter for [`ExecutionLog::recent`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogFilter {
    /// Keep only records for this event type.
    pub event_type: Option<EventType>,
    /// Keep only records at or after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Keep only records at or before this instant.
    pub until: Option<DateTime<Utc>>,
}

impl LogFilter {
    /// Matches every record.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts to one event type.
    #[must_use]
    pub fn with_event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    /// Restricts to records at or after `since`.
    #[must_use]
    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Restricts to records at or before `until`.
    #[must_use]
    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    fn matches(&self, record: &ChainRecord) -> bool {
        if let Some(event_type) = self.event_type {
            if record.event_type != event_type {
                return false;
            }
        }
        if let Some(since) = self.since {
            if record.at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if record.at > until {
                return false;
            }
        }
        true
    }
}

/// Bounded in-memory ring buffer of chain records.
///
/// Oldest records are evicted once capacity is reached. Safe for
/// concurrent use; writers take the lock only to push one record.
pub struct ExecutionLog {
    entries: RwLock<VecDeque<ChainRecord>>,
    capacity: usize,
}

impl ExecutionLog {
    /// Creates a log with [`DEFAULT_LOG_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// Creates a log retaining at most `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Appends a record, evicting the oldest when full.
    pub fn record(&self, record: ChainRecord) {
        let mut entries = self.entries.write();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(record);
    }

    /// Returns matching records, newest first.
    #[must_use]
    pub fn recent(&self, filter: &LogFilter) -> Vec<ChainRecord> {
        self.entries
            .read()
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    /// Number of retained records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no records are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for ExecutionLog {
    fn default() -> Self {
        Self::new()
    }
}
