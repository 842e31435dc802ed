//! # Outbox Intents
//!
//! Mirror intents emitted by committed ledger transitions.
//!
//! ## Why an Explicit Outbox?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Local Commit, Then Mirror                       │
//! │                                                                     │
//! │   set_room_status / settle / end_session                            │
//! │        │                                                            │
//! │        ▼  (synchronous, in-memory, already visible to readers)      │
//! │   LedgerStore mutation commits                                      │
//! │        │                                                            │
//! │        ▼                                                            │
//! │   MirrorIntent pushed onto the store's outbox queue                 │
//! │        │                                                            │
//! │        ▼  (norae-sync, asynchronous, best effort, one attempt)      │
//! │   drain_intents() ──► MirrorDispatcher ──► durable store            │
//! │                                                                     │
//! │   A failed mirror write NEVER rolls the local transition back;      │
//! │   it only produces an advisory report.                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keeping the boundary as data (intents) instead of direct calls makes the
//! persistence contract testable without any remote store in the loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SaleRecord;

// =============================================================================
// Mirror Intent
// =============================================================================

/// One finalized fact the durable store should learn about.
///
/// Intents are emitted in commit order and carry everything the sink needs;
/// the dispatcher never reads the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MirrorIntent {
    /// A business session opened (explicitly or auto-opened by a room
    /// entering in-progress).
    SessionStarted {
        id: String,
        start_at: DateTime<Utc>,
    },

    /// The open business session closed.
    SessionEnded { id: String, end_at: DateTime<Utc> },

    /// A room was settled into an immutable sale record.
    SettlementRecorded { record: SaleRecord },
}

impl MirrorIntent {
    /// Short label for logs and advisory reports.
    pub const fn kind(&self) -> &'static str {
        match self {
            MirrorIntent::SessionStarted { .. } => "session_started",
            MirrorIntent::SessionEnded { .. } => "session_ended",
            MirrorIntent::SettlementRecorded { .. } => "settlement_recorded",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
