//! # Ledger Sink
//!
//! The collaborator contract for the durable store, plus an in-memory
//! reference implementation.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          LedgerSink                                 │
//! │                                                                     │
//! │  record_session_start   session opened   (insert, idempotent ok)    │
//! │  record_session_end     session closed   (update end timestamp)     │
//! │  record_settlement      room settled     (append sale + lines)      │
//! │  load_snapshot          startup rehydration (sessions + sales)      │
//! │                                                                     │
//! │  Each call either succeeds or returns a MirrorError. The core       │
//! │  never blocks on these; the dispatcher makes exactly one attempt    │
//! │  per intent and surfaces failures as advisory reports. Timeouts,    │
//! │  if any, are a property of the transport behind the impl.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use norae_core::types::{BusinessSession, LedgerSnapshot, SaleRecord};

use crate::error::MirrorResult;

// =============================================================================
// Sink Trait
// =============================================================================

/// Where finalized sessions and settlements are mirrored for durability.
///
/// Implementations wrap whatever remote store the deployment uses; the
/// dispatcher only ever sees this trait.
#[async_trait]
pub trait LedgerSink: Send + Sync {
    /// Records that a business session opened.
    async fn record_session_start(&self, id: &str, start_at: DateTime<Utc>) -> MirrorResult<()>;

    /// Records that the business session closed.
    async fn record_session_end(&self, id: &str, end_at: DateTime<Utc>) -> MirrorResult<()>;

    /// Appends one settled sale with its priced line items.
    async fn record_settlement(&self, record: &SaleRecord) -> MirrorResult<()>;

    /// Loads the rehydration snapshot, once, at startup.
    async fn load_snapshot(&self) -> MirrorResult<LedgerSnapshot>;
}

// =============================================================================
// In-Memory Sink
// =============================================================================

/// An in-memory [`LedgerSink`].
///
/// Serves as the reference implementation for tests and as a working
/// fallback when no remote store is configured (everything is then lost on
/// exit, which is exactly what the local-first contract tolerates).
///
/// Cloning is cheap and clones share storage, so a test can keep a handle
/// to inspect what the dispatcher delivered.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    sessions: Arc<Mutex<Vec<BusinessSession>>>,
    sales: Arc<Mutex<Vec<SaleRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions recorded so far.
    pub fn sessions(&self) -> Vec<BusinessSession> {
        self.sessions.lock().expect("sink mutex poisoned").clone()
    }

    /// Sales recorded so far.
    pub fn sales(&self) -> Vec<SaleRecord> {
        self.sales.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl LedgerSink for MemorySink {
    async fn record_session_start(&self, id: &str, start_at: DateTime<Utc>) -> MirrorResult<()> {
        let mut sessions = self.sessions.lock().expect("sink mutex poisoned");
        // Duplicate starts are tolerated, matching remote upsert behavior.
        if !sessions.iter().any(|session| session.id == id) {
            sessions.push(BusinessSession {
                id: id.to_string(),
                start_time: start_at,
                end_time: None,
            });
        }
        Ok(())
    }

    async fn record_session_end(&self, id: &str, end_at: DateTime<Utc>) -> MirrorResult<()> {
        let mut sessions = self.sessions.lock().expect("sink mutex poisoned");
        if let Some(session) = sessions.iter_mut().find(|session| session.id == id) {
            session.end_time = Some(end_at);
        }
        Ok(())
    }

    async fn record_settlement(&self, record: &SaleRecord) -> MirrorResult<()> {
        self.sales
            .lock()
            .expect("sink mutex poisoned")
            .push(record.clone());
        Ok(())
    }

    async fn load_snapshot(&self) -> MirrorResult<LedgerSnapshot> {
        let sessions = self.sessions();
        let active_session_id = sessions
            .iter()
            .rev()
            .find(|session| session.is_open())
            .map(|session| session.id.clone());
        Ok(LedgerSnapshot {
            sessions,
            active_session_id,
            sales: self.sales(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
