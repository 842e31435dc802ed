//! # Mirror Dispatcher
//!
//! Drains the core's outbox and pushes each intent to the durable-store
//! sink, best effort, exactly one attempt each.
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Mirror Dispatch Flow                            │
//! │                                                                     │
//! │  LedgerStore.drain_intents()                                        │
//! │        │                                                            │
//! │        ▼ forward_intents() — try_send, never blocks the reducer     │
//! │  ┌───────────────┐      ┌──────────────────┐      ┌─────────────┐   │
//! │  │ intent channel│ ───► │ MirrorDispatcher │ ───► │ LedgerSink  │   │
//! │  │ (bounded)     │      │ one attempt per  │      │ (remote     │   │
//! │  └───────────────┘      │ intent, in order │      │  store)     │   │
//! │                         └────────┬─────────┘      └─────────────┘   │
//! │                                  │ on failure                       │
//! │                                  ▼                                  │
//! │                         ┌──────────────────┐                        │
//! │                         │ MirrorReport     │  advisory only:        │
//! │                         │ (report channel) │  the local ledger is   │
//! │                         └──────────────────┘  already committed     │
//! │                                                                     │
//! │  NO RETRY • NO BACKOFF • NO ROLLBACK                                │
//! │  Retrying is the caller's decision; the worst case is a degraded    │
//! │  mirror until the next successful write.                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use norae_core::outbox::MirrorIntent;
use norae_core::store::LedgerStore;
use norae_core::types::LedgerSnapshot;

use crate::error::MirrorResult;
use crate::sink::LedgerSink;

// =============================================================================
// Constants
// =============================================================================

/// Intent channel capacity. A full channel drops the intent with a warning
/// rather than ever blocking a local commit.
const INTENT_CHANNEL_CAPACITY: usize = 256;

/// Report channel capacity. Reports are advisory; with no listener they
/// are dropped silently.
const REPORT_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// Advisory Reports
// =============================================================================

/// A non-blocking notification that one mirror write failed.
///
/// By the time a report exists the local transition is committed and
/// visible; the report only tells the caller the durable backup is behind.
#[derive(Debug, Clone)]
pub struct MirrorReport {
    /// Which intent kind failed ("settlement_recorded", ...).
    pub kind: &'static str,
    /// The sink's error, stringified.
    pub error: String,
    /// When the attempt failed.
    pub at: DateTime<Utc>,
}

// =============================================================================
// Handle
// =============================================================================

/// Handle for feeding and stopping the dispatcher.
#[derive(Clone)]
pub struct MirrorHandle {
    intent_tx: mpsc::Sender<MirrorIntent>,
    shutdown_tx: mpsc::Sender<()>,
}

impl MirrorHandle {
    /// Queues one intent for mirroring.
    ///
    /// Uses `try_send` so the caller (the reducer's thread) never waits on
    /// the mirror. A full or closed channel drops the intent with a
    /// warning; a degraded mirror is the accepted worst case.
    pub fn enqueue(&self, intent: MirrorIntent) {
        if let Err(err) = self.intent_tx.try_send(intent) {
            warn!(%err, "Dropping mirror intent; durable mirror is degraded");
        }
    }

    /// Triggers graceful shutdown after queued intents are handled.
    pub async fn shutdown(&self) {
        // A closed channel means the dispatcher is already gone.
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Drains a store's outbox into the dispatcher, preserving commit order.
///
/// Call after each batch of UI intents has been applied to the store.
pub fn forward_intents(store: &mut LedgerStore, handle: &MirrorHandle) {
    for intent in store.drain_intents() {
        handle.enqueue(intent);
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Pushes mirror intents to a [`LedgerSink`], one attempt per intent.
pub struct MirrorDispatcher<S: LedgerSink> {
    sink: S,
    intent_rx: mpsc::Receiver<MirrorIntent>,
    report_tx: mpsc::Sender<MirrorReport>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl<S: LedgerSink> MirrorDispatcher<S> {
    /// Creates a dispatcher plus its handle and the advisory report stream.
    pub fn new(sink: S) -> (Self, MirrorHandle, mpsc::Receiver<MirrorReport>) {
        let (intent_tx, intent_rx) = mpsc::channel(INTENT_CHANNEL_CAPACITY);
        let (report_tx, report_rx) = mpsc::channel(REPORT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let dispatcher = MirrorDispatcher {
            sink,
            intent_rx,
            report_tx,
            shutdown_rx,
        };
        let handle = MirrorHandle {
            intent_tx,
            shutdown_tx,
        };
        (dispatcher, handle, report_rx)
    }

    /// Runs the dispatch loop. Spawn this as a background task.
    ///
    /// The loop ends on explicit shutdown or when every handle is dropped.
    pub async fn run(mut self) {
        info!("Mirror dispatcher starting");

        loop {
            tokio::select! {
                Some(intent) = self.intent_rx.recv() => {
                    self.dispatch(intent).await;
                }
                _ = self.shutdown_rx.recv() => {
                    info!("Mirror dispatcher shutting down");
                    break;
                }
                else => break,
            }
        }

        info!("Mirror dispatcher stopped");
    }

    /// One write attempt. Failure becomes an advisory report, never a
    /// rollback and never a stop.
    async fn dispatch(&mut self, intent: MirrorIntent) {
        let kind = intent.kind();
        let result = match &intent {
            MirrorIntent::SessionStarted { id, start_at } => {
                self.sink.record_session_start(id, *start_at).await
            }
            MirrorIntent::SessionEnded { id, end_at } => {
                self.sink.record_session_end(id, *end_at).await
            }
            MirrorIntent::SettlementRecorded { record } => {
                self.sink.record_settlement(record).await
            }
        };

        match result {
            Ok(()) => debug!(kind, "Mirrored intent"),
            Err(error) => {
                warn!(kind, %error, "Mirror write failed; local ledger remains authoritative");
                let report = MirrorReport {
                    kind,
                    error: error.to_string(),
                    at: Utc::now(),
                };
                if self.report_tx.try_send(report).is_err() {
                    debug!(kind, "Advisory report dropped; no listener");
                }
            }
        }
    }
}

// =============================================================================
// Startup Hydration
// =============================================================================

/// Loads the startup snapshot from the sink, once.
///
/// Callers feed the result into `LedgerStore::apply_snapshot`; on error
/// they start from an empty history.
pub async fn hydrate<S: LedgerSink>(sink: &S) -> MirrorResult<LedgerSnapshot> {
    let snapshot = sink.load_snapshot().await?;
    info!(
        sessions = snapshot.sessions.len(),
        sales = snapshot.sales.len(),
        "Hydrated ledger snapshot"
    );
    Ok(snapshot)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MirrorError;
    use crate::sink::MemorySink;
    use async_trait::async_trait;

    /// Sink that rejects every write, for failure-path tests.
    #[derive(Clone, Default)]
    struct RejectingSink;

    #[async_trait]
    impl LedgerSink for RejectingSink {
        async fn record_session_start(
            &self,
            _id: &str,
            _start_at: DateTime<Utc>,
        ) -> MirrorResult<()> {
            Err(MirrorError::WriteRejected("offline".into()))
        }

        async fn record_session_end(&self, _id: &str, _end_at: DateTime<Utc>) -> MirrorResult<()> {
            Err(MirrorError::WriteRejected("offline".into()))
        }

        async fn record_settlement(
            &self,
            _record: &norae_core::types::SaleRecord,
        ) -> MirrorResult<()> {
            Err(MirrorError::WriteRejected("offline".into()))
        }

        async fn load_snapshot(&self) -> MirrorResult<LedgerSnapshot> {
            Err(MirrorError::SnapshotUnavailable("offline".into()))
        }
    }

    /// Runs a full day in the store and mirrors it through the dispatcher.
    #[tokio::test]
    async fn test_dispatcher_mirrors_store_intents_in_order() {
        let sink = MemorySink::new();
        let (dispatcher, handle, _reports) = MirrorDispatcher::new(sink.clone());
        let join = tokio::spawn(dispatcher.run());

        let mut store = LedgerStore::new();
        let time = store.catalog()[0].id.clone();
        store.start_session().unwrap();
        store.increment_item("room-1", &time).unwrap();
        store.settle("room-1").unwrap();
        store.end_session().unwrap();
        forward_intents(&mut store, &handle);

        handle.shutdown().await;
        join.await.unwrap();

        assert_eq!(sink.sessions().len(), 1);
        assert!(sink.sessions()[0].end_time.is_some());
        assert_eq!(sink.sales().len(), 1);
        assert_eq!(sink.sales()[0].total, 30_000);
    }

    #[tokio::test]
    async fn test_failed_writes_report_and_do_not_stop_the_loop() {
        let (dispatcher, handle, mut reports) = MirrorDispatcher::new(RejectingSink);
        let join = tokio::spawn(dispatcher.run());

        handle.enqueue(MirrorIntent::SessionStarted {
            id: "s-1".into(),
            start_at: Utc::now(),
        });
        handle.enqueue(MirrorIntent::SessionEnded {
            id: "s-1".into(),
            end_at: Utc::now(),
        });

        let first = reports.recv().await.expect("first advisory report");
        assert_eq!(first.kind, "session_started");
        assert!(first.error.contains("offline"));
        // The loop survived the failure and attempted the next intent.
        let second = reports.recv().await.expect("second advisory report");
        assert_eq!(second.kind, "session_ended");

        handle.shutdown().await;
        join.await.unwrap();
    }

    #[tokio::test]
    async fn test_dispatcher_stops_when_handles_drop() {
        let (dispatcher, handle, reports) = MirrorDispatcher::new(MemorySink::new());
        let join = tokio::spawn(dispatcher.run());

        drop(handle);
        drop(reports);
        join.await.unwrap();
    }

    #[tokio::test]
    async fn test_hydrate_round_trips_through_the_sink() {
        let sink = MemorySink::new();
        sink.record_session_start("s-1", Utc::now()).await.unwrap();

        let snapshot = hydrate(&sink).await.unwrap();
        assert_eq!(snapshot.active_session_id.as_deref(), Some("s-1"));

        let mut store = LedgerStore::new();
        store.apply_snapshot(snapshot);
        assert!(store.active_session().is_some());
    }

    #[tokio::test]
    async fn test_hydrate_surfaces_snapshot_failure() {
        let err = hydrate(&RejectingSink).await.unwrap_err();
        assert!(matches!(err, MirrorError::SnapshotUnavailable(_)));
    }
}
