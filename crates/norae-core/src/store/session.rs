//! # Business Session Operations
//!
//! The single-active-session state machine: one open operating period at a
//! time, under which the day's sales are aggregated.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Business Session Lifecycle                       │
//! │                                                                     │
//! │            start_session() / auto-open on first room                │
//! │   (closed) ───────────────────────────────────────► (open)          │
//! │       ▲                                                │            │
//! │       │                    end_session()               │            │
//! │       └────────────────────────────────────────────────┘            │
//! │         stamps end_time, forces EVERY room to Waiting               │
//! │         (start = None, end = close time) and clears EVERY           │
//! │         usage ledger — deliberately destructive: the day            │
//! │         boundary means unsettled work is abandoned. Warning         │
//! │         the operator about unsettled rooms is the caller's job;     │
//! │         once invoked, closing is unconditional.                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::error::{LedgerError, LedgerResult};
use crate::outbox::MirrorIntent;
use crate::types::{BusinessSession, RoomStatus, Usage};

use super::{new_uuid, LedgerStore};

impl LedgerStore {
    /// Opens the business day.
    ///
    /// A reported no-op when a session is already open, so a double-tapped
    /// open button still leaves exactly one active session.
    pub fn start_session(&mut self) -> LedgerResult<()> {
        if self.active_session_id.is_some() {
            return Err(LedgerError::SessionAlreadyOpen);
        }
        self.open_session_at(Self::now());
        Ok(())
    }

    /// Creates and activates a session, emitting the mirror intent.
    ///
    /// Shared by the explicit open button and the auto-open in
    /// `set_room_status`; callers have already checked there is no open
    /// session.
    pub(super) fn open_session_at(&mut self, start_at: DateTime<Utc>) {
        let session = BusinessSession {
            id: new_uuid(),
            start_time: start_at,
            end_time: None,
        };
        self.push_intent(MirrorIntent::SessionStarted {
            id: session.id.clone(),
            start_at,
        });
        self.active_session_id = Some(session.id.clone());
        self.sessions.push(session);
    }

    /// Closes the business day.
    ///
    /// Stamps `end_time` on the open session, then force-resets the whole
    /// floor: every room back to `Waiting` with `start_time = None` and
    /// `end_time =` the close time, every usage ledger emptied. A reported
    /// no-op when no session is open.
    pub fn end_session(&mut self) -> LedgerResult<()> {
        let active_id = self
            .active_session_id
            .take()
            .ok_or(LedgerError::NoOpenSession)?;
        let ended_at = Self::now();

        if let Some(session) = self
            .sessions
            .iter_mut()
            .find(|session| session.id == active_id)
        {
            session.end_time = Some(ended_at);
        }

        for room in &mut self.rooms {
            room.status = RoomStatus::Waiting;
            room.start_time = None;
            room.end_time = Some(ended_at);
        }
        for usage in self.usage_by_room.values_mut() {
            *usage = Usage::default();
        }

        self.push_intent(MirrorIntent::SessionEnded {
            id: active_id,
            end_at: ended_at,
        });
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_opens_exactly_one_session() {
        let mut store = LedgerStore::new();
        store.start_session().unwrap();

        let session = store.active_session().unwrap();
        assert!(session.is_open());
        assert_eq!(store.sessions().len(), 1);
    }

    #[test]
    fn test_double_start_is_idempotent() {
        let mut store = LedgerStore::new();
        store.start_session().unwrap();
        assert_eq!(store.start_session(), Err(LedgerError::SessionAlreadyOpen));

        let open_count = store.sessions().iter().filter(|s| s.is_open()).count();
        assert_eq!(open_count, 1);
        assert_eq!(store.sessions().len(), 1);
    }

    #[test]
    fn test_end_without_open_session_is_reported_noop() {
        let mut store = LedgerStore::new();
        assert_eq!(store.end_session(), Err(LedgerError::NoOpenSession));
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn test_end_clears_every_room_and_ledger() {
        let mut store = LedgerStore::new();
        let time = store.catalog()[0].id.clone();

        store.start_session().unwrap();
        store
            .set_room_status("room-1", RoomStatus::InProgress)
            .unwrap();
        store
            .set_room_status("room-3", RoomStatus::InProgress)
            .unwrap();
        store.increment_item("room-1", &time).unwrap();
        store.increment_item("room-3", &time).unwrap();
        store.set_cash_amount("room-3", 10_000).unwrap();

        store.end_session().unwrap();

        assert!(store.active_session().is_none());
        assert!(store.sessions()[0].end_time.is_some());
        for room in store.rooms() {
            assert_eq!(room.status, RoomStatus::Waiting);
            assert!(room.start_time.is_none());
            assert!(room.end_time.is_some());
        }
        // No stale counts survive the close.
        for room in store.rooms() {
            let usage = store.usage(&room.id).unwrap();
            assert!(usage.item_counts.is_empty());
            assert_eq!(usage.cash_amount, 0);
            assert_eq!(usage.card_amount, 0);
        }
    }

    #[test]
    fn test_sessions_accumulate_across_days() {
        let mut store = LedgerStore::new();
        store.start_session().unwrap();
        store.end_session().unwrap();
        store.start_session().unwrap();

        assert_eq!(store.sessions().len(), 2);
        assert!(store.sessions()[0].end_time.is_some());
        assert!(store.sessions()[1].is_open());
    }

    #[test]
    fn test_session_lifecycle_emits_mirror_intents() {
        let mut store = LedgerStore::new();
        store.start_session().unwrap();
        store.end_session().unwrap();

        let intents = store.drain_intents();
        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].kind(), "session_started");
        assert_eq!(intents[1].kind(), "session_ended");
        match (&intents[0], &intents[1]) {
            (
                MirrorIntent::SessionStarted { id: started, .. },
                MirrorIntent::SessionEnded { id: ended, .. },
            ) => assert_eq!(started, ended),
            other => panic!("unexpected intents: {:?}", other),
        }
    }
}
