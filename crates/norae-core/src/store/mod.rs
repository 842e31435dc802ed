//! # Ledger Store
//!
//! The single-writer reducer that owns every live entity of the venue.
//!
//! ## State Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         LedgerStore                                 │
//! │                                                                     │
//! │  catalog            mirrored in, read-mostly price table            │
//! │  rooms              live status + timestamps (core-owned)           │
//! │  usage_by_room      per-room counts, memo, payment split            │
//! │  sessions           business sessions, at most one open             │
//! │  sales              append-only settlement history                  │
//! │  outbox             mirror intents awaiting the dispatcher          │
//! │                                                                     │
//! │  Every operation executes to completion before the next is          │
//! │  accepted. No locking: there is no parallelism inside the core.     │
//! │  Concurrent external writers are reconciled last-writer-wins at     │
//! │  the persistence layer, an accepted limitation.                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations by Module
//! - [`rooms`](self) - registry, status toggles, add/rename/remove
//! - [`usage`](self) - item counts, memo, payment split
//! - [`session`](self) - business session open/close
//! - [`settlement`](self) - the freeze-into-history transition

mod rooms;
mod session;
mod settlement;
mod usage;

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::{default_catalog, normalize_catalog, sanitize_catalog};
use crate::money::Won;
use crate::outbox::MirrorIntent;
use crate::types::{
    BusinessSession, CatalogItem, LedgerSnapshot, RawCatalogRow, Room, SaleRecord, Usage,
};

/// Number of rooms seeded before the external identity list arrives.
const DEFAULT_ROOM_COUNT: usize = 4;

/// Fresh v4 id for sessions, sales and locally added rooms.
pub(crate) fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Ledger Store
// =============================================================================

/// The in-memory source of truth for the venue's books.
///
/// Fields are private so every mutation flows through an operation that
/// maintains the cross-field invariants (status implies timestamps, card
/// follows total, one open session). External observers read through the
/// accessor views and subscribe to changes by draining the outbox.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    catalog: Vec<CatalogItem>,
    rooms: Vec<Room>,
    selected_room_id: String,
    usage_by_room: HashMap<String, Usage>,
    sessions: Vec<BusinessSession>,
    active_session_id: Option<String>,
    sales: Vec<SaleRecord>,
    outbox: VecDeque<MirrorIntent>,
}

impl LedgerStore {
    /// Creates a store seeded with the built-in catalog and the default
    /// four rooms (`1번방`..`4번방`), ready to run before any external
    /// data has arrived.
    pub fn new() -> Self {
        let rooms: Vec<Room> = (1..=DEFAULT_ROOM_COUNT)
            .map(|n| Room::waiting(format!("room-{}", n), format!("{}번방", n)))
            .collect();
        let usage_by_room = rooms
            .iter()
            .map(|room| (room.id.clone(), Usage::default()))
            .collect();
        let selected_room_id = rooms
            .first()
            .map(|room| room.id.clone())
            .unwrap_or_default();

        LedgerStore {
            catalog: default_catalog(),
            rooms,
            selected_room_id,
            usage_by_room,
            sessions: Vec::new(),
            active_session_id: None,
            sales: Vec::new(),
            outbox: VecDeque::new(),
        }
    }

    // =========================================================================
    // Rehydration & Catalog
    // =========================================================================

    /// Rehydrates session and sales history from the durable store.
    ///
    /// Called once at startup. Live room/usage state is not part of the
    /// snapshot; it is local by design.
    pub fn apply_snapshot(&mut self, snapshot: LedgerSnapshot) {
        self.sessions = snapshot.sessions;
        self.active_session_id = snapshot.active_session_id;
        self.sales = snapshot.sales;
    }

    /// Replaces the catalog from a raw external load (normalizing it), then
    /// re-derives every room's card amount against the new prices.
    pub fn load_catalog(&mut self, rows: Vec<RawCatalogRow>) {
        self.catalog = normalize_catalog(rows);
        self.resync_all_card_amounts();
    }

    /// Replaces the catalog with an edited item list (sanitizing it), then
    /// re-derives every room's card amount against the new prices.
    pub fn set_catalog(&mut self, items: Vec<CatalogItem>) {
        self.catalog = sanitize_catalog(items);
        self.resync_all_card_amounts();
    }

    // =========================================================================
    // Derived Views
    // =========================================================================

    /// The bill for one room at current catalog prices.
    ///
    /// ## Tolerant Read
    /// Counts for item ids no longer in the catalog contribute nothing but
    /// are not deleted; catalog churn never breaks total computation.
    /// Unknown rooms price at zero.
    pub fn room_total(&self, room_id: &str) -> Won {
        let Some(usage) = self.usage_by_room.get(room_id) else {
            return Won::zero();
        };
        self.catalog
            .iter()
            .filter(|item| item.is_active)
            .map(|item| Won::new(item.price) * usage.count(&item.id))
            .sum()
    }

    /// Cash + card entered so far for one room.
    pub fn room_paid(&self, room_id: &str) -> Won {
        self.usage_by_room
            .get(room_id)
            .map(|usage| Won::new(usage.cash_amount) + Won::new(usage.card_amount))
            .unwrap_or_else(Won::zero)
    }

    /// What is still owed for one room, floored at zero.
    pub fn room_outstanding(&self, room_id: &str) -> Won {
        self.room_total(room_id)
            .saturating_sub_floor(self.room_paid(room_id))
    }

    /// Sum of settled sales recorded under one business session.
    pub fn session_sales_total(&self, session_id: &str) -> Won {
        self.sales
            .iter()
            .filter(|sale| sale.business_session_id.as_deref() == Some(session_id))
            .map(|sale| Won::new(sale.total))
            .sum()
    }

    /// The normalized catalog.
    pub fn catalog(&self) -> &[CatalogItem] {
        &self.catalog
    }

    /// All rooms in registry order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// One room by id.
    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == room_id)
    }

    /// The live usage ledger for one room.
    pub fn usage(&self, room_id: &str) -> Option<&Usage> {
        self.usage_by_room.get(room_id)
    }

    /// The room currently shown by the UI.
    pub fn selected_room_id(&self) -> &str {
        &self.selected_room_id
    }

    /// All business sessions, oldest first.
    pub fn sessions(&self) -> &[BusinessSession] {
        &self.sessions
    }

    /// The open business session, if any.
    pub fn active_session(&self) -> Option<&BusinessSession> {
        let id = self.active_session_id.as_deref()?;
        self.sessions.iter().find(|session| session.id == id)
    }

    /// Append-only settlement history, in settlement order.
    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    // =========================================================================
    // Outbox
    // =========================================================================

    /// Hands every queued mirror intent to the caller, in commit order.
    ///
    /// The dispatcher in `norae-sync` drains this after each batch of UI
    /// intents; nothing local waits for the mirror.
    pub fn drain_intents(&mut self) -> Vec<MirrorIntent> {
        self.outbox.drain(..).collect()
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    pub(crate) fn push_intent(&mut self, intent: MirrorIntent) {
        self.outbox.push_back(intent);
    }

    /// Index of a room, or the reported no-op for unknown ids.
    pub(crate) fn require_room(&self, room_id: &str) -> crate::LedgerResult<usize> {
        self.rooms
            .iter()
            .position(|room| room.id == room_id)
            .ok_or_else(|| crate::LedgerError::UnknownRoom(room_id.to_string()))
    }

    /// Re-derives one room's card amount: `card = max(0, total - cash)`.
    ///
    /// Runs after every operation that can move the total or the cash
    /// entry, keeping the split aligned unless the caller has just set the
    /// card side explicitly.
    pub(crate) fn resync_card_amount(&mut self, room_id: &str) {
        let total = self.room_total(room_id);
        if let Some(usage) = self.usage_by_room.get_mut(room_id) {
            usage.card_amount = total
                .saturating_sub_floor(Won::new(usage.cash_amount))
                .amount();
        }
    }

    /// Card re-derivation for every room, used after catalog swaps.
    pub(crate) fn resync_all_card_amounts(&mut self) {
        let room_ids: Vec<String> = self.rooms.iter().map(|room| room.id.clone()).collect();
        for room_id in room_ids {
            self.resync_card_amount(&room_id);
        }
    }

    /// Re-targets the selection when the selected room disappeared.
    pub(crate) fn fix_selection(&mut self) {
        let still_there = self
            .rooms
            .iter()
            .any(|room| room.id == self.selected_room_id);
        if !still_there {
            self.selected_room_id = self
                .rooms
                .first()
                .map(|room| room.id.clone())
                .unwrap_or_default();
        }
    }

    pub(crate) fn now() -> DateTime<Utc> {
        Utc::now()
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Integration-Style Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoomStatus;

    fn item_id(store: &LedgerStore, category: crate::types::Category) -> String {
        store
            .catalog()
            .iter()
            .find(|item| item.category == category)
            .map(|item| item.id.clone())
            .expect("default catalog carries every category")
    }

    #[test]
    fn test_new_store_seeds_defaults() {
        let store = LedgerStore::new();
        assert_eq!(store.rooms().len(), 4);
        assert_eq!(store.rooms()[0].name, "1번방");
        assert_eq!(store.catalog().len(), 4);
        assert_eq!(store.selected_room_id(), "room-1");
        assert!(store.active_session().is_none());
        assert!(store.sales().is_empty());
    }

    #[test]
    fn test_apply_snapshot_rehydrates_history() {
        let mut store = LedgerStore::new();
        let session = BusinessSession {
            id: "s-1".into(),
            start_time: Utc::now(),
            end_time: None,
        };
        store.apply_snapshot(LedgerSnapshot {
            sessions: vec![session.clone()],
            active_session_id: Some("s-1".into()),
            sales: Vec::new(),
        });

        assert_eq!(store.sessions().len(), 1);
        assert_eq!(store.active_session().map(|s| s.id.as_str()), Some("s-1"));
    }

    #[test]
    fn test_catalog_swap_resyncs_card_amounts() {
        let mut store = LedgerStore::new();
        let time = item_id(&store, crate::types::Category::Time);
        store.increment_item("room-1", &time).unwrap();
        store.set_cash_amount("room-1", 10_000).unwrap();
        assert_eq!(store.usage("room-1").unwrap().card_amount, 20_000);

        // Double the price of time; the card side follows the new total.
        let mut items = store.catalog().to_vec();
        items[0].price = 60_000;
        store.set_catalog(items);
        assert_eq!(store.usage("room-1").unwrap().card_amount, 50_000);
    }

    #[test]
    fn test_drain_intents_preserves_commit_order() {
        let mut store = LedgerStore::new();
        store.start_session().unwrap();
        store.settle("room-1").unwrap();
        store.end_session().unwrap();

        let kinds: Vec<&str> = store.drain_intents().iter().map(|i| i.kind()).collect();
        assert_eq!(
            kinds,
            vec!["session_started", "settlement_recorded", "session_ended"]
        );
        assert!(store.drain_intents().is_empty());
    }

    /// The full operator flow: open the day, run a room, settle it, and
    /// confirm the session keeps going.
    #[test]
    fn test_full_day_flow() {
        let mut store = LedgerStore::new();
        let time = item_id(&store, crate::types::Category::Time);
        let beer = item_id(&store, crate::types::Category::Beer);
        let room = store
            .rooms()
            .iter()
            .find(|r| r.name == "1번방")
            .map(|r| r.id.clone())
            .unwrap();

        store.start_session().unwrap();
        store.set_room_status(&room, RoomStatus::InProgress).unwrap();
        store.increment_item(&room, &time).unwrap();
        store.increment_item(&room, &beer).unwrap();
        store.increment_item(&room, &beer).unwrap();
        assert_eq!(store.room_total(&room).amount(), 40_000);

        store.settle(&room).unwrap();

        assert_eq!(store.sales().len(), 1);
        let room_after = store.room(&room).unwrap();
        assert_eq!(room_after.status, RoomStatus::Waiting);
        assert!(room_after.start_time.is_none());
        let usage = store.usage(&room).unwrap();
        assert!(usage.item_counts.values().all(|&count| count == 0) || usage.item_counts.is_empty());
        // Settlement does not close the business day.
        assert!(store.active_session().is_some());
    }
}
