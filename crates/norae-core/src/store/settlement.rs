//! # Settlement Engine
//!
//! The transition that freezes a room's live usage into an immutable sale
//! record, resets the room, and appends to the sales history.
//!
//! ## Settlement Transition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        settle(room_id)                              │
//! │                                                                     │
//! │  1. Look up room + usage (unknown room → reported no-op)            │
//! │  2. Price the bill at CURRENT catalog prices                        │
//! │  3. Snapshot priced line items (quantity > 0 only) for audit        │
//! │  4. Build the SaleRecord                                            │
//! │       start   = room.start_time ?? now   (never-started rooms       │
//! │                 settle as a zero-duration record, not an error)     │
//! │       end     = settled_at = now                                    │
//! │       session = open session id, or None (sales outside any         │
//! │                 session are allowed)                                │
//! │  5. Append to history (append-only, settlement order)               │
//! │  6. Reset room: Waiting, start = None, end = now                    │
//! │  7. Clear the room's usage ledger                                   │
//! │  8. Emit the SettlementRecorded mirror intent                       │
//! │                                                                     │
//! │  Steps 4-8 happen inside one &mut borrow of the store: a reader     │
//! │  can never observe the sale recorded with the usage still live.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::LedgerResult;
use crate::money::Won;
use crate::outbox::MirrorIntent;
use crate::types::{RoomStatus, SaleLineItem, SaleRecord, Usage};

use super::{new_uuid, LedgerStore};

impl LedgerStore {
    /// Settles a room: freezes its usage into a [`SaleRecord`], resets the
    /// room to waiting, and clears its ledger.
    ///
    /// Returns the id of the appended record. A reported no-op for unknown
    /// rooms; everything else about the room's state is acceptable input
    /// (a never-started room settles as a zero-duration sale).
    pub fn settle(&mut self, room_id: &str) -> LedgerResult<String> {
        let index = self.require_room(room_id)?;
        let settled_at = Self::now();

        let usage = self
            .usage_by_room
            .get(room_id)
            .cloned()
            .unwrap_or_default();

        // Price the bill and freeze the breakdown before touching state.
        let total: Won = self
            .catalog
            .iter()
            .filter(|item| item.is_active)
            .map(|item| Won::new(item.price) * usage.count(&item.id))
            .sum();
        let line_items: Vec<SaleLineItem> = self
            .catalog
            .iter()
            .filter(|item| item.is_active && usage.count(&item.id) > 0)
            .map(|item| SaleLineItem {
                item_id: item.id.clone(),
                name: item.name.clone(),
                unit: item.unit.clone(),
                unit_price: item.price,
                quantity: usage.count(&item.id),
            })
            .collect();

        let room = &mut self.rooms[index];
        let record = SaleRecord {
            id: new_uuid(),
            room_id: room.id.clone(),
            room_name: room.name.clone(),
            start_time: room.start_time.unwrap_or(settled_at),
            end_time: settled_at,
            total: total.amount(),
            cash_amount: usage.cash_amount,
            card_amount: usage.card_amount,
            memo: usage.memo,
            settled_at,
            business_session_id: self.active_session_id.clone(),
            line_items,
        };

        room.status = RoomStatus::Waiting;
        room.start_time = None;
        room.end_time = Some(settled_at);

        self.usage_by_room
            .insert(room_id.to_string(), Usage::default());

        let record_id = record.id.clone();
        self.sales.push(record.clone());
        self.push_intent(MirrorIntent::SettlementRecorded { record });
        Ok(record_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
