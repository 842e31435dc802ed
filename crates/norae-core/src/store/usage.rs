//! # Usage Ledger Operations
//!
//! Per-room accumulation of item counts, memo text, and the cash/card
//! payment split.
//!
//! ## The Card-Follows-Total Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  The operator types the cash portion; the card portion is derived:  │
//! │                                                                     │
//! │      card = max(0, total - cash)                                    │
//! │                                                                     │
//! │  and RE-derived after anything that moves the total (item counts,   │
//! │  catalog price edits) so the split tracks the live bill. Setting    │
//! │  the card amount explicitly overrides the derivation until the      │
//! │  next total or cash change.                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::LedgerResult;
use crate::money::Won;
use crate::types::Usage;

use super::LedgerStore;

impl LedgerStore {
    /// Adds one unit of an item to a room's ledger.
    ///
    /// The item id is not validated against the catalog: counts for ids
    /// that later leave the catalog are retained (and priced at zero), so
    /// accepting unknown ids keeps the two directions symmetric.
    pub fn increment_item(&mut self, room_id: &str, item_id: &str) -> LedgerResult<()> {
        self.require_room(room_id)?;
        let usage = self.usage_by_room.entry(room_id.to_string()).or_default();
        *usage.item_counts.entry(item_id.to_string()).or_insert(0) += 1;
        self.resync_card_amount(room_id);
        Ok(())
    }

    /// Removes one unit of an item from a room's ledger, flooring at zero.
    pub fn decrement_item(&mut self, room_id: &str, item_id: &str) -> LedgerResult<()> {
        self.require_room(room_id)?;
        let usage = self.usage_by_room.entry(room_id.to_string()).or_default();
        let count = usage.item_counts.entry(item_id.to_string()).or_insert(0);
        *count = (*count - 1).max(0);
        self.resync_card_amount(room_id);
        Ok(())
    }

    /// Overwrites a room's memo verbatim.
    pub fn set_memo(&mut self, room_id: &str, memo: &str) -> LedgerResult<()> {
        self.require_room(room_id)?;
        let usage = self.usage_by_room.entry(room_id.to_string()).or_default();
        usage.memo = memo.to_string();
        Ok(())
    }

    /// Sets the cash portion of the split (clamped ≥ 0) and re-derives the
    /// card portion against the live total.
    pub fn set_cash_amount(&mut self, room_id: &str, amount: i64) -> LedgerResult<()> {
        self.require_room(room_id)?;
        let usage = self.usage_by_room.entry(room_id.to_string()).or_default();
        usage.cash_amount = Won::clamp_non_negative(amount).amount();
        self.resync_card_amount(room_id);
        Ok(())
    }

    /// Sets the card portion explicitly (clamped ≥ 0).
    ///
    /// This is an override: it is NOT re-derived here, and it holds only
    /// until the next total or cash change re-runs the derivation.
    pub fn set_card_amount(&mut self, room_id: &str, amount: i64) -> LedgerResult<()> {
        self.require_room(room_id)?;
        let usage = self.usage_by_room.entry(room_id.to_string()).or_default();
        usage.card_amount = Won::clamp_non_negative(amount).amount();
        Ok(())
    }

    /// Replaces a room's ledger with an empty one. Room status and
    /// timestamps are untouched.
    pub fn reset_usage(&mut self, room_id: &str) -> LedgerResult<()> {
        self.require_room(room_id)?;
        self.usage_by_room
            .insert(room_id.to_string(), Usage::default());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
