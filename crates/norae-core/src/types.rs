//! # Domain Types
//!
//! Core domain types for the karaoke-venue ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌────────────────────┐     │
//! │  │  CatalogItem  │   │     Room      │   │      Usage         │     │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────────   │     │
//! │  │  id           │   │  id / name    │   │  item_counts       │     │
//! │  │  price (won)  │   │  status       │   │  memo              │     │
//! │  │  category     │   │  start/end    │   │  cash / card       │     │
//! │  └───────────────┘   └───────────────┘   └────────────────────┘     │
//! │                                                                     │
//! │  ┌───────────────────┐   ┌──────────────────────────────────────┐   │
//! │  │  BusinessSession  │   │  SaleRecord (+ SaleLineItem)         │   │
//! │  │  ───────────────  │   │  ──────────────────────────────────  │   │
//! │  │  one open at a    │   │  immutable, append-only settlement   │   │
//! │  │  time, at most    │   │  snapshot with priced line items     │   │
//! │  └───────────────────┘   └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The core exclusively owns `Room` status/timestamps and `Usage`. The
//! catalog and the room-identity list are owned by the external layer and
//! only mirrored in. `SaleRecord` and `BusinessSession` are owned here and
//! mirrored out for durability.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Category
// =============================================================================

/// Billable-item category.
///
/// Categories drive the unit defaults and the Time-item guarantee; anything
/// the venue invents beyond the four known kinds collapses into `Etc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Room time (시간). Exactly one active catalog item always carries it.
    Time,
    /// Soft drinks (음료).
    Drink,
    /// Soju (소주).
    Soju,
    /// Beer (맥주).
    Beer,
    /// Everything else.
    Etc,
}

impl Category {
    /// Infers a category from free text: an explicit category field or, as
    /// legacy fallback, the item's display name.
    ///
    /// ## Legacy Shim — Reproduced Exactly
    /// Pre-existing catalog rows carry no category column; their kind was
    /// derived by substring-matching the Korean item name. That rule is
    /// load-bearing for round-tripping old data and must not be "improved":
    ///
    /// | match                      | category |
    /// |----------------------------|----------|
    /// | `"time"` or contains 시간  | Time     |
    /// | `"drink"` or contains 음료 | Drink    |
    /// | `"soju"` or contains 소주  | Soju     |
    /// | `"beer"` or contains 맥주  | Beer     |
    /// | anything else              | Etc      |
    ///
    /// Any new category keyword requires a corresponding substring rule.
    pub fn infer(text: &str) -> Category {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return Category::Etc;
        }
        if normalized == "time" || normalized.contains("시간") {
            Category::Time
        } else if normalized == "drink" || normalized.contains("음료") {
            Category::Drink
        } else if normalized == "soju" || normalized.contains("소주") {
            Category::Soju
        } else if normalized == "beer" || normalized.contains("맥주") {
            Category::Beer
        } else {
            Category::Etc
        }
    }

    /// Stable lowercase label, as persisted by the external store.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Time => "time",
            Category::Drink => "drink",
            Category::Soju => "soju",
            Category::Beer => "beer",
            Category::Etc => "etc",
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A billable product or service, normalized and ready for lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Unique identifier. UUID for persisted rows, `default-*` for built-ins.
    pub id: String,

    /// Display name shown on the usage panel and receipts.
    pub name: String,

    /// Billing unit label (시간 for time, 개 for countables).
    pub unit: String,

    /// Unit price in whole won, always ≥ 0.
    pub price: i64,

    /// Item category (drives unit defaults and the Time guarantee).
    pub category: Category,

    /// Position in the usage panel, renumbered 0..n-1 on normalization.
    pub display_order: i64,

    /// Whether the item is currently sellable (soft delete).
    pub is_active: bool,
}

/// A raw catalog row as delivered by the external source, before any
/// normalization. Field shapes deliberately match the remote table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCatalogRow {
    pub id: String,
    pub category: Option<String>,
    pub name: String,
    pub unit: Option<String>,
    pub default_unit_price: f64,
    pub display_order: Option<i64>,
    pub is_active: bool,
}

// =============================================================================
// Rooms
// =============================================================================

/// Lifecycle status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Empty and available.
    Waiting,
    /// Occupied; the clock is running.
    InProgress,
}

impl Default for RoomStatus {
    fn default() -> Self {
        RoomStatus::Waiting
    }
}

/// A karaoke room and its live occupancy state.
///
/// ## Invariants
/// - `InProgress` ⇒ `start_time` is set and `end_time` is `None`.
/// - A freshly reset room (settlement or session close) is `Waiting` with
///   `start_time = None`. A bare toggle back to `Waiting` keeps its
///   timestamps; callers wanting a clean slate settle or reset instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub status: RoomStatus,
    #[ts(as = "Option<String>")]
    pub start_time: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Room {
    /// Creates a waiting room from an identity.
    pub fn waiting(id: impl Into<String>, name: impl Into<String>) -> Self {
        Room {
            id: id.into(),
            name: name.into(),
            status: RoomStatus::Waiting,
            start_time: None,
            end_time: None,
        }
    }
}

/// An externally owned room identity (id + display name). The core mirrors
/// these via `register_rooms` and never invents or destroys them itself,
/// apart from the local convenience operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RoomIdentity {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Usage
// =============================================================================

/// The live, mutable per-room consumption ledger before settlement.
///
/// `cash_amount + card_amount` is *not* required to equal the bill while
/// work is in progress; the store re-derives the card side whenever the
/// total or the cash entry changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// Quantity per catalog item id, each ≥ 0. Counts for ids that have
    /// left the catalog are retained but excluded from totals.
    pub item_counts: HashMap<String, i64>,

    /// Free-form operator memo, stored verbatim.
    pub memo: String,

    /// Cash portion of the payment split, in won (≥ 0).
    pub cash_amount: i64,

    /// Card portion of the payment split, in won (≥ 0).
    pub card_amount: i64,
}

impl Usage {
    /// Quantity for one item id (0 when absent).
    pub fn count(&self, item_id: &str) -> i64 {
        self.item_counts.get(item_id).copied().unwrap_or(0)
    }
}

// =============================================================================
// Business Session
// =============================================================================

/// A bounded operating period (open → close) under which sales are
/// aggregated for daily reporting. At most one session is open at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSession {
    pub id: String,
    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub end_time: Option<DateTime<Utc>>,
}

impl BusinessSession {
    /// True while the session has not been closed.
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

// =============================================================================
// Sale Records
// =============================================================================

/// One priced line of a settlement, frozen at settlement time.
///
/// Prices are snapshotted per line for audit; later catalog edits never
/// change what a past customer was billed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineItem {
    /// Catalog item id at settlement time.
    pub item_id: String,
    /// Item name at settlement time (frozen).
    pub name: String,
    /// Billing unit at settlement time (frozen).
    pub unit: String,
    /// Unit price in won at settlement time (frozen).
    pub unit_price: i64,
    /// Quantity settled, always > 0 (zero-count lines are dropped).
    pub quantity: i64,
}

/// An immutable, append-only record of one settled room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: String,
    pub room_id: String,
    /// Room name at settlement time (rooms may be renamed later).
    pub room_name: String,
    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,
    #[ts(as = "String")]
    pub end_time: DateTime<Utc>,
    /// Bill total at settlement-time catalog prices, in won (≥ 0).
    pub total: i64,
    pub cash_amount: i64,
    pub card_amount: i64,
    pub memo: String,
    #[ts(as = "String")]
    pub settled_at: DateTime<Utc>,
    /// Whichever business session was open at settlement time; `None` when
    /// the room was settled outside any session.
    pub business_session_id: Option<String>,
    /// Priced breakdown of the bill.
    pub line_items: Vec<SaleLineItem>,
}

// =============================================================================
// Snapshot
// =============================================================================

/// The rehydration payload loaded once at startup from the durable store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub sessions: Vec<BusinessSession>,
    pub active_session_id: Option<String>,
    pub sales: Vec<SaleRecord>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_infer_english_tokens() {
        assert_eq!(Category::infer("time"), Category::Time);
        assert_eq!(Category::infer("  Drink "), Category::Drink);
        assert_eq!(Category::infer("SOJU"), Category::Soju);
        assert_eq!(Category::infer("beer"), Category::Beer);
    }

    #[test]
    fn test_category_infer_korean_substrings() {
        assert_eq!(Category::infer("시간"), Category::Time);
        assert_eq!(Category::infer("추가 시간권"), Category::Time);
        assert_eq!(Category::infer("음료수"), Category::Drink);
        assert_eq!(Category::infer("참이슬 소주"), Category::Soju);
        assert_eq!(Category::infer("카스 맥주 500"), Category::Beer);
    }

    #[test]
    fn test_category_infer_fallback() {
        assert_eq!(Category::infer(""), Category::Etc);
        assert_eq!(Category::infer("   "), Category::Etc);
        assert_eq!(Category::infer("양주"), Category::Etc);
        assert_eq!(Category::infer("snacks"), Category::Etc);
    }

    #[test]
    fn test_room_waiting_constructor() {
        let room = Room::waiting("room-1", "1번방");
        assert_eq!(room.status, RoomStatus::Waiting);
        assert!(room.start_time.is_none());
        assert!(room.end_time.is_none());
    }

    #[test]
    fn test_usage_count_defaults_to_zero() {
        let usage = Usage::default();
        assert_eq!(usage.count("missing"), 0);
        assert_eq!(usage.cash_amount, 0);
        assert_eq!(usage.card_amount, 0);
    }

    #[test]
    fn test_session_is_open() {
        let mut session = BusinessSession {
            id: "s-1".into(),
            start_time: Utc::now(),
            end_time: None,
        };
        assert!(session.is_open());
        session.end_time = Some(Utc::now());
        assert!(!session.is_open());
    }
}
