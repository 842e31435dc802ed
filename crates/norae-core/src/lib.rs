//! # norae-core: Pure Business Logic for the Norae Ledger
//!
//! This crate is the **heart** of the karaoke-venue ledger. It holds the
//! room/session/settlement state machine as a single-writer, in-memory
//! reducer with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Norae Ledger Architecture                      │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                       UI Shell (external)                     │  │
//! │  │   Room grid ──► Usage panel ──► Payment split ──► Settle      │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │ intents                           │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │               ★ norae-core (THIS CRATE) ★                     │  │
//! │  │                                                               │  │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌────────┐  │  │
//! │  │  │ catalog │ │  money  │ │  types  │ │  store  │ │ outbox │  │  │
//! │  │  │ rows →  │ │  Won    │ │ Room    │ │ reducer │ │ Mirror │  │  │
//! │  │  │ items   │ │ integer │ │ Usage   │ │ + views │ │ Intent │  │  │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └────────┘  │  │
//! │  │                                                               │  │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • SINGLE WRITER            │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │ drained intents                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │                 norae-sync (Mirror Dispatcher)                │  │
//! │  │        fire-and-forget writes to the durable store            │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Room, Usage, BusinessSession, SaleRecord)
//! - [`money`] - Integer won with tolerant numeric coercion
//! - [`catalog`] - Catalog row normalization and the Time-item guarantee
//! - [`store`] - The [`store::LedgerStore`] reducer and derived views
//! - [`outbox`] - Mirror intents emitted by committed transitions
//! - [`error`] - Reported-no-op precondition errors
//!
//! ## Design Principles
//!
//! 1. **Single writer**: every mutation runs to completion before the next
//!    is accepted; there is no locking because there is no parallelism here.
//! 2. **No fatal path**: precondition violations return a typed error and
//!    leave state untouched; numeric garbage is clamped, never rejected.
//! 3. **Local commit first**: durable mirroring happens strictly after the
//!    in-memory transition, via the outbox, and never rolls it back.
//!
//! ## Example Usage
//!
//! ```rust
//! use norae_core::store::LedgerStore;
//! use norae_core::types::RoomStatus;
//!
//! let mut store = LedgerStore::new();
//! let room_id = store.rooms()[0].id.clone();
//! let time_id = store.catalog()[0].id.clone();
//!
//! store.set_room_status(&room_id, RoomStatus::InProgress).unwrap();
//! store.increment_item(&room_id, &time_id).unwrap();
//! assert_eq!(store.room_total(&room_id).amount(), 30_000);
//!
//! store.settle(&room_id).unwrap();
//! assert_eq!(store.sales().len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod outbox;
pub mod store;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{LedgerError, LedgerResult};
pub use money::Won;
pub use outbox::MirrorIntent;
pub use store::LedgerStore;
pub use types::*;
