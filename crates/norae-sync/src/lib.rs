//! # norae-sync: Mirror Dispatcher for the Norae Ledger
//!
//! Fire-and-forget mirroring of finalized ledger entities (business
//! sessions, settled sales) to a durable-store collaborator. The local
//! in-memory ledger in `norae-core` is always authoritative; this crate
//! only keeps a best-effort backup behind it.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         norae-sync                                  │
//! │                                                                     │
//! │  norae-core::LedgerStore                                            │
//! │        │ drain_intents()                                            │
//! │        ▼                                                            │
//! │  forward_intents ──► MirrorHandle ──► MirrorDispatcher              │
//! │                      (try_send,        │ one attempt per intent     │
//! │                       never blocks)    ▼                            │
//! │                                   LedgerSink (trait)                │
//! │                                     ├── MemorySink (reference)      │
//! │                                     └── remote store impls          │
//! │                                                                     │
//! │  Failures become advisory MirrorReports; nothing is retried or      │
//! │  rolled back here.                                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup
//! `hydrate` loads a [`LedgerSnapshot`](norae_core::types::LedgerSnapshot)
//! from the sink exactly once; the caller feeds it into
//! `LedgerStore::apply_snapshot` or, on failure, starts with empty history.

pub mod dispatcher;
pub mod error;
pub mod sink;

pub use dispatcher::{forward_intents, hydrate, MirrorDispatcher, MirrorHandle, MirrorReport};
pub use error::{MirrorError, MirrorResult};
pub use sink::{LedgerSink, MemorySink};
