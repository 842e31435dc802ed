//! # Error Types
//!
//! Precondition errors for the ledger reducer.
//!
//! ## Error Philosophy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 Reported No-Ops, Never Failures                     │
//! │                                                                     │
//! │  The ledger is driven by a touch UI: double-taps, stale buttons     │
//! │  and out-of-order clicks are normal input, not bugs. So:            │
//! │                                                                     │
//! │  • A precondition violation returns Err(..) AND leaves the state    │
//! │    byte-for-byte unchanged. Callers may ignore the Err freely.      │
//! │  • Malformed numbers are clamped on the way in, never rejected.     │
//! │  • Nothing in the core panics; there is no fatal path.              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// A precondition that made an operation a no-op.
///
/// Every variant means "nothing happened"; none is fatal and none leaves
/// partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The room id is not registered (it may have been removed by the
    /// external room-identity owner while the UI still showed it).
    #[error("Unknown room: {0}")]
    UnknownRoom(String),

    /// `start_session` while a session is already open. Double-tapping the
    /// open button leaves exactly one session open.
    #[error("A business session is already open")]
    SessionAlreadyOpen,

    /// `end_session` with nothing to close.
    #[error("No business session is open")]
    NoOpenSession,

    /// `remove_room` would leave the venue with zero rooms.
    #[error("Cannot remove the last room")]
    LastRoom,

    /// `register_rooms` with an empty identity list; wiping every room is
    /// assumed to be a collaborator glitch and ignored.
    #[error("Room identity list is empty")]
    EmptyRoomList,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LedgerError::UnknownRoom("room-9".into()).to_string(),
            "Unknown room: room-9"
        );
        assert_eq!(
            LedgerError::SessionAlreadyOpen.to_string(),
            "A business session is already open"
        );
    }
}
