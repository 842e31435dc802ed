//! # Mirror Error Types
//!
//! Error types for mirror writes and snapshot loads.
//!
//! ## Error Philosophy
//! Nothing here is fatal to the ledger: by the time an error surfaces the
//! local transition is committed and visible. Errors exist so failures can
//! be reported upward as advisory notifications, not so anyone can roll
//! anything back.

use thiserror::Error;

/// Result type alias for mirror operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// A mirror operation failure.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The durable store rejected or failed a mirror write. The local
    /// ledger stays authoritative; the entity is simply not backed up yet.
    #[error("Mirror write rejected: {0}")]
    WriteRejected(String),

    /// The startup snapshot could not be loaded; the caller starts from an
    /// empty history instead.
    #[error("Ledger snapshot unavailable: {0}")]
    SnapshotUnavailable(String),

    /// A mirror payload failed to serialize.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The dispatcher's channel is gone (shutdown already happened).
    #[error("Mirror channel closed: {0}")]
    ChannelClosed(String),
}

impl MirrorError {
    /// True for failures of an actual write attempt, as opposed to local
    /// plumbing problems. Used when classifying advisory reports.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, MirrorError::WriteRejected(_))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_failure_classification() {
        assert!(MirrorError::WriteRejected("timeout".into()).is_write_failure());
        assert!(!MirrorError::ChannelClosed("gone".into()).is_write_failure());
    }

    #[test]
    fn test_error_display() {
        let err = MirrorError::SnapshotUnavailable("network unreachable".into());
        assert_eq!(
            err.to_string(),
            "Ledger snapshot unavailable: network unreachable"
        );
    }
}
