//=========================================================================
// Lifecycle and Input Errors
//=========================================================================

use thiserror::Error;

use crate::core::boundary::Status;

//=== LifecycleError ======================================================

/// Fatal engine bootstrap failures. Reported once, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Engine `init` returned a failure status.
    #[error("Unable to initialize (status {status})")]
    Init { status: Status },

    /// Engine `restore` returned a failure status.
    #[error("Unable to restore (status {status})")]
    Restore { status: Status },
}

//=== ProtocolAnomaly =====================================================

/// Malformed or redundant input delivery. Logged, never surfaced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolAnomaly {
    #[error("non-monotonic timestamp: {previous}ms then {current}ms")]
    NonMonotonicTimestamp { previous: i64, current: i64 },

    #[error("pointer #{id} pressed twice without release")]
    DuplicatePress { id: i32 },

    #[error("pointer #{id} is not being tracked")]
    UnknownPointer { id: i32 },

    #[error("sample has no pointer at index {index}")]
    MissingPointer { index: usize },

    #[error("surface size is {width}x{height}, cannot normalize")]
    EmptySurface { width: i32, height: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_messages_match_reported_text() {
        assert_eq!(LifecycleError::Init { status: -1 }.to_string(), "Unable to initialize (status -1)");
        assert_eq!(LifecycleError::Restore { status: 3 }.to_string(), "Unable to restore (status 3)");
    }

    #[test]
    fn anomaly_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ProtocolAnomaly>();
        assert_error::<LifecycleError>();
    }
}
