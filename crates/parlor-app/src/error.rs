//! Controller errors.
//!
//! Errors local to the join workflow become state ([`JoinRejected`] is
//! stored, displayed, and retryable); errors that prevent the controller
//! from functioning at all propagate from `attach` as [`AttachError`].

use parlor_core::RoomId;
use thiserror::Error;

/// Failure to attach the controller to a room.
#[derive(Debug, Error)]
pub enum AttachError {
    /// The requested room is not known to the messaging client.
    #[error("room {0} is not known to the messaging client")]
    RoomNotFound(RoomId),

    /// No live messaging connection was available to subscribe on.
    #[error("no live messaging connection available")]
    SubscriptionUnavailable,
}

/// An asynchronous join request was rejected.
///
/// Carries the protocol error code (for example `M_FORBIDDEN`). Never fatal:
/// the controller stores it for display and the user may retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("join rejected: {code}")]
pub struct JoinRejected {
    /// Protocol-level error code.
    pub code: String,
}

impl JoinRejected {
    /// Create a rejection with the given protocol error code.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
