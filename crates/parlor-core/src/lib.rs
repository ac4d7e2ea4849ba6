//! Core data model for Parlor.
//!
//! Plain domain types shared by the controller and the test harness: room,
//! user, and event identifiers, membership state, timeline events, immutable
//! room snapshots, and viewport scroll probes. No I/O and no protocol
//! mechanics live here.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod event;
mod id;
mod membership;
mod scroll;
mod snapshot;

pub use event::TimelineEvent;
pub use id::{EventId, RoomId, UserId};
pub use membership::Membership;
pub use scroll::ScrollProbe;
pub use snapshot::RoomSnapshot;
