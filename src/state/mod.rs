//! In-process state containers backing the command surface
//!
//! Thin stateful wrappers over the adapter: `SessionState` tracks the
//! authenticated user, `CheckinState` tracks the points view and calendar.
//! Commands read from these instead of calling the adapter directly, so a
//! command that touches both views works from one consistent snapshot.

pub mod checkin;
pub mod session;

pub use checkin::CheckinState;
pub use session::SessionState;
