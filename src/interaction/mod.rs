//! Press-and-hold interaction: a pure state machine and the session that
//! turns its commands into scene changes.

pub mod machine;
pub mod session;

pub use machine::{HoldCommand, HoldEvent, HoldState};
pub use session::InteractionSession;
