//! What happens after a hold completes: the unlock sequence on the held node
//! and the cascades it starts toward newly unlockable children.

pub mod cascade;
pub mod orchestrator;

pub use cascade::{Cascade, CascadeRunner, CompletionBarrier};
pub use orchestrator::{UnlockContext, UnlockOrchestrator, UnlockPhase, UnlockProgress};
