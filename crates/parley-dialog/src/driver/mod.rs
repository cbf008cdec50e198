//! Conversation turn driver.
//!
//! `TurnDriver` owns the session and runs the listen / send / speak loop
//! against a `DialogBackend` and a speech collaborator until a stop
//! condition is reached.

mod policy;
mod summary;
mod turn;

#[cfg(test)]
mod tests;

pub use policy::TurnPolicy;
pub use summary::{ConversationSummary, EndReason};
pub use turn::TurnDriver;
