//! Conversation session state.
//!
//! A `Session` holds the lifecycle flags of one chat with the backend:
//! whether it is active, which conversation id namespaces the backend's
//! dialog state, how many empty utterances were heard in a row, and the
//! reply fragments of the current turn.

mod manager;
mod normalize;
mod types;


pub use manager::Session;
pub use types::{NormalizedReply, SessionState, NO_RESPONSE_SENTINEL};
