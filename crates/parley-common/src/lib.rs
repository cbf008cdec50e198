pub mod errors;
pub mod id;
pub mod phrase;

pub use errors::{ConfigError, ParleyError};
pub use id::{new_turn_id, ConversationId};
pub use phrase::normalize_phrase;
