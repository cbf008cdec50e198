//! Configuration schema types for Parley.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod backend;
mod dialog;
mod speech;
mod system;
mod triggers;

pub use backend::*;
pub use dialog::*;
pub use speech::*;
pub use system::*;
pub use triggers::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Parley.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ParleyConfig {
    pub backend: BackendConfig,
    pub dialog: DialogConfig,
    pub speech: SpeechConfig,
    pub triggers: TriggerConfig,
    pub logging: LoggingConfig,
}
