//! REST webhook client for Rasa-style dialog servers.
//!
//! Posts `{"message": ..., "sender_id": ...}` to the configured endpoint
//! and decodes the JSON array of reply fragments.

mod api;
mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::RestClient;
pub use config::RestConfig;
