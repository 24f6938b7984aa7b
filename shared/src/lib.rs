//! Shared types for the labreserve client
//!
//! Domain models and API DTOs used by both the gateway crate and the
//! terminal application. All wire shapes follow the backend's JSON
//! contract (camelCase fields, SCREAMING_SNAKE enums).

pub mod client;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};
