//! labreserve-client - typed gateway for the laboratory reservation API
//!
//! Provides the session state (token + role, persisted across runs) and
//! one typed request surface per resource family over the backend's
//! REST contract.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use session::{SessionData, SessionEvent, SessionHandle, SessionStore};

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse, RegisterRequest};
