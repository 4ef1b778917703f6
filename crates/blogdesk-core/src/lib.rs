//! Domain layer for blogdesk: sessions, permissions and route protection.
//!
//! Nothing in this crate performs I/O. Persistence and the HTTP API are
//! reached through the [`session::SessionStore`] and [`auth::AuthApi`] traits,
//! implemented in `blogdesk-infrastructure`.

pub mod auth;
pub mod config;
pub mod error;
pub mod permission;
pub mod route;
pub mod session;

// Re-export common error type
pub use error::BlogdeskError;
pub use session::Session;
