//! Application layer for blogdesk.
//!
//! Coordinates the domain types from `blogdesk-core` with whatever store and
//! API implementations the caller wires in.

pub mod auth_session_manager;
pub mod navigation;

pub use auth_session_manager::AuthSessionManager;
pub use navigation::{NavLink, NavigationModel, navigation_menu};
