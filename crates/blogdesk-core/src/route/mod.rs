//! Route protection.
//!
//! - `guard`: `RouteGuard` and the per-view `RouteRequirement`
//! - `table`: the client's route table and path resolution

mod guard;
mod table;

pub use guard::{GuardDecision, ProtectedRoute, Rendered, RouteGuard, RouteRequirement};
pub use table::{RouteDefinition, Router, View};
