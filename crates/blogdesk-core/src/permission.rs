//! Permission evaluation.
//!
//! Permissions are server-defined string tags. The client never validates a
//! name; it only tests exact, case-sensitive membership in the session's set.

use crate::session::Session;

/// Grants access to the category management view.
pub const MANAGE_CATEGORIES: &str = "manage categories";
/// Grants access to the post management view.
pub const MANAGE_POSTS: &str = "manage posts";
/// Grants access to the post management view.
pub const CREATE_POSTS: &str = "create posts";
/// Grants access to the post management view.
pub const MODERATE_COMMENTS: &str = "moderate comments";
/// Grants access to the user management view.
pub const MANAGE_USERS: &str = "manage users";

/// True iff the session's permission set contains `permission` exactly.
///
/// An unauthenticated session has no permissions, so this is always false
/// for it.
pub fn has_permission(session: &Session, permission: &str) -> bool {
    session.permissions().contains(permission)
}

/// True iff `permissions` is empty or at least one entry passes
/// [`has_permission`].
///
/// The empty case is vacuously true: a requirement that names no permission
/// admits every session, authenticated or not.
pub fn has_any_permission<S: AsRef<str>>(session: &Session, permissions: &[S]) -> bool {
    permissions.is_empty()
        || permissions
            .iter()
            .any(|permission| has_permission(session, permission.as_ref()))
}
