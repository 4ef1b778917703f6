//! Route guard: render the target view or the not-found fallback.

use crate::permission::has_any_permission;
use crate::session::Session;

/// Permissions a protected view declares. Satisfied by holding any one of them.
///
/// An empty requirement admits every session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequirement {
    permissions: Vec<String>,
}

impl RouteRequirement {
    /// No permission required.
    pub fn public() -> Self {
        Self::default()
    }

    /// Exactly one permission required.
    pub fn single(permission: impl Into<String>) -> Self {
        Self {
            permissions: vec![permission.into()],
        }
    }

    /// Any one of `permissions` is sufficient.
    pub fn any_of<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Combines the two ways a route can declare its requirement.
    ///
    /// A declared list takes precedence over a single name, even when the list
    /// is empty.
    pub fn from_declaration(single: Option<String>, list: Option<Vec<String>>) -> Self {
        match (list, single) {
            (Some(list), _) => Self::any_of(list),
            (None, Some(single)) => Self::single(single),
            (None, None) => Self::public(),
        }
    }

    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    pub fn is_public(&self) -> bool {
        self.permissions.is_empty()
    }

    pub fn is_satisfied_by(&self, session: &Session) -> bool {
        has_any_permission(session, &self.permissions)
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Deliberately indistinguishable from a missing page, so restricted views
    /// are not revealed to sessions that cannot open them.
    NotFound,
}

/// A view together with the requirement guarding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoute<V> {
    pub view: V,
    pub requirement: RouteRequirement,
}

impl<V> ProtectedRoute<V> {
    pub fn new(view: V, requirement: RouteRequirement) -> Self {
        Self { view, requirement }
    }
}

/// What the guard hands back for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered<'a, V> {
    View(&'a V),
    NotFound,
}

/// Stateless guard. Every call recomputes the decision from the session it is
/// given; nothing is cached between navigations.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn decide(&self, session: &Session, requirement: &RouteRequirement) -> GuardDecision {
        let decision = if requirement.is_satisfied_by(session) {
            GuardDecision::Render
        } else {
            GuardDecision::NotFound
        };

        tracing::debug!(
            "[RouteGuard] requirement={:?} authenticated={} -> {:?}",
            requirement.permissions(),
            session.is_authenticated(),
            decision
        );

        decision
    }

    pub fn resolve<'a, V>(&self, session: &Session, route: &'a ProtectedRoute<V>) -> Rendered<'a, V> {
        match self.decide(session, &route.requirement) {
            GuardDecision::Render => Rendered::View(&route.view),
            GuardDecision::NotFound => Rendered::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::{MANAGE_POSTS, MANAGE_USERS};
    use crate::session::UserIdentity;

    fn session_with(permissions: &[&str]) -> Session {
        Session::authenticated("T1", UserIdentity::default(), permissions.iter().copied()).unwrap()
    }

    #[test]
    fn test_unauthenticated_gets_not_found() {
        let guard = RouteGuard::new();
        let route = ProtectedRoute::new("users", RouteRequirement::any_of([MANAGE_USERS]));

        assert_eq!(
            guard.resolve(&Session::unauthenticated(), &route),
            Rendered::NotFound
        );
    }

    #[test]
    fn test_public_route_renders_for_anyone() {
        let guard = RouteGuard::new();
        let route = ProtectedRoute::new("home", RouteRequirement::public());

        assert_eq!(
            guard.resolve(&Session::unauthenticated(), &route),
            Rendered::View(&"home")
        );
        assert_eq!(guard.resolve(&session_with(&[]), &route), Rendered::View(&"home"));
    }

    #[test]
    fn test_any_of_requirement() {
        let guard = RouteGuard::new();
        let requirement = RouteRequirement::any_of([MANAGE_USERS, MANAGE_POSTS]);

        assert_eq!(
            guard.decide(&session_with(&[MANAGE_POSTS]), &requirement),
            GuardDecision::Render
        );
        assert_eq!(
            guard.decide(&session_with(&["create posts"]), &requirement),
            GuardDecision::NotFound
        );
    }

    #[test]
    fn test_decision_follows_session_changes() {
        let guard = RouteGuard::new();
        let requirement = RouteRequirement::single(MANAGE_USERS);

        let before = Session::unauthenticated();
        let after = session_with(&[MANAGE_USERS]);

        assert_eq!(guard.decide(&before, &requirement), GuardDecision::NotFound);
        assert_eq!(guard.decide(&after, &requirement), GuardDecision::Render);
        assert_eq!(guard.decide(&before, &requirement), GuardDecision::NotFound);
    }

    #[test]
    fn test_declaration_precedence() {
        let list_wins = RouteRequirement::from_declaration(
            Some(MANAGE_POSTS.to_string()),
            Some(vec![MANAGE_USERS.to_string()]),
        );
        assert_eq!(list_wins.permissions().to_vec(), vec![MANAGE_USERS.to_string()]);

        let empty_list = RouteRequirement::from_declaration(Some(MANAGE_POSTS.to_string()), Some(vec![]));
        assert!(empty_list.is_public());

        let single = RouteRequirement::from_declaration(Some(MANAGE_POSTS.to_string()), None);
        assert_eq!(single.permissions().to_vec(), vec![MANAGE_POSTS.to_string()]);

        assert!(RouteRequirement::from_declaration(None, None).is_public());
    }
}
