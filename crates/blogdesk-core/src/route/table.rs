//! The application's route table.

use std::fmt;

use super::guard::{GuardDecision, RouteGuard, RouteRequirement};
use crate::permission::{CREATE_POSTS, MANAGE_CATEGORIES, MANAGE_POSTS, MANAGE_USERS, MODERATE_COMMENTS};
use crate::session::Session;

/// Views the client can show. CRUD screens are opaque here; only their
/// identity and the parameters pulled out of the path matter to routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Home,
    SinglePost { id: String },
    CategoryManage,
    PostList,
    UserManage,
    NotFound,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Login => write!(f, "Login"),
            View::Register => write!(f, "Register"),
            View::Home => write!(f, "Home"),
            View::SinglePost { id } => write!(f, "SinglePost({})", id),
            View::CategoryManage => write!(f, "CategoryManage"),
            View::PostList => write!(f, "PostList"),
            View::UserManage => write!(f, "UserManage"),
            View::NotFound => write!(f, "NotFound"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewKind {
    Login,
    Register,
    Home,
    SinglePost,
    CategoryManage,
    PostList,
    UserManage,
}

/// One entry of the route table: a path pattern (`:name` segments capture),
/// the view it leads to and the permissions guarding it.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    pub pattern: &'static str,
    kind: ViewKind,
    pub requirement: RouteRequirement,
}

impl RouteDefinition {
    fn new(pattern: &'static str, kind: ViewKind, requirement: RouteRequirement) -> Self {
        Self {
            pattern,
            kind,
            requirement,
        }
    }

    /// Matches `path` against the pattern and builds the view on success.
    fn matches(&self, path: &str) -> Option<View> {
        let pattern_segments = segments(self.pattern);
        let path_segments = segments(path);
        if pattern_segments.len() != path_segments.len() {
            return None;
        }

        let mut id = None;
        for (expected, actual) in pattern_segments.iter().zip(&path_segments) {
            if let Some(_param) = expected.strip_prefix(':') {
                if actual.is_empty() {
                    return None;
                }
                id = Some(actual.to_string());
            } else if expected != actual {
                return None;
            }
        }

        Some(match self.kind {
            ViewKind::Login => View::Login,
            ViewKind::Register => View::Register,
            ViewKind::Home => View::Home,
            ViewKind::SinglePost => View::SinglePost { id: id? },
            ViewKind::CategoryManage => View::CategoryManage,
            ViewKind::PostList => View::PostList,
            ViewKind::UserManage => View::UserManage,
        })
    }
}

/// Splits a path into segments, ignoring the query string, fragment and
/// trailing slash.
fn segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Resolves paths to views, applying the route guard to protected entries.
///
/// Unknown paths and guarded paths the session may not open both resolve to
/// [`View::NotFound`].
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<RouteDefinition>,
    guard: RouteGuard,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// The blog client's route table.
    pub fn new() -> Self {
        let routes = vec![
            RouteDefinition::new("/login", ViewKind::Login, RouteRequirement::public()),
            RouteDefinition::new("/register", ViewKind::Register, RouteRequirement::public()),
            RouteDefinition::new("/", ViewKind::Home, RouteRequirement::public()),
            RouteDefinition::new("/post/:id", ViewKind::SinglePost, RouteRequirement::public()),
            RouteDefinition::new(
                "/category",
                ViewKind::CategoryManage,
                RouteRequirement::single(MANAGE_CATEGORIES),
            ),
            RouteDefinition::new(
                "/manage-posts",
                ViewKind::PostList,
                RouteRequirement::any_of([MANAGE_POSTS, CREATE_POSTS, MODERATE_COMMENTS]),
            ),
            RouteDefinition::new(
                "/manage-users",
                ViewKind::UserManage,
                RouteRequirement::any_of([MANAGE_USERS]),
            ),
        ];

        Self {
            routes,
            guard: RouteGuard::new(),
        }
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    /// Resolves `path` for `session`. Recomputed on every call.
    pub fn navigate(&self, path: &str, session: &Session) -> View {
        for route in &self.routes {
            if let Some(view) = route.matches(path) {
                return match self.guard.decide(session, &route.requirement) {
                    GuardDecision::Render => view,
                    GuardDecision::NotFound => View::NotFound,
                };
            }
        }

        View::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserIdentity;

    fn session_with(permissions: &[&str]) -> Session {
        Session::authenticated("T1", UserIdentity::default(), permissions.iter().copied()).unwrap()
    }

    #[test]
    fn test_public_routes() {
        let router = Router::new();
        let anonymous = Session::unauthenticated();

        assert_eq!(router.navigate("/", &anonymous), View::Home);
        assert_eq!(router.navigate("/login", &anonymous), View::Login);
        assert_eq!(router.navigate("/register/", &anonymous), View::Register);
        assert_eq!(
            router.navigate("/post/42?comments=1", &anonymous),
            View::SinglePost { id: "42".to_string() }
        );
    }

    #[test]
    fn test_unknown_paths_are_not_found() {
        let router = Router::new();
        let anonymous = Session::unauthenticated();

        assert_eq!(router.navigate("/post", &anonymous), View::NotFound);
        assert_eq!(router.navigate("/post/1/edit", &anonymous), View::NotFound);
        assert_eq!(router.navigate("/nope", &anonymous), View::NotFound);
    }

    #[test]
    fn test_unauthenticated_cannot_open_user_management() {
        let router = Router::new();
        assert_eq!(
            router.navigate("/manage-users", &Session::unauthenticated()),
            View::NotFound
        );
    }

    #[test]
    fn test_protected_routes_with_permissions() {
        let router = Router::new();

        assert_eq!(
            router.navigate("/manage-users", &session_with(&[MANAGE_USERS])),
            View::UserManage
        );
        assert_eq!(
            router.navigate("/category", &session_with(&[MANAGE_CATEGORIES])),
            View::CategoryManage
        );
        assert_eq!(
            router.navigate("/category", &session_with(&[MANAGE_POSTS])),
            View::NotFound
        );

        for permission in [MANAGE_POSTS, CREATE_POSTS, MODERATE_COMMENTS] {
            assert_eq!(
                router.navigate("/manage-posts", &session_with(&[permission])),
                View::PostList
            );
        }
        assert_eq!(
            router.navigate("/manage-posts", &session_with(&[MANAGE_USERS])),
            View::NotFound
        );
    }

    #[test]
    fn test_view_display() {
        assert_eq!(View::SinglePost { id: "7".to_string() }.to_string(), "SinglePost(7)");
        assert_eq!(View::NotFound.to_string(), "NotFound");
    }
}
