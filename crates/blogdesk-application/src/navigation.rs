//! Navigation menu derived from the current session.

use std::fmt;
use std::sync::Arc;

use blogdesk_core::permission::{
    CREATE_POSTS, MANAGE_CATEGORIES, MANAGE_POSTS, MANAGE_USERS, MODERATE_COMMENTS,
    has_any_permission, has_permission,
};
use blogdesk_core::session::Session;
use tokio::sync::watch;

/// One entry of the top navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Home,
    CategoryManage,
    BlogManage,
    UserManage,
    Login,
    Register,
    /// An action rather than a route.
    Logout,
}

impl NavLink {
    pub fn label(&self) -> &'static str {
        match self {
            NavLink::Home => "Home",
            NavLink::CategoryManage => "Category Manage",
            NavLink::BlogManage => "Blog Manage",
            NavLink::UserManage => "User Manage",
            NavLink::Login => "Login",
            NavLink::Register => "Register",
            NavLink::Logout => "Logout",
        }
    }

    /// Route the link points at; `None` for [`NavLink::Logout`].
    pub fn path(&self) -> Option<&'static str> {
        match self {
            NavLink::Home => Some("/"),
            NavLink::CategoryManage => Some("/category"),
            NavLink::BlogManage => Some("/manage-posts"),
            NavLink::UserManage => Some("/manage-users"),
            NavLink::Login => Some("/login"),
            NavLink::Register => Some("/register"),
            NavLink::Logout => None,
        }
    }
}

impl fmt::Display for NavLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Links visible for `session`, in display order.
///
/// Management links mirror the route table's requirements, so a visible link
/// never leads to the not-found view.
pub fn navigation_menu(session: &Session) -> Vec<NavLink> {
    let mut links = vec![NavLink::Home];

    if has_permission(session, MANAGE_CATEGORIES) {
        links.push(NavLink::CategoryManage);
    }
    if has_any_permission(session, &[MANAGE_POSTS, CREATE_POSTS, MODERATE_COMMENTS]) {
        links.push(NavLink::BlogManage);
    }
    if has_permission(session, MANAGE_USERS) {
        links.push(NavLink::UserManage);
    }

    if session.is_authenticated() {
        links.push(NavLink::Logout);
    } else {
        links.push(NavLink::Login);
        links.push(NavLink::Register);
    }

    links
}

/// Keeps a menu in step with the session published by the auth manager.
pub struct NavigationModel {
    receiver: watch::Receiver<Arc<Session>>,
    menu: Vec<NavLink>,
}

impl NavigationModel {
    pub fn new(mut receiver: watch::Receiver<Arc<Session>>) -> Self {
        let menu = navigation_menu(&receiver.borrow_and_update());
        Self { receiver, menu }
    }

    pub fn menu(&self) -> &[NavLink] {
        &self.menu
    }

    /// Waits for the next session change and recomputes the menu.
    ///
    /// Returns `false` once the publishing side is gone.
    pub async fn changed(&mut self) -> bool {
        if self.receiver.changed().await.is_err() {
            return false;
        }
        self.menu = navigation_menu(&self.receiver.borrow_and_update());
        true
    }
}
