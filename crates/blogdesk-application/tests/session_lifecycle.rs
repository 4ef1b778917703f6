//! End-to-end session lifecycle: HTTP API, persisted store, manager, guard.

use std::sync::Arc;

use blogdesk_application::{AuthSessionManager, NavLink, NavigationModel};
use blogdesk_core::auth::{AuthError, LoginCredentials};
use blogdesk_core::config::ClientConfig;
use blogdesk_core::permission::{has_permission, MANAGE_POSTS};
use blogdesk_core::route::{Router, View};
use blogdesk_core::session::SessionStore;
use blogdesk_infrastructure::storage::FileKeyValueStore;
use blogdesk_infrastructure::{HttpAuthApi, KeyValueSessionStore, RestClient};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn wire(server: &MockServer, dir: &TempDir) -> AuthSessionManager {
    let config = ClientConfig {
        api_base_url: format!("{}/api", server.uri()),
        ..ClientConfig::default()
    };
    let api = HttpAuthApi::new(RestClient::new(&config).unwrap());
    let store = KeyValueSessionStore::new(FileKeyValueStore::new(dir.path()));
    AuthSessionManager::new(Arc::new(store), Arc::new(api))
}

#[tokio::test]
async fn test_login_survives_restart_and_logout_clears() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "T1",
            "name": "Ada",
            "permission": ["manage posts"]
        })))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let router = Router::new();

    let manager = wire(&server, &dir);
    manager.initialize().await.unwrap();
    assert_eq!(
        router.navigate("/manage-posts", &manager.current_session()),
        View::NotFound
    );

    manager
        .login(&LoginCredentials::new("ada@example.com", "pw"))
        .await
        .unwrap();
    assert_eq!(
        router.navigate("/manage-posts", &manager.current_session()),
        View::PostList
    );

    // Second process over the same storage directory.
    let restarted = wire(&server, &dir);
    let restored = restarted.initialize().await.unwrap();
    assert_eq!(restored.token(), Some("T1"));
    assert!(has_permission(&restored, MANAGE_POSTS));

    restarted.logout().await;
    let store = KeyValueSessionStore::new(FileKeyValueStore::new(dir.path()));
    let reloaded = store.load().await;
    assert!(!reloaded.is_authenticated());
    assert!(reloaded.permissions().is_empty());
}

#[tokio::test]
async fn test_rejected_login_keeps_previous_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let manager = wire(&server, &dir);
    manager.initialize().await.unwrap();
    let before = manager.current_session();

    let err = manager
        .login(&LoginCredentials::new("ada@example.com", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::rejected(401, "Invalid credentials"));
    assert_eq!(manager.current_session(), before);
}

#[tokio::test]
async fn test_navigation_follows_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "T1",
            "permissions": "manage users"
        })))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let manager = wire(&server, &dir);
    manager.initialize().await.unwrap();
    let mut model = NavigationModel::new(manager.subscribe());
    assert_eq!(
        model.menu(),
        &[NavLink::Home, NavLink::Login, NavLink::Register]
    );

    manager
        .login(&LoginCredentials::new("ada@example.com", "pw"))
        .await
        .unwrap();
    assert!(model.changed().await);
    assert_eq!(
        model.menu(),
        &[NavLink::Home, NavLink::UserManage, NavLink::Logout]
    );
}
