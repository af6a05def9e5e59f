//! Session guard behavior against a stub auth backend

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lms_portal::{
    error::AuthFailure,
    models::{Registration, Role, User},
    services::auth::ACCESS_DENIED_MESSAGE,
    GuardOutcome,
};

use crate::support::{unreachable_base_url, PageEvent, Tab};

async fn mount_check_auth(server: &MockServer, authenticated: bool) {
    Mock::given(method("GET"))
        .and(path("/api/auth/check-auth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "authenticated": authenticated })),
        )
        .mount(server)
        .await;
}

async fn mount_me(server: &MockServer, role: &str) {
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 1, "username": "alice", "role": role }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_valid_credentials_caches_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "username": "alice", "password": "correct" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 1, "username": "alice", "role": "student" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    let guard = &tab.state.services.auth;

    let user = assert_ok!(guard.login("alice", "correct").await);
    assert_eq!(user, User::new(1, "alice", Role::Student));
    assert_eq!(guard.cached_user(), Some(user));
    assert!(tab.navigator.events().is_empty());
}

#[tokio::test]
async fn test_login_invalid_credentials_leaves_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    let guard = &tab.state.services.auth;
    let previous = User::new(9, "bob", Role::Admin);
    guard.update_cached_user(&previous);

    let failure = assert_err!(guard.login("alice", "wrong").await);
    assert_eq!(failure, AuthFailure::rejected(401, "Invalid credentials"));
    assert_eq!(failure.message(), "Invalid credentials");
    assert_eq!(guard.cached_user(), Some(previous));
}

#[tokio::test]
async fn test_login_without_response_is_network_error() {
    let tab = Tab::open(&unreachable_base_url());
    let guard = &tab.state.services.auth;
    let previous = User::new(9, "bob", Role::Admin);
    guard.update_cached_user(&previous);

    let failure = assert_err!(guard.login("alice", "correct").await);
    assert_eq!(failure, AuthFailure::Network);
    assert_eq!(failure.message(), "Network error occurred");
    assert_eq!(guard.cached_user(), Some(previous));
}

#[tokio::test]
async fn test_login_unreadable_success_body_leaves_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Welcome</html>"))
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    let guard = &tab.state.services.auth;
    let previous = User::new(9, "bob", Role::Admin);
    guard.update_cached_user(&previous);

    assert_eq!(guard.login("alice", "correct").await, Err(AuthFailure::Network));
    assert_eq!(guard.cached_user(), Some(previous));
}

#[tokio::test]
async fn test_register_does_not_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "username": "carol",
            "password": "pw",
            "email": "carol@example.org"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user": { "id": 3, "username": "carol", "role": "student" }
        })))
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    let registration = Registration::new("carol", "pw").with_field("email", "carol@example.org");

    let user = assert_ok!(tab.state.services.auth.register(&registration).await);
    assert_eq!(user.map(|u| u.username).as_deref(), Some("carol"));
    assert!(tab.cached_slot().is_none());
}

#[tokio::test]
async fn test_register_confirmation_without_user_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "message": "User created successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    let registered = assert_ok!(
        tab.state
            .services
            .auth
            .register(&Registration::new("dave", "pw"))
            .await
    );
    assert!(registered.is_none());
    assert!(tab.cached_slot().is_none());
}

#[tokio::test]
async fn test_register_duplicate_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Username already exists" })),
        )
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    let guard = &tab.state.services.auth;
    let previous = User::new(9, "bob", Role::Admin);
    guard.update_cached_user(&previous);

    let failure = assert_err!(guard.register(&Registration::new("alice", "pw")).await);
    assert_eq!(failure, AuthFailure::rejected(400, "Username already exists"));
    assert_eq!(guard.cached_user(), Some(previous));
}

#[tokio::test]
async fn test_is_authenticated_fails_closed() {
    let tab = Tab::open(&unreachable_base_url());
    assert!(!tab.state.services.auth.is_authenticated().await);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/check-auth"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let tab = Tab::open(&server.uri());
    assert!(!tab.state.services.auth.is_authenticated().await);
}

#[tokio::test]
async fn test_is_authenticated_reads_body_regardless_of_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/check-auth"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "authenticated": false })))
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    assert!(!tab.state.services.auth.is_authenticated().await);
}

#[tokio::test]
async fn test_current_user_absent_on_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Not logged in" })))
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    assert!(tab.state.services.auth.current_user().await.is_none());
}

#[tokio::test]
async fn test_current_user_does_not_touch_cache() {
    let server = MockServer::start().await;
    mount_me(&server, "admin").await;

    let tab = Tab::open(&server.uri());
    let guard = &tab.state.services.auth;

    let user = guard.current_user().await.expect("user");
    assert_eq!(user.role, Role::Admin);
    assert!(tab.cached_slot().is_none());

    let remembered = guard.remember_current_user().await;
    assert_eq!(remembered.as_ref(), Some(&user));
    assert_eq!(guard.cached_user(), Some(user));
}

#[tokio::test]
async fn test_logout_success_clears_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    let guard = &tab.state.services.auth;
    guard.update_cached_user(&User::new(1, "alice", Role::Student));

    assert_ok!(guard.logout().await);
    assert!(tab.cached_slot().is_none());
}

#[tokio::test]
async fn test_logout_rejected_still_clears_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    let guard = &tab.state.services.auth;
    guard.update_cached_user(&User::new(1, "alice", Role::Student));

    let failure = assert_err!(guard.logout().await);
    assert_eq!(failure.message(), "Logout failed");
    assert!(tab.cached_slot().is_none());
}

#[tokio::test]
async fn test_logout_transport_failure_still_clears_cache() {
    let tab = Tab::open(&unreachable_base_url());
    let guard = &tab.state.services.auth;
    guard.update_cached_user(&User::new(1, "alice", Role::Student));

    assert_eq!(guard.logout().await, Err(AuthFailure::Network));
    assert!(tab.cached_slot().is_none());
}

#[tokio::test]
async fn test_require_auth_without_role() {
    let server = MockServer::start().await;
    mount_check_auth(&server, true).await;
    let tab = Tab::open(&server.uri());
    assert!(tab.state.services.auth.require_auth(None).await);
    assert!(tab.navigator.events().is_empty());

    let server = MockServer::start().await;
    mount_check_auth(&server, false).await;
    let tab = Tab::open(&server.uri());
    assert!(!tab.state.services.auth.require_auth(None).await);
    assert_eq!(tab.navigator.navigations(), vec!["/index.html".to_string()]);
}

#[tokio::test]
async fn test_require_auth_transport_failure_redirects() {
    let tab = Tab::open(&unreachable_base_url());
    assert!(!tab.state.services.auth.require_auth(None).await);
    assert_eq!(
        tab.navigator.events(),
        vec![PageEvent::Navigated("/index.html".to_string())]
    );
}

#[tokio::test]
async fn test_require_admin_role() {
    let server = MockServer::start().await;
    mount_check_auth(&server, true).await;
    mount_me(&server, "admin").await;
    let tab = Tab::open(&server.uri());
    assert!(tab.state.services.auth.require_auth(Some(&Role::Admin)).await);
    assert!(tab.navigator.events().is_empty());

    let server = MockServer::start().await;
    mount_check_auth(&server, true).await;
    mount_me(&server, "student").await;
    let tab = Tab::open(&server.uri());
    assert!(!tab.state.services.auth.require_auth(Some(&Role::Admin)).await);
    assert_eq!(
        tab.navigator.events(),
        vec![
            PageEvent::Notified(ACCESS_DENIED_MESSAGE.to_string()),
            PageEvent::Navigated("/index.html".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_role_check_ignores_cached_user() {
    let server = MockServer::start().await;
    mount_check_auth(&server, true).await;
    mount_me(&server, "student").await;

    let tab = Tab::open(&server.uri());
    let guard = &tab.state.services.auth;
    guard.update_cached_user(&User::new(1, "alice", Role::Admin));

    assert_eq!(guard.check_access(Some(&Role::Admin)).await, GuardOutcome::RoleDenied);
}

#[tokio::test]
async fn test_failed_check_keeps_stale_cache() {
    let server = MockServer::start().await;
    mount_check_auth(&server, false).await;

    let tab = Tab::open(&server.uri());
    let guard = &tab.state.services.auth;
    guard.update_cached_user(&User::new(1, "alice", Role::Student));

    assert!(!guard.require_auth(None).await);
    assert!(guard.cached_user().is_some());
}

#[tokio::test]
async fn test_redirect_admin_dashboard_once() {
    let server = MockServer::start().await;
    mount_me(&server, "admin").await;

    let tab = Tab::open(&server.uri());
    tab.state.services.auth.redirect_based_on_role().await;
    assert_eq!(
        tab.navigator.navigations(),
        vec!["/admin-dashboard-enhanced.html".to_string()]
    );
}

#[tokio::test]
async fn test_redirect_without_user_stays() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    tab.state.services.auth.redirect_based_on_role().await;
    assert!(tab.navigator.events().is_empty());
}

#[tokio::test]
async fn test_login_session_carries_into_guard() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=alice-session; Path=/")
                .set_body_json(json!({
                    "user": { "id": 1, "username": "alice", "role": "admin" }
                })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/check-auth"))
        .and(wiremock::matchers::header("cookie", "session=alice-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authenticated": true })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/check-auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authenticated": false })))
        .mount(&server)
        .await;

    let tab = Tab::open(&server.uri());
    let guard = &tab.state.services.auth;
    assert!(!guard.is_authenticated().await);

    assert_ok!(guard.login("alice", "correct").await);
    assert!(guard.is_authenticated().await);
}
