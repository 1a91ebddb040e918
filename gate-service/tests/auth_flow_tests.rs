mod common;

use common::set_cookies;
use common::TestApp;
use common::LOCKOUT_MAX_FAILURES;
use reqwest::StatusCode;

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login attempt.";
const LOCKED_OUT_MESSAGE: &str = "This account has been locked out, please try again later.";

#[tokio::test]
async fn test_gated_page_redirects_anonymous_visitors() {
    let app = TestApp::spawn().await;

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/login");
}

#[tokio::test]
async fn test_register_mismatched_confirmation_creates_no_account() {
    let app = TestApp::spawn().await;

    let response = app
        .register("alice@example.com", "Passw0rd", "Different1")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("The password and confirmation password do not match."));

    assert!(!app.account_exists("alice@example.com").await);
}

#[tokio::test]
async fn test_register_short_password_creates_no_account() {
    let app = TestApp::spawn().await;

    let response = app.register("alice@example.com", "abc", "abc").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("The Password must be at least 6 characters long."));

    assert!(!app.account_exists("alice@example.com").await);
}

#[tokio::test]
async fn test_register_signs_in_and_reaches_gated_page() {
    let app = TestApp::spawn().await;

    let response = app
        .register("alice@example.com", "Passw0rd", "Passw0rd")
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/");

    let home = app.get("/").await;
    assert_eq!(home.status(), StatusCode::OK);
    let body = home.text().await.expect("Failed to read body");
    assert!(body.contains("alice@example.com"));
}

#[tokio::test]
async fn test_register_duplicate_email_leaves_one_account() {
    let app = TestApp::spawn().await;

    app.register("alice@example.com", "Passw0rd", "Passw0rd")
        .await;
    app.logout().await;

    // Same address, different case: still the same account
    let response = app
        .register("Alice@Example.com", "0therPass", "0therPass")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("An account with this email already exists."));

    assert!(app.account_exists("alice@example.com").await);
}

#[tokio::test]
async fn test_register_logout_login_round_trip() {
    let app = TestApp::spawn().await;

    let registered = app
        .register("user@user.com", "Passw0rd", "Passw0rd")
        .await;
    assert_eq!(registered.status(), StatusCode::SEE_OTHER);

    let logged_out = app.logout().await;
    assert_eq!(logged_out.status(), StatusCode::SEE_OTHER);
    assert_eq!(logged_out.headers()["location"], "/login");

    // Signed out again: the gated page is out of reach
    let home = app.get("/").await;
    assert_eq!(home.status(), StatusCode::SEE_OTHER);
    assert_eq!(home.headers()["location"], "/login");

    let logged_in = app.login("user@user.com", "Passw0rd").await;
    assert_eq!(logged_in.status(), StatusCode::SEE_OTHER);
    assert_eq!(logged_in.headers()["location"], "/");

    let home = app.get("/").await;
    assert_eq!(home.status(), StatusCode::OK);

    // Wrong password after a logout gets the generic message
    app.logout().await;
    let rejected = app.login("user@user.com", "wrong").await;
    assert_eq!(rejected.status(), StatusCode::OK);
    let body = rejected.text().await.expect("Failed to read body");
    assert!(body.contains(INVALID_CREDENTIALS_MESSAGE));
}

#[tokio::test]
async fn test_lockout_after_repeated_failures() {
    let app = TestApp::spawn().await;
    app.seed_account("alice@example.com", "Passw0rd", false)
        .await;

    // Up to the threshold the answer stays the generic rejection
    for _ in 0..LOCKOUT_MAX_FAILURES - 1 {
        let response = app.login("alice@example.com", "wrong").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.text().await.expect("Failed to read body");
        assert!(body.contains(INVALID_CREDENTIALS_MESSAGE));
        assert!(!body.contains(LOCKED_OUT_MESSAGE));
    }

    // The attempt that crosses the threshold already reports the lockout
    let response = app.login("alice@example.com", "wrong").await;
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains(LOCKED_OUT_MESSAGE));

    // Even the correct password is refused while the lock holds
    let response = app.login("alice@example.com", "Passw0rd").await;
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains(LOCKED_OUT_MESSAGE));
    assert!(!body.contains(INVALID_CREDENTIALS_MESSAGE));
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.seed_account("alice@example.com", "Passw0rd", false)
        .await;

    let unknown = app.login("nobody@example.com", "Passw0rd").await;
    assert_eq!(unknown.status(), StatusCode::OK);
    let unknown_body = unknown.text().await.expect("Failed to read body");

    let wrong = app.login("alice@example.com", "wrong").await;
    assert_eq!(wrong.status(), StatusCode::OK);
    let wrong_body = wrong.text().await.expect("Failed to read body");

    assert!(unknown_body.contains(INVALID_CREDENTIALS_MESSAGE));
    assert!(wrong_body.contains(INVALID_CREDENTIALS_MESSAGE));
}

#[tokio::test]
async fn test_remember_me_controls_cookie_persistence() {
    let app = TestApp::spawn().await;
    app.seed_account("alice@example.com", "Passw0rd", false)
        .await;

    let response = app.login("alice@example.com", "Passw0rd").await;
    let session_cookie = set_cookies(&response)
        .into_iter()
        .find(|c| c.starts_with("gate_session="))
        .expect("login set no session cookie");
    // A browser-session cookie carries no explicit lifetime
    assert!(!session_cookie.contains("Max-Age"));
    assert!(session_cookie.contains("HttpOnly"));

    app.logout().await;

    let response = app.login_remembered("alice@example.com", "Passw0rd").await;
    let session_cookie = set_cookies(&response)
        .into_iter()
        .find(|c| c.starts_with("gate_session="))
        .expect("login set no session cookie");
    assert!(session_cookie.contains("Max-Age=1209600"));
}

#[tokio::test]
async fn test_post_without_valid_forgery_token_is_rejected() {
    let app = TestApp::spawn().await;
    app.seed_account("alice@example.com", "Passw0rd", false)
        .await;

    // Prime the nonce cookie, then submit a token that does not pair
    app.get("/login").await;
    let response = app
        .post_form(
            "/login",
            &[
                ("email", "alice@example.com"),
                ("password", "Passw0rd"),
                ("csrf_token", "forged-token"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    // The forged submission never signed anyone in
    let home = app.get("/").await;
    assert_eq!(home.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_post_without_nonce_cookie_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/logout",
            &[("csrf_token", "anything")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let app = TestApp::spawn().await;
    app.seed_account("alice@example.com", "Passw0rd", false)
        .await;

    app.login("alice@example.com", "Passw0rd").await;
    let first = app.logout().await;
    assert_eq!(first.status(), StatusCode::SEE_OTHER);

    // Signing out again, now anonymous, is not an error
    let token = app.csrf_token_from("/login").await;
    let second = app.post_form("/logout", &[("csrf_token", &token)]).await;
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    assert_eq!(second.headers()["location"], "/login");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}
