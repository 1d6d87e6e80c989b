//! Authentication API Tests

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;

use crate::common::{body_json, location, session_cookie, TestApp, TestUser, PASSWORD};

#[tokio::test]
async fn test_register_redirects_to_login() {
    let app = TestApp::new();
    let user = TestUser::generate();

    let response = app.register(&user.username, &user.email, PASSWORD).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users/login?notice=registered");
    assert_eq!(app.users.len(), 1);
}

#[tokio::test]
async fn test_register_reports_every_violation_and_echoes_identity() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/users/register",
            &[
                ("username", "alice"),
                ("email", "not-an-email"),
                ("password", "short"),
                ("password2", "different"),
            ],
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let mut fields: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    fields.dedup();
    assert_eq!(fields, vec!["email", "password", "password2"]);
    assert_eq!(json["username"], "alice");
    assert_eq!(json["email"], "not-an-email");
    assert!(json.get("password").is_none());
    assert!(app.users.is_empty());
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/users/register",
            &[
                ("username", "alice"),
                ("email", "alice@example.com"),
                ("password", "secret1"),
                ("password2", "secret2"),
            ],
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["message"], "Passwords do not match");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new();
    let user = TestUser::generate();
    app.register(&user.username, &user.email, PASSWORD).await;

    let response = app.register("someone-else", &user.email, PASSWORD).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["email"], user.email.as_str());
    assert_eq!(app.users.len(), 1);
}

#[tokio::test]
async fn test_concurrent_duplicate_registration_one_wins() {
    let app = TestApp::new();
    let user = TestUser::generate();

    let (a, b) = futures::join!(
        app.register(&user.username, &user.email, PASSWORD),
        app.register("other-name", &user.email, PASSWORD),
    );

    let mut statuses = vec![a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::SEE_OTHER, StatusCode::CONFLICT]);
    assert_eq!(app.users.len(), 1);
}

#[tokio::test]
async fn test_login_sets_http_only_cookie_and_redirects() {
    let app = TestApp::new();
    let user = TestUser::generate();
    app.register(&user.username, &user.email, PASSWORD).await;

    let response = app.login(&user.email, PASSWORD).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert_eq!(session_cookie(&response).unwrap().len(), 64);
    assert_eq!(app.sessions.len(), 1);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    let user = TestUser::generate();
    app.register(&user.username, &user.email, PASSWORD).await;

    let wrong_password = app.login(&user.email, "wrong-password").await;
    let unknown_email = app.login("nobody@example.com", PASSWORD).await;

    for response in [&wrong_password, &unknown_email] {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(response), "/users/login?notice=invalid_credentials");
        assert!(session_cookie(response).is_none());
    }
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new();
    let user = TestUser::generate();
    app.register(&user.username, &user.email, PASSWORD).await;

    let response = app.login(&user.email.to_uppercase(), PASSWORD).await;

    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_logout_destroys_session_and_clears_cookie() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;

    let response = app.get("/users/logout", Some(user.session())).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users/login?notice=logged_out");
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));
    assert!(app.sessions.is_empty());

    let response = app.get("/dashboard", Some(user.session())).await;
    assert_eq!(location(&response), "/users/login?notice=login_required");
}

#[tokio::test]
async fn test_logout_without_session_still_redirects() {
    let app = TestApp::new();

    let first = app.get("/users/logout", None).await;
    let second = app.get("/users/logout", Some("not-a-real-token")).await;

    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_page_renders_known_notice() {
    let app = TestApp::new();

    let response = app.get("/users/login?notice=logged_out", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["notice"], "logged_out");
    assert_eq!(json["message"], "You are logged out");
}

#[tokio::test]
async fn test_dashboard_requires_session() {
    let app = TestApp::new();

    let response = app.get("/dashboard", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users/login?notice=login_required");
}

#[tokio::test]
async fn test_dashboard_shows_user_and_own_events() {
    let app = TestApp::new();
    let alice = app.signed_in_user().await;
    let bob = app.signed_in_user().await;
    app.create_event(alice.session(), "Alice's party").await;
    app.create_event(bob.session(), "Bob's party").await;

    let response = app.get("/dashboard", Some(alice.session())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["username"], alice.username.as_str());
    assert!(json["user"].get("password_hash").is_none());
    let titles: Vec<&str> = json["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Alice's party"]);
}

#[tokio::test]
async fn test_idle_expired_session_is_rejected() {
    let app = TestApp::with_idle_timeout(0);
    let user = app.signed_in_user().await;

    let response = app.get("/dashboard", Some(user.session())).await;

    assert_eq!(location(&response), "/users/login?notice=login_required");
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_session_of_deleted_user_is_rejected() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;
    let id = {
        let response = app.get("/dashboard", Some(user.session())).await;
        body_json(response).await["user"]["id"]
            .as_str()
            .unwrap()
            .parse::<i64>()
            .unwrap()
    };

    app.users.remove(id);

    let response = app.get("/dashboard", Some(user.session())).await;
    assert_eq!(location(&response), "/users/login?notice=login_required");
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_register_echoes_reserved_characters_intact() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/users/register",
            &[
                ("username", "Ann & Bob=1"),
                ("email", "ann+events@example.com?x"),
                ("password", "short"),
                ("password2", "short"),
            ],
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["username"], "Ann & Bob=1");
    assert_eq!(json["email"], "ann+events@example.com?x");
}
