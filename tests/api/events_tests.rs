//! Event API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_json, location, MultipartForm, TestApp, MAX_BODY_BYTES};

fn event_form(title: &str, date: &str) -> MultipartForm {
    MultipartForm::new()
        .text("title", title)
        .text("description", "Bring snacks")
        .text("date", date)
}

#[tokio::test]
async fn test_create_event_without_image() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;

    let response = app
        .send_multipart("POST", "/events", event_form("Picnic", "2026-07-04"), Some(user.session()))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Picnic");
    assert_eq!(json["description"], "Bring snacks");
    assert_eq!(json["date"], "2026-07-04");
    assert!(json["image_url"].is_null());
    assert_eq!(app.uploader.calls(), 0);
}

#[tokio::test]
async fn test_create_event_with_image_stores_hosted_url() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;
    let form = event_form("Gallery night", "2026-09-12").file(
        "image",
        "poster.png",
        "image/png",
        b"\x89PNG fake image bytes",
    );

    let response = app
        .send_multipart("POST", "/events", form, Some(user.session()))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["image_url"], "https://cdn.test/1/poster.png");
    assert_eq!(app.uploader.calls(), 1);
}

#[tokio::test]
async fn test_empty_file_part_is_ignored() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;
    let form = event_form("No poster", "2026-09-12").file("image", "", "application/octet-stream", b"");

    let response = app
        .send_multipart("POST", "/events", form, Some(user.session()))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.uploader.calls(), 0);
}

#[tokio::test]
async fn test_create_event_requires_title_and_date() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;
    let form = MultipartForm::new().text("description", "nothing else");

    let response = app
        .send_multipart("POST", "/events", form, Some(user.session()))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "date"]);
    assert!(app.events.is_empty());
}

#[tokio::test]
async fn test_create_event_rejects_malformed_date() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;

    let response = app
        .send_multipart("POST", "/events", event_form("Party", "04/07/2026"), Some(user.session()))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "date");
}

#[tokio::test]
async fn test_upload_failure_persists_nothing() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;
    app.uploader.fail_from_now_on();
    let form = event_form("Launch", "2026-10-01").file("image", "a.jpg", "image/jpeg", b"jpeg");

    let response = app
        .send_multipart("POST", "/events", form, Some(user.session()))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(!json["message"].as_str().unwrap().contains("media host"));
    assert!(app.events.is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;
    let big = vec![b'x'; MAX_BODY_BYTES * 2];
    let form = event_form("Huge", "2026-10-01").file("image", "big.bin", "application/octet-stream", &big);

    let response = app
        .send_multipart("POST", "/events", form, Some(user.session()))
        .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.events.is_empty());
    assert_eq!(app.uploader.calls(), 0);
}

#[tokio::test]
async fn test_list_is_scoped_to_owner_in_creation_order() {
    let app = TestApp::new();
    let alice = app.signed_in_user().await;
    let bob = app.signed_in_user().await;
    app.create_event(alice.session(), "First").await;
    app.create_event(bob.session(), "Not mine").await;
    app.create_event(alice.session(), "Second").await;

    let response = app.get("/events", Some(alice.session())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<&str> = json["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[tokio::test]
async fn test_events_require_session() {
    let app = TestApp::new();

    let list = app.get("/events", None).await;
    let create = app
        .send_multipart("POST", "/events", event_form("Sneaky", "2026-01-01"), None)
        .await;

    for response in [&list, &create] {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(response), "/users/login?notice=login_required");
    }
    assert!(app.events.is_empty());
}

#[tokio::test]
async fn test_owner_can_load_event_for_edit() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;
    let id = app.create_event(user.session(), "Editable").await;

    let response = app
        .get(&format!("/events/{}/edit", id), Some(user.session()))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["title"], "Editable");
}

#[tokio::test]
async fn test_non_owner_is_unauthorized_everywhere() {
    let app = TestApp::new();
    let owner = app.signed_in_user().await;
    let intruder = app.signed_in_user().await;
    let id = app.create_event(owner.session(), "Private").await;
    let uri = format!("/events/{}", id);

    let edit = app
        .get(&format!("{}/edit", uri), Some(intruder.session()))
        .await;
    let update = app
        .send_multipart("PUT", &uri, event_form("Hijacked", "2030-01-01"), Some(intruder.session()))
        .await;
    let delete = app.delete(&uri, Some(intruder.session())).await;

    assert_eq!(edit.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(update.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(delete.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .get(&format!("{}/edit", uri), Some(owner.session()))
        .await;
    let json = body_json(response).await;
    assert_eq!(json["title"], "Private");
    assert_eq!(app.events.len(), 1);
}

#[tokio::test]
async fn test_non_owner_upload_is_never_attempted() {
    let app = TestApp::new();
    let owner = app.signed_in_user().await;
    let intruder = app.signed_in_user().await;
    let id = app.create_event(owner.session(), "Private").await;
    let form = MultipartForm::new().file("image", "x.png", "image/png", b"png");

    let response = app
        .send_multipart("PUT", &format!("/events/{}", id), form, Some(intruder.session()))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.uploader.calls(), 0);
}

#[tokio::test]
async fn test_missing_event_is_not_found() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;

    let unknown = app.get("/events/999999/edit", Some(user.session())).await;
    let garbage = app.get("/events/not-a-number/edit", Some(user.session())).await;
    let delete = app.delete("/events/999999", Some(user.session())).await;

    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    assert_eq!(garbage.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_changes_only_supplied_fields() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;
    let form = event_form("Original", "2026-05-05").file("image", "cover.png", "image/png", b"png");
    let created = app
        .send_multipart("POST", "/events", form, Some(user.session()))
        .await;
    let created = body_json(created).await;
    let id = created["id"].as_str().unwrap();

    let patch = MultipartForm::new().text("title", "Renamed").text("date", "");
    let response = app
        .send_multipart("PUT", &format!("/events/{}", id), patch, Some(user.session()))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Renamed");
    assert_eq!(json["description"], "Bring snacks");
    assert_eq!(json["date"], "2026-05-05");
    assert_eq!(json["image_url"], created["image_url"]);
    assert_eq!(json["owner_id"], created["owner_id"]);
    assert_eq!(app.uploader.calls(), 1);
}

#[tokio::test]
async fn test_update_with_new_image_replaces_url() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;
    let id = app.create_event(user.session(), "Plain").await;
    let form = MultipartForm::new().file("image", "new.png", "image/png", b"png");

    let response = app
        .send_multipart("PUT", &format!("/events/{}", id), form, Some(user.session()))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["image_url"], "https://cdn.test/1/new.png");
    assert_eq!(json["title"], "Plain");
}

#[tokio::test]
async fn test_failed_upload_leaves_event_unchanged() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;
    let id = app.create_event(user.session(), "Stable").await;
    app.uploader.fail_from_now_on();
    let form = event_form("Changed", "2027-01-01").file("image", "new.png", "image/png", b"png");

    let response = app
        .send_multipart("PUT", &format!("/events/{}", id), form, Some(user.session()))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let response = app
        .get(&format!("/events/{}/edit", id), Some(user.session()))
        .await;
    let json = body_json(response).await;
    assert_eq!(json["title"], "Stable");
    assert!(json["image_url"].is_null());
}

#[tokio::test]
async fn test_delete_then_edit_is_not_found() {
    let app = TestApp::new();
    let user = app.signed_in_user().await;
    let id = app.create_event(user.session(), "Short-lived").await;
    let uri = format!("/events/{}", id);

    let response = app.delete(&uri, Some(user.session())).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get(&format!("{}/edit", uri), Some(user.session())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.events.is_empty());
}
