mod common;

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, HOST, ORIGIN},
        Method, Request, StatusCode,
    },
};
use common::TestApp;
use minigame_archive::models::*;
use serde_json::json;

fn form_post(app: &TestApp, uri: &str, origin: &str) -> Request<Body> {
    app.builder(Method::POST, uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(ORIGIN, origin)
        .body(Body::from("language=de&next=%2F"))
        .unwrap()
}

#[tokio::test]
async fn unknown_hosts_are_rejected() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .uri("/")
        .header(HOST, "evil.test")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let with_port = Request::builder()
        .uri("/")
        .header(HOST, "127.0.0.1:8000")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(with_port).await.status, StatusCode::OK);
}

#[tokio::test]
async fn cross_origin_posts_are_refused() {
    let app = TestApp::new().await;

    let evil = app.send(form_post(&app, "/set-language", "http://evil.test")).await;
    assert_eq!(evil.status, StatusCode::FORBIDDEN);
    assert!(evil.body.contains("Origin checking failed. Request aborted."));

    let same_site = app.send(form_post(&app, "/set-language", "http://localhost")).await;
    assert_eq!(same_site.status, StatusCode::SEE_OTHER);

    let trusted = app
        .send(form_post(&app, "/set-language", "https://coach.example.org"))
        .await;
    assert_eq!(trusted.status, StatusCode::SEE_OTHER);

    // Origin 헤더가 없는 요청은 통과합니다.
    let no_origin = app.post_form("/set-language", "language=en&next=%2F").await;
    assert_eq!(no_origin.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn bearer_requests_skip_the_origin_check() {
    let app = TestApp::new().await;
    let admin = app.create_user("admin", "adminpass1", true).await;

    let request = app
        .builder(Method::POST, "/api/v1/tags/focus")
        .header(CONTENT_TYPE, "application/json")
        .header(ORIGIN, "http://evil.test")
        .header("authorization", format!("Bearer {}", app.token_for(&admin)))
        .body(Body::from(json!({ "name": "Balance" }).to_string()))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["name"], "Balance");
}

#[tokio::test]
async fn health_and_public_lists() {
    let app = TestApp::new().await;
    let admin = app.create_user("admin", "adminpass1", true).await;
    app.create_tag(TagKind::Materials, "Bibs").await;
    app.create_language("en", "English").await;

    let health = app.get("/api/v1/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["status"], "ok");

    let materials = app.get("/api/v1/tags/materials").await;
    assert_eq!(materials.status, StatusCode::OK);
    let unknown_kind = app.get("/api/v1/tags/colors").await;
    assert_eq!(unknown_kind.status, StatusCode::NOT_FOUND);

    let languages = app.get("/api/v1/languages").await;
    assert_eq!(languages.status, StatusCode::OK);

    let created = app
        .api(
            Method::POST,
            "/api/v1/info",
            Some(&app.token_for(&admin)),
            Some(json!({ "kind": "about", "title": "Who we are", "content": "A *coaching* collective." })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let info = app.get("/api/v1/info").await.json();
    assert_eq!(info["sections"][0]["title"], "Who we are");

    let home = app.get("/").await;
    assert!(home.body.contains("data-modal=\"about-modal\""));
    assert!(home.body.contains("<em>coaching</em>"));
    assert!(!home.body.contains("impressum-modal"));
}

#[tokio::test]
async fn static_assets_are_served() {
    let app = TestApp::new().await;

    let css = app.get("/static/css/app.css").await;
    assert_eq!(css.status, StatusCode::OK);
    assert!(css.header("content-type").starts_with("text/css"));

    let js = app.get("/static/js/cart.js").await;
    assert_eq!(js.status, StatusCode::OK);
}
