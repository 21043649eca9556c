mod common;

use axum::{
    body::Body,
    http::{header::ACCEPT_LANGUAGE, header::REFERER, Method, StatusCode},
};
use common::TestApp;
use minigame_archive::models::*;
use serde_json::json;

async fn get_with_language(app: &TestApp, uri: &str, accept: &str) -> common::TestResponse {
    let request = app
        .builder(Method::GET, uri)
        .header(ACCEPT_LANGUAGE, accept)
        .body(Body::empty())
        .unwrap();
    app.send(request).await
}

#[tokio::test]
async fn accept_language_picks_german() {
    let app = TestApp::new().await;

    let page = get_with_language(&app, "/", "de-CH, en;q=0.5").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.header("content-language"), "de");
    assert!(page.body.contains("<html lang=\"de\">"));
    assert!(page.body.contains("Spiele"));

    let fallback = get_with_language(&app, "/", "fr-FR, es").await;
    assert_eq!(fallback.header("content-language"), "en");
    assert!(fallback.body.contains("<html lang=\"en\">"));
}

#[tokio::test]
async fn chosen_language_sticks_to_the_session() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Teamwork").await;
    let game = app
        .create_game_with(GameInput {
            name: "Training Session".into(),
            description: "Games for *everyone*.".into(),
            player_count: "any".into(),
            duration: "10min".into(),
            focus: vec![focus.id.clone()],
            ..GameInput::default()
        })
        .await;

    let switched = app.post_form("/set-language", "language=de&next=%2Fcart").await;
    assert_eq!(switched.status, StatusCode::SEE_OTHER);
    assert_eq!(switched.location(), "/cart");

    // 세션 선택이 Accept-Language보다 우선합니다.
    let page = get_with_language(&app, "/", "en").await;
    assert_eq!(page.header("content-language"), "de");
    assert!(page.body.contains("Spiele"));

    // 저장된 게임 내용은 번역하지 않습니다.
    let detail = app.get(&format!("/games/{}", game.game.id)).await;
    assert_eq!(detail.header("content-language"), "de");
    assert!(detail.body.contains("<h1>Training Session</h1>"));
    assert!(detail.body.contains("Games for <em>everyone</em>."));
    assert!(!detail.body.contains("<h1>Trainingseinheit</h1>"));

    let ignored = app.post_form("/set-language", "language=xx&next=%2F").await;
    assert_eq!(ignored.status, StatusCode::SEE_OTHER);
    assert_eq!(app.get("/").await.header("content-language"), "de");
}

#[tokio::test]
async fn redirect_target_falls_back_to_referer_then_root() {
    let app = TestApp::new().await;

    let request = app
        .builder(Method::POST, "/set-language")
        .header("content-type", "application/x-www-form-urlencoded")
        .header(REFERER, "http://localhost/games/abc?page=2")
        .body(Body::from("language=en"))
        .unwrap();
    let from_referer = app.send(request).await;
    assert_eq!(from_referer.location(), "/games/abc?page=2");

    let offsite = app
        .post_form("/set-language", "language=en&next=https%3A%2F%2Fevil.test%2F")
        .await;
    assert_eq!(offsite.location(), "/");
}

#[tokio::test]
async fn flash_and_cart_messages_are_translated() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Shooting").await;
    let game = app.create_game("Knockout", "10min", &focus).await;
    app.post_form("/set-language", "language=de&next=%2F").await;

    let added = app.post_json("/cart/add", json!({ "game_id": game.game.id })).await.json();
    assert_eq!(added["message"], "Spiel \"Knockout\" zur Trainingseinheit hinzugefügt!");

    let missing = app.post_json("/cart/add", json!({})).await.json();
    assert_eq!(missing["message"], "Spiel-ID ist erforderlich");

    app.post_form("/cart/clear", "").await;
    let page = app.get("/cart").await;
    assert!(page.body.contains("Trainingseinheit erfolgreich geleert!"));

    let not_found = app.get("/games/missing").await;
    assert_eq!(not_found.status, StatusCode::NOT_FOUND);
    assert!(not_found.body.contains("Seite nicht gefunden"));
}
