mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use minigame_archive::models::*;
use serde_json::json;

#[tokio::test]
async fn single_game_downloads_as_a_card() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Reaction").await;
    let cones = app.create_tag(TagKind::Materials, "Cones").await;
    let game = app
        .create_game_with(GameInput {
            name: "Traffic Lights".into(),
            description: "Run on *green*, stop on red.".into(),
            player_count: "13+".into(),
            duration: "5min".into(),
            focus: vec![focus.id.clone()],
            materials: vec![cones.id.clone()],
            ..GameInput::default()
        })
        .await;

    let response = app.get(&format!("/print/games/{}", game.game.id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header("content-type").starts_with("text/html"));
    assert_eq!(
        response.header("content-disposition"),
        format!("attachment; filename=\"game_{}.html\"", game.game.id)
    );
    assert_eq!(response.body.matches("class=\"card\"").count(), 1);
    assert!(response.body.contains("Traffic Lights"));
    assert!(response.body.contains("<em>green</em>"));
    assert!(response.body.contains("13+ players"));
    assert!(response.body.contains("5 minutes"));
    assert!(response.body.contains("Reaction"));
    assert!(response.body.contains("Materials: Cones"));

    let missing = app.get("/print/games/missing").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cart_prints_cards_in_cart_order() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Warmup").await;
    let first = app.create_game("Jog", "5min", &focus).await;
    let second = app.create_game("Stretch", "10min", &focus).await;
    app.post_json("/cart/add", json!({ "game_id": second.game.id })).await;
    app.post_json("/cart/add", json!({ "game_id": first.game.id })).await;

    let response = app.get("/cart/print").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"training_session.html\""
    );
    assert_eq!(response.body.matches("class=\"card\"").count(), 2);
    let stretch = response.body.find("Stretch").unwrap();
    let jog = response.body.find("Jog").unwrap();
    assert!(stretch < jog);
    assert!(response.body.contains("Total duration: 15 min"));
}

#[tokio::test]
async fn saved_session_prints_multipliers_and_notes() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Finishing").await;
    let game = app.create_game("Shooting Gallery", "10min", &focus).await;
    let coach = app.create_user("coach", "coachpass1", false).await;
    let token = app.token_for(&coach);

    let detail = app
        .api(
            Method::POST,
            "/api/v1/sessions",
            Some(&token),
            Some(json!({ "name": "Finishing Friday", "description": "Goals!", "game_ids": [game.game.id] })),
        )
        .await
        .json();
    let id = detail["id"].as_str().unwrap().to_string();
    let entry_id = detail["games"][0]["id"].as_str().unwrap();
    app.api(
        Method::PATCH,
        &format!("/api/v1/sessions/{id}/games/{entry_id}"),
        Some(&token),
        Some(json!({ "duration_multiplier": 1.5, "notes": "Weak foot only" })),
    )
    .await;

    let anonymous = app.get(&format!("/sessions/{id}/print")).await;
    assert_eq!(anonymous.status, StatusCode::SEE_OTHER);

    app.login("coach", "coachpass1").await;
    let response = app.get(&format!("/sessions/{id}/print")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header("content-disposition"),
        format!("attachment; filename=\"session_{id}.html\"")
    );
    assert!(response.body.contains("Finishing Friday"));
    assert!(response.body.contains("Goals!"));
    assert!(response.body.contains("15 min (&times;1.5)"));
    assert!(response.body.contains("Weak foot only"));
    assert!(response.body.contains("Total duration: 15 min"));
}
