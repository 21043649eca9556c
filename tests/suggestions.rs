mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use minigame_archive::models::*;
use serde_json::json;

#[tokio::test]
async fn anonymous_suggestion_waits_for_review() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Defense").await;
    let admin = app.create_user("admin", "adminpass1", true).await;
    let token = app.token_for(&admin);

    let submitted = app
        .post_form(
            "/suggest",
            &format!(
                "name=Mirror+Drill&description=Copy+your+partner.&player_count=1-2&duration=5min&focus={}",
                focus.id
            ),
        )
        .await;
    assert_eq!(submitted.status, StatusCode::SEE_OTHER);
    assert_eq!(submitted.location(), "/");

    let home = app.get("/").await;
    assert!(home.body.contains("Your game suggestion has been submitted"));
    assert!(!home.body.contains("Mirror Drill"));

    let pending = app
        .api(Method::GET, "/api/v1/suggestions?status=pending", Some(&token), None)
        .await;
    assert_eq!(pending.status, StatusCode::OK);
    let list = pending.json();
    let suggestion = &list["suggestions"][0];
    assert_eq!(suggestion["game_name"], "Mirror Drill");
    assert_eq!(suggestion["status"], "pending");
    assert!(suggestion["submitted_by"].is_null());

    let id = suggestion["id"].as_str().unwrap();
    let approved = app
        .api(
            Method::PATCH,
            &format!("/api/v1/suggestions/{id}"),
            Some(&token),
            Some(json!({ "status": "approved", "admin_notes": "Nice one" })),
        )
        .await;
    assert_eq!(approved.status, StatusCode::OK);
    assert_eq!(approved.json()["admin_notes"], "Nice one");
    assert!(app.get("/").await.body.contains("Mirror Drill"));

    let rejected = app
        .api(
            Method::PATCH,
            &format!("/api/v1/suggestions/{id}"),
            Some(&token),
            Some(json!({ "status": "rejected" })),
        )
        .await;
    assert_eq!(rejected.json()["status"], "rejected");
    assert_eq!(rejected.json()["admin_notes"], "Nice one");
    assert!(!app.get("/").await.body.contains("Mirror Drill"));
}

#[tokio::test]
async fn invalid_suggestion_redisplays_the_form() {
    let app = TestApp::new().await;
    app.create_tag(TagKind::Focus, "Speed").await;

    let response = app
        .post_form("/suggest", "name=Half+Baked&player_count=2-3&duration=")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("value=\"Half Baked\""));
    assert!(response.body.contains("Select a valid choice."));
    assert!(response.body.contains("This field is required."));

    let home = app.get("/").await;
    assert!(!home.body.contains("Half Baked"));
}

#[tokio::test]
async fn logged_in_suggestions_record_the_author() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Passing").await;
    let coach = app.create_user("coach", "coachpass1", false).await;
    let admin = app.create_user("admin", "adminpass1", true).await;

    let created = app
        .api(
            Method::POST,
            "/api/v1/suggestions",
            Some(&app.token_for(&coach)),
            Some(json!({
                "name": "Monkey in the Middle",
                "description": "Keep the ball away.",
                "player_count": "3-4",
                "duration": "10min",
                "focus": [focus.id],
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.json()["submitted_by_username"], "coach");

    let listed = app
        .api(Method::GET, "/api/v1/suggestions", Some(&app.token_for(&admin)), None)
        .await
        .json();
    assert_eq!(listed["suggestions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn only_staff_review_suggestions() {
    let app = TestApp::new().await;
    let coach = app.create_user("coach", "coachpass1", false).await;
    let admin = app.create_user("admin", "adminpass1", true).await;

    let forbidden = app
        .api(Method::GET, "/api/v1/suggestions", Some(&app.token_for(&coach)), None)
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let unknown = app
        .api(
            Method::GET,
            "/api/v1/suggestions?status=maybe",
            Some(&app.token_for(&admin)),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

    let missing = app
        .api(
            Method::PATCH,
            "/api/v1/suggestions/nope",
            Some(&app.token_for(&admin)),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
