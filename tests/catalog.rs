mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use minigame_archive::{db, models::*};
use serde_json::json;

fn names(body: &serde_json::Value) -> Vec<String> {
    body["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|g| g["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn list_shows_only_active_non_suggested_games() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Dribbling").await;
    app.create_game("Fruit Bowl", "10min", &focus).await;
    let retired = app.create_game("Retired Drill", "10min", &focus).await;
    db::games::update_game(
        &app.pool,
        &retired.game.id,
        &UpdateGameRequest {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    db::suggestions::create_suggestion(
        &app.pool,
        &GameInput {
            name: "Pending Idea".into(),
            description: "Not reviewed yet".into(),
            player_count: "3-4".into(),
            duration: "5min".into(),
            focus: vec![focus.id.clone()],
            ..GameInput::default()
        },
        None,
    )
    .await
    .unwrap();

    let page = app.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Fruit Bowl"));
    assert!(!page.body.contains("Retired Drill"));
    assert!(!page.body.contains("Pending Idea"));

    let api = app.get("/api/v1/games").await.json();
    assert_eq!(names(&api), vec!["Fruit Bowl"]);
    assert_eq!(api["page"]["total"], 1);
}

#[tokio::test]
async fn search_matches_name_description_and_variants() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Passing").await;
    app.create_game("Relay Race", "10min", &focus).await;
    app.create_game_with(GameInput {
        name: "Pass Chain".into(),
        description: "Pass along the line like a relay.".into(),
        player_count: "7-8".into(),
        duration: "15min".into(),
        focus: vec![focus.id.clone()],
        ..GameInput::default()
    })
    .await;
    app.create_game("Wall Sit", "5min", &focus).await;

    let body = app.get("/api/v1/games?search=relay").await.json();
    assert_eq!(names(&body), vec!["Pass Chain", "Relay Race"]);

    // LIKE 와일드카드는 글자 그대로 취급됩니다.
    let body = app.get("/api/v1/games?search=%25").await.json();
    assert!(names(&body).is_empty());
}

#[tokio::test]
async fn facets_or_within_and_across() {
    let app = TestApp::new().await;
    let dribbling = app.create_tag(TagKind::Focus, "Dribbling").await;
    let defense = app.create_tag(TagKind::Focus, "Defense").await;
    let cones = app.create_tag(TagKind::Materials, "Cones").await;

    app.create_game_with(GameInput {
        name: "Cone Weave".into(),
        description: "Weave through cones.".into(),
        player_count: "1-2".into(),
        duration: "10min".into(),
        focus: vec![dribbling.id.clone()],
        materials: vec![cones.id.clone()],
        ..GameInput::default()
    })
    .await;
    app.create_game("Shadow Defense", "10min", &defense).await;
    app.create_game("Free Dribble", "15min", &dribbling).await;

    let either = app.get("/api/v1/games?focus=Dribbling&focus=Defense").await.json();
    assert_eq!(names(&either), vec!["Cone Weave", "Free Dribble", "Shadow Defense"]);

    let both = app.get("/api/v1/games?focus=Dribbling&materials=Cones").await.json();
    assert_eq!(names(&both), vec!["Cone Weave"]);

    let by_duration = app.get("/api/v1/games?duration=15min").await.json();
    assert_eq!(names(&by_duration), vec!["Free Dribble"]);

    let by_players = app.get("/api/v1/games?player_count=1-2").await.json();
    assert_eq!(names(&by_players), vec!["Cone Weave"]);
}

#[tokio::test]
async fn pagination_clamps_out_of_range_pages() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Speed").await;
    for i in 0..13 {
        app.create_game(&format!("Sprint {i:02}"), "5min", &focus).await;
    }

    let first = app.get("/api/v1/games").await.json();
    assert_eq!(names(&first).len(), 12);
    assert_eq!(first["page"]["num_pages"], 2);
    assert_eq!(first["page"]["has_next"], true);

    let last = app.get("/api/v1/games?page=99").await.json();
    assert_eq!(last["page"]["number"], 2);
    assert_eq!(names(&last), vec!["Sprint 12"]);

    let huge = app.get("/api/v1/games?page=99999999999999999999").await.json();
    assert_eq!(huge["page"]["number"], 2);

    let junk = app.get("/api/v1/games?page=abc").await.json();
    assert_eq!(junk["page"]["number"], 1);

    let html = app.get("/?page=2").await;
    assert_eq!(html.body.matches("class=\"game-card\"").count(), 1);
    assert!(html.body.contains("Page 2 of 2"));
}

#[tokio::test]
async fn detail_page_hides_unpublished_games() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Teamwork").await;
    let game = app
        .create_game_with(GameInput {
            name: "Knot".into(),
            description: "Hold hands and **untangle**.".into(),
            player_count: "9-10".into(),
            duration: "10+min".into(),
            variants: "Eyes closed.".into(),
            focus: vec![focus.id.clone()],
            ..GameInput::default()
        })
        .await;

    let page = app.get(&format!("/games/{}", game.game.id)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<strong>untangle</strong>"));
    assert!(page.body.contains("9-10 players"));
    assert!(page.body.contains("10+ minutes"));

    db::games::update_game(
        &app.pool,
        &game.game.id,
        &UpdateGameRequest {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let hidden = app.get(&format!("/games/{}", game.game.id)).await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
    assert!(hidden.body.contains("Page not found"));

    let api = app.api(Method::GET, &format!("/api/v1/games/{}", game.game.id), None, None).await;
    assert_eq!(api.status, StatusCode::NOT_FOUND);
    assert_eq!(api.json()["error"]["code"], "not_found");
}

#[tokio::test]
async fn unknown_page_renders_html_404() {
    let app = TestApp::new().await;
    let response = app.get("/no/such/page").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.header("content-type").starts_with("text/html"));
}

#[tokio::test]
async fn staff_manage_games_over_the_api() {
    let app = TestApp::new().await;
    let focus = app.create_tag(TagKind::Focus, "Agility").await;
    let coach = app.create_user("coach", "coachpass1", false).await;
    let admin = app.create_user("admin", "adminpass1", true).await;

    let input = json!({
        "name": "Ladder Hops",
        "description": "Hop through the ladder.",
        "player_count": "3-4",
        "duration": "10min",
        "focus": [focus.id],
    });

    let forbidden = app
        .api(Method::POST, "/api/v1/games", Some(&app.token_for(&coach)), Some(input.clone()))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let token = app.token_for(&admin);
    let created = app.api(Method::POST, "/api/v1/games", Some(&token), Some(input.clone())).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.json()["id"].as_str().unwrap().to_string();

    let duplicate = app.api(Method::POST, "/api/v1/games", Some(&token), Some(input)).await;
    assert_eq!(duplicate.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        duplicate.json()["error"]["fields"]["name"][0],
        "A game with this name already exists."
    );

    let bad_choice = app
        .api(
            Method::PATCH,
            &format!("/api/v1/games/{id}"),
            Some(&token),
            Some(json!({ "duration": "7min" })),
        )
        .await;
    assert_eq!(bad_choice.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(bad_choice.json()["error"]["fields"]["duration"][0], "Select a valid choice.");

    let deleted = app
        .api(Method::DELETE, &format!("/api/v1/games/{id}"), Some(&token), None)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
}
