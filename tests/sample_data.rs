mod common;

use axum::http::Method;
use common::TestApp;
use minigame_archive::db::seed::{load_sample_data, SeedReport};

#[tokio::test]
async fn sample_data_loads_once() {
    let app = TestApp::new().await;
    let admin = app.create_user("admin", "adminpass1", true).await;

    let first = load_sample_data(&app.pool).await.unwrap();
    assert_eq!(first.languages, 2);
    assert_eq!(first.games, 5);
    assert_eq!(first.sessions, 3);
    assert!(first.tags > 0);
    assert!(first.info_sections > 0);

    let second = load_sample_data(&app.pool).await.unwrap();
    assert_eq!(second, SeedReport::default());

    let catalog = app.get("/api/v1/games").await.json();
    assert_eq!(catalog["page"]["total"], 5);

    let sessions = app
        .api(Method::GET, "/api/v1/sessions", Some(&app.token_for(&admin)), None)
        .await
        .json();
    assert_eq!(sessions["sessions"].as_array().unwrap().len(), 3);

    let info = app.get("/api/v1/info").await.json();
    assert!(!info["sections"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn sessions_are_skipped_without_a_staff_user() {
    let app = TestApp::new().await;

    let report = load_sample_data(&app.pool).await.unwrap();
    assert_eq!(report.games, 5);
    assert_eq!(report.sessions, 0);
}
