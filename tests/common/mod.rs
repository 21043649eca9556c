//! 통합 테스트 공용 도구
//!
//! 인메모리 SQLite(연결 1개) 위에 실제 라우터를 띄우고, `tower::ServiceExt::oneshot`으로
//! 요청을 보냅니다. 세션 쿠키는 `TestApp`이 기억했다가 다음 요청에 붙여 보냅니다.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, HOST, LOCATION, SET_COOKIE},
        HeaderMap, Method, Request, StatusCode,
    },
    Router,
};
use minigame_archive::{
    config::Config,
    db::{self, games::NewGame},
    middleware::auth::{create_access_token, hash_password},
    models::*,
    routes::{router, AppState},
    services::{i18n::Translations, templates},
};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;
use tower_sessions_sqlx_store::SqliteStore;

pub const TEST_HOST: &str = "localhost";
pub const SECRET: &str = "test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        secret_key: SECRET.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        debug: true,
        allowed_hosts: vec![TEST_HOST.to_string(), "127.0.0.1".to_string()],
        csrf_trusted_origins: vec!["https://coach.example.org".to_string()],
        log_dir: "logs".to_string(),
        locale_dir: "locale".to_string(),
        static_dir: "static".to_string(),
        session_idle_days: 14,
        load_sample_data: false,
        admin: None,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("response is not JSON ({e}): {}", self.body))
    }

    pub fn location(&self) -> &str {
        self.headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

pub struct TestApp {
    pub pool: SqlitePool,
    router: Router,
    cookie: Arc<Mutex<Option<String>>>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        // 인메모리 DB는 연결마다 따로 생기므로 연결 하나를 끝까지 재사용합니다.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .expect("foreign keys");
        db::MIGRATOR.run(&pool).await.expect("migrations");

        let store = SqliteStore::new(pool.clone());
        store.migrate().await.expect("session table");

        let translations = Arc::new(Translations::load(&config.locale_dir).expect("catalogs"));
        let templates = Arc::new(templates::build(Arc::clone(&translations)).expect("templates"));

        let state = AppState {
            pool: pool.clone(),
            config: Arc::new(config),
            templates,
            translations,
        };

        TestApp {
            pool,
            router: router(state, store),
            cookie: Arc::new(Mutex::new(None)),
        }
    }

    /// 쿠키를 지운 새 방문자로 바꿉니다.
    pub fn forget_cookies(&self) {
        *self.cookie.lock().unwrap() = None;
    }

    pub fn builder(&self, method: Method, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(HOST, TEST_HOST);
        if let Some(cookie) = self.cookie.lock().unwrap().clone() {
            builder = builder.header(COOKIE, cookie);
        }
        builder
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        for value in response.headers().get_all(SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            if let Some(pair) = value.split(';').next() {
                if pair.starts_with("id=") {
                    *self.cookie.lock().unwrap() = Some(pair.to_string());
                }
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = self.builder(Method::GET, uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> TestResponse {
        let request = self
            .builder(Method::POST, uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        let request = self
            .builder(Method::POST, uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Bearer 토큰을 붙인 JSON API 요청
    pub async fn api(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = self
            .builder(method, uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        self.send(builder.body(body).unwrap()).await
    }

    // ── 데이터 준비 ──

    pub async fn create_user(&self, username: &str, password: &str, is_staff: bool) -> User {
        let hash = hash_password(password).expect("hash");
        let id = uuid::Uuid::now_v7().to_string();
        db::users::create_user(&self.pool, &id, username, None, &hash, is_staff)
            .await
            .expect("user")
    }

    pub fn token_for(&self, user: &User) -> String {
        create_access_token(&user.id, SECRET).expect("token")
    }

    /// 브라우저 로그인 폼으로 로그인합니다.
    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post_form(
            "/login",
            &format!("username={username}&password={password}&next=%2F"),
        )
        .await
    }

    pub async fn create_tag(&self, kind: TagKind, name: &str) -> Tag {
        db::tags::create_tag(
            &self.pool,
            kind,
            &CreateTagRequest {
                name: name.to_string(),
                description: None,
                color: None,
            },
        )
        .await
        .expect("tag")
    }

    pub async fn create_language(&self, code: &str, name: &str) -> Language {
        db::languages::create_language(
            &self.pool,
            &CreateLanguageRequest {
                code: code.to_string(),
                name: name.to_string(),
            },
        )
        .await
        .expect("language")
    }

    /// 공개 카탈로그 게임 하나를 만듭니다.
    pub async fn create_game(&self, name: &str, duration: &str, focus: &Tag) -> GameDetail {
        self.create_game_with(GameInput {
            name: name.to_string(),
            description: format!("How to play {name}."),
            player_count: "5-6".to_string(),
            duration: duration.to_string(),
            focus: vec![focus.id.clone()],
            ..GameInput::default()
        })
        .await
    }

    pub async fn create_game_with(&self, input: GameInput) -> GameDetail {
        db::games::create_game(&self.pool, &input, &NewGame::default())
            .await
            .expect("game")
    }
}
