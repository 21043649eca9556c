//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 전체 라우터 구성을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! ## 브라우저 페이지 (HTML)
//! - `catalog`: 게임 목록/검색/필터, 게임 상세
//! - `cart`: 카트 보기/저장/추가/삭제/비우기
//! - `training`: 내 훈련 세션 목록/상세/삭제/칸 삭제
//! - `print`: 명함 크기 카드 인쇄 (게임, 카트, 세션)
//! - `account`: 로그인/로그아웃, 언어 전환
//! - `suggestions`: 게임 제안 폼 (+ JSON API)
//!
//! ## JSON API (`/api/v1`)
//! - `auth`, `games`, `tags`, `languages`, `sessions`, `suggestions`, `users`, `info`, `health`
//!
//! ## 미들웨어 순서 (바깥 → 안)
//! `TraceLayer` → Host/Origin 검사 → 세션 → 로케일 → (페이지 라우트만) 에러 페이지

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod games;
pub mod health;
pub mod info;
pub mod languages;
pub mod page;
pub mod print;
pub mod sessions;
pub mod suggestions;
pub mod tags;
pub mod training;
pub mod users;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use minijinja::Environment;
use sqlx::SqlitePool;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::{
    config::Config,
    error::AppError,
    middleware::{error_page, locale, security},
    services::i18n::Translations,
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 풀과 Arc 필드는 clone해도 실제 자원이 복제되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// 환경변수에서 읽은 설정 (비밀키, 디버그 모드, 허용 호스트 등)
    pub config: Arc<Config>,
    /// minijinja 템플릿 환경
    pub templates: Arc<Environment<'static>>,
    /// 언어별 번역 카탈로그
    pub translations: Arc<Translations>,
}

/// 찾을 수 없는 페이지 경로
async fn page_not_found() -> AppError {
    AppError::NotFound
}

/// 전체 라우터를 구성합니다.
///
/// 서버(main.rs)와 통합 테스트가 같은 함수를 사용합니다.
pub fn router(state: AppState, session_store: SqliteStore) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        // 인증
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/users", post(users::create_user))
        // 카탈로그
        .route("/games", get(games::list_games).post(games::create_game))
        .route(
            "/games/{id}",
            get(games::get_game).patch(games::update_game).delete(games::delete_game),
        )
        .route("/tags/{kind}", get(tags::list_tags).post(tags::create_tag))
        .route("/tags/{kind}/{id}", patch(tags::update_tag).delete(tags::delete_tag))
        .route("/languages", get(languages::list_languages).post(languages::create_language))
        // 훈련 세션
        .route("/sessions", get(sessions::list_sessions).post(sessions::create_session))
        .route(
            "/sessions/{id}",
            get(sessions::get_session)
                .patch(sessions::update_session)
                .delete(sessions::delete_session),
        )
        .route("/sessions/{id}/games", post(sessions::add_session_game))
        .route(
            "/sessions/{id}/games/{entry_id}",
            patch(sessions::update_session_game).delete(sessions::remove_session_game),
        )
        // 제안
        .route(
            "/suggestions",
            get(suggestions::list_suggestions).post(suggestions::create_suggestion),
        )
        .route("/suggestions/{id}", patch(suggestions::review_suggestion))
        // 안내 섹션
        .route("/info", get(info::list_info).post(info::create_info))
        .route("/info/{id}", patch(info::update_info).delete(info::delete_info));

    let page_routes = Router::new()
        .route("/", get(catalog::game_list))
        .route("/games/{id}", get(catalog::game_detail))
        .route("/cart", get(cart::view_cart).post(cart::save_cart))
        .route("/cart/add", post(cart::add_to_cart))
        .route("/cart/remove", post(cart::remove_from_cart))
        .route("/cart/clear", post(cart::clear_cart))
        .route("/cart/print", get(print::print_cart))
        .route("/sessions", get(training::session_list))
        .route("/sessions/{id}", get(training::session_detail))
        .route("/sessions/{id}/delete", post(training::delete_session))
        .route(
            "/sessions/{id}/games/{entry_id}/remove",
            post(training::remove_session_game),
        )
        .route("/sessions/{id}/print", get(print::print_session))
        .route("/suggest", get(suggestions::suggestion_form).post(suggestions::submit_suggestion))
        .route("/print/games/{id}", get(print::print_game))
        .route("/set-language", post(account::set_language))
        .route("/login", get(account::login_form).post(account::login))
        .route("/logout", post(account::logout))
        .fallback(page_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error_page::render_error_page,
        ));

    // 비활성 상태로 SESSION_IDLE_DAYS일이 지나면 세션(카트, 언어, 로그인)이 만료됩니다.
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            state.config.session_idle_days,
        )));

    Router::new()
        .nest("/api/v1", api_routes)
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .merge(page_routes)
        .layer(middleware::from_fn(locale::negotiate_locale))
        .layer(session_layer)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security::guard_origin,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
