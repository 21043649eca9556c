//! # 내 훈련 세션 페이지
//!
//! 모든 페이지가 로그인을 요구하고, 다른 사용자의 세션은 404로 보입니다.
//!
//! ## 엔드포인트
//! - `GET  /sessions`                                → 내 세션 목록 (최신순)
//! - `GET  /sessions/{id}`                           → 세션 상세 (칸 목록, 총 소요 시간)
//! - `POST /sessions/{id}/delete`                    → 세션 삭제
//! - `POST /sessions/{id}/games/{entry_id}/remove`   → 칸 하나 삭제

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};
use minijinja::context;

use super::{page::Page, AppState};
use crate::{db, error::AppError, middleware::auth::LoginRequired, services::flash::FlashLevel};

/// `GET /sessions`
pub async fn session_list(
    State(state): State<AppState>,
    LoginRequired(user): LoginRequired,
    page: Page,
) -> Result<Html<String>, AppError> {
    let sessions = db::sessions::list_sessions(&state.pool, &user.user_id).await?;
    page.render(&state, "session_list.html", context! { sessions => sessions })
        .await
}

/// `GET /sessions/{id}`
pub async fn session_detail(
    State(state): State<AppState>,
    LoginRequired(user): LoginRequired,
    Path(id): Path<String>,
    page: Page,
) -> Result<Html<String>, AppError> {
    let detail = db::sessions::get_session_detail(&state.pool, &id, &user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    page.render(&state, "session_detail.html", context! { session => detail })
        .await
}

/// `POST /sessions/{id}/delete`
pub async fn delete_session(
    State(state): State<AppState>,
    LoginRequired(user): LoginRequired,
    Path(id): Path<String>,
    page: Page,
) -> Result<Redirect, AppError> {
    let session = db::sessions::get_session(&state.pool, &id, &user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    db::sessions::delete_session(&state.pool, &id, &user.user_id).await?;

    tracing::info!(session_id = %id, user = %user.username, "Training session deleted");
    page.flash(
        &state,
        FlashLevel::Success,
        "Training session \"{name}\" deleted.",
        &[("name", &session.name)],
    )
    .await?;
    Ok(Redirect::to("/sessions"))
}

/// `POST /sessions/{id}/games/{entry_id}/remove`
///
/// 같은 게임이 여러 칸에 있어도 지정한 칸 하나만 지웁니다.
pub async fn remove_session_game(
    State(state): State<AppState>,
    LoginRequired(user): LoginRequired,
    Path((id, entry_id)): Path<(String, String)>,
    page: Page,
) -> Result<Redirect, AppError> {
    db::sessions::get_session(&state.pool, &id, &user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !db::sessions::remove_entry(&state.pool, &id, &entry_id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(session_id = %id, entry_id = %entry_id, "Game removed from saved session");
    page.flash(&state, FlashLevel::Success, "Game removed from session.", &[])
        .await?;
    Ok(Redirect::to(&format!("/sessions/{id}")))
}
