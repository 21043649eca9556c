//! 게임 설명 언어 API: `GET /api/v1/languages` (공개), `POST /api/v1/languages` (관리자)

use crate::{db, error::AppError, middleware::auth::StaffUser, models::*, routes::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

pub async fn list_languages(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let languages = db::languages::list_languages(&state.pool).await?;
    Ok(Json(json!({ "languages": languages })))
}

/// 코드가 이미 있으면 409 Conflict
pub async fn create_language(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(req): Json<CreateLanguageRequest>,
) -> Result<(StatusCode, Json<Language>), AppError> {
    let language = db::languages::create_language(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(language)))
}
