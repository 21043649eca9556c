//! # 훈련 세션 API 라우트 핸들러
//!
//! 훈련 세션과 세션 칸(SessionGame) 편집을 위한 JSON 핸들러 함수들입니다.
//! 모든 엔드포인트는 로그인이 필요하고, 자기 세션만 보고 고칠 수 있습니다.
//! 다른 사용자의 세션은 존재하지 않는 것처럼 404를 돌려줍니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/sessions | `list_sessions` | 내 세션 목록 (최신순) |
//! | POST | /api/v1/sessions | `create_session` | 게임 목록으로 세션 생성 |
//! | GET | /api/v1/sessions/{id} | `get_session` | 세션 상세 + 총 소요 시간 |
//! | PATCH | /api/v1/sessions/{id} | `update_session` | 이름/설명 수정 |
//! | DELETE | /api/v1/sessions/{id} | `delete_session` | 세션 삭제 |
//! | POST | /api/v1/sessions/{id}/games | `add_session_game` | 게임 추가 |
//! | PATCH | /api/v1/sessions/{id}/games/{entry_id} | `update_session_game` | 순서/배율/메모 수정 |
//! | DELETE | /api/v1/sessions/{id}/games/{entry_id} | `remove_session_game` | 칸 하나 삭제 |

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// 소유자 확인. 내 세션이 아니면 NotFound
async fn owned_session(state: &AppState, id: &str, user: &AuthUser) -> Result<TrainingSession, AppError> {
    db::sessions::get_session(&state.pool, id, &user.user_id)
        .await?
        .ok_or(AppError::NotFound)
}

/// `GET /api/v1/sessions` → `{ "sessions": [...] }`
///
/// 각 항목에 게임 수(`game_count`)와 총 소요 시간(`total_duration`)이 포함됩니다.
pub async fn list_sessions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let sessions = db::sessions::list_sessions(&state.pool, &user.user_id).await?;
    Ok(Json(json!({ "sessions": sessions })))
}

/// `POST /api/v1/sessions` + `{ "name": "...", "description": "...", "game_ids": [...] }`
///
/// game_ids 순서대로 1..n 칸이 한 트랜잭션으로 만들어집니다.
pub async fn create_session(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<TrainingSessionDetail>), AppError> {
    let session = db::sessions::create_session(&state.pool, &user.user_id, &req).await?;
    tracing::info!(session_id = %session.id, games = req.game_ids.len(), "Training session created via API");

    let detail = db::sessions::get_session_detail(&state.pool, &session.id, &user.user_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created session".to_string()))?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// `GET /api/v1/sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TrainingSessionDetail>, AppError> {
    let detail = db::sessions::get_session_detail(&state.pool, &id, &user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(detail))
}

/// `PATCH /api/v1/sessions/{id}` + `{ "name": "...", "description": "..." }`
pub async fn update_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateSessionRequest>,
) -> Result<Json<TrainingSession>, AppError> {
    let session = db::sessions::update_session(&state.pool, &id, &user.user_id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(session))
}

/// `DELETE /api/v1/sessions/{id}` → `204 No Content`
pub async fn delete_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::sessions::delete_session(&state.pool, &id, &user.user_id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(session_id = %id, "Training session deleted via API");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/sessions/{id}/games`
/// + `{ "game_id": "...", "order": 3, "duration_multiplier": 1.5, "notes": "..." }`
///
/// `order`를 생략하면 마지막 칸 다음에 붙습니다.
pub async fn add_session_game(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<AddSessionGameRequest>,
) -> Result<(StatusCode, Json<SessionGame>), AppError> {
    owned_session(&state, &id, &user).await?;
    let entry = db::sessions::add_entry(&state.pool, &id, &req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `PATCH /api/v1/sessions/{id}/games/{entry_id}`
///
/// 배율이 0.5..=3.0 범위를 벗어나면 422
pub async fn update_session_game(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, entry_id)): Path<(String, String)>,
    Json(req): Json<UpdateSessionGameRequest>,
) -> Result<Json<SessionGame>, AppError> {
    owned_session(&state, &id, &user).await?;
    let entry = db::sessions::update_entry(&state.pool, &id, &entry_id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(entry))
}

/// `DELETE /api/v1/sessions/{id}/games/{entry_id}` → `204 No Content`
pub async fn remove_session_game(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, entry_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    owned_session(&state, &id, &user).await?;
    if !db::sessions::remove_entry(&state.pool, &id, &entry_id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
