//! # 분류 태그 API 라우트 핸들러
//!
//! 포커스/준비물/라벨 태그 CRUD를 위한 HTTP 핸들러 함수들입니다.
//! 세 종류가 같은 핸들러를 공유하고, 경로의 `{kind}`로 구분합니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/tags/{kind} | `list_tags` | 태그 목록 (공개) |
//! | POST | /api/v1/tags/{kind} | `create_tag` | 새 태그 생성 (관리자) |
//! | PATCH | /api/v1/tags/{kind}/{id} | `update_tag` | 태그 수정 (관리자) |
//! | DELETE | /api/v1/tags/{kind}/{id} | `delete_tag` | 태그 삭제 (관리자) |
//!
//! `{kind}`는 `focus`, `materials`, `labels` 중 하나이며, 그 외 값은 404입니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::StaffUser,
    models::*,
    routes::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

fn parse_kind(raw: &str) -> Result<TagKind, AppError> {
    raw.parse().map_err(|_| AppError::NotFound)
}

/// `GET /api/v1/tags/{kind}` → `{ "tags": [...] }` (이름순)
pub async fn list_tags(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Value>, AppError> {
    let tags = db::tags::list_tags(&state.pool, parse_kind(&kind)?).await?;
    Ok(Json(json!({ "tags": tags })))
}

/// `POST /api/v1/tags/{kind}` + `{ "name": "...", "description": "...", "color": "#rrggbb" }`
///
/// 이름이 이미 있으면 409 Conflict
pub async fn create_tag(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(kind): Path<String>,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    let kind = parse_kind(&kind)?;
    let tag = db::tags::create_tag(&state.pool, kind, &req).await?;
    tracing::info!(kind = kind.as_str(), name = %tag.name, "Tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

/// `PATCH /api/v1/tags/{kind}/{id}`
pub async fn update_tag(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path((kind, id)): Path<(String, String)>,
    Json(req): Json<UpdateTagRequest>,
) -> Result<Json<Tag>, AppError> {
    let tag = db::tags::update_tag(&state.pool, parse_kind(&kind)?, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}

/// `DELETE /api/v1/tags/{kind}/{id}` → `204 No Content`
///
/// 게임과의 연결도 함께 지워집니다 (`ON DELETE CASCADE`).
pub async fn delete_tag(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let deleted = db::tags::delete_tag(&state.pool, parse_kind(&kind)?, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
