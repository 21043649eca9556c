//! # 안내 섹션 API
//!
//! 페이지 하단의 소개(About)/임프레숨(Impressum) 모달에 들어가는 글입니다.
//!
//! - `GET    /api/v1/info`       → 활성 섹션 목록 (공개)
//! - `POST   /api/v1/info`       → 섹션 생성 (관리자)
//! - `PATCH  /api/v1/info/{id}`  → 섹션 수정 (관리자)
//! - `DELETE /api/v1/info/{id}`  → 섹션 삭제 (관리자)

use crate::{db, error::AppError, middleware::auth::StaffUser, models::*, routes::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list_info(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let sections = db::info::list_active(&state.pool).await?;
    Ok(Json(json!({ "sections": sections })))
}

pub async fn create_info(
    State(state): State<AppState>,
    _staff: StaffUser,
    Json(req): Json<CreateInfoRequest>,
) -> Result<(StatusCode, Json<InfoSection>), AppError> {
    let section = db::info::create_section(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

pub async fn update_info(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateInfoRequest>,
) -> Result<Json<InfoSection>, AppError> {
    let section = db::info::update_section(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(section))
}

pub async fn delete_info(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::info::delete_section(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
