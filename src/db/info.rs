//! # 안내 섹션 쿼리 모듈
//!
//! 페이지 하단 모달(소개/임프레숨)에 들어갈 글을 관리합니다.

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::*;

const INFO_COLUMNS: &str = "id, kind, title, content, is_active, sort_order, created_at, updated_at";

/// 활성화된 섹션을 종류별 정렬 순서대로 조회합니다 (공개 화면용).
pub async fn list_active(pool: &SqlitePool) -> Result<Vec<InfoSection>, AppError> {
    let sections = sqlx::query_as::<_, InfoSection>(&format!(
        "SELECT {INFO_COLUMNS} FROM info_sections WHERE is_active = 1 ORDER BY kind, sort_order, title"
    ))
    .fetch_all(pool)
    .await?;

    Ok(sections)
}

pub async fn get_section(pool: &SqlitePool, id: &str) -> Result<Option<InfoSection>, AppError> {
    let section = sqlx::query_as::<_, InfoSection>(&format!(
        "SELECT {INFO_COLUMNS} FROM info_sections WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(section)
}

pub async fn find_by_title(
    pool: &SqlitePool,
    kind: InfoKind,
    title: &str,
) -> Result<Option<InfoSection>, AppError> {
    let section = sqlx::query_as::<_, InfoSection>(&format!(
        "SELECT {INFO_COLUMNS} FROM info_sections WHERE kind = ? AND title = ?"
    ))
    .bind(kind.as_str())
    .bind(title)
    .fetch_optional(pool)
    .await?;

    Ok(section)
}

pub async fn create_section(pool: &SqlitePool, req: &CreateInfoRequest) -> Result<InfoSection, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::field("title", crate::services::forms::REQUIRED));
    }

    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query(
        r#"
        INSERT INTO info_sections (id, kind, title, content, is_active, sort_order)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(req.kind.as_str())
    .bind(req.title.trim())
    .bind(&req.content)
    .bind(req.is_active.unwrap_or(true))
    .bind(req.sort_order.unwrap_or(0))
    .execute(pool)
    .await?;

    get_section(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created section".to_string()))
}

pub async fn update_section(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateInfoRequest,
) -> Result<Option<InfoSection>, AppError> {
    if get_section(pool, id).await?.is_none() {
        return Ok(None);
    }
    if matches!(&req.title, Some(title) if title.trim().is_empty()) {
        return Err(AppError::field("title", crate::services::forms::REQUIRED));
    }

    // COALESCE(?, col): 바인딩 값이 NULL(None)이면 기존 값을 유지합니다.
    sqlx::query(
        r#"
        UPDATE info_sections
        SET kind = COALESCE(?, kind),
            title = COALESCE(?, title),
            content = COALESCE(?, content),
            is_active = COALESCE(?, is_active),
            sort_order = COALESCE(?, sort_order),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(req.kind.map(InfoKind::as_str))
    .bind(req.title.as_deref().map(str::trim))
    .bind(req.content.as_deref())
    .bind(req.is_active)
    .bind(req.sort_order)
    .bind(id)
    .execute(pool)
    .await?;

    get_section(pool, id).await
}

pub async fn delete_section(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM info_sections WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
