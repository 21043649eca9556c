//! # 게임 제안 데이터베이스 쿼리 모듈
//!
//! 제안 게임은 `games` 테이블에 숨김 상태로 들어가고, `game_suggestions`에
//! 검토 기록이 1:1로 붙습니다. 두 행은 항상 한 트랜잭션으로 함께 쓰여집니다.

use sqlx::SqlitePool;

use super::games::{self, NewGame};
use crate::error::AppError;
use crate::models::*;
use crate::services::forms;

const SUGGESTION_SELECT: &str = r#"
    SELECT s.id, s.game_id, g.name AS game_name, s.submitted_by,
           u.username AS submitted_by_username, s.submitted_at, s.admin_notes, s.status
    FROM game_suggestions s
    JOIN games g ON g.id = s.game_id
    LEFT JOIN users u ON u.id = s.submitted_by
"#;

/// 제안을 접수합니다: 숨겨진 게임 + pending 상태의 제안 기록
///
/// `submitted_by`가 None이면 익명 제안입니다.
pub async fn create_suggestion(
    pool: &SqlitePool,
    input: &GameInput,
    submitted_by: Option<&str>,
) -> Result<GameSuggestion, AppError> {
    forms::validate_game(input)?;

    let mut tx = pool.begin().await?;
    let game_id = games::insert_game(
        &mut tx,
        input,
        &NewGame {
            is_suggestion: true,
            created_by: None,
            suggested_by: submitted_by,
        },
    )
    .await?;

    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query("INSERT INTO game_suggestions (id, game_id, submitted_by) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(&game_id)
        .bind(submitted_by)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    get_suggestion(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created suggestion".to_string()))
}

pub async fn get_suggestion(pool: &SqlitePool, id: &str) -> Result<Option<GameSuggestion>, AppError> {
    let suggestion = sqlx::query_as::<_, GameSuggestion>(&format!("{SUGGESTION_SELECT} WHERE s.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(suggestion)
}

/// 제안 목록을 최신순으로 조회합니다. 상태를 주면 그 상태만
pub async fn list_suggestions(
    pool: &SqlitePool,
    status: Option<SuggestionStatus>,
) -> Result<Vec<GameSuggestion>, AppError> {
    let suggestions = match status {
        Some(status) => {
            sqlx::query_as::<_, GameSuggestion>(&format!(
                "{SUGGESTION_SELECT} WHERE s.status = ? ORDER BY s.submitted_at DESC, s.id DESC"
            ))
            .bind(status.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, GameSuggestion>(&format!(
                "{SUGGESTION_SELECT} ORDER BY s.submitted_at DESC, s.id DESC"
            ))
            .fetch_all(pool)
            .await?
        }
    };

    Ok(suggestions)
}

/// 제안을 검토합니다. 상태와 게임의 공개 플래그를 한 트랜잭션으로 바꿉니다.
///
/// - approved: `is_suggestion = 0, approved = 1` (공개 카탈로그에 등장)
/// - rejected / pending: `is_suggestion = 1, approved = 0` (숨김)
pub async fn review_suggestion(
    pool: &SqlitePool,
    id: &str,
    status: SuggestionStatus,
    admin_notes: Option<&str>,
) -> Result<Option<GameSuggestion>, AppError> {
    let Some(current) = get_suggestion(pool, id).await? else {
        return Ok(None);
    };

    let (is_suggestion, approved) = status.game_flags();

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE game_suggestions SET status = ?, admin_notes = COALESCE(?, admin_notes) WHERE id = ?")
        .bind(status.as_str())
        .bind(admin_notes)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        r#"
        UPDATE games
        SET is_suggestion = ?, approved = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(is_suggestion)
    .bind(approved)
    .bind(&current.game_id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(
        suggestion = %id,
        game = %current.game_name,
        from = %current.status,
        to = status.as_str(),
        "Suggestion reviewed"
    );

    get_suggestion(pool, id).await
}
