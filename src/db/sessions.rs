//! # 훈련 세션 데이터베이스 쿼리 모듈
//!
//! 훈련 세션과 세션 칸(session_games)의 생성, 조회, 수정, 삭제를 담당합니다.
//!
//! ## 소유권
//! 세션 조회/수정 함수는 모두 `owner`(사용자 ID)를 함께 받아
//! `WHERE id = ? AND created_by = ?`로 조회합니다. 남의 세션은 없는 것과 같으므로
//! 라우트 핸들러는 None을 받으면 404를 돌려줍니다.
//!
//! ## 세션 라이프사이클
//! ```text
//! [장바구니] create_session() → 이름/설명 수정, 칸 추가/수정/삭제 → delete_session()
//! ```

use std::collections::HashMap;

use sqlx::SqlitePool;

use super::games;
use crate::error::{is_unique_violation, AppError};
use crate::models::*;
use crate::services::forms::{self, DUPLICATE_POSITION, INVALID_CHOICE};

const SESSION_COLUMNS: &str = "id, name, description, created_by, created_at, updated_at";
const ENTRY_COLUMNS: &str = "id, session_id, game_id, position, duration_multiplier, notes";

/// 세션 목록 화면의 한 줄: 세션 + 칸 수 + 총 소요 시간
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionSummary {
    #[serde(flatten)]
    pub session: TrainingSession,
    pub game_count: usize,
    pub total_duration: u32,
}

/// 사용자의 세션을 최신순으로 조회합니다.
pub async fn list_sessions(pool: &SqlitePool, owner: &str) -> Result<Vec<SessionSummary>, AppError> {
    let sessions = sqlx::query_as::<_, TrainingSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM training_sessions \
         WHERE created_by = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(owner)
    .fetch_all(pool)
    .await?;

    // 모든 칸의 (세션 ID, 게임 소요 시간, 배율)을 한 번에 가져와 세션별로 합산합니다.
    let rows = sqlx::query_as::<_, (String, String, f64)>(
        r#"
        SELECT sg.session_id, g.duration, sg.duration_multiplier
        FROM session_games sg
        JOIN games g ON g.id = sg.game_id
        JOIN training_sessions s ON s.id = sg.session_id
        WHERE s.created_by = ?
        "#,
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;

    let mut per_session: HashMap<String, Vec<(u32, f64)>> = HashMap::new();
    for (session_id, duration, multiplier) in rows {
        let minutes = duration.parse::<GameDuration>().map(|d| d.minutes).unwrap_or(0);
        per_session.entry(session_id).or_default().push((minutes, multiplier));
    }

    Ok(sessions
        .into_iter()
        .map(|session| {
            let entries = per_session.remove(&session.id).unwrap_or_default();
            SessionSummary {
                game_count: entries.len(),
                total_duration: total_minutes(entries),
                session,
            }
        })
        .collect())
}

/// 소유자의 세션 하나를 조회합니다. 남의 세션이면 None
pub async fn get_session(
    pool: &SqlitePool,
    id: &str,
    owner: &str,
) -> Result<Option<TrainingSession>, AppError> {
    let session = sqlx::query_as::<_, TrainingSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM training_sessions WHERE id = ? AND created_by = ?"
    ))
    .bind(id)
    .bind(owner)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// 세션의 칸을 순서(position)대로 조회합니다.
pub async fn list_entries(pool: &SqlitePool, session_id: &str) -> Result<Vec<SessionGame>, AppError> {
    let entries = sqlx::query_as::<_, SessionGame>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM session_games WHERE session_id = ? ORDER BY position, id"
    ))
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// 칸 목록에 게임 상세를 채우고 총 소요 시간을 계산합니다.
///
/// 게임이 사라진 칸은 CASCADE로 함께 삭제되므로 조회 결과에 항상 게임이 있습니다.
pub async fn hydrate_entries(
    pool: &SqlitePool,
    entries: Vec<SessionGame>,
) -> Result<(Vec<SessionEntry>, u32), AppError> {
    let ids: Vec<String> = entries.iter().map(|e| e.game_id.clone()).collect();
    let details = games::get_game_details(pool, &ids, false).await?;

    let hydrated: Vec<SessionEntry> = entries
        .into_iter()
        .filter_map(|entry| {
            let game = details.get(&entry.game_id)?.clone();
            let minutes = entry.scaled_minutes(game.game.minutes());
            Some(SessionEntry { entry, game, minutes })
        })
        .collect();

    let total = total_minutes(
        hydrated
            .iter()
            .map(|e| (e.game.game.minutes(), e.entry.duration_multiplier)),
    );

    Ok((hydrated, total))
}

/// 세션 상세 (칸 + 게임 + 총 소요 시간)
pub async fn get_session_detail(
    pool: &SqlitePool,
    id: &str,
    owner: &str,
) -> Result<Option<TrainingSessionDetail>, AppError> {
    let Some(session) = get_session(pool, id, owner).await? else {
        return Ok(None);
    };

    let entries = list_entries(pool, &session.id).await?;
    let (games, total_duration) = hydrate_entries(pool, entries).await?;

    Ok(Some(TrainingSessionDetail {
        session,
        games,
        total_duration,
    }))
}

/// 세션과 칸들을 한 트랜잭션으로 생성합니다.
///
/// `game_ids` 순서대로 position 1..n이 부여됩니다. 공개 카탈로그에 없는 게임
/// (검토 전 제안, 비활성 게임 포함)이 있으면 아무것도 저장하지 않고 필드 에러를 돌려줍니다.
pub async fn create_session(
    pool: &SqlitePool,
    owner: &str,
    req: &CreateSessionRequest,
) -> Result<TrainingSession, AppError> {
    forms::validate_session(req)?;

    let mut tx = pool.begin().await?;

    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query("INSERT INTO training_sessions (id, name, description, created_by) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(req.name.trim())
        .bind(req.description.trim())
        .bind(owner)
        .execute(&mut *tx)
        .await?;

    for (index, game_id) in req.game_ids.iter().enumerate() {
        let exists: Option<String> = sqlx::query_scalar(&format!(
            "SELECT g.id FROM games g WHERE g.id = ? AND {}",
            games::PUBLIC_CATALOG
        ))
        .bind(game_id)
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            // tx는 commit 없이 drop되면 자동으로 롤백됩니다.
            return Err(AppError::field("games", INVALID_CHOICE));
        }

        sqlx::query(
            "INSERT INTO session_games (id, session_id, game_id, position) VALUES (?, ?, ?, ?)",
        )
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(&id)
        .bind(game_id)
        .bind(index as i64 + 1)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    get_session(pool, &id, owner)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created session".to_string()))
}

/// 세션 이름/설명을 수정합니다.
pub async fn update_session(
    pool: &SqlitePool,
    id: &str,
    owner: &str,
    req: &UpdateSessionRequest,
) -> Result<Option<TrainingSession>, AppError> {
    let Some(current) = get_session(pool, id, owner).await? else {
        return Ok(None);
    };

    let name = req.name.as_deref().map(str::trim).unwrap_or(current.name.as_str());
    let description = req
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or(current.description.as_str());

    let mut errors = crate::error::FieldErrors::new();
    forms::check_name(&mut errors, "name", name);
    forms::into_result(errors)?;

    sqlx::query(
        r#"
        UPDATE training_sessions
        SET name = ?, description = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND created_by = ?
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(id)
    .bind(owner)
    .execute(pool)
    .await?;

    get_session(pool, id, owner).await
}

/// 세션을 삭제합니다. 칸은 CASCADE로 함께 삭제됩니다.
pub async fn delete_session(pool: &SqlitePool, id: &str, owner: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM training_sessions WHERE id = ? AND created_by = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// ── 세션 칸 ──

pub async fn get_entry(
    pool: &SqlitePool,
    session_id: &str,
    entry_id: &str,
) -> Result<Option<SessionGame>, AppError> {
    let entry = sqlx::query_as::<_, SessionGame>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM session_games WHERE id = ? AND session_id = ?"
    ))
    .bind(entry_id)
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// (세션, 게임, 순서) 중복을 order 필드 에러로 바꿉니다.
fn duplicate_position(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::field("order", DUPLICATE_POSITION)
    } else {
        AppError::Database(err)
    }
}

/// 세션에 공개 카탈로그 게임을 추가합니다. 소유권 확인은 호출하는 쪽에서 먼저 해야 합니다.
///
/// 순서를 지정하지 않으면 마지막 칸 다음 번호가 됩니다.
pub async fn add_entry(
    pool: &SqlitePool,
    session_id: &str,
    req: &AddSessionGameRequest,
) -> Result<SessionGame, AppError> {
    forms::validate_entry(req.order, req.duration_multiplier)?;

    if games::get_public_game(pool, &req.game_id).await?.is_none() {
        return Err(AppError::field("game_id", INVALID_CHOICE));
    }

    let position = match req.order {
        Some(order) => order,
        None => {
            let max: Option<i64> =
                sqlx::query_scalar("SELECT MAX(position) FROM session_games WHERE session_id = ?")
                    .bind(session_id)
                    .fetch_one(pool)
                    .await?;
            max.unwrap_or(0) + 1
        }
    };

    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query(
        r#"
        INSERT INTO session_games (id, session_id, game_id, position, duration_multiplier, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(session_id)
    .bind(&req.game_id)
    .bind(position)
    .bind(req.duration_multiplier.unwrap_or(1.0))
    .bind(req.notes.as_deref().unwrap_or_default())
    .execute(pool)
    .await
    .map_err(duplicate_position)?;

    touch_session(pool, session_id).await?;

    get_entry(pool, session_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created entry".to_string()))
}

/// 세션 칸의 순서/배율/메모를 수정합니다.
pub async fn update_entry(
    pool: &SqlitePool,
    session_id: &str,
    entry_id: &str,
    req: &UpdateSessionGameRequest,
) -> Result<Option<SessionGame>, AppError> {
    forms::validate_entry(req.order, req.duration_multiplier)?;

    if get_entry(pool, session_id, entry_id).await?.is_none() {
        return Ok(None);
    }

    sqlx::query(
        r#"
        UPDATE session_games
        SET position = COALESCE(?, position),
            duration_multiplier = COALESCE(?, duration_multiplier),
            notes = COALESCE(?, notes)
        WHERE id = ? AND session_id = ?
        "#,
    )
    .bind(req.order)
    .bind(req.duration_multiplier)
    .bind(req.notes.as_deref())
    .bind(entry_id)
    .bind(session_id)
    .execute(pool)
    .await
    .map_err(duplicate_position)?;

    touch_session(pool, session_id).await?;

    get_entry(pool, session_id, entry_id).await
}

/// 세션 칸 하나를 삭제합니다. 같은 게임의 다른 칸은 그대로 남습니다.
pub async fn remove_entry(pool: &SqlitePool, session_id: &str, entry_id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM session_games WHERE id = ? AND session_id = ?")
        .bind(entry_id)
        .bind(session_id)
        .execute(pool)
        .await?;

    if result.rows_affected() > 0 {
        touch_session(pool, session_id).await?;
    }

    Ok(result.rows_affected() > 0)
}

async fn touch_session(pool: &SqlitePool, session_id: &str) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE training_sessions SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?",
    )
    .bind(session_id)
    .execute(pool)
    .await?;

    Ok(())
}
