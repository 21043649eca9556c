//! # 분류 태그 데이터베이스 쿼리 모듈
//!
//! 포커스/준비물/라벨 CRUD와 게임-태그 관계를 관리하는 SQL 쿼리 함수들입니다.
//! 세 종류는 테이블 이름만 다르므로 `TagKind`로 테이블을 고르고 같은 함수를 씁니다.
//!
//! ## 테이블 구조
//! - `focuses`, `materials`, `labels`: 태그 엔티티
//! - `game_focuses`, `game_materials`, `game_labels`: 게임과의 다대다(N:M) 관계 테이블
//!
//! 테이블 이름은 `TagKind`가 돌려주는 정적 문자열만 `format!`으로 끼워 넣습니다.
//! 사용자 입력은 항상 `.bind()`로 전달됩니다.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::error::{is_unique_violation, AppError};
use crate::models::*;

/// 종류별 태그 전체를 이름순으로 조회합니다.
pub async fn list_tags(pool: &SqlitePool, kind: TagKind) -> Result<Vec<Tag>, AppError> {
    let sql = format!(
        "SELECT {} FROM {} t ORDER BY t.name",
        kind.select_columns(),
        kind.table()
    );
    let tags = sqlx::query_as::<_, Tag>(&sql).fetch_all(pool).await?;

    Ok(tags)
}

/// ID로 태그 하나를 조회합니다.
pub async fn get_tag(pool: &SqlitePool, kind: TagKind, id: &str) -> Result<Option<Tag>, AppError> {
    let sql = format!(
        "SELECT {} FROM {} t WHERE t.id = ?",
        kind.select_columns(),
        kind.table()
    );
    let tag = sqlx::query_as::<_, Tag>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(tag)
}

/// 이름으로 태그를 조회합니다. 샘플 데이터 적재에서 멱등성 확인에 씁니다.
pub async fn find_tag_by_name(
    pool: &SqlitePool,
    kind: TagKind,
    name: &str,
) -> Result<Option<Tag>, AppError> {
    let sql = format!(
        "SELECT {} FROM {} t WHERE t.name = ?",
        kind.select_columns(),
        kind.table()
    );
    let tag = sqlx::query_as::<_, Tag>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(tag)
}

/// 이름 중복(UNIQUE 위반)을 409 Conflict로 바꿉니다.
fn conflict_on_duplicate(kind: TagKind, err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict(format!("A {} tag with this name already exists", kind.as_str()))
    } else {
        AppError::Database(err)
    }
}

/// 새 태그를 생성하고 생성된 태그를 반환합니다.
///
/// 포커스/준비물은 description을, 라벨은 color를 저장합니다.
/// 라벨 색상이 없으면 기본 색상(`#007bff`)을 씁니다.
pub async fn create_tag(
    pool: &SqlitePool,
    kind: TagKind,
    req: &CreateTagRequest,
) -> Result<Tag, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::field("name", crate::services::forms::REQUIRED));
    }

    let id = uuid::Uuid::now_v7().to_string();

    let result = match kind {
        TagKind::Labels => {
            let color = req.color.as_deref().unwrap_or(DEFAULT_LABEL_COLOR);
            if !is_hex_color(color) {
                return Err(AppError::field("color", "Enter a colour like #28a745."));
            }
            sqlx::query("INSERT INTO labels (id, name, color) VALUES (?, ?, ?)")
                .bind(&id)
                .bind(name)
                .bind(color)
                .execute(pool)
                .await
        }
        TagKind::Focus | TagKind::Materials => {
            let sql = format!(
                "INSERT INTO {} (id, name, description) VALUES (?, ?, ?)",
                kind.table()
            );
            sqlx::query(&sql)
                .bind(&id)
                .bind(name)
                .bind(req.description.as_deref().unwrap_or_default())
                .execute(pool)
                .await
        }
    };
    result.map_err(|e| conflict_on_duplicate(kind, e))?;

    get_tag(pool, kind, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created tag".to_string()))
}

/// 태그 정보를 부분 업데이트합니다.
///
/// ## 반환값
/// - `Ok(Some(Tag))`: 업데이트 성공
/// - `Ok(None)`: 해당 ID의 태그가 존재하지 않음
pub async fn update_tag(
    pool: &SqlitePool,
    kind: TagKind,
    id: &str,
    req: &UpdateTagRequest,
) -> Result<Option<Tag>, AppError> {
    if get_tag(pool, kind, id).await?.is_none() {
        return Ok(None);
    }

    if let Some(name) = &req.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::field("name", crate::services::forms::REQUIRED));
        }
        let sql = format!("UPDATE {} SET name = ? WHERE id = ?", kind.table());
        sqlx::query(&sql)
            .bind(name)
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| conflict_on_duplicate(kind, e))?;
    }

    match kind {
        TagKind::Labels => {
            if let Some(color) = &req.color {
                if !is_hex_color(color) {
                    return Err(AppError::field("color", "Enter a colour like #28a745."));
                }
                sqlx::query("UPDATE labels SET color = ? WHERE id = ?")
                    .bind(color)
                    .bind(id)
                    .execute(pool)
                    .await?;
            }
        }
        TagKind::Focus | TagKind::Materials => {
            if let Some(description) = &req.description {
                let sql = format!("UPDATE {} SET description = ? WHERE id = ?", kind.table());
                sqlx::query(&sql)
                    .bind(description)
                    .bind(id)
                    .execute(pool)
                    .await?;
            }
        }
    }

    get_tag(pool, kind, id).await
}

/// ID로 태그를 삭제합니다. 게임과의 연결은 `ON DELETE CASCADE`로 함께 삭제됩니다.
pub async fn delete_tag(pool: &SqlitePool, kind: TagKind, id: &str) -> Result<bool, AppError> {
    let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;

    Ok(result.rows_affected() > 0)
}

/// 주어진 ID 중 존재하지 않는 것을 돌려줍니다.
pub async fn missing_tag_ids(
    conn: &mut SqliteConnection,
    kind: TagKind,
    ids: &[String],
) -> Result<Vec<String>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT id FROM {} WHERE id IN (", kind.table()));
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");

    let found: Vec<String> = qb.build_query_scalar().fetch_all(&mut *conn).await?;
    Ok(ids.iter().filter(|id| !found.contains(id)).cloned().collect())
}

/// 게임의 태그 연결을 주어진 ID 목록으로 교체합니다.
pub async fn replace_game_tags(
    conn: &mut SqliteConnection,
    kind: TagKind,
    game_id: &str,
    ids: &[String],
) -> Result<(), AppError> {
    let (join_table, column) = kind.join_table();

    sqlx::query(&format!("DELETE FROM {join_table} WHERE game_id = ?"))
        .bind(game_id)
        .execute(&mut *conn)
        .await?;

    let insert = format!("INSERT OR IGNORE INTO {join_table} (game_id, {column}) VALUES (?, ?)");
    for id in ids {
        sqlx::query(&insert)
            .bind(game_id)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// JOIN 결과 한 행: 어떤 게임에 연결된 태그인지 + 태그 필드
#[derive(sqlx::FromRow)]
struct GameTagRow {
    game_id: String,
    #[sqlx(flatten)]
    tag: Tag,
}

/// 여러 게임의 태그를 한 번의 쿼리로 가져와 게임 ID별로 묶습니다.
///
/// ```sql
/// focuses ←── game_focuses ──→ games
/// ```
pub async fn tags_for_games(
    pool: &SqlitePool,
    kind: TagKind,
    game_ids: &[String],
) -> Result<HashMap<String, Vec<Tag>>, AppError> {
    let mut grouped: HashMap<String, Vec<Tag>> = HashMap::new();
    if game_ids.is_empty() {
        return Ok(grouped);
    }

    let (join_table, column) = kind.join_table();
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT j.game_id, {} FROM {} t JOIN {join_table} j ON j.{column} = t.id WHERE j.game_id IN (",
        kind.select_columns(),
        kind.table(),
    ));
    let mut separated = qb.separated(", ");
    for id in game_ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(") ORDER BY t.name");

    let rows: Vec<GameTagRow> = qb.build_query_as().fetch_all(pool).await?;
    for row in rows {
        grouped.entry(row.game_id).or_default().push(row.tag);
    }

    Ok(grouped)
}
