//! # 게임 데이터베이스 쿼리 모듈
//!
//! 게임 카탈로그의 조회, 필터링, 생성, 수정, 삭제를 담당합니다.
//!
//! ## 공개 카탈로그
//! 방문자에게 보이는 게임은 `is_active = 1 AND is_suggestion = 0` 인 행뿐입니다.
//! 승인 대기/거절된 제안은 같은 테이블에 있지만 이 조건으로 걸러집니다.
//!
//! ## 필터 쿼리
//! 다대다 필터는 facet마다 `EXISTS (...)` 서브쿼리 하나로 표현합니다.
//! JOIN으로 필터링하면 한 게임이 여러 번 나오므로 DISTINCT가 필요하지만,
//! EXISTS는 게임 행을 늘리지 않으므로 결과가 항상 중복 없이 나옵니다.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::{languages, tags};
use crate::error::{is_unique_violation, AppError, FieldErrors};
use crate::models::*;
use crate::services::forms::{self, DUPLICATE_GAME_NAME, INVALID_CHOICE};

/// games 테이블 조회 컬럼 (별칭 g)
const GAME_COLUMNS: &str = "g.id, g.name, g.description, g.player_count, g.variants, \
    g.duration, g.is_active, g.is_suggestion, g.approved, g.created_by, g.suggested_by, \
    g.created_at, g.updated_at";

/// 공개 카탈로그 조건
pub(crate) const PUBLIC_CATALOG: &str = "g.is_active = 1 AND g.is_suggestion = 0";

/// 새 게임을 누가, 어떤 상태로 만드는지
#[derive(Debug, Clone, Default)]
pub struct NewGame<'a> {
    /// true면 사용자 제안 (공개 카탈로그에서 숨김)
    pub is_suggestion: bool,
    pub created_by: Option<&'a str>,
    pub suggested_by: Option<&'a str>,
}

// ── 필터 ──

/// LIKE 패턴의 와일드카드(`%`, `_`)와 이스케이프 문자를 이스케이프합니다.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 다대다 facet 하나를 `AND EXISTS (...)`로 추가합니다. 값이 없으면 아무것도 하지 않습니다.
fn push_name_facet(
    qb: &mut QueryBuilder<'_, Sqlite>,
    join_table: &str,
    column: &str,
    table: &str,
    names: &[String],
) {
    if names.is_empty() {
        return;
    }
    qb.push(format!(
        " AND EXISTS (SELECT 1 FROM {join_table} j JOIN {table} t ON t.id = j.{column} \
         WHERE j.game_id = g.id AND t.name IN ("
    ));
    let mut separated = qb.separated(", ");
    for name in names {
        separated.push_bind(name.clone());
    }
    separated.push_unseparated("))");
}

/// 필터 조건을 WHERE 절 뒤에 이어 붙입니다.
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &GameFilter) {
    if !filter.search.is_empty() {
        let pattern = format!("%{}%", escape_like(&filter.search));
        qb.push(" AND (g.name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR g.description LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR g.variants LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    for kind in [TagKind::Focus, TagKind::Materials, TagKind::Labels] {
        let names = match kind {
            TagKind::Focus => &filter.focus,
            TagKind::Materials => &filter.materials,
            TagKind::Labels => &filter.labels,
        };
        let (join_table, column) = kind.join_table();
        push_name_facet(qb, join_table, column, kind.table(), names);
    }
    push_name_facet(
        qb,
        "game_languages",
        "language_id",
        "languages",
        &filter.languages,
    );

    if let Some(player_count) = &filter.player_count {
        qb.push(" AND g.player_count = ").push_bind(player_count.clone());
    }
    if let Some(duration) = &filter.duration {
        qb.push(" AND g.duration = ").push_bind(duration.clone());
    }
}

/// 공개 카탈로그에서 필터에 맞는 게임을 이름순으로 한 페이지 조회합니다.
///
/// `page`는 쿼리스트링의 원문입니다. 범위를 벗어나면 `PageInfo::resolve` 규칙으로 보정됩니다.
pub async fn list_public_games(
    pool: &SqlitePool,
    filter: &GameFilter,
    page: Option<&str>,
) -> Result<Paginated<GameDetail>, AppError> {
    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM games g WHERE ");
    count.push(PUBLIC_CATALOG);
    push_filter(&mut count, filter);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let page = PageInfo::resolve(page, total, GAMES_PER_PAGE);

    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {GAME_COLUMNS} FROM games g WHERE "));
    query.push(PUBLIC_CATALOG);
    push_filter(&mut query, filter);
    query
        .push(" ORDER BY g.name LIMIT ")
        .push_bind(page.per_page)
        .push(" OFFSET ")
        .push_bind(page.offset());
    let games: Vec<Game> = query.build_query_as().fetch_all(pool).await?;

    Ok(Paginated {
        items: with_details(pool, games).await?,
        page,
    })
}

// ── 단건/다건 조회 ──

/// ID로 게임 하나를 조회합니다 (공개 여부와 무관).
pub async fn get_game(pool: &SqlitePool, id: &str) -> Result<Option<Game>, AppError> {
    let game = sqlx::query_as::<_, Game>(&format!("SELECT {GAME_COLUMNS} FROM games g WHERE g.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(game)
}

/// 공개 카탈로그의 게임만 조회합니다. 숨겨진 제안은 None입니다.
pub async fn get_public_game(pool: &SqlitePool, id: &str) -> Result<Option<Game>, AppError> {
    let game = sqlx::query_as::<_, Game>(&format!(
        "SELECT {GAME_COLUMNS} FROM games g WHERE g.id = ? AND {PUBLIC_CATALOG}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(game)
}

/// 공개 카탈로그 게임을 태그와 함께 조회합니다.
pub async fn get_public_game_detail(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<GameDetail>, AppError> {
    match get_public_game(pool, id).await? {
        Some(game) => Ok(with_details(pool, vec![game]).await?.pop()),
        None => Ok(None),
    }
}

/// 게임을 태그와 함께 조회합니다 (공개 여부와 무관, 관리자용).
pub async fn get_game_detail(pool: &SqlitePool, id: &str) -> Result<Option<GameDetail>, AppError> {
    match get_game(pool, id).await? {
        Some(game) => Ok(with_details(pool, vec![game]).await?.pop()),
        None => Ok(None),
    }
}

/// 이름으로 게임을 조회합니다. 샘플 데이터 적재에서 멱등성 확인에 씁니다.
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Game>, AppError> {
    let game = sqlx::query_as::<_, Game>(&format!("SELECT {GAME_COLUMNS} FROM games g WHERE g.name = ?"))
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(game)
}

/// 여러 게임을 ID로 조회해 ID → 상세 맵으로 돌려줍니다.
///
/// `public_only`가 true면 공개 카탈로그 게임만 포함됩니다.
/// 장바구니처럼 순서가 중요한 곳에서는 호출하는 쪽이 자신의 ID 순서대로 꺼내 씁니다.
pub async fn get_game_details(
    pool: &SqlitePool,
    ids: &[String],
    public_only: bool,
) -> Result<HashMap<String, GameDetail>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {GAME_COLUMNS} FROM games g WHERE "));
    if public_only {
        qb.push(PUBLIC_CATALOG).push(" AND ");
    }
    qb.push("g.id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");
    let games: Vec<Game> = qb.build_query_as().fetch_all(pool).await?;

    Ok(with_details(pool, games)
        .await?
        .into_iter()
        .map(|detail| (detail.game.id.clone(), detail))
        .collect())
}

/// 게임 목록에 태그 정보를 채웁니다. 종류별로 쿼리 한 번씩만 실행합니다.
async fn with_details(pool: &SqlitePool, games: Vec<Game>) -> Result<Vec<GameDetail>, AppError> {
    let ids: Vec<String> = games.iter().map(|g| g.id.clone()).collect();

    let mut focus = tags::tags_for_games(pool, TagKind::Focus, &ids).await?;
    let mut materials = tags::tags_for_games(pool, TagKind::Materials, &ids).await?;
    let mut labels = tags::tags_for_games(pool, TagKind::Labels, &ids).await?;
    let mut langs = languages::languages_for_games(pool, &ids).await?;

    Ok(games
        .into_iter()
        .map(|game| GameDetail {
            focus: focus.remove(&game.id).unwrap_or_default(),
            materials: materials.remove(&game.id).unwrap_or_default(),
            labels: labels.remove(&game.id).unwrap_or_default(),
            languages: langs.remove(&game.id).unwrap_or_default(),
            game,
        })
        .collect())
}

// ── 쓰기 ──

/// 태그/언어 ID가 모두 존재하는지 확인합니다. 없으면 필드 에러
async fn check_relations(
    conn: &mut SqliteConnection,
    focus: Option<&[String]>,
    materials: Option<&[String]>,
    labels: Option<&[String]>,
    langs: Option<&[String]>,
) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();

    for (kind, ids) in [
        (TagKind::Focus, focus),
        (TagKind::Materials, materials),
        (TagKind::Labels, labels),
    ] {
        if let Some(ids) = ids {
            if !tags::missing_tag_ids(conn, kind, ids).await?.is_empty() {
                errors.insert(kind.as_str().to_string(), vec![INVALID_CHOICE.to_string()]);
            }
        }
    }
    if let Some(ids) = langs {
        if !languages::missing_language_ids(conn, ids).await?.is_empty() {
            errors.insert("languages".to_string(), vec![INVALID_CHOICE.to_string()]);
        }
    }

    forms::into_result(errors)
}

/// 이름 중복(UNIQUE 위반)을 name 필드 에러로 바꿉니다.
fn duplicate_name(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::field("name", DUPLICATE_GAME_NAME)
    } else {
        AppError::Database(err)
    }
}

/// 게임 한 행과 태그 연결을 삽입합니다. 호출하는 쪽의 트랜잭션 안에서 실행됩니다.
///
/// 입력은 `forms::validate_game`을 통과한 것이어야 합니다.
pub async fn insert_game(
    conn: &mut SqliteConnection,
    input: &GameInput,
    new: &NewGame<'_>,
) -> Result<String, AppError> {
    check_relations(
        conn,
        Some(&input.focus),
        Some(&input.materials),
        Some(&input.labels),
        Some(&input.languages),
    )
    .await?;

    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query(
        r#"
        INSERT INTO games
            (id, name, description, player_count, variants, duration,
             is_suggestion, approved, created_by, suggested_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(&input.player_count)
    .bind(&input.variants)
    .bind(&input.duration)
    .bind(new.is_suggestion)
    .bind(new.created_by)
    .bind(new.suggested_by)
    .execute(&mut *conn)
    .await
    .map_err(duplicate_name)?;

    tags::replace_game_tags(conn, TagKind::Focus, &id, &input.focus).await?;
    tags::replace_game_tags(conn, TagKind::Materials, &id, &input.materials).await?;
    tags::replace_game_tags(conn, TagKind::Labels, &id, &input.labels).await?;
    languages::replace_game_languages(conn, &id, &input.languages).await?;

    Ok(id)
}

/// 게임을 생성하고 태그가 채워진 상세를 반환합니다.
pub async fn create_game(
    pool: &SqlitePool,
    input: &GameInput,
    new: &NewGame<'_>,
) -> Result<GameDetail, AppError> {
    forms::validate_game(input)?;

    let mut tx = pool.begin().await?;
    let id = insert_game(&mut tx, input, new).await?;
    tx.commit().await?;

    get_game_detail(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created game".to_string()))
}

/// 게임 정보를 부분 업데이트합니다.
///
/// ## 반환값
/// - `Ok(Some(GameDetail))`: 업데이트 성공
/// - `Ok(None)`: 해당 ID의 게임이 존재하지 않음
pub async fn update_game(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateGameRequest,
) -> Result<Option<GameDetail>, AppError> {
    let Some(current) = get_game(pool, id).await? else {
        return Ok(None);
    };

    // 현재 값에 변경분을 덮어쓴 뒤 생성과 같은 규칙으로 검증합니다.
    let merged = GameInput {
        name: req.name.clone().unwrap_or(current.name),
        description: req.description.clone().unwrap_or(current.description),
        player_count: req.player_count.clone().unwrap_or(current.player_count),
        duration: req.duration.clone().unwrap_or(current.duration),
        variants: req.variants.clone().unwrap_or(current.variants),
        // focus가 없으면 기존 연결을 유지하므로 검증만 통과시킵니다.
        focus: req.focus.clone().unwrap_or_else(|| vec![String::new()]),
        ..GameInput::default()
    }
    .normalized();
    forms::validate_game(&merged)?;

    let mut tx = pool.begin().await?;
    check_relations(
        &mut tx,
        req.focus.as_deref(),
        req.materials.as_deref(),
        req.labels.as_deref(),
        req.languages.as_deref(),
    )
    .await?;

    sqlx::query(
        r#"
        UPDATE games
        SET name = ?, description = ?, player_count = ?, duration = ?, variants = ?,
            is_active = COALESCE(?, is_active),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&merged.name)
    .bind(&merged.description)
    .bind(&merged.player_count)
    .bind(&merged.duration)
    .bind(&merged.variants)
    .bind(req.is_active)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(duplicate_name)?;

    if let Some(ids) = &req.focus {
        tags::replace_game_tags(&mut tx, TagKind::Focus, id, ids).await?;
    }
    if let Some(ids) = &req.materials {
        tags::replace_game_tags(&mut tx, TagKind::Materials, id, ids).await?;
    }
    if let Some(ids) = &req.labels {
        tags::replace_game_tags(&mut tx, TagKind::Labels, id, ids).await?;
    }
    if let Some(ids) = &req.languages {
        languages::replace_game_languages(&mut tx, id, ids).await?;
    }
    tx.commit().await?;

    get_game_detail(pool, id).await
}

/// 게임을 삭제합니다. 태그 연결, 세션 칸, 제안 기록은 CASCADE로 함께 삭제됩니다.
pub async fn delete_game(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM games WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("relay"), "relay");
    }

    #[test]
    fn filter_adds_one_exists_clause_per_facet() {
        let filter = GameFilter {
            search: "ball".into(),
            focus: vec!["Dribbling".into(), "Passing".into()],
            labels: vec!["Fun".into()],
            duration: Some("10min".into()),
            ..GameFilter::default()
        };
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM games g WHERE ");
        qb.push(PUBLIC_CATALOG);
        push_filter(&mut qb, &filter);
        let sql = qb.sql();

        assert_eq!(sql.matches("EXISTS").count(), 2);
        assert!(sql.contains("game_focuses"));
        assert!(sql.contains("game_labels"));
        assert!(!sql.contains("game_materials"));
        assert!(sql.contains("g.duration = ?"));
        assert_eq!(sql.matches("LIKE").count(), 3);
    }
}
