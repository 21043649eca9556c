use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::error::{is_unique_violation, AppError};
use crate::models::*;

pub async fn list_languages(pool: &SqlitePool) -> Result<Vec<Language>, AppError> {
    let languages =
        sqlx::query_as::<_, Language>("SELECT id, code, name FROM languages ORDER BY name")
            .fetch_all(pool)
            .await?;

    Ok(languages)
}

pub async fn find_by_code(pool: &SqlitePool, code: &str) -> Result<Option<Language>, AppError> {
    let language =
        sqlx::query_as::<_, Language>("SELECT id, code, name FROM languages WHERE code = ?")
            .bind(code)
            .fetch_optional(pool)
            .await?;

    Ok(language)
}

pub async fn create_language(
    pool: &SqlitePool,
    req: &CreateLanguageRequest,
) -> Result<Language, AppError> {
    let code = req.code.trim().to_ascii_lowercase();
    let name = req.name.trim();
    if code.is_empty() || name.is_empty() {
        return Err(AppError::BadRequest("Language code and name are required".to_string()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    sqlx::query("INSERT INTO languages (id, code, name) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(&code)
        .bind(name)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Language '{code}' already exists"))
            } else {
                AppError::Database(e)
            }
        })?;

    find_by_code(pool, &code)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created language".to_string()))
}

pub async fn missing_language_ids(
    conn: &mut SqliteConnection,
    ids: &[String],
) -> Result<Vec<String>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new("SELECT id FROM languages WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");

    let found: Vec<String> = qb.build_query_scalar().fetch_all(&mut *conn).await?;
    Ok(ids.iter().filter(|id| !found.contains(id)).cloned().collect())
}

pub async fn replace_game_languages(
    conn: &mut SqliteConnection,
    game_id: &str,
    ids: &[String],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM game_languages WHERE game_id = ?")
        .bind(game_id)
        .execute(&mut *conn)
        .await?;

    for id in ids {
        sqlx::query("INSERT OR IGNORE INTO game_languages (game_id, language_id) VALUES (?, ?)")
            .bind(game_id)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

#[derive(sqlx::FromRow)]
struct GameLanguageRow {
    game_id: String,
    #[sqlx(flatten)]
    language: Language,
}

pub async fn languages_for_games(
    pool: &SqlitePool,
    game_ids: &[String],
) -> Result<HashMap<String, Vec<Language>>, AppError> {
    let mut grouped: HashMap<String, Vec<Language>> = HashMap::new();
    if game_ids.is_empty() {
        return Ok(grouped);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT j.game_id, l.id, l.code, l.name FROM languages l \
         JOIN game_languages j ON j.language_id = l.id WHERE j.game_id IN (",
    );
    let mut separated = qb.separated(", ");
    for id in game_ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(") ORDER BY l.name");

    let rows: Vec<GameLanguageRow> = qb.build_query_as().fetch_all(pool).await?;
    for row in rows {
        grouped.entry(row.game_id).or_default().push(row.language);
    }

    Ok(grouped)
}
