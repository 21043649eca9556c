//! 사용자 계정과 API refresh 토큰 저장소

use crate::error::{is_unique_violation, AppError};
use crate::models::user::{RefreshToken, User};
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, username, email, password_hash, is_staff, created_at, updated_at";

pub async fn create_user(
    pool: &SqlitePool,
    id: &str,
    username: &str,
    email: Option<&str>,
    password_hash: &str,
    is_staff: bool,
) -> Result<User, AppError> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, is_staff)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(is_staff)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Username already exists".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// 관리자 계정이 없으면 만듭니다. 이미 같은 이름의 사용자가 있으면 그대로 둡니다.
///
/// 반환값은 (사용자, 새로 만들었는지 여부)입니다.
pub async fn ensure_superuser(
    pool: &SqlitePool,
    username: &str,
    email: Option<&str>,
    password_hash: &str,
) -> Result<(User, bool), AppError> {
    if let Some(existing) = find_by_username(pool, username).await? {
        return Ok((existing, false));
    }

    let id = uuid::Uuid::now_v7().to_string();
    let user = create_user(pool, &id, username, email, password_hash, true).await?;
    Ok((user, true))
}

/// 가장 먼저 만들어진 관리자. 샘플 세션의 소유자로 씁니다.
pub async fn first_staff_user(pool: &SqlitePool) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE is_staff = 1 ORDER BY created_at, id LIMIT 1"
    ))
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// refresh 토큰 해시를 저장합니다.
pub async fn store_refresh_token(
    pool: &SqlitePool,
    user_id: &str,
    token_hash: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(uuid::Uuid::now_v7().to_string())
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// refresh 토큰을 꺼내면서 지웁니다. 같은 토큰으로 두 번 갱신할 수 없습니다.
///
/// 동시에 두 요청이 같은 토큰을 보내도 한쪽만 행을 받습니다.
pub async fn take_refresh_token(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<RefreshToken>, AppError> {
    let token = sqlx::query_as::<_, RefreshToken>(
        "DELETE FROM refresh_tokens WHERE token_hash = ? RETURNING user_id, expires_at",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(token)
}

/// 한 사용자의 refresh 토큰을 모두 폐기합니다 (API 로그아웃).
pub async fn revoke_refresh_tokens(pool: &SqlitePool, user_id: &str) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
